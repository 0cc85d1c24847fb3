use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trellis_compiler_css::CompileOptions;

pub const DEFAULT_CONFIG_NAME: &str = "trellis.config.json";

/// Trellis configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Site document, relative to the config file
    #[serde(default = "default_document")]
    pub document: String,

    /// Directory compiled stylesheets are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: String,

    #[serde(default)]
    pub breakpoints: Breakpoints,

    /// Attribute rendered nodes carry their id in
    #[serde(default = "default_scope_attribute")]
    pub scope_attribute: String,
}

/// Max widths (px) of the tablet and mobile media queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub tablet: u32,
    pub mobile: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        let options = CompileOptions::default();
        Self {
            tablet: options.tablet_max_width,
            mobile: options.mobile_max_width,
        }
    }
}

fn default_document() -> String {
    "site.json".to_string()
}

fn default_out_dir() -> String {
    "dist".to_string()
}

fn default_scope_attribute() -> String {
    CompileOptions::default().scope_attribute
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn get_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.out_dir)
    }

    /// Compiler options carried by this config, validated
    pub fn compile_options(&self) -> anyhow::Result<CompileOptions> {
        let options = CompileOptions {
            tablet_max_width: self.breakpoints.tablet,
            mobile_max_width: self.breakpoints.mobile,
            scope_attribute: self.scope_attribute.clone(),
        };
        options.validate()?;
        Ok(options)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document: default_document(),
            out_dir: default_out_dir(),
            breakpoints: Breakpoints::default(),
            scope_attribute: default_scope_attribute(),
        }
    }
}

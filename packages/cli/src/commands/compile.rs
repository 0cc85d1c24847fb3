use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use trellis_compiler_css::CompileOptions;
use trellis_editor::{Document, DocumentStore, FileStore};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Document to compile (overrides config)
    pub document: Option<String>,

    /// Compile only this page (id or slug)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,
}

/// One compiled page
#[derive(Debug, Clone, PartialEq)]
pub struct PageCss {
    pub page_id: String,
    pub file_name: String,
    pub css: String,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let options = config.compile_options()?;
    let document_key = args.document.as_deref().unwrap_or(&config.document);

    let document = FileStore::new(cwd).load(document_key)?;

    if !args.stdout {
        println!("{}", "🔨 Compiling Trellis styles...".bright_blue().bold());
    }

    let outputs = compile_pages(&document, args.page.as_deref(), &options)?;

    if args.stdout {
        for output in &outputs {
            print!("{}", output.css);
        }
        return Ok(());
    }

    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };
    fs::create_dir_all(&out_dir)?;

    for output in &outputs {
        let path = out_dir.join(&output.file_name);
        fs::write(&path, &output.css)?;
        println!("  {} {} → {}", "✓".green(), output.page_id, path.display());
    }

    println!();
    println!("{} Compiled {} pages successfully", "✅".green(), outputs.len());
    Ok(())
}

/// Compile every page, or only the one whose id or slug is `only`
pub fn compile_pages(document: &Document, only: Option<&str>, options: &CompileOptions) -> Result<Vec<PageCss>> {
    let pages: Vec<_> = document
        .pages
        .iter()
        .filter(|p| only.map_or(true, |key| p.id == key || p.slug == key))
        .collect();

    if pages.is_empty() {
        return Err(match only {
            Some(key) => anyhow!("No page with id or slug `{}`", key),
            None => anyhow!("Document has no pages"),
        });
    }

    pages
        .into_iter()
        .map(|page| -> Result<PageCss> {
            debug!(page = %page.id, slug = %page.slug, "Compiling page");
            let css = trellis_compiler_css::compile(document, Some(&page.id), options)?;
            Ok(PageCss {
                page_id: page.id.clone(),
                file_name: css_file_name(&page.slug, &page.id),
                css,
            })
        })
        .collect()
}

/// `/` → `index.css`, `/about/team` → `about-team.css`
fn css_file_name(slug: &str, page_id: &str) -> String {
    let stem: Vec<&str> = slug.split('/').filter(|s| !s.is_empty()).collect();
    if stem.is_empty() {
        if slug == "/" {
            "index.css".to_string()
        } else {
            format!("{}.css", page_id)
        }
    } else {
        format!("{}.css", stem.join("-"))
    }
}

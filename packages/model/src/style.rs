//! Per-breakpoint style records.
//!
//! Every node carries a [`ResponsiveStyle`]: one flat property map per
//! [`Breakpoint`]. Maps are ordered so that anything derived from them
//! (compiled CSS, serialized documents) is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the three fixed responsive tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Breakpoint::Desktop, Breakpoint::Tablet, Breakpoint::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakpoint::Desktop => "desktop",
            Breakpoint::Tablet => "tablet",
            Breakpoint::Mobile => "mobile",
        }
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single style property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Blank strings carry no value and are dropped from compiled rules
    pub fn is_blank(&self) -> bool {
        match self {
            StyleValue::Number(n) => !n.is_finite(),
            StyleValue::Text(s) => s.trim().is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{}", n),
            StyleValue::Text(s) => f.write_str(s.trim()),
        }
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

/// Flat map of camelCase property names to values
pub type StyleMap = BTreeMap<String, StyleValue>;

/// Style record with all three breakpoint keys always present
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveStyle {
    #[serde(default)]
    pub desktop: StyleMap,
    #[serde(default)]
    pub tablet: StyleMap,
    #[serde(default)]
    pub mobile: StyleMap,
}

impl ResponsiveStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, breakpoint: Breakpoint) -> &StyleMap {
        match breakpoint {
            Breakpoint::Desktop => &self.desktop,
            Breakpoint::Tablet => &self.tablet,
            Breakpoint::Mobile => &self.mobile,
        }
    }

    pub fn get_mut(&mut self, breakpoint: Breakpoint) -> &mut StyleMap {
        match breakpoint {
            Breakpoint::Desktop => &mut self.desktop,
            Breakpoint::Tablet => &mut self.tablet,
            Breakpoint::Mobile => &mut self.mobile,
        }
    }

    /// Builder-style setter, mostly for tests and the default-node factory
    pub fn with(mut self, breakpoint: Breakpoint, property: &str, value: impl Into<StyleValue>) -> Self {
        self.get_mut(breakpoint).insert(property.to_string(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.desktop.is_empty() && self.tablet.is_empty() && self.mobile.is_empty()
    }

    /// Shallow-merge each breakpoint independently.
    ///
    /// Keys in `patch` overwrite, keys absent from `patch` are preserved.
    pub fn merge(&mut self, patch: &ResponsiveStylePatch) {
        for breakpoint in Breakpoint::ALL {
            if let Some(props) = patch.get(breakpoint) {
                let target = self.get_mut(breakpoint);
                for (key, value) in props {
                    target.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

/// Partial style update; a missing breakpoint means "leave untouched"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveStylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<StyleMap>,
}

impl ResponsiveStylePatch {
    pub fn get(&self, breakpoint: Breakpoint) -> Option<&StyleMap> {
        match breakpoint {
            Breakpoint::Desktop => self.desktop.as_ref(),
            Breakpoint::Tablet => self.tablet.as_ref(),
            Breakpoint::Mobile => self.mobile.as_ref(),
        }
    }

    pub fn set(mut self, breakpoint: Breakpoint, property: &str, value: impl Into<StyleValue>) -> Self {
        let slot = match breakpoint {
            Breakpoint::Desktop => &mut self.desktop,
            Breakpoint::Tablet => &mut self.tablet,
            Breakpoint::Mobile => &mut self.mobile,
        };
        slot.get_or_insert_with(StyleMap::new)
            .insert(property.to_string(), value.into());
        self
    }
}

/// Per-breakpoint visibility flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    #[serde(default = "visible")]
    pub desktop: bool,
    #[serde(default = "visible")]
    pub tablet: bool,
    #[serde(default = "visible")]
    pub mobile: bool,
}

fn visible() -> bool {
    true
}

impl Visibility {
    pub fn is_visible(&self, breakpoint: Breakpoint) -> bool {
        match breakpoint {
            Breakpoint::Desktop => self.desktop,
            Breakpoint::Tablet => self.tablet,
            Breakpoint::Mobile => self.mobile,
        }
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            desktop: true,
            tablet: true,
            mobile: true,
        }
    }
}

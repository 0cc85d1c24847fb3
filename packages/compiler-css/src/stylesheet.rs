//! In-memory stylesheet and its text rendering.

use std::collections::BTreeMap;

/// CSS rule with selector and properties
#[derive(Debug, Clone, PartialEq)]
pub struct CssRule {
    pub selector: String,
    /// Kebab-case property name to value, sorted for stable output
    pub properties: BTreeMap<String, String>,
}

impl CssRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn write(&self, css: &mut String, indent: &str) {
        css.push_str(indent);
        css.push_str(&self.selector);
        css.push_str(" {\n");
        for (key, value) in &self.properties {
            css.push_str(indent);
            css.push_str("  ");
            css.push_str(key);
            css.push_str(": ");
            css.push_str(value);
            css.push_str(";\n");
        }
        css.push_str(indent);
        css.push_str("}\n");
    }
}

/// Rules sharing one `@media` condition
#[derive(Debug, Clone, PartialEq)]
pub struct MediaBlock {
    pub query: String,
    pub rules: Vec<CssRule>,
}

/// CSS document in output order: root variables, raw custom CSS, top-level
/// rules, then one block per media query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VirtualCssDocument {
    pub variables: Vec<(String, String)>,
    pub raw: Vec<String>,
    pub rules: Vec<CssRule>,
    pub media: Vec<MediaBlock>,
}

impl VirtualCssDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.push((name.into(), value.into()));
    }

    pub fn add_raw(&mut self, css: impl Into<String>) {
        self.raw.push(css.into());
    }

    /// Add a rule, unconditioned when `media_query` is `None`.
    ///
    /// All rules for the same query land in one block; empty rules are dropped.
    pub fn add_rule(&mut self, rule: CssRule, media_query: Option<&str>) {
        if rule.is_empty() {
            return;
        }
        match media_query {
            None => self.rules.push(rule),
            Some(query) => match self.media.iter_mut().find(|m| m.query == query) {
                Some(block) => block.rules.push(rule),
                None => self.media.push(MediaBlock {
                    query: query.to_string(),
                    rules: vec![rule],
                }),
            },
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len() + self.media.iter().map(|m| m.rules.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.raw.is_empty() && self.rule_count() == 0
    }

    /// Convert to CSS text
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        if !self.variables.is_empty() {
            css.push_str(":root {\n");
            for (name, value) in &self.variables {
                css.push_str("  ");
                css.push_str(name);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }
            css.push_str("}\n\n");
        }

        for raw in &self.raw {
            css.push_str(raw.trim());
            css.push_str("\n\n");
        }

        for rule in &self.rules {
            rule.write(&mut css, "");
            css.push('\n');
        }

        for block in &self.media {
            css.push_str("@media ");
            css.push_str(&block.query);
            css.push_str(" {\n");
            for rule in &block.rules {
                rule.write(&mut css, "  ");
            }
            css.push_str("}\n\n");
        }

        css
    }
}

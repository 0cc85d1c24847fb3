use crate::naming::{kebab_case, scope_custom_css, token_slug};
use crate::stylesheet::{CssRule, VirtualCssDocument};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use trellis_model::{Breakpoint, Document, Node, StyleMap};

pub type CssResult<T> = Result<T, CssError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CssError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Document has no pages")]
    NoPages,

    #[error("Invalid breakpoints: mobile ({mobile}px) must be narrower than tablet ({tablet}px)")]
    InvalidBreakpoints { tablet: u32, mobile: u32 },

    #[error("Invalid scope attribute '{0}'")]
    InvalidScopeAttribute(String),
}

/// Breakpoint thresholds and the attribute nodes are scoped by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Upper bound of the tablet breakpoint, in px
    pub tablet_max_width: u32,
    /// Upper bound of the mobile breakpoint, in px
    pub mobile_max_width: u32,
    pub scope_attribute: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            tablet_max_width: 1024,
            mobile_max_width: 768,
            scope_attribute: "data-node-id".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn validate(&self) -> CssResult<()> {
        if self.mobile_max_width >= self.tablet_max_width {
            return Err(CssError::InvalidBreakpoints {
                tablet: self.tablet_max_width,
                mobile: self.mobile_max_width,
            });
        }
        let attr = &self.scope_attribute;
        if attr.is_empty() || !attr.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(CssError::InvalidScopeAttribute(attr.clone()));
        }
        Ok(())
    }

    /// Selector matching exactly the node with `id`
    pub fn selector_for(&self, id: &str) -> String {
        format!(
            "[{}=\"{}\"]",
            self.scope_attribute,
            id.replace('\\', "\\\\").replace('"', "\\\"")
        )
    }

    /// Media condition for a breakpoint; `None` for desktop
    pub fn media_query(&self, breakpoint: Breakpoint) -> Option<String> {
        match breakpoint {
            Breakpoint::Desktop => None,
            Breakpoint::Tablet => Some(format!("(max-width: {}px)", self.tablet_max_width)),
            Breakpoint::Mobile => Some(format!("(max-width: {}px)", self.mobile_max_width)),
        }
    }
}

/// Style resolution: walks header, active page and footer and turns
/// per-node style data into one stylesheet
pub struct StyleCompiler {
    options: CompileOptions,
}

impl StyleCompiler {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Evaluate `doc` for `page_id` (the homepage when `None`)
    #[instrument(skip(self, doc), fields(document = %doc.id, pages = doc.pages.len()))]
    pub fn evaluate(&self, doc: &Document, page_id: Option<&str>) -> CssResult<VirtualCssDocument> {
        self.options.validate()?;
        let page = match page_id {
            Some(id) => doc.page(id).ok_or_else(|| CssError::PageNotFound(id.to_string()))?,
            None => doc.homepage().ok_or(CssError::NoPages)?,
        };
        info!(page = %page.id, "Starting style resolution");

        let mut css = VirtualCssDocument::new();
        self.add_tokens(doc, &mut css);

        let mut nodes: Vec<&Node> = Vec::new();
        for root in doc.header.iter().chain(&page.content).chain(&doc.footer) {
            root.walk(&mut |node| nodes.push(node));
        }

        for node in &nodes {
            self.add_custom_css(node, &mut css);
        }
        for node in &nodes {
            self.add_hover(node, Breakpoint::Desktop, &mut css);
        }
        for breakpoint in [Breakpoint::Tablet, Breakpoint::Mobile] {
            for node in &nodes {
                self.add_base_override(node, breakpoint, &mut css);
                self.add_hover(node, breakpoint, &mut css);
            }
        }

        info!(nodes = nodes.len(), rules = css.rule_count(), "Style resolution complete");
        Ok(css)
    }

    fn add_tokens(&self, doc: &Document, css: &mut VirtualCssDocument) {
        for color in &doc.global_styles.colors {
            let slug = token_slug(&color.name);
            if slug.is_empty() || color.value.trim().is_empty() {
                warn!(token = %color.name, "Skipping malformed color token");
                continue;
            }
            debug!(token = %slug, value = %color.value, "Registering color token");
            css.add_variable(format!("--color-{}", slug), color.value.trim());
        }

        for font in &doc.global_styles.typography {
            let slug = token_slug(&font.name);
            if slug.is_empty() || font.font_family.trim().is_empty() {
                warn!(token = %font.name, "Skipping malformed typography token");
                continue;
            }
            css.add_variable(format!("--font-{}", slug), font.font_family.trim());
            if let Some(size) = font.font_size.as_deref().filter(|s| !s.trim().is_empty()) {
                css.add_variable(format!("--font-{}-size", slug), size.trim());
            }
            if let Some(weight) = font.font_weight.as_deref().filter(|s| !s.trim().is_empty()) {
                css.add_variable(format!("--font-{}-weight", slug), weight.trim());
            }
        }
    }

    fn add_custom_css(&self, node: &Node, css: &mut VirtualCssDocument) {
        let Some(custom) = node.custom_css.as_deref() else {
            return;
        };
        if custom.trim().is_empty() {
            return;
        }
        debug!(node_id = %node.id, "Scoping custom CSS");
        css.add_raw(scope_custom_css(custom, &self.options.selector_for(&node.id)));
    }

    fn add_hover(&self, node: &Node, breakpoint: Breakpoint, css: &mut VirtualCssDocument) {
        let Some(hover) = &node.hover_style else {
            return;
        };
        let selector = format!("{}:hover", self.options.selector_for(&node.id));
        if let Some(rule) = build_rule(&node.id, selector, hover.get(breakpoint)) {
            css.add_rule(rule, self.options.media_query(breakpoint).as_deref());
        }
    }

    fn add_base_override(&self, node: &Node, breakpoint: Breakpoint, css: &mut VirtualCssDocument) {
        let selector = self.options.selector_for(&node.id);
        if let Some(rule) = build_rule(&node.id, selector, node.style.get(breakpoint)) {
            css.add_rule(rule, self.options.media_query(breakpoint).as_deref());
        }
    }
}

impl Default for StyleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Rule for one style map; `None` when nothing is left to emit or the map
/// is malformed
fn build_rule(node_id: &str, selector: String, styles: &StyleMap) -> Option<CssRule> {
    if styles.keys().any(|k| k.trim().is_empty()) {
        warn!(node_id = %node_id, "Skipping style map with a blank property name");
        return None;
    }

    let mut rule = CssRule::new(selector);
    for (property, value) in styles {
        if value.is_blank() {
            continue;
        }
        rule.properties.insert(kebab_case(property), value.to_string());
    }
    (!rule.is_empty()).then_some(rule)
}

//! Site documents: pages, shared header/footer trees and global style tokens.

use crate::error::ModelResult;
use crate::id_generator::IdGenerator;
use crate::legacy;
use crate::lenient;
use crate::node::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// One editable tree of a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pageId", rename_all = "lowercase")]
pub enum Scope {
    Header,
    Footer,
    Page(String),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Header => f.write_str("header"),
            Scope::Footer => f.write_str("footer"),
            Scope::Page(id) => write!(f, "page:{}", id),
        }
    }
}

/// A single page and its section tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub is_homepage: bool,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
    #[serde(default, deserialize_with = "lenient::nodes")]
    pub content: Vec<Node>,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            is_homepage: false,
            is_draft: false,
            meta_title: None,
            meta_description: None,
            hero_image: None,
            content: Vec::new(),
        }
    }
}

/// Named color exposed as a CSS custom property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    pub name: String,
    pub value: String,
}

/// Named typography preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyToken {
    pub name: String,
    pub font_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalStyles {
    pub colors: Vec<ColorToken>,
    pub typography: Vec<TypographyToken>,
}

/// Root document: the unit persisted, loaded and wrapped by history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default, deserialize_with = "lenient::nodes")]
    pub header: Vec<Node>,
    #[serde(default, deserialize_with = "lenient::nodes")]
    pub footer: Vec<Node>,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub global_styles: GlobalStyles,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// New document with a single empty homepage
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut home = Page::new(Uuid::new_v4().to_string(), "Home", "/");
        home.is_homepage = true;

        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            theme: String::new(),
            header: Vec::new(),
            footer: Vec::new(),
            pages: vec![home],
            global_styles: GlobalStyles::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse a stored document, recovering legacy shapes first
    pub fn from_json(source: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(source)?;
        Self::from_value(value, &mut IdGenerator::new())
    }

    pub fn from_value(mut value: Value, ids: &mut IdGenerator) -> ModelResult<Self> {
        legacy::upgrade(&mut value, ids);
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> ModelResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    pub fn page_mut(&mut self, page_id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == page_id)
    }

    /// The page flagged as homepage, falling back to the first page
    pub fn homepage(&self) -> Option<&Page> {
        self.pages
            .iter()
            .find(|p| p.is_homepage)
            .or_else(|| self.pages.first())
    }

    pub fn roots(&self, scope: &Scope) -> Option<&Vec<Node>> {
        match scope {
            Scope::Header => Some(&self.header),
            Scope::Footer => Some(&self.footer),
            Scope::Page(id) => self.page(id).map(|p| &p.content),
        }
    }

    pub fn roots_mut(&mut self, scope: &Scope) -> Option<&mut Vec<Node>> {
        match scope {
            Scope::Header => Some(&mut self.header),
            Scope::Footer => Some(&mut self.footer),
            Scope::Page(id) => self.page_mut(id).map(|p| &mut p.content),
        }
    }

    /// Every tree in the document: header, pages in order, footer
    pub fn scopes(&self) -> Vec<Scope> {
        let mut scopes = Vec::with_capacity(self.pages.len() + 2);
        scopes.push(Scope::Header);
        scopes.extend(self.pages.iter().map(|p| Scope::Page(p.id.clone())));
        scopes.push(Scope::Footer);
        scopes
    }

    /// The tree that contains node `id`, if any
    pub fn scope_of(&self, id: &str) -> Option<Scope> {
        self.scopes().into_iter().find(|scope| {
            self.roots(scope)
                .map(|roots| contains(roots, id))
                .unwrap_or(false)
        })
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn contains(roots: &[Node], id: &str) -> bool {
    let mut found = false;
    for root in roots {
        root.walk(&mut |n| found |= n.id == id);
        if found {
            break;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_document_has_homepage() {
        let doc = Document::new("My site");
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.homepage().unwrap().is_homepage);
        assert_eq!(doc.homepage().unwrap().slug, "/");
    }

    #[test]
    fn test_round_trip_json() {
        let doc = Document::new("Round trip");
        let json = doc.to_json_pretty().unwrap();
        let parsed = Document::from_json(&json).unwrap();
        assert_eq!(doc, parsed);
    }

    #[test]
    fn test_scope_of_finds_nested_nodes() {
        let value = json!({
            "id": "d1",
            "name": "Doc",
            "header": [{ "id": "hs", "type": "section", "children": [] }],
            "pages": [{
                "id": "p1",
                "name": "Home",
                "content": [{ "id": "s1", "type": "section", "children": [
                    { "id": "r1", "type": "row", "children": [] }
                ] }]
            }]
        });
        let doc = Document::from_value(value, &mut IdGenerator::from_seed("t")).unwrap();

        assert_eq!(doc.scope_of("hs"), Some(Scope::Header));
        assert_eq!(doc.scope_of("r1"), Some(Scope::Page("p1".to_string())));
        assert_eq!(doc.scope_of("missing"), None);
    }

    #[test]
    fn test_scope_serialization() {
        let json = serde_json::to_value(Scope::Page("p1".to_string())).unwrap();
        assert_eq!(json, json!({ "kind": "page", "pageId": "p1" }));
        let header: Scope = serde_json::from_value(json!({ "kind": "header" })).unwrap();
        assert_eq!(header, Scope::Header);
    }
}

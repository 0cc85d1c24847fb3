//! # Document Mutations
//!
//! High-level semantic operations on Trellis documents. Every change an
//! outside caller makes goes through a [`Mutation`], which becomes one
//! history entry labelled by [`Mutation::description`].
//!
//! ## Mutation Semantics
//!
//! ### Node mutations
//! - Nodes are addressed by id alone; ids are unique across the header,
//!   the footer and every page
//! - Structure is checked against the containment rules; an illegal insert
//!   or move is refused and nothing changes
//! - Locked nodes refuse `MoveNode` and `RemoveNode` (but can be updated,
//!   which is how they get unlocked)
//! - Moves stay within one tree (header, footer or a single page)
//!
//! ### Page mutations
//! - A document always keeps at least one page
//! - Removing the homepage promotes the first remaining page
//!
//! ### Global styles
//! - Tokens are keyed by name; setting an existing name replaces its value

use crate::tree::{self, NodePatch, Placement};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;
use trellis_model::{ColorToken, Document, IdGenerator, NodeId, NodeType, Page, Scope, TypographyToken};

/// Semantic mutations (intent-preserving operations)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Mutation {
    /// Create a default node of `node_type` in `scope`, under or next to `target`
    InsertNode {
        scope: Scope,
        #[serde(default)]
        target: Option<NodeId>,
        node_type: NodeType,
    },

    MoveNode {
        node_id: NodeId,
        target_id: NodeId,
        placement: Placement,
    },

    /// Deep copy with fresh ids, placed right after the original
    DuplicateNode { node_id: NodeId },

    RemoveNode { node_id: NodeId },

    UpdateNode { node_id: NodeId, patch: NodePatch },

    AddPage {
        name: String,
        #[serde(default)]
        slug: Option<String>,
    },

    RemovePage { page_id: String },

    UpdatePage { page_id: String, patch: PagePatch },

    SetHomepage { page_id: String },

    /// Insert or replace a color token by name
    SetColorToken { name: String, value: String },

    RemoveColorToken { name: String },

    /// Insert or replace a typography token by name
    SetTypographyToken { token: TypographyToken },

    RenameDocument { name: String },
}

/// Page settings update; absent fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_image: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Illegal structure: {0}")]
    IllegalStructure(String),

    #[error("Node is locked: {0}")]
    Locked(String),

    #[error("Content does not fit node {0}")]
    InvalidContent(String),

    #[error("A document must keep at least one page")]
    LastPage,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Mutation {
    /// Apply to `doc`, returning the id of anything created (node or page).
    ///
    /// On error `doc` may be partially modified; callers run mutations
    /// against a scratch copy (see [`crate::History::commit`]).
    pub fn apply(&self, doc: &mut Document, ids: &mut IdGenerator) -> Result<Option<String>, MutationError> {
        debug!(mutation = %self.description(), "Applying mutation");

        match self {
            Mutation::InsertNode {
                scope,
                target,
                node_type,
            } => Self::apply_insert(doc, scope, target.as_deref(), *node_type, ids).map(Some),

            Mutation::MoveNode {
                node_id,
                target_id,
                placement,
            } => Self::apply_move(doc, node_id, target_id, *placement).map(|_| None),

            Mutation::DuplicateNode { node_id } => {
                let roots = node_roots(doc, node_id)?;
                tree::duplicate_by_id(roots, node_id, ids)
                    .map(Some)
                    .ok_or_else(|| MutationError::NodeNotFound(node_id.clone()))
            }

            Mutation::RemoveNode { node_id } => {
                ensure_unlocked(doc, node_id)?;
                let roots = node_roots(doc, node_id)?;
                tree::remove_by_id(roots, node_id);
                Ok(None)
            }

            Mutation::UpdateNode { node_id, patch } => {
                let reserved = ids_in_other_trees(doc, node_id);
                let roots = node_roots(doc, node_id)?;
                if tree::update_by_id_reserving(roots, node_id, patch, &reserved) {
                    Ok(None)
                } else {
                    Err(MutationError::InvalidContent(node_id.clone()))
                }
            }

            Mutation::AddPage { name, slug } => Self::apply_add_page(doc, name, slug.as_deref(), ids).map(Some),

            Mutation::RemovePage { page_id } => Self::apply_remove_page(doc, page_id).map(|_| None),

            Mutation::UpdatePage { page_id, patch } => {
                if doc.page(page_id).is_none() {
                    return Err(MutationError::PageNotFound(page_id.clone()));
                }
                if let Some(slug) = &patch.slug {
                    if doc.pages.iter().any(|p| p.id != *page_id && p.slug == *slug) {
                        return Err(MutationError::InvalidInput(format!("slug `{}` is already used", slug)));
                    }
                }
                let page = doc
                    .page_mut(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                patch.apply_to(page);
                Ok(None)
            }

            Mutation::SetHomepage { page_id } => {
                if doc.page(page_id).is_none() {
                    return Err(MutationError::PageNotFound(page_id.clone()));
                }
                for page in &mut doc.pages {
                    page.is_homepage = page.id == *page_id;
                }
                Ok(None)
            }

            Mutation::SetColorToken { name, value } => {
                let name = required("color name", name)?;
                let colors = &mut doc.global_styles.colors;
                match colors.iter_mut().find(|c| c.name == name) {
                    Some(token) => token.value = value.clone(),
                    None => colors.push(ColorToken {
                        name: name.to_string(),
                        value: value.clone(),
                    }),
                }
                Ok(None)
            }

            Mutation::RemoveColorToken { name } => {
                doc.global_styles.colors.retain(|c| c.name != *name);
                Ok(None)
            }

            Mutation::SetTypographyToken { token } => {
                required("typography name", &token.name)?;
                let presets = &mut doc.global_styles.typography;
                match presets.iter_mut().find(|t| t.name == token.name) {
                    Some(existing) => *existing = token.clone(),
                    None => presets.push(token.clone()),
                }
                Ok(None)
            }

            Mutation::RenameDocument { name } => {
                doc.name = required("document name", name)?.to_string();
                Ok(None)
            }
        }
    }

    fn apply_insert(
        doc: &mut Document,
        scope: &Scope,
        target: Option<&str>,
        node_type: NodeType,
        ids: &mut IdGenerator,
    ) -> Result<String, MutationError> {
        let roots = doc
            .roots_mut(scope)
            .ok_or_else(|| MutationError::PageNotFound(scope.to_string()))?;

        if let Some(target) = target {
            if !tree::collect_ids(roots).iter().any(|id| id == target) {
                return Err(MutationError::NodeNotFound(target.to_string()));
            }
        }

        tree::insert_node(roots, target, node_type, ids)
            .ok_or_else(|| MutationError::IllegalStructure(format!("{} cannot be placed here", node_type)))
    }

    fn apply_move(doc: &mut Document, node_id: &str, target_id: &str, placement: Placement) -> Result<(), MutationError> {
        ensure_unlocked(doc, node_id)?;

        let source_scope = doc
            .scope_of(node_id)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        let target_scope =
            scope_holding(doc, target_id).ok_or_else(|| MutationError::NodeNotFound(target_id.to_string()))?;
        if source_scope != target_scope {
            return Err(MutationError::IllegalStructure(format!(
                "cannot move from {} to {}",
                source_scope, target_scope
            )));
        }

        let roots = doc
            .roots_mut(&source_scope)
            .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
        if tree::move_node(roots, node_id, target_id, placement) {
            Ok(())
        } else {
            Err(MutationError::IllegalStructure(format!(
                "{} cannot be dropped {:?} {}",
                node_id, placement, target_id
            )))
        }
    }

    fn apply_add_page(
        doc: &mut Document,
        name: &str,
        slug: Option<&str>,
        ids: &mut IdGenerator,
    ) -> Result<String, MutationError> {
        let name = required("page name", name)?;
        let slug = match slug {
            Some(slug) if !slug.trim().is_empty() => slug.to_string(),
            _ => slugify(name),
        };
        if doc.pages.iter().any(|p| p.slug == slug) {
            return Err(MutationError::InvalidInput(format!("slug `{}` is already used", slug)));
        }

        let page = Page::new(ids.new_id(), name, slug);
        let page_id = page.id.clone();
        doc.pages.push(page);
        Ok(page_id)
    }

    fn apply_remove_page(doc: &mut Document, page_id: &str) -> Result<(), MutationError> {
        let index = doc
            .pages
            .iter()
            .position(|p| p.id == page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))?;
        if doc.pages.len() == 1 {
            return Err(MutationError::LastPage);
        }

        let removed = doc.pages.remove(index);
        if removed.is_homepage {
            if let Some(first) = doc.pages.first_mut() {
                first.is_homepage = true;
            }
        }
        Ok(())
    }

    /// Human-readable label used for history entries
    pub fn description(&self) -> String {
        match self {
            Mutation::InsertNode { node_type, .. } => format!("Add {}", node_type),
            Mutation::MoveNode { .. } => "Move element".to_string(),
            Mutation::DuplicateNode { .. } => "Duplicate element".to_string(),
            Mutation::RemoveNode { .. } => "Delete element".to_string(),
            Mutation::UpdateNode { patch, .. } => describe_patch(patch).to_string(),
            Mutation::AddPage { name, .. } => format!("Add page \"{}\"", name),
            Mutation::RemovePage { .. } => "Delete page".to_string(),
            Mutation::UpdatePage { .. } => "Update page settings".to_string(),
            Mutation::SetHomepage { .. } => "Set homepage".to_string(),
            Mutation::SetColorToken { name, .. } => format!("Set color \"{}\"", name),
            Mutation::RemoveColorToken { name } => format!("Remove color \"{}\"", name),
            Mutation::SetTypographyToken { token } => format!("Set typography \"{}\"", token.name),
            Mutation::RenameDocument { .. } => "Rename site".to_string(),
        }
    }

    /// Node the mutation acts on, if any
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Mutation::MoveNode { node_id, .. }
            | Mutation::DuplicateNode { node_id }
            | Mutation::RemoveNode { node_id }
            | Mutation::UpdateNode { node_id, .. } => Some(node_id),
            Mutation::InsertNode { target, .. } => target.as_deref(),
            _ => None,
        }
    }
}

impl PagePatch {
    fn apply_to(&self, page: &mut Page) {
        if let Some(name) = &self.name {
            page.name = name.clone();
        }
        if let Some(slug) = &self.slug {
            page.slug = slug.clone();
        }
        if let Some(is_draft) = self.is_draft {
            page.is_draft = is_draft;
        }
        if let Some(title) = &self.meta_title {
            page.meta_title = optional(title);
        }
        if let Some(description) = &self.meta_description {
            page.meta_description = optional(description);
        }
        if let Some(image) = &self.hero_image {
            page.hero_image = optional(image);
        }
    }
}

fn describe_patch(patch: &NodePatch) -> &'static str {
    let style_only = patch.content.is_none()
        && patch.name.is_none()
        && patch.locked.is_none()
        && patch.visibility.is_none()
        && patch.custom_css.is_none();

    if patch.content.is_some() {
        "Edit content"
    } else if style_only && (patch.style.is_some() || patch.hover_style.is_some()) {
        "Change style"
    } else if patch.locked == Some(true) {
        "Lock element"
    } else if patch.locked == Some(false) {
        "Unlock element"
    } else if patch.visibility.is_some() {
        "Change visibility"
    } else {
        "Update element"
    }
}

fn node_roots<'a>(doc: &'a mut Document, node_id: &str) -> Result<&'a mut Vec<trellis_model::Node>, MutationError> {
    let scope = doc
        .scope_of(node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    doc.roots_mut(&scope)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))
}

/// Identifiers used outside the tree that holds `node_id`
fn ids_in_other_trees(doc: &Document, node_id: &str) -> HashSet<String> {
    let own = doc.scope_of(node_id);
    doc.scopes()
        .into_iter()
        .filter(|scope| Some(scope) != own.as_ref())
        .filter_map(|scope| doc.roots(&scope).map(|roots| tree::collect_ids(roots)))
        .flatten()
        .collect()
}

fn ensure_unlocked(doc: &Document, node_id: &str) -> Result<(), MutationError> {
    let scope = doc
        .scope_of(node_id)
        .ok_or_else(|| MutationError::NodeNotFound(node_id.to_string()))?;
    let locked = doc
        .roots(&scope)
        .and_then(|roots| tree::find_by_id(roots, node_id))
        .map(|node| node.locked)
        .unwrap_or(false);
    if locked {
        Err(MutationError::Locked(node_id.to_string()))
    } else {
        Ok(())
    }
}

/// Tree holding `id` as a node or as an item (tab panels are addressed by item id)
fn scope_holding(doc: &Document, id: &str) -> Option<Scope> {
    doc.scopes().into_iter().find(|scope| {
        doc.roots(scope)
            .map(|roots| tree::collect_ids(roots).iter().any(|i| i == id))
            .unwrap_or(false)
    })
}

fn required<'a>(what: &str, value: &'a str) -> Result<&'a str, MutationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(MutationError::InvalidInput(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}

fn optional(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// `"About Us!"` -> `"/about-us"`
pub fn slugify(name: &str) -> String {
    let words: Vec<String> = name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    format!("/{}", words.join("-"))
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq)]
pub struct MutationResult {
    /// New version number
    pub version: u64,

    /// Id of the node or page the mutation created
    pub created: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        let mut doc = Document::new("Site");
        doc.pages[0].id = "home".to_string();
        doc
    }

    #[test]
    fn test_mutation_serialization() {
        let mutation = Mutation::MoveNode {
            node_id: "a".to_string(),
            target_id: "b".to_string(),
            placement: Placement::After,
        };
        let value = serde_json::to_value(&mutation).unwrap();
        assert_eq!(
            value,
            json!({ "type": "moveNode", "nodeId": "a", "targetId": "b", "placement": "after" })
        );

        let parsed: Mutation = serde_json::from_value(json!({
            "type": "insertNode",
            "scope": { "kind": "page", "pageId": "home" },
            "nodeType": "section"
        }))
        .unwrap();
        assert_eq!(
            parsed,
            Mutation::InsertNode {
                scope: Scope::Page("home".to_string()),
                target: None,
                node_type: NodeType::Section,
            }
        );
    }

    #[test]
    fn test_descriptions() {
        let insert = Mutation::InsertNode {
            scope: Scope::Header,
            target: None,
            node_type: NodeType::Section,
        };
        assert_eq!(insert.description(), "Add section");

        let edit = Mutation::UpdateNode {
            node_id: "n".to_string(),
            patch: NodePatch::new().content(json!({ "text": "Hi" })),
        };
        assert_eq!(edit.description(), "Edit content");

        let style = Mutation::UpdateNode {
            node_id: "n".to_string(),
            patch: NodePatch::new().style(trellis_model::Breakpoint::Mobile, "color", "red"),
        };
        assert_eq!(style.description(), "Change style");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("About Us!"), "/about-us");
        assert_eq!(slugify("  Pricing  "), "/pricing");
        assert_eq!(slugify("FAQ & Help"), "/faq-help");
    }

    #[test]
    fn test_insert_into_missing_page() {
        let mut doc = doc();
        let mut ids = IdGenerator::from_seed("m");
        let result = Mutation::InsertNode {
            scope: Scope::Page("nope".to_string()),
            target: None,
            node_type: NodeType::Section,
        }
        .apply(&mut doc, &mut ids);
        assert!(matches!(result, Err(MutationError::PageNotFound(_))));
    }

    #[test]
    fn test_page_lifecycle() {
        let mut doc = doc();
        let mut ids = IdGenerator::from_seed("m");

        let about = Mutation::AddPage {
            name: "About Us".to_string(),
            slug: None,
        }
        .apply(&mut doc, &mut ids)
        .unwrap()
        .unwrap();
        assert_eq!(doc.page(&about).unwrap().slug, "/about-us");

        let duplicate_slug = Mutation::AddPage {
            name: "About us".to_string(),
            slug: None,
        }
        .apply(&mut doc, &mut ids);
        assert!(matches!(duplicate_slug, Err(MutationError::InvalidInput(_))));

        Mutation::RemovePage {
            page_id: "home".to_string(),
        }
        .apply(&mut doc, &mut ids)
        .unwrap();
        assert!(doc.page(&about).unwrap().is_homepage);

        let last = Mutation::RemovePage { page_id: about }.apply(&mut doc, &mut ids);
        assert_eq!(last, Err(MutationError::LastPage));
    }

    #[test]
    fn test_set_homepage_is_exclusive() {
        let mut doc = doc();
        let mut ids = IdGenerator::from_seed("m");
        let blog = Mutation::AddPage {
            name: "Blog".to_string(),
            slug: Some("/journal".to_string()),
        }
        .apply(&mut doc, &mut ids)
        .unwrap()
        .unwrap();

        Mutation::SetHomepage { page_id: blog.clone() }
            .apply(&mut doc, &mut ids)
            .unwrap();
        assert_eq!(doc.pages.iter().filter(|p| p.is_homepage).count(), 1);
        assert_eq!(doc.homepage().unwrap().id, blog);
    }

    #[test]
    fn test_update_page_clears_empty_meta() {
        let mut doc = doc();
        let mut ids = IdGenerator::from_seed("m");
        let patch = PagePatch {
            meta_title: Some("Welcome".to_string()),
            ..Default::default()
        };
        Mutation::UpdatePage {
            page_id: "home".to_string(),
            patch,
        }
        .apply(&mut doc, &mut ids)
        .unwrap();
        assert_eq!(doc.pages[0].meta_title.as_deref(), Some("Welcome"));

        let patch = PagePatch {
            meta_title: Some(String::new()),
            ..Default::default()
        };
        Mutation::UpdatePage {
            page_id: "home".to_string(),
            patch,
        }
        .apply(&mut doc, &mut ids)
        .unwrap();
        assert_eq!(doc.pages[0].meta_title, None);
    }

    #[test]
    fn test_update_page_refuses_taken_slug() {
        let mut doc = doc();
        let mut ids = IdGenerator::from_seed("m");
        let blog = Mutation::AddPage {
            name: "Blog".to_string(),
            slug: Some("/blog".to_string()),
        }
        .apply(&mut doc, &mut ids)
        .unwrap()
        .unwrap();
        let home_slug = doc.page("home").unwrap().slug.clone();

        let slug_update = |slug: &str| Mutation::UpdatePage {
            page_id: blog.clone(),
            patch: PagePatch {
                slug: Some(slug.to_string()),
                ..Default::default()
            },
        };

        let taken = slug_update(&home_slug).apply(&mut doc, &mut ids);
        assert!(matches!(taken, Err(MutationError::InvalidInput(_))));
        assert_eq!(doc.page(&blog).unwrap().slug, "/blog");

        // Keeping its own slug is not a clash
        slug_update("/blog").apply(&mut doc, &mut ids).unwrap();
        slug_update("/news").apply(&mut doc, &mut ids).unwrap();
        assert_eq!(doc.page(&blog).unwrap().slug, "/news");
    }

    #[test]
    fn test_color_tokens_upsert_by_name() {
        let mut doc = doc();
        let mut ids = IdGenerator::from_seed("m");
        for value in ["#111", "#222"] {
            Mutation::SetColorToken {
                name: "primary".to_string(),
                value: value.to_string(),
            }
            .apply(&mut doc, &mut ids)
            .unwrap();
        }
        assert_eq!(doc.global_styles.colors.len(), 1);
        assert_eq!(doc.global_styles.colors[0].value, "#222");

        Mutation::RemoveColorToken {
            name: "primary".to_string(),
        }
        .apply(&mut doc, &mut ids)
        .unwrap();
        assert!(doc.global_styles.colors.is_empty());

        let blank = Mutation::SetColorToken {
            name: " ".to_string(),
            value: "#000".to_string(),
        }
        .apply(&mut doc, &mut ids);
        assert!(matches!(blank, Err(MutationError::InvalidInput(_))));
    }
}

//! # Edit Session Management
//!
//! An EditSession is one user's view of a document: which page is open,
//! what is selected, and the identifier generator new nodes draw from.
//! Selection and active page are repaired after every history move so they
//! never point at something that no longer exists.

use crate::document::EditorDocument;
use crate::mutations::{Mutation, MutationResult};
use crate::pipeline::{Pipeline, PipelineResult};
use crate::store::DocumentStore;
use crate::suggest::{ContentSuggester, SuggestionAction, SuggestionError, SuggestionRequest};
use crate::tree::{self, NodePatch};
use crate::EditorError;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use trellis_compiler_css::CompileOptions;
use trellis_model::{Document, IdGenerator, Node, NodeId, Scope};

/// One step of the selection breadcrumb trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crumb {
    pub id: NodeId,
    pub label: String,
}

/// Single-user edit session
pub struct EditSession {
    document: EditorDocument,
    ids: IdGenerator,
    active_page: String,
    selection: Option<NodeId>,
    pipeline: Pipeline,
}

impl EditSession {
    /// Open `document`; the homepage becomes the active page
    pub fn new(document: EditorDocument) -> Self {
        let active_page = document
            .current()
            .homepage()
            .map(|p| p.id.clone())
            .unwrap_or_default();
        Self {
            document,
            ids: IdGenerator::new(),
            active_page,
            selection: None,
            pipeline: Pipeline::new(),
        }
    }

    pub fn open(store: &dyn DocumentStore, key: &str) -> Result<Self, EditorError> {
        Ok(Self::new(EditorDocument::load(store, key)?))
    }

    pub fn with_ids(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_compile_options(mut self, options: CompileOptions) -> Self {
        self.pipeline = Pipeline::with_options(options);
        self
    }

    pub fn document(&self) -> &EditorDocument {
        &self.document
    }

    /// Current snapshot
    pub fn current(&self) -> &Document {
        self.document.current()
    }

    pub fn active_page(&self) -> &str {
        &self.active_page
    }

    pub fn set_active_page(&mut self, page_id: &str) -> Result<(), EditorError> {
        if self.current().page(page_id).is_none() {
            return Err(EditorError::PageNotFound(page_id.to_string()));
        }
        self.active_page = page_id.to_string();
        // Selection belongs to the page being left
        let doc = self.document.current();
        let left_behind = self
            .selection
            .as_deref()
            .is_some_and(|id| matches!(doc.scope_of(id), Some(Scope::Page(ref p)) if p != page_id));
        if left_behind {
            self.selection = None;
        }
        Ok(())
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Select node `id`, or clear the selection with `None`
    pub fn select(&mut self, id: Option<&str>) -> Result<(), EditorError> {
        match id {
            None => self.selection = None,
            Some(id) => {
                if self.find(id).is_none() {
                    return Err(EditorError::NodeNotFound(id.to_string()));
                }
                self.selection = Some(id.to_string());
            }
        }
        Ok(())
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.as_deref().and_then(|id| self.find(id))
    }

    /// Locate node `id` in whichever tree holds it
    pub fn find(&self, id: &str) -> Option<&Node> {
        let doc = self.current();
        let scope = doc.scope_of(id)?;
        tree::find_by_id(doc.roots(&scope)?, id)
    }

    /// Ancestor trail of the selection, outermost first
    pub fn breadcrumbs(&self) -> Vec<Crumb> {
        let Some(id) = self.selection.as_deref() else {
            return Vec::new();
        };
        let doc = self.current();
        doc.scope_of(id)
            .and_then(|scope| doc.roots(&scope))
            .and_then(|roots| tree::find_path(roots, id))
            .map(|path| {
                path.into_iter()
                    .map(|node| Crumb {
                        id: node.id.clone(),
                        label: node.label().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Apply mutation; a created node becomes the selection
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        let result = self.document.apply(mutation, &mut self.ids)?;

        match mutation {
            Mutation::InsertNode { .. } | Mutation::DuplicateNode { .. } => {
                self.selection = result.created.clone();
            }
            Mutation::AddPage { .. } => {
                if let Some(page_id) = &result.created {
                    self.active_page = page_id.clone();
                    self.selection = None;
                }
            }
            _ => {}
        }
        self.repair();
        Ok(result)
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.document.undo();
        self.repair();
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.document.redo();
        self.repair();
        moved
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        let moved = self.document.jump_to(index);
        self.repair();
        moved
    }

    /// Drop a selection or active page the current snapshot no longer has
    fn repair(&mut self) {
        let doc = self.document.current();
        if doc.page(&self.active_page).is_none() {
            if let Some(home) = doc.homepage() {
                debug!(from = %self.active_page, to = %home.id, "Active page vanished, switching to homepage");
                self.active_page = home.id.clone();
            }
        }
        let vanished = self.selection.as_deref().is_some_and(|id| doc.scope_of(id).is_none());
        if vanished {
            self.selection = None;
        }
    }

    /// Ask `suggester` for new content for node `node_id` and apply it as an
    /// ordinary content edit. On any failure the node is left unchanged.
    pub fn apply_suggestion(
        &mut self,
        node_id: &str,
        action: SuggestionAction,
        suggester: &dyn ContentSuggester,
    ) -> Result<MutationResult, EditorError> {
        let node = self
            .find(node_id)
            .ok_or_else(|| EditorError::NodeNotFound(node_id.to_string()))?;
        let node_type = node.node_type();
        let content = node
            .content_value()
            .ok_or(SuggestionError::Unsupported(node_type))?;

        let request = SuggestionRequest {
            node_id: node_id.to_string(),
            node_type,
            content,
            action,
        };
        info!(node_id = %node_id, action = %request.action, "Requesting content suggestion");

        let Value::Object(replacement) = suggester.suggest(&request)? else {
            return Err(SuggestionError::NotAnObject.into());
        };

        let mutation = Mutation::UpdateNode {
            node_id: node_id.to_string(),
            patch: NodePatch {
                content: Some(replacement),
                ..Default::default()
            },
        };
        self.apply(&mutation)
    }

    /// Stylesheet for the current snapshot and active page
    pub fn css(&mut self) -> Result<PipelineResult, EditorError> {
        let revision = self.document.history().revision();
        let result = self
            .pipeline
            .css(self.document.current(), revision, &self.active_page)?;
        Ok(result)
    }

    pub fn save(&mut self, store: &mut dyn DocumentStore) -> Result<(), EditorError> {
        self.document.save(store)
    }
}

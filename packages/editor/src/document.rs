//! # Document Handle
//!
//! An [`EditorDocument`] is one document under edit: its history of
//! snapshots, a version counter and whether it has unsaved changes.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Apply* (↔ Undo/Redo) → Save
//!   ↓        ↓                    ↓
//! Store   History entries       Store
//! ```

use crate::history::History;
use crate::mutations::{Mutation, MutationResult};
use crate::post_effects::PostEffectEngine;
use crate::store::DocumentStore;
use crate::EditorError;
use std::sync::Arc;
use tracing::{info, warn};
use trellis_model::{Document, IdGenerator};

/// Editable Trellis document
#[derive(Debug)]
pub struct EditorDocument {
    /// Key the document is loaded from and saved under
    pub key: String,

    /// Current version number (increments on each applied mutation)
    pub version: u64,

    history: History<Document>,
    effects: PostEffectEngine,
    dirty: bool,
}

impl EditorDocument {
    pub fn new(key: impl Into<String>, document: Document) -> Self {
        Self {
            key: key.into(),
            version: 0,
            history: History::new(document),
            effects: PostEffectEngine::new(),
            dirty: false,
        }
    }

    /// Load from `store`; a failed load yields no document at all
    pub fn load(store: &dyn DocumentStore, key: &str) -> Result<Self, EditorError> {
        let document = store.load(key)?;
        info!(key = %key, document = %document.id, "Opened document");
        Ok(Self::new(key, document))
    }

    pub fn with_effects(mut self, effects: PostEffectEngine) -> Self {
        self.effects = effects;
        self
    }

    /// Current snapshot
    pub fn current(&self) -> &Document {
        self.history.current()
    }

    pub fn snapshot(&self) -> Arc<Document> {
        self.history.current_arc()
    }

    pub fn history(&self) -> &History<Document> {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply mutation (with post-effects) as one history entry
    pub fn apply(&mut self, mutation: &Mutation, ids: &mut IdGenerator) -> Result<MutationResult, EditorError> {
        let before = self.history.current_arc();
        let effects = &self.effects;
        let created = self.history.commit(mutation.description(), |doc| {
            effects.apply_with_effects(mutation, &before, doc, ids)
        })?;

        self.version += 1;
        self.dirty = true;
        Ok(MutationResult {
            version: self.version,
            created,
        })
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo();
        self.moved(moved)
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo();
        self.moved(moved)
    }

    pub fn jump_to(&mut self, index: usize) -> bool {
        let moved = self.history.jump_to(index);
        self.moved(moved)
    }

    fn moved(&mut self, moved: bool) -> bool {
        if moved {
            self.version += 1;
            self.dirty = true;
        }
        moved
    }

    /// Hand the current snapshot to `store`.
    ///
    /// The dirty flag clears only on success; history is never touched.
    pub fn save(&mut self, store: &mut dyn DocumentStore) -> Result<(), EditorError> {
        match store.save(&self.key, self.history.current()) {
            Ok(()) => {
                self.dirty = false;
                info!(key = %self.key, version = self.version, "Saved document");
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Save failed, document stays dirty");
                Err(e.into())
            }
        }
    }
}

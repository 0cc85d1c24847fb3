//! # Undo/Redo History
//!
//! Snapshot-based linear history.
//!
//! ## Design
//!
//! - Every entry holds a complete snapshot of the document
//! - `commit` clones the current snapshot, runs the mutator on the copy and
//!   appends it as a new entry; entries after the current index are dropped
//! - Undo, redo and jumps only move the index; they never copy
//! - A failed mutator leaves entries and index exactly as they were
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = History::new(document);
//!
//! history.commit("Rename site", |doc| {
//!     doc.name = "New name".to_string();
//!     Ok::<_, MutationError>(())
//! })?;
//!
//! history.undo();
//! history.redo();
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Description of the entry created for the initial document
pub const INITIAL_DESCRIPTION: &str = "Loaded document";

#[derive(Debug, Clone)]
struct Entry<T> {
    snapshot: Arc<T>,
    description: String,
    timestamp: DateTime<Utc>,
    revision: u64,
}

/// Read-only view of an entry, for history scrubbers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInfo {
    pub index: usize,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub is_current: bool,
}

/// Linear history of immutable snapshots
#[derive(Debug)]
pub struct History<T> {
    entries: Vec<Entry<T>>,
    index: usize,
    next_revision: u64,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T) -> Self {
        Self {
            entries: vec![Entry {
                snapshot: Arc::new(initial),
                description: INITIAL_DESCRIPTION.to_string(),
                timestamp: Utc::now(),
                revision: 0,
            }],
            index: 0,
            next_revision: 1,
        }
    }

    /// Snapshot at the current index
    pub fn current(&self) -> &T {
        &self.entries[self.index].snapshot
    }

    /// Shared handle to the current snapshot
    pub fn current_arc(&self) -> Arc<T> {
        Arc::clone(&self.entries[self.index].snapshot)
    }

    /// Run `mutator` on a copy of the current snapshot and record the result.
    ///
    /// On `Err` nothing is recorded and the error is handed back.
    #[instrument(level = "debug", skip_all)]
    pub fn commit<R, E, F>(&mut self, description: impl Into<String>, mutator: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let mut working = (*self.entries[self.index].snapshot).clone();
        let output = mutator(&mut working)?;

        let description = description.into();
        self.entries.truncate(self.index + 1);
        self.entries.push(Entry {
            snapshot: Arc::new(working),
            description,
            timestamp: Utc::now(),
            revision: self.next_revision,
        });
        self.next_revision += 1;
        self.index = self.entries.len() - 1;

        debug!(index = self.index, description = %self.entries[self.index].description, "Committed history entry");
        Ok(output)
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Step back one entry; `false` at the start
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one entry; `false` at the end
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Make `index` current; out-of-range requests are ignored
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            debug!(index, len = self.entries.len(), "Ignored out-of-range history jump");
            return false;
        }
        self.index = index;
        true
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Identity of the current snapshot; unlike the index it never repeats
    /// after a truncating commit
    pub fn revision(&self) -> u64 {
        self.entries[self.index].revision
    }

    pub fn entries(&self) -> Vec<EntryInfo> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| EntryInfo {
                index,
                description: entry.description.clone(),
                timestamp: entry.timestamp,
                is_current: index == self.index,
            })
            .collect()
    }

    /// Label of the change an undo would revert
    pub fn undo_description(&self) -> Option<&str> {
        if self.can_undo() {
            Some(&self.entries[self.index].description)
        } else {
            None
        }
    }

    /// Label of the change a redo would reapply
    pub fn redo_description(&self) -> Option<&str> {
        self.entries.get(self.index + 1).map(|e| e.description.as_str())
    }
}

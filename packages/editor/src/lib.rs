//! # Trellis Editor
//!
//! Core document editing engine for Trellis sites.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Document, Node tree, tokens          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document lifecycle + mutations      │
//! │  - Tree queries and structural edits        │
//! │  - Containment rules shared with drag UI    │
//! │  - Mutations + post-effects per commit      │
//! │  - Snapshot history (undo/redo/jump)        │
//! │  - Session: page, selection, suggestions    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ compiler-css: Document → stylesheet         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are immutable**: every edit produces a new history entry
//! 2. **Refusal is a no-op**: an illegal edit leaves the document untouched
//! 3. **One rule table**: drag feedback and enforcement agree by construction
//! 4. **Collaborators at the edge**: storage and suggestions are traits
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trellis_editor::{EditSession, FileStore, Mutation};
//!
//! let mut store = FileStore::new("./sites");
//! let mut session = EditSession::open(&store, "site")?;
//!
//! session.apply(&Mutation::InsertNode {
//!     scope: Scope::Page(session.active_page().to_string()),
//!     target: None,
//!     node_type: NodeType::Section,
//! })?;
//!
//! let css = session.css()?.css;
//! session.undo();
//! session.save(&mut store)?;
//! ```

mod document;
mod errors;
pub mod factory;
mod history;
mod mutations;
mod pipeline;
mod post_effects;
pub mod rules;
mod session;
mod store;
mod suggest;
pub mod tree;

pub use document::EditorDocument;
pub use errors::EditorError;
pub use factory::default_node;
pub use history::{EntryInfo, History, INITIAL_DESCRIPTION};
pub use mutations::{slugify, Mutation, MutationError, MutationResult, PagePatch};
pub use pipeline::{Pipeline, PipelineResult};
pub use post_effects::{PostEffect, PostEffectEngine, RebalanceColumns, TouchTimestamp};
pub use rules::{can_drop, is_allowed};
pub use session::{Crumb, EditSession};
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};
pub use suggest::{ContentSuggester, SuggestionAction, SuggestionError, SuggestionRequest};
pub use tree::{NodePatch, Placement};

// Re-export common types for convenience
pub use trellis_compiler_css::CompileOptions;
pub use trellis_model::{Document, IdGenerator, Node, NodeType, Scope};

//! Error types for the editor

use crate::suggest::SuggestionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Suggestion error: {0}")]
    Suggestion(#[from] SuggestionError),

    #[error("Style compilation error: {0}")]
    Css(#[from] trellis_compiler_css::CssError),

    #[error("Model error: {0}")]
    Model(#[from] trellis_model::ModelError),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}

use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Content does not match the `{node_type}` contract: {message}")]
    ContentMismatch { node_type: String, message: String },

    #[error("`{node_type}` nodes carry no content")]
    NoContent { node_type: String },
}

impl ModelError {
    pub fn content_mismatch(node_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ContentMismatch {
            node_type: node_type.into(),
            message: message.into(),
        }
    }
}

//! Content-suggestion collaborator.
//!
//! A suggester receives a node's kind and current content and returns a
//! replacement content object. The editor applies the result as an ordinary
//! content update, so it is validated, undoable and labelled like any edit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use trellis_model::{NodeId, NodeType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SuggestionAction {
    Improve,
    Shorten,
    Lengthen,
    Retone { tone: String },
    Generate,
}

impl fmt::Display for SuggestionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionAction::Improve => f.write_str("improve"),
            SuggestionAction::Shorten => f.write_str("shorten"),
            SuggestionAction::Lengthen => f.write_str("lengthen"),
            SuggestionAction::Retone { tone } => write!(f, "retone ({})", tone),
            SuggestionAction::Generate => f.write_str("generate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub node_id: NodeId,
    pub node_type: NodeType,
    pub content: Value,
    #[serde(flatten)]
    pub action: SuggestionAction,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SuggestionError {
    #[error("Suggestion service failed: {0}")]
    Failed(String),

    #[error("{0} nodes have no content to suggest")]
    Unsupported(NodeType),

    #[error("Suggestion is not a content object")]
    NotAnObject,
}

pub trait ContentSuggester {
    /// Replacement content for the request's node
    fn suggest(&self, request: &SuggestionRequest) -> Result<Value, SuggestionError>;
}

impl<F> ContentSuggester for F
where
    F: Fn(&SuggestionRequest) -> Result<Value, SuggestionError>,
{
    fn suggest(&self, request: &SuggestionRequest) -> Result<Value, SuggestionError> {
        self(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = SuggestionRequest {
            node_id: "n1".to_string(),
            node_type: NodeType::Heading,
            content: json!({ "text": "Hi", "level": 2 }),
            action: SuggestionAction::Retone {
                tone: "playful".to_string(),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["action"], "retone");
        assert_eq!(value["tone"], "playful");
        assert_eq!(value["nodeType"], "heading");
    }

    #[test]
    fn test_closures_are_suggesters() {
        let shout = |req: &SuggestionRequest| -> Result<Value, SuggestionError> {
            let text = req.content["text"].as_str().unwrap_or_default().to_uppercase();
            Ok(json!({ "text": text }))
        };
        let request = SuggestionRequest {
            node_id: "n1".to_string(),
            node_type: NodeType::Text,
            content: json!({ "text": "quiet" }),
            action: SuggestionAction::Improve,
        };
        assert_eq!(shout.suggest(&request).unwrap(), json!({ "text": "QUIET" }));
    }
}

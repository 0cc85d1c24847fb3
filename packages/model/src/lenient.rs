//! Lenient child-list loading.
//!
//! Documents may have been written by an older schema. A node that cannot be
//! read (missing `id`, missing or unknown `type`, mistyped content) is dropped
//! from its list with a warning; its siblings still load.

use crate::node::Node;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// `deserialize_with` target for every `Vec<Node>` field
pub fn nodes<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(parse_nodes(raw.unwrap_or_default()))
}

/// Parse each value independently, skipping the ones that are not nodes
pub fn parse_nodes(raw: Vec<Value>) -> Vec<Node> {
    raw.into_iter()
        .filter_map(|value| {
            let id = value.get("id").and_then(Value::as_str).map(String::from);
            let node_type = value.get("type").and_then(Value::as_str).map(String::from);

            match serde_json::from_value::<Node>(value) {
                Ok(node) => Some(node),
                Err(e) => {
                    warn!(
                        id = id.as_deref().unwrap_or("<missing>"),
                        node_type = node_type.as_deref().unwrap_or("<missing>"),
                        error = %e,
                        "Skipping malformed node"
                    );
                    None
                }
            }
        })
        .collect()
}

//! One-time recovery of legacy document shapes.
//!
//! Older documents stored a page's elements as a flat `sections` list and
//! allowed rows, columns or bare elements directly at a root. Before typed
//! loading, such pages are rewritten so every root entry is a section and
//! every stray node is wrapped in the section → row → column chain it is
//! missing.

use crate::id_generator::IdGenerator;
use crate::node::NodeType;
use serde_json::{json, Map, Value};
use tracing::{debug, info};

/// Rewrite legacy shapes in place; returns the number of wrapped nodes
pub fn upgrade(document: &mut Value, ids: &mut IdGenerator) -> usize {
    let Some(doc) = document.as_object_mut() else {
        return 0;
    };

    let mut wrapped = 0;

    if let Some(Value::Array(pages)) = doc.get_mut("pages") {
        for page in pages.iter_mut().filter_map(Value::as_object_mut) {
            adopt_flat_sections(page);
            if let Some(Value::Array(content)) = page.get_mut("content") {
                wrapped += wrap_roots(content, ids);
            }
        }
    }

    for key in ["header", "footer"] {
        if let Some(Value::Array(roots)) = doc.get_mut(key) {
            wrapped += wrap_roots(roots, ids);
        }
    }

    if wrapped > 0 {
        info!(wrapped, "Recovered legacy document structure");
    }
    wrapped
}

/// Move a legacy `sections` list to `content` when the page has none
fn adopt_flat_sections(page: &mut Map<String, Value>) {
    let has_content = matches!(page.get("content"), Some(Value::Array(_)));
    if has_content {
        return;
    }
    if let Some(sections) = page.remove("sections") {
        if sections.is_array() {
            debug!("Adopting legacy `sections` list as page content");
            page.insert("content".to_string(), sections);
        }
    }
}

fn wrap_roots(roots: &mut [Value], ids: &mut IdGenerator) -> usize {
    let mut wrapped = 0;
    for root in roots.iter_mut() {
        // Untyped and unknown nodes are left for the lenient loader to skip
        let node_type = root
            .get("type")
            .and_then(Value::as_str)
            .and_then(|t| t.parse::<NodeType>().ok());
        let Some(node_type) = node_type else {
            continue;
        };

        let replacement = match node_type {
            NodeType::Section => continue,
            NodeType::Row => section(vec![root.take()], ids),
            NodeType::Column => section(vec![row(vec![root.take()], ids)], ids),
            _ => section(vec![row(vec![column(vec![root.take()], ids)], ids)], ids),
        };
        *root = replacement;
        wrapped += 1;
    }
    wrapped
}

fn section(children: Vec<Value>, ids: &mut IdGenerator) -> Value {
    json!({ "id": ids.new_id(), "type": "section", "children": children })
}

fn row(children: Vec<Value>, ids: &mut IdGenerator) -> Value {
    json!({ "id": ids.new_id(), "type": "row", "children": children })
}

fn column(children: Vec<Value>, ids: &mut IdGenerator) -> Value {
    json!({
        "id": ids.new_id(),
        "type": "column",
        "style": { "desktop": { "flexBasis": "100%" }, "tablet": {}, "mobile": {} },
        "children": children
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_sections_are_wrapped() {
        let mut doc = json!({
            "pages": [{
                "id": "p1",
                "name": "Home",
                "sections": [
                    { "id": "h1", "type": "heading", "content": { "text": "Hi" } },
                    { "id": "s1", "type": "section", "children": [] }
                ]
            }]
        });
        let mut ids = IdGenerator::from_seed("w");

        assert_eq!(upgrade(&mut doc, &mut ids), 1);

        let content = doc["pages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "section");
        assert_eq!(content[0]["children"][0]["type"], "row");
        assert_eq!(content[0]["children"][0]["children"][0]["type"], "column");
        assert_eq!(content[0]["children"][0]["children"][0]["children"][0]["id"], "h1");
        assert_eq!(content[1]["id"], "s1");
        assert!(doc["pages"][0].get("sections").is_none());
    }

    #[test]
    fn test_stray_row_in_header_gets_a_section() {
        let mut doc = json!({
            "header": [{ "id": "r1", "type": "row", "children": [] }]
        });
        let mut ids = IdGenerator::from_seed("w");

        upgrade(&mut doc, &mut ids);

        assert_eq!(doc["header"][0]["type"], "section");
        assert_eq!(doc["header"][0]["children"][0]["id"], "r1");
    }

    #[test]
    fn test_unknown_types_are_not_wrapped() {
        let mut doc = json!({
            "footer": [
                { "id": "x1", "type": "carousel" },
                { "id": "h1", "type": "heading" }
            ]
        });
        let mut ids = IdGenerator::from_seed("w");

        assert_eq!(upgrade(&mut doc, &mut ids), 1);
        assert_eq!(doc["footer"][0], json!({ "id": "x1", "type": "carousel" }));
        assert_eq!(doc["footer"][1]["type"], "section");
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_normalized_document_is_untouched() {
        let mut doc = json!({
            "pages": [{ "id": "p1", "content": [{ "id": "s1", "type": "section", "children": [] }] }]
        });
        let before = doc.clone();
        let mut ids = IdGenerator::from_seed("w");

        assert_eq!(upgrade(&mut doc, &mut ids), 0);
        assert_eq!(doc, before);
        assert_eq!(ids.issued(), 0);
    }
}

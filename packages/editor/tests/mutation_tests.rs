//! Comprehensive mutation tests

#![recursion_limit = "256"]

use serde_json::json;
use trellis_editor::tree::{self, WIDTH_PROPERTY};
use trellis_editor::{
    Document, EditorDocument, EditorError, IdGenerator, Mutation, MutationError, NodePatch, NodeType, Placement,
    Scope,
};
use trellis_model::Breakpoint;

fn site() -> Document {
    let value = json!({
        "id": "site",
        "name": "Site",
        "header": [
            { "id": "hs", "type": "section", "children": [
                { "id": "hr", "type": "row", "children": [
                    { "id": "hc", "type": "column", "children": [
                        { "id": "nav", "type": "navbar", "content": { "brand": "Acme", "links": [
                            { "id": "l1", "label": "Home", "href": "/" }
                        ] } }
                    ] }
                ] }
            ] }
        ],
        "pages": [{
            "id": "home", "name": "Home", "slug": "/", "isHomepage": true,
            "content": [
                { "id": "s1", "type": "section", "children": [
                    { "id": "r1", "type": "row", "children": [
                        { "id": "c1", "type": "column", "style": { "desktop": { "flexBasis": "50%" } }, "children": [
                            { "id": "h1", "type": "heading", "content": { "text": "Welcome", "level": 1 },
                              "style": { "desktop": { "color": "red", "fontSize": "12px" } } },
                            { "id": "t1", "type": "text", "content": { "text": "Hello" } }
                        ] },
                        { "id": "c2", "type": "column", "style": { "desktop": { "flexBasis": "50%" } }, "children": [
                            { "id": "b1", "type": "button", "content": { "label": "Go", "href": "#" }, "locked": true }
                        ] }
                    ] }
                ] }
            ]
        }]
    });
    Document::from_value(value, &mut IdGenerator::from_seed("load")).unwrap()
}

fn editor() -> (EditorDocument, IdGenerator) {
    (EditorDocument::new("site", site()), IdGenerator::from_seed("m"))
}

fn page(doc: &EditorDocument) -> &[trellis_editor::Node] {
    &doc.current().pages[0].content
}

fn width(doc: &EditorDocument, id: &str) -> String {
    tree::find_by_id(page(doc), id).unwrap().style.desktop[WIDTH_PROPERTY].to_string()
}

fn child_ids(doc: &EditorDocument, id: &str) -> Vec<String> {
    tree::find_by_id(page(doc), id)
        .and_then(|n| n.children())
        .map(|c| c.iter().map(|n| n.id.clone()).collect())
        .unwrap_or_default()
}

#[test]
fn test_removing_column_rebalances_remaining_column() {
    let (mut doc, mut ids) = editor();
    assert_eq!(width(&doc, "c1"), "50%");

    // Only the node itself is checked for a lock, not its descendants
    doc.apply(&Mutation::RemoveNode { node_id: "c2".into() }, &mut ids)
        .unwrap();

    assert_eq!(child_ids(&doc, "r1"), vec!["c1"]);
    assert_eq!(width(&doc, "c1"), "100%");

    // Undo brings back both halves
    assert!(doc.undo());
    assert_eq!(child_ids(&doc, "r1").len(), 2);
    assert_eq!(width(&doc, "c1"), "50%");
}

#[test]
fn test_inserting_column_gives_three_equal_shares() {
    let (mut doc, mut ids) = editor();
    let result = doc
        .apply(
            &Mutation::InsertNode {
                scope: Scope::Page("home".into()),
                target: Some("r1".into()),
                node_type: NodeType::Column,
            },
            &mut ids,
        )
        .unwrap();
    let new_column = result.created.unwrap();

    for id in ["c1", "c2", new_column.as_str()] {
        assert_eq!(width(&doc, id), "33.33%");
    }
}

#[test]
fn test_update_preserves_unnamed_style_properties() {
    let (mut doc, mut ids) = editor();
    doc.apply(
        &Mutation::UpdateNode {
            node_id: "h1".into(),
            patch: NodePatch::new().style(Breakpoint::Desktop, "color", "blue"),
        },
        &mut ids,
    )
    .unwrap();

    let heading = tree::find_by_id(page(&doc), "h1").unwrap();
    assert_eq!(heading.style.desktop["color"].to_string(), "blue");
    assert_eq!(heading.style.desktop["fontSize"].to_string(), "12px");
}

#[test]
fn test_locked_node_refuses_move_and_remove() {
    let (mut doc, mut ids) = editor();

    let removed = doc.apply(&Mutation::RemoveNode { node_id: "b1".into() }, &mut ids);
    assert!(matches!(removed, Err(EditorError::Mutation(MutationError::Locked(_)))));

    let moved = doc.apply(
        &Mutation::MoveNode {
            node_id: "b1".into(),
            target_id: "t1".into(),
            placement: Placement::After,
        },
        &mut ids,
    );
    assert!(matches!(moved, Err(EditorError::Mutation(MutationError::Locked(_)))));

    // Updates still go through, which is how a node gets unlocked
    doc.apply(
        &Mutation::UpdateNode {
            node_id: "b1".into(),
            patch: NodePatch::new().locked(false),
        },
        &mut ids,
    )
    .unwrap();
    doc.apply(&Mutation::RemoveNode { node_id: "b1".into() }, &mut ids)
        .unwrap();
    assert!(tree::find_by_id(page(&doc), "b1").is_none());
}

#[test]
fn test_illegal_move_is_refused_without_history_entry() {
    let (mut doc, mut ids) = editor();
    let before = serde_json::to_string(doc.current()).unwrap();

    let result = doc.apply(
        &Mutation::MoveNode {
            node_id: "r1".into(),
            target_id: "c1".into(),
            placement: Placement::Inside,
        },
        &mut ids,
    );

    assert!(matches!(result, Err(EditorError::Mutation(MutationError::IllegalStructure(_)))));
    assert_eq!(doc.history().len(), 1);
    assert_eq!(serde_json::to_string(doc.current()).unwrap(), before);
}

#[test]
fn test_moves_stay_within_one_tree() {
    let (mut doc, mut ids) = editor();
    let result = doc.apply(
        &Mutation::MoveNode {
            node_id: "t1".into(),
            target_id: "nav".into(),
            placement: Placement::After,
        },
        &mut ids,
    );
    assert!(matches!(result, Err(EditorError::Mutation(MutationError::IllegalStructure(_)))));
}

#[test]
fn test_move_into_empty_column() {
    let (mut doc, mut ids) = editor();
    let empty = doc
        .apply(
            &Mutation::InsertNode {
                scope: Scope::Page("home".into()),
                target: Some("r1".into()),
                node_type: NodeType::Column,
            },
            &mut ids,
        )
        .unwrap()
        .created
        .unwrap();

    doc.apply(
        &Mutation::MoveNode {
            node_id: "t1".into(),
            target_id: empty.clone(),
            placement: Placement::Inside,
        },
        &mut ids,
    )
    .unwrap();

    assert_eq!(child_ids(&doc, &empty), vec!["t1"]);
    assert_eq!(child_ids(&doc, "c1"), vec!["h1"]);
}

#[test]
fn test_duplicate_column_rebalances_row() {
    let (mut doc, mut ids) = editor();
    let copy = doc
        .apply(&Mutation::DuplicateNode { node_id: "c1".into() }, &mut ids)
        .unwrap()
        .created
        .unwrap();

    assert_eq!(child_ids(&doc, "r1"), vec!["c1".to_string(), copy.clone(), "c2".to_string()]);
    assert_eq!(width(&doc, &copy), "33.33%");
    assert!(tree::validate_tree(page(&doc)).is_empty());
}

#[test]
fn test_duplicate_row_keeps_custom_widths() {
    let (mut doc, mut ids) = editor();
    for (id, share) in [("c1", "70%"), ("c2", "30%")] {
        doc.apply(
            &Mutation::UpdateNode {
                node_id: id.into(),
                patch: NodePatch::new().style(Breakpoint::Desktop, WIDTH_PROPERTY, share),
            },
            &mut ids,
        )
        .unwrap();
    }

    let copy = doc
        .apply(&Mutation::DuplicateNode { node_id: "r1".into() }, &mut ids)
        .unwrap()
        .created
        .unwrap();

    assert_eq!(child_ids(&doc, "s1"), vec!["r1".to_string(), copy.clone()]);
    let widths: Vec<String> = child_ids(&doc, &copy).iter().map(|id| width(&doc, id)).collect();
    assert_eq!(widths, vec!["70%", "30%"]);
    assert_eq!(width(&doc, "c1"), "70%");
    assert_eq!(width(&doc, "c2"), "30%");
}

#[test]
fn test_header_nodes_are_editable() {
    let (mut doc, mut ids) = editor();
    doc.apply(
        &Mutation::UpdateNode {
            node_id: "nav".into(),
            patch: NodePatch::new().content(json!({ "brand": "Acme Inc" })),
        },
        &mut ids,
    )
    .unwrap();

    let nav = tree::find_by_id(&doc.current().header, "nav").unwrap();
    assert_eq!(nav.content_value().unwrap()["brand"], "Acme Inc");
    assert_eq!(nav.content_value().unwrap()["links"][0]["id"], "l1");
}

#[test]
fn test_content_contract_violation_is_refused() {
    let (mut doc, mut ids) = editor();
    let result = doc.apply(
        &Mutation::UpdateNode {
            node_id: "h1".into(),
            patch: NodePatch::new().content(json!({ "level": "big" })),
        },
        &mut ids,
    );
    assert!(matches!(result, Err(EditorError::Mutation(MutationError::InvalidContent(_)))));
    assert_eq!(doc.history().len(), 1);
}

#[test]
fn test_content_items_cannot_reuse_ids_from_other_trees() {
    let (mut doc, mut ids) = editor();
    let result = doc.apply(
        &Mutation::UpdateNode {
            node_id: "nav".into(),
            patch: NodePatch::new().content(json!({ "links": [
                { "id": "l1", "label": "Home", "href": "/" },
                { "id": "h1", "label": "About", "href": "/about" }
            ] })),
        },
        &mut ids,
    );
    assert!(matches!(result, Err(EditorError::Mutation(MutationError::InvalidContent(_)))));
    assert_eq!(doc.history().len(), 1);

    // A fresh id is fine
    doc.apply(
        &Mutation::UpdateNode {
            node_id: "nav".into(),
            patch: NodePatch::new().content(json!({ "links": [
                { "id": "l1", "label": "Home", "href": "/" },
                { "id": "l2", "label": "About", "href": "/about" }
            ] })),
        },
        &mut ids,
    )
    .unwrap();
    let nav = tree::find_by_id(&doc.current().header, "nav").unwrap();
    assert_eq!(nav.item_ids(), vec!["l1", "l2"]);
}

#[test]
fn test_unknown_nodes_are_reported() {
    let (mut doc, mut ids) = editor();
    for mutation in [
        Mutation::RemoveNode { node_id: "ghost".into() },
        Mutation::DuplicateNode { node_id: "ghost".into() },
        Mutation::UpdateNode {
            node_id: "ghost".into(),
            patch: NodePatch::new().name("x"),
        },
        Mutation::InsertNode {
            scope: Scope::Page("home".into()),
            target: Some("ghost".into()),
            node_type: NodeType::Text,
        },
    ] {
        let result = doc.apply(&mutation, &mut ids);
        assert!(
            matches!(result, Err(EditorError::Mutation(MutationError::NodeNotFound(_)))),
            "{:?}",
            mutation
        );
    }
    assert_eq!(doc.history().len(), 1);
}

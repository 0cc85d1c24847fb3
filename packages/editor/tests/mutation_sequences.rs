//! Tests for longer mutation sequences
//!
//! This tests:
//! - Move + update + delete chains
//! - Undo/redo sequences and redo truncation
//! - History jumps
//! - Document integrity after operations

use serde_json::json;
use trellis_editor::tree;
use trellis_editor::{
    Document, EditSession, EditorDocument, IdGenerator, Mutation, NodePatch, NodeType, Placement, Scope,
};

fn site() -> Document {
    let value = json!({
        "id": "site",
        "name": "Site",
        "pages": [{
            "id": "home", "name": "Home", "slug": "/", "isHomepage": true,
            "content": [
                { "id": "s1", "type": "section", "children": [
                    { "id": "r1", "type": "row", "children": [
                        { "id": "c1", "type": "column", "children": [
                            { "id": "h1", "type": "heading", "content": { "text": "v0", "level": 1 } },
                            { "id": "t1", "type": "text", "content": { "text": "Hello" } }
                        ] },
                        { "id": "c2", "type": "column", "children": [] }
                    ] }
                ] }
            ]
        }]
    });
    Document::from_value(value, &mut IdGenerator::from_seed("load")).unwrap()
}

fn text_of(doc: &Document, id: &str) -> String {
    tree::find_by_id(&doc.pages[0].content, id)
        .and_then(|n| n.content_value())
        .map(|v| v["text"].as_str().unwrap_or_default().to_string())
        .unwrap_or_default()
}

fn edit_text(id: &str, text: &str) -> Mutation {
    Mutation::UpdateNode {
        node_id: id.to_string(),
        patch: NodePatch::new().content(json!({ "text": text })),
    }
}

#[test]
fn test_move_then_delete_sequence() {
    let mut doc = EditorDocument::new("site", site());
    let mut ids = IdGenerator::from_seed("seq");

    // Move t1 into the empty column
    doc.apply(
        &Mutation::MoveNode {
            node_id: "t1".into(),
            target_id: "c2".into(),
            placement: Placement::Inside,
        },
        &mut ids,
    )
    .unwrap();

    // Verify move worked
    let c2 = tree::find_by_id(&doc.current().pages[0].content, "c2").unwrap();
    assert_eq!(c2.children().unwrap().len(), 1);

    // Delete c2 (takes t1 with it)
    doc.apply(&Mutation::RemoveNode { node_id: "c2".into() }, &mut ids)
        .unwrap();
    let roots = &doc.current().pages[0].content;
    assert!(tree::find_by_id(roots, "c2").is_none());
    assert!(tree::find_by_id(roots, "t1").is_none());

    // Undo delete (restores both)
    assert!(doc.undo());
    let roots = &doc.current().pages[0].content;
    assert!(tree::find_by_id(roots, "c2").is_some());
    assert!(tree::find_by_id(roots, "t1").is_some());

    // Undo move (t1 back under c1)
    assert!(doc.undo());
    let path = tree::find_path(&doc.current().pages[0].content, "t1").unwrap();
    let ids: Vec<&str> = path.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "r1", "c1", "t1"]);
}

#[test]
fn test_multiple_text_updates_with_undo_redo() {
    let mut doc = EditorDocument::new("site", site());
    let mut ids = IdGenerator::from_seed("seq");

    for i in 1..=3 {
        doc.apply(&edit_text("h1", &format!("v{}", i)), &mut ids)
            .unwrap();
    }
    assert_eq!(text_of(doc.current(), "h1"), "v3");

    assert!(doc.undo());
    assert!(doc.undo());
    assert_eq!(text_of(doc.current(), "h1"), "v1");

    assert!(doc.redo());
    assert_eq!(text_of(doc.current(), "h1"), "v2");

    // Undo everything, then one more undo is a no-op
    assert!(doc.undo());
    assert!(doc.undo());
    assert!(!doc.undo());
    assert_eq!(text_of(doc.current(), "h1"), "v0");
}

#[test]
fn test_commit_after_undo_discards_redo() {
    let mut doc = EditorDocument::new("site", site());
    let mut ids = IdGenerator::from_seed("seq");

    doc.apply(&edit_text("h1", "A"), &mut ids).unwrap();
    doc.apply(&edit_text("h1", "B"), &mut ids).unwrap();
    assert!(doc.undo());
    doc.apply(&edit_text("h1", "C"), &mut ids).unwrap();

    let history = doc.history();
    assert_eq!(history.len(), 3);
    assert!(!history.can_redo());
    assert_eq!(text_of(doc.current(), "h1"), "C");

    // B is gone for good
    assert!(doc.undo());
    assert_eq!(text_of(doc.current(), "h1"), "A");
}

#[test]
fn test_undo_restores_deep_equal_snapshot() {
    let original = site();
    let mut doc = EditorDocument::new("site", original.clone());
    let mut ids = IdGenerator::from_seed("seq");

    doc.apply(
        &Mutation::InsertNode {
            scope: Scope::Page("home".into()),
            target: Some("c2".into()),
            node_type: NodeType::Image,
        },
        &mut ids,
    )
    .unwrap();
    doc.apply(&Mutation::DuplicateNode { node_id: "c1".into() }, &mut ids)
        .unwrap();
    assert_ne!(doc.current(), &original);

    assert!(doc.jump_to(0));
    assert_eq!(doc.current(), &original);

    assert!(doc.jump_to(2));
    assert_eq!(doc.history().index(), 2);
    assert_eq!(doc.current().pages[0].content[0].children().unwrap()[0].children().unwrap().len(), 3);
}

#[test]
fn test_duplicate_gets_fresh_ids_and_equal_content() {
    let mut doc = EditorDocument::new("site", site());
    let mut ids = IdGenerator::from_seed("seq");

    let copy = doc
        .apply(&Mutation::DuplicateNode { node_id: "c1".into() }, &mut ids)
        .unwrap()
        .created
        .unwrap();

    let roots = &doc.current().pages[0].content;
    let source = tree::find_by_id(roots, "c1").unwrap();
    let clone = tree::find_by_id(roots, &copy).unwrap();

    let mut source_ids = Vec::new();
    source.walk(&mut |n| source_ids.push(n.id.clone()));
    let mut clone_ids = Vec::new();
    clone.walk(&mut |n| clone_ids.push(n.id.clone()));
    assert_eq!(source_ids.len(), clone_ids.len());
    assert!(clone_ids.iter().all(|id| !source_ids.contains(id)));

    let source_children = source.children().unwrap();
    let clone_children = clone.children().unwrap();
    for (a, b) in source_children.iter().zip(clone_children) {
        assert_eq!(a.content_value(), b.content_value());
        assert_eq!(a.node_type(), b.node_type());
    }
    assert!(tree::validate_tree(roots).is_empty());
}

#[test]
fn test_session_keeps_selection_and_page_consistent() {
    let mut session = EditSession::new(EditorDocument::new("site", site())).with_ids(IdGenerator::from_seed("seq"));

    let about = session
        .apply(&Mutation::AddPage {
            name: "About".into(),
            slug: None,
        })
        .unwrap()
        .created
        .unwrap();
    assert_eq!(session.active_page(), about);

    let section = session
        .apply(&Mutation::InsertNode {
            scope: Scope::Page(about.clone()),
            target: None,
            node_type: NodeType::Section,
        })
        .unwrap()
        .created
        .unwrap();
    assert_eq!(session.selection(), Some(section.as_str()));

    // Undo the insert: the selection vanishes with the node
    assert!(session.undo());
    assert_eq!(session.selection(), None);

    // Undo the page: the session falls back to the homepage
    assert!(session.undo());
    assert_eq!(session.active_page(), "home");
    assert!(session.current().page(&about).is_none());
}

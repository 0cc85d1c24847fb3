use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use serde_json::{json, Value};
use trellis_editor::tree;
use trellis_editor::{Document, EditorDocument, IdGenerator, Mutation, NodeType, Scope};

fn document(sections: usize) -> Document {
    let content: Vec<Value> = (0..sections)
        .map(|s| {
            json!({
                "id": format!("s{}", s),
                "type": "section",
                "children": [{
                    "id": format!("s{}-r", s),
                    "type": "row",
                    "children": (0..3).map(|c| json!({
                        "id": format!("s{}-c{}", s, c),
                        "type": "column",
                        "children": (0..5).map(|t| json!({
                            "id": format!("s{}-c{}-t{}", s, c, t),
                            "type": "text",
                            "content": { "text": "Lorem ipsum" }
                        })).collect::<Vec<_>>()
                    })).collect::<Vec<_>>()
                }]
            })
        })
        .collect();

    let value = json!({
        "id": "bench",
        "name": "Bench",
        "pages": [{ "id": "home", "name": "Home", "isHomepage": true, "content": content }]
    });
    Document::from_value(value, &mut IdGenerator::from_seed("b")).unwrap()
}

fn find_last_node(c: &mut Criterion) {
    let doc = document(50);
    let roots = &doc.pages[0].content;
    c.bench_function("find_last_node", |b| {
        b.iter(|| tree::find_by_id(black_box(roots), black_box("s49-c2-t4")))
    });
}

fn insert_column_with_history(c: &mut Criterion) {
    let doc = document(50);
    c.bench_function("insert_column_with_history", |b| {
        b.iter_batched(
            || (EditorDocument::new("bench", doc.clone()), IdGenerator::from_seed("i")),
            |(mut editor, mut ids)| {
                editor
                    .apply(
                        &Mutation::InsertNode {
                            scope: Scope::Page("home".to_string()),
                            target: Some("s25-r".to_string()),
                            node_type: NodeType::Column,
                        },
                        &mut ids,
                    )
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

fn move_across_sections(c: &mut Criterion) {
    let doc = document(50);
    c.bench_function("move_across_sections", |b| {
        b.iter_batched(
            || doc.pages[0].content.clone(),
            |mut roots| tree::move_node(&mut roots, "s0-c0-t0", "s49-c2", trellis_editor::Placement::Inside),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, find_last_node, insert_column_with_history, move_across_sections);
criterion_main!(benches);

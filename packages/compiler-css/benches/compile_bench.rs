use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use trellis_compiler_css::compile_to_css;
use trellis_model::{Document, IdGenerator};

fn styled_column(n: usize) -> Value {
    json!({
        "id": format!("c{}", n),
        "type": "column",
        "style": { "desktop": { "flexBasis": "25%" }, "mobile": { "flexBasis": "100%" } },
        "children": (0..6).map(|i| json!({
            "id": format!("c{}-t{}", n, i),
            "type": "text",
            "content": { "text": "Lorem ipsum" },
            "customCss": "selector { line-height: 1.6; }",
            "hoverStyle": {
                "desktop": { "color": "#333", "textDecoration": "underline" },
                "tablet": { "color": "#555" }
            }
        })).collect::<Vec<_>>()
    })
}

fn document(sections: usize) -> Document {
    let content: Vec<Value> = (0..sections)
        .map(|s| {
            json!({
                "id": format!("s{}", s),
                "type": "section",
                "children": [{
                    "id": format!("s{}-r", s),
                    "type": "row",
                    "children": (0..4).map(|c| styled_column(s * 4 + c)).collect::<Vec<_>>()
                }]
            })
        })
        .collect();

    let value = json!({
        "id": "bench",
        "name": "Bench",
        "globalStyles": {
            "colors": [{ "name": "primary", "value": "#3366FF" }, { "name": "accent", "value": "#FF6633" }]
        },
        "pages": [{ "id": "home", "name": "Home", "isHomepage": true, "content": content }]
    });
    Document::from_value(value, &mut IdGenerator::from_seed("b")).unwrap()
}

fn compile_small_page(c: &mut Criterion) {
    let doc = document(2);
    c.bench_function("compile_small_page", |b| {
        b.iter(|| compile_to_css(black_box(&doc), None))
    });
}

fn compile_large_page(c: &mut Criterion) {
    let doc = document(40);
    c.bench_function("compile_large_page", |b| {
        b.iter(|| compile_to_css(black_box(&doc), None))
    });
}

criterion_group!(benches, compile_small_page, compile_large_page);
criterion_main!(benches);

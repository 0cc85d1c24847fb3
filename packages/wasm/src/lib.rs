use serde_json::json;
use trellis_compiler_css::compile_to_css;
use trellis_editor::{can_drop, Document, EditSession, EditorDocument, Mutation, Placement};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(context: &str, error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, error))
}

/// Edit session handle for the browser renderer.
///
/// Structured values cross the boundary as JSON strings.
#[wasm_bindgen]
pub struct Editor {
    session: EditSession,
}

#[wasm_bindgen]
impl Editor {
    /// Open a stored document (legacy shapes are recovered)
    #[wasm_bindgen(constructor)]
    pub fn new(document_json: &str) -> Result<Editor, JsValue> {
        let document = Document::from_json(document_json).map_err(|e| js_error("Load error", e))?;
        Ok(Self::from_document(document))
    }

    /// Apply a mutation; returns `{ "version": n, "created": id | null }`
    pub fn apply(&mut self, mutation_json: &str) -> Result<String, JsValue> {
        let mutation: Mutation =
            serde_json::from_str(mutation_json).map_err(|e| js_error("Invalid mutation", e))?;
        let result = self
            .session
            .apply(&mutation)
            .map_err(|e| js_error("Mutation refused", e))?;
        Ok(json!({ "version": result.version, "created": result.created }).to_string())
    }

    pub fn undo(&mut self) -> bool {
        self.session.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.redo()
    }

    #[wasm_bindgen(js_name = jumpTo)]
    pub fn jump_to(&mut self, index: usize) -> bool {
        self.session.jump_to(index)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.document().history().can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.document().history().can_redo()
    }

    /// History entries for the scrubber
    #[wasm_bindgen(js_name = historyJson)]
    pub fn history_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.document().history().entries())
            .map_err(|e| js_error("Serialization error", e))
    }

    /// Would dropping `dragged_id` at `target_id` be accepted?
    #[wasm_bindgen(js_name = canDrop)]
    pub fn can_drop(&self, dragged_id: &str, target_id: &str, placement: &str) -> bool {
        let Ok(placement) = serde_json::from_value::<Placement>(json!(placement)) else {
            return false;
        };
        let doc = self.session.current();
        doc.scope_of(dragged_id)
            .and_then(|scope| doc.roots(&scope))
            .is_some_and(|roots| can_drop(roots, dragged_id, target_id, placement))
    }

    #[wasm_bindgen(js_name = documentJson)]
    pub fn document_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.current()).map_err(|e| js_error("Serialization error", e))
    }

    /// Stylesheet for the active page (cached between edits)
    pub fn css(&mut self) -> Result<String, JsValue> {
        self.session
            .css()
            .map(|result| result.css)
            .map_err(|e| js_error("CSS compile error", e))
    }

    #[wasm_bindgen(getter, js_name = activePage)]
    pub fn active_page(&self) -> String {
        self.session.active_page().to_string()
    }

    #[wasm_bindgen(js_name = setActivePage)]
    pub fn set_active_page(&mut self, page_id: &str) -> Result<(), JsValue> {
        self.session
            .set_active_page(page_id)
            .map_err(|e| js_error("Page error", e))
    }

    #[wasm_bindgen(getter)]
    pub fn selection(&self) -> Option<String> {
        self.session.selection().map(String::from)
    }

    /// Select a node, or clear the selection with `undefined`
    pub fn select(&mut self, node_id: Option<String>) -> Result<(), JsValue> {
        self.session
            .select(node_id.as_deref())
            .map_err(|e| js_error("Selection error", e))
    }

    #[wasm_bindgen(js_name = breadcrumbsJson)]
    pub fn breadcrumbs_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.breadcrumbs()).map_err(|e| js_error("Serialization error", e))
    }

    #[wasm_bindgen(getter, js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.session.document().is_dirty()
    }
}

impl Editor {
    fn from_document(document: Document) -> Self {
        Self {
            session: EditSession::new(EditorDocument::new("document", document)),
        }
    }
}

/// Compile a stored document to CSS without opening a session
#[wasm_bindgen(js_name = compileToCss)]
pub fn compile_to_css_js(document_json: &str, page_id: Option<String>) -> Result<String, JsValue> {
    let document = Document::from_json(document_json).map_err(|e| js_error("Load error", e))?;
    compile_to_css(&document, page_id.as_deref()).map_err(|e| js_error("CSS compile error", e))
}

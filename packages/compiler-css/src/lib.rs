//! # Trellis CSS Compiler
//!
//! Turns a document's per-node style data into one stylesheet for the
//! active page:
//!
//! ```text
//! :root { --color-*, --font-* }        global tokens
//! [data-node-id="…"] …                 custom CSS, placeholder scoped
//! [data-node-id="…"]:hover { … }       desktop hover
//! @media (max-width: 1024px) { … }     tablet overrides + hover
//! @media (max-width: 768px)  { … }     mobile overrides + hover
//! ```
//!
//! Output is deterministic: compiling an unchanged document twice yields
//! byte-identical text.

mod compiler;
mod naming;
mod stylesheet;

pub use compiler::{CompileOptions, CssError, CssResult, StyleCompiler};
pub use naming::{kebab_case, scope_custom_css, token_slug, SELECTOR_PLACEHOLDER};
pub use stylesheet::{CssRule, MediaBlock, VirtualCssDocument};

use trellis_model::Document;

/// Compile `document` for `page_id` (the homepage when `None`) with default options
pub fn compile_to_css(document: &Document, page_id: Option<&str>) -> CssResult<String> {
    compile(document, page_id, &CompileOptions::default())
}

pub fn compile(document: &Document, page_id: Option<&str>, options: &CompileOptions) -> CssResult<String> {
    let compiler = StyleCompiler::with_options(options.clone());
    Ok(compiler.evaluate(document, page_id)?.to_css())
}

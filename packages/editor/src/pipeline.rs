//! # Style Pipeline
//!
//! Recompiles the stylesheet whenever the document or the active page
//! changes, and hands back the cached text otherwise.
//!
//! The cache is keyed by the history revision (not the index, which repeats
//! after an undo followed by a new edit) and the active page id.

use trellis_compiler_css::{CompileOptions, CssResult, StyleCompiler};
use trellis_model::Document;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    page_id: String,
}

/// Manages the document → CSS step
pub struct Pipeline {
    compiler: StyleCompiler,
    cached: Option<(CacheKey, String)>,
    compilations: usize,
}

/// Result of pipeline execution
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub css: String,

    /// Served from cache without recompiling
    pub cached: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            compiler: StyleCompiler::with_options(options),
            cached: None,
            compilations: 0,
        }
    }

    pub fn options(&self) -> &CompileOptions {
        self.compiler.options()
    }

    /// CSS for `doc` at history `revision` and `page_id`
    pub fn css(&mut self, doc: &Document, revision: u64, page_id: &str) -> CssResult<PipelineResult> {
        let key = CacheKey {
            revision,
            page_id: page_id.to_string(),
        };
        if let Some((cached_key, css)) = &self.cached {
            if *cached_key == key {
                return Ok(PipelineResult {
                    css: css.clone(),
                    cached: true,
                });
            }
        }

        let css = self.compiler.evaluate(doc, Some(page_id))?.to_css();
        self.compilations += 1;
        self.cached = Some((key, css.clone()));
        Ok(PipelineResult { css, cached: false })
    }

    /// Number of real compilations so far
    pub fn compilations(&self) -> usize {
        self.compilations
    }

    /// Force a recompile on the next request
    pub fn clear_cache(&mut self) {
        self.cached = None;
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

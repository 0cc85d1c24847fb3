//! # Trellis Model
//!
//! Data contracts for Trellis site documents: the typed node tree, pages,
//! global style tokens and the identifier generator. No editing behavior
//! lives here; see `trellis-editor` for that.

pub mod document;
pub mod error;
pub mod id_generator;
pub mod legacy;
pub mod lenient;
pub mod node;
pub mod style;

pub use document::{ColorToken, Document, GlobalStyles, Page, Scope, TypographyToken};
pub use error::{ModelError, ModelResult};
pub use id_generator::IdGenerator;
pub use node::*;
pub use style::{Breakpoint, ResponsiveStyle, ResponsiveStylePatch, StyleMap, StyleValue, Visibility};

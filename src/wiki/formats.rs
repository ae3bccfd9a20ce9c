//! Output formats
//!
//! Renderers walk a parsed [`Document`](crate::wiki::ast::Document) and serialize it:
//! - HTML, plain text and Texinfo renderings of the document content
//! - a JSON dump and a treeviz view of the tree itself, for debugging
//!
//! Renderers are looked up by `(format, dialect)` in the [`RendererRegistry`].

pub mod dump;
pub mod html;
pub mod registry;
pub mod texinfo;
pub mod text;
pub mod treeviz;

pub use dump::DumpRenderer;
pub use html::HtmlRenderer;
pub use registry::{Renderer, RendererFactory, RendererRegistry};
pub use texinfo::TexinfoRenderer;
pub use text::PlainTextRenderer;
pub use treeviz::{to_treeviz_str, TreevizRenderer};

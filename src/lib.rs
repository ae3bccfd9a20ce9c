//! # wikitrans
//!
//! Translates MediaWiki markup, including Wiktionary-style dictionary pages, into HTML, plain
//! text, Texinfo, a JSON dump of the parse tree, or a one-line-per-node tree view.
//!
//!     source → [scanner](wiki::lexing) → [parser](wiki::parsing) → [`Document`] →
//!     [renderer](wiki::formats) → output
//!
//! ```rust,ignore
//! use wikitrans::{translate, OutputFormat, TranslateConfig, Dialect};
//!
//! let config = TranslateConfig::new(OutputFormat::Text, Dialect::Default);
//! let text = translate("== Title ==\n[[Target|Text]]", &config)?;
//! ```
//!
//! ## Testing
//!
//! Tree-shape tests use the fluent assertions in [testing](wiki::testing).

pub mod wiki;

pub use wiki::ast::Document;
pub use wiki::config::{derive_html_base, OutputFormat, SectioningModel, TranslateConfig};
pub use wiki::dialect::Dialect;
pub use wiki::error::{Result, TranslateError};
pub use wiki::formats::{Renderer, RendererRegistry};
pub use wiki::parsing::{parse, parse_document, ParseOptions, Recovery};
pub use wiki::processor::{translate, translate_bytes, Translation, Translator};

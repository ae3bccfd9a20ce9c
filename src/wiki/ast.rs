//! Document Model for translated wiki pages
//!
//!     The parser produces a [`Document`]: an ordered tree of block nodes, each owning its
//!     children by value. There are no back references from child to parent, and nothing
//!     position-dependent (heading anchors, Texinfo node names) is stored on the nodes. Renderers
//!     derive those in a single top-down pass.
//!
//!     Once handed to a renderer the document is read-only; renderers take `&Document`.
//!
//! Block nodes
//!
//!     Heading, Paragraph, List, DefinitionList, Table, Preformatted, HorizontalRule,
//!     TemplateInvocation, References and (dictionary dialect only) Section.
//!
//! Inline nodes
//!
//!     Text, Emphasis, InternalLink, ExternalLink, Template, LineBreak, Code and Footnote.
//!
//!     Footnote numbers are the one exception to the rule above: the parser numbers `<ref>`
//!     nodes and fills each References list in a final pass, so every renderer agrees on them.
//!
//! Invariants
//!
//!     - List, DefinitionList and Table containers hold at least one child. Their
//!       constructors return `None` for empty input.
//!     - Heading levels are clamped to 1..=6.
//!     - InternalLink targets are never empty.

pub mod elements;
pub mod snapshot;
pub mod traits;

pub use elements::*;
pub use snapshot::{snapshot_from_document, AstSnapshot};
pub use traits::AstNode;

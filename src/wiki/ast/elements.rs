//! Element types of the Document Model

pub mod block;
pub mod definition;
pub mod document;
pub mod inlines;
pub mod list;
pub mod section;
pub mod table;
pub mod template;

pub use block::{Block, Heading, Note, Paragraph, Preformatted, References};
pub use definition::{Definition, DefinitionEntry, DefinitionList};
pub use document::{Document, Metadata};
pub use inlines::{
    plain_text, Code, CodeTag, Emphasis, EmphasisKind, ExternalLink, Footnote, Inline,
    InlineContent, InternalLink, Text,
};
pub use list::{List, ListItem, ListKind};
pub use section::{Section, SectionKind};
pub use table::{Table, TableCell, TableRow};
pub use template::{TemplateInvocation, TemplateParam};

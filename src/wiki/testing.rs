//! Testing utilities for AST assertions
//!
//! Checking a parsed tree by hand means a `match` per level and a `panic!` per wrong variant:
//!
//! ```rust-example
//! match &doc.blocks[0] {
//!     Block::List(list) => {
//!         assert_eq!(list.items.len(), 2);
//!         match &list.items[0].blocks[0] {
//!             Block::Paragraph(p) => assert_eq!(p.text(), "a"),
//!             _ => panic!("Expected paragraph"),
//!         }
//!     }
//!     _ => panic!("Expected list"),
//! }
//! ```
//!
//! The fluent API states the same thing as a shape:
//!
//! ```rust-example
//! use wikitrans::wiki::testing::assert_doc;
//!
//! assert_doc(&doc)
//!     .block_count(1)
//!     .block(0, |b| {
//!         b.assert_list()
//!             .unordered()
//!             .item_count(2)
//!             .item(0, |item| {
//!                 item.block(0, |b| {
//!                     b.assert_paragraph().text("a");
//!                 });
//!             });
//!     });
//! ```
//!
//! Failures name the path to the offending node (`blocks[0].items[1].blocks[0]`).

mod testing_assertions;

pub use testing_assertions::{
    assert_doc, BlockAssertion, BlocksAssertion, DefinitionListAssertion, DocumentAssertion,
    EntryAssertion, HeadingAssertion, InlineAssertion, LinkAssertion, ListAssertion,
    ParagraphAssertion, SectionAssertion, TableAssertion, TemplateAssertion,
};

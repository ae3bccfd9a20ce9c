//! Fluent assertion API for AST nodes

use crate::wiki::ast::{
    plain_text, AstNode, Block, CodeTag, DefinitionEntry, DefinitionList, Document, EmphasisKind,
    Heading, Inline, InternalLink, List, Paragraph, Section, SectionKind, Table, TemplateInvocation,
};

// ============================================================================
// Entry Point
// ============================================================================

/// Create an assertion builder for a document
pub fn assert_doc(doc: &Document) -> DocumentAssertion<'_> {
    DocumentAssertion { doc }
}

fn summarize(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| b.node_type())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Document and block sequences
// ============================================================================

pub struct DocumentAssertion<'a> {
    doc: &'a Document,
}

impl<'a> DocumentAssertion<'a> {
    pub fn block_count(self, expected: usize) -> Self {
        BlocksAssertion::new(&self.doc.blocks, "blocks".to_string()).block_count(expected);
        self
    }

    pub fn block<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        BlocksAssertion::new(&self.doc.blocks, "blocks".to_string()).block(index, assertion);
        self
    }

    pub fn language(self, expected: &str) -> Self {
        assert_eq!(self.doc.metadata.language, expected, "document language");
        self
    }
}

/// Assertions over any owned block sequence: list items, definitions, table cells, sections.
pub struct BlocksAssertion<'a> {
    blocks: &'a [Block],
    context: String,
}

impl<'a> BlocksAssertion<'a> {
    fn new(blocks: &'a [Block], context: String) -> Self {
        Self { blocks, context }
    }

    pub fn block_count(self, expected: usize) -> Self {
        assert_eq!(
            self.blocks.len(),
            expected,
            "{}: expected {} blocks, found {}: [{}]",
            self.context,
            expected,
            self.blocks.len(),
            summarize(self.blocks)
        );
        self
    }

    pub fn block<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlockAssertion<'a>),
    {
        assert!(
            index < self.blocks.len(),
            "{}: block index {} out of bounds ({} blocks)",
            self.context,
            index,
            self.blocks.len()
        );
        assertion(BlockAssertion {
            block: &self.blocks[index],
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Shortcut: the sequence is exactly one paragraph with this text.
    pub fn single_paragraph(self, expected: &str) -> Self {
        let this = self.block_count(1);
        this.block(0, |b| {
            b.assert_paragraph().text(expected);
        })
    }
}

// ============================================================================
// Block Assertions
// ============================================================================

pub struct BlockAssertion<'a> {
    block: &'a Block,
    context: String,
}

impl<'a> BlockAssertion<'a> {
    fn wrong(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, found {} ({})",
            self.context,
            expected,
            self.block.node_type(),
            self.block.display_label()
        )
    }

    pub fn assert_heading(self) -> HeadingAssertion<'a> {
        match self.block {
            Block::Heading(heading) => HeadingAssertion {
                heading,
                context: self.context,
            },
            _ => self.wrong("Heading"),
        }
    }

    pub fn assert_paragraph(self) -> ParagraphAssertion<'a> {
        match self.block {
            Block::Paragraph(para) => ParagraphAssertion {
                para,
                context: self.context,
            },
            _ => self.wrong("Paragraph"),
        }
    }

    pub fn assert_list(self) -> ListAssertion<'a> {
        match self.block {
            Block::List(list) => ListAssertion {
                list,
                context: self.context,
            },
            _ => self.wrong("List"),
        }
    }

    pub fn assert_definition_list(self) -> DefinitionListAssertion<'a> {
        match self.block {
            Block::DefinitionList(list) => DefinitionListAssertion {
                list,
                context: self.context,
            },
            _ => self.wrong("DefinitionList"),
        }
    }

    pub fn assert_table(self) -> TableAssertion<'a> {
        match self.block {
            Block::Table(table) => TableAssertion {
                table,
                context: self.context,
            },
            _ => self.wrong("Table"),
        }
    }

    pub fn assert_template(self) -> TemplateAssertion<'a> {
        match self.block {
            Block::Template(template) => TemplateAssertion {
                template,
                context: self.context,
            },
            _ => self.wrong("Template"),
        }
    }

    pub fn assert_section(self) -> SectionAssertion<'a> {
        match self.block {
            Block::Section(section) => SectionAssertion {
                section,
                context: self.context,
            },
            _ => self.wrong("Section"),
        }
    }

    pub fn assert_preformatted(self, expected: &str) {
        match self.block {
            Block::Preformatted(pre) => {
                assert_eq!(pre.text, expected, "{}: preformatted text", self.context)
            }
            _ => self.wrong("Preformatted"),
        }
    }

    /// A references list holding exactly these note numbers.
    pub fn assert_references(self, numbers: &[usize]) {
        match self.block {
            Block::References(references) => {
                let actual: Vec<usize> = references.notes.iter().map(|n| n.number).collect();
                assert_eq!(actual, numbers, "{}: note numbers", self.context);
            }
            _ => self.wrong("References"),
        }
    }

    pub fn assert_rule(self) {
        if !matches!(self.block, Block::HorizontalRule) {
            self.wrong("HorizontalRule")
        }
    }
}

pub struct HeadingAssertion<'a> {
    heading: &'a Heading,
    context: String,
}

impl HeadingAssertion<'_> {
    pub fn level(self, expected: u8) -> Self {
        assert_eq!(self.heading.level, expected, "{}: heading level", self.context);
        self
    }

    pub fn title(self, expected: &str) -> Self {
        assert_eq!(self.heading.title(), expected, "{}: heading title", self.context);
        self
    }
}

pub struct ParagraphAssertion<'a> {
    para: &'a Paragraph,
    context: String,
}

impl<'a> ParagraphAssertion<'a> {
    /// Plain text of the paragraph, markup removed.
    pub fn text(self, expected: &str) -> Self {
        assert_eq!(self.para.text(), expected, "{}: paragraph text", self.context);
        self
    }

    pub fn text_contains(self, needle: &str) -> Self {
        let text = self.para.text();
        assert!(
            text.contains(needle),
            "{}: expected paragraph text to contain {:?}, got {:?}",
            self.context,
            needle,
            text
        );
        self
    }

    pub fn inline_count(self, expected: usize) -> Self {
        assert_eq!(
            self.para.content.len(),
            expected,
            "{}: inline count in {:?}",
            self.context,
            self.para.content
        );
        self
    }

    pub fn inline<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(InlineAssertion<'a>),
    {
        assert!(
            index < self.para.content.len(),
            "{}: inline index {} out of bounds ({} inlines)",
            self.context,
            index,
            self.para.content.len()
        );
        assertion(InlineAssertion {
            inline: &self.para.content[index],
            context: format!("{}.content[{}]", self.context, index),
        });
        self
    }
}

pub struct ListAssertion<'a> {
    list: &'a List,
    context: String,
}

impl<'a> ListAssertion<'a> {
    pub fn ordered(self) -> Self {
        assert!(self.list.is_ordered(), "{}: expected an ordered list", self.context);
        self
    }

    pub fn unordered(self) -> Self {
        assert!(!self.list.is_ordered(), "{}: expected an unordered list", self.context);
        self
    }

    pub fn item_count(self, expected: usize) -> Self {
        assert_eq!(self.list.items.len(), expected, "{}: item count", self.context);
        self
    }

    pub fn item<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlocksAssertion<'a>),
    {
        assert!(
            index < self.list.items.len(),
            "{}: item index {} out of bounds ({} items)",
            self.context,
            index,
            self.list.items.len()
        );
        assertion(BlocksAssertion::new(
            &self.list.items[index].blocks,
            format!("{}.items[{}]", self.context, index),
        ));
        self
    }
}

pub struct DefinitionListAssertion<'a> {
    list: &'a DefinitionList,
    context: String,
}

impl<'a> DefinitionListAssertion<'a> {
    pub fn entry_count(self, expected: usize) -> Self {
        assert_eq!(self.list.entries.len(), expected, "{}: entry count", self.context);
        self
    }

    pub fn entry<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(EntryAssertion<'a>),
    {
        assert!(
            index < self.list.entries.len(),
            "{}: entry index {} out of bounds",
            self.context,
            index
        );
        assertion(EntryAssertion {
            entry: &self.list.entries[index],
            context: format!("{}.entries[{}]", self.context, index),
        });
        self
    }
}

pub struct EntryAssertion<'a> {
    entry: &'a DefinitionEntry,
    context: String,
}

impl<'a> EntryAssertion<'a> {
    /// `None` asserts a definition-only entry.
    pub fn term(self, expected: Option<&str>) -> Self {
        let term = self.entry.term.as_deref().map(plain_text);
        assert_eq!(term.as_deref(), expected, "{}: term", self.context);
        self
    }

    pub fn definition_count(self, expected: usize) -> Self {
        assert_eq!(
            self.entry.definitions.len(),
            expected,
            "{}: definition count",
            self.context
        );
        self
    }

    pub fn definition<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(BlocksAssertion<'a>),
    {
        assert!(
            index < self.entry.definitions.len(),
            "{}: definition index {} out of bounds",
            self.context,
            index
        );
        assertion(BlocksAssertion::new(
            &self.entry.definitions[index].blocks,
            format!("{}.definitions[{}]", self.context, index),
        ));
        self
    }
}

pub struct TableAssertion<'a> {
    table: &'a Table,
    context: String,
}

impl<'a> TableAssertion<'a> {
    pub fn row_count(self, expected: usize) -> Self {
        assert_eq!(self.table.rows.len(), expected, "{}: row count", self.context);
        self
    }

    pub fn caption(self, expected: Option<&str>) -> Self {
        let caption = self.table.caption.as_deref().map(plain_text);
        assert_eq!(caption.as_deref(), expected, "{}: caption", self.context);
        self
    }

    pub fn header_row(self, row: usize) -> Self {
        assert!(
            self.table.rows.get(row).is_some_and(|r| r.is_header()),
            "{}: expected row {} to be a header row",
            self.context,
            row
        );
        self
    }

    /// Cell content at `(row, column)`.
    pub fn cell<F>(self, row: usize, column: usize, assertion: F) -> Self
    where
        F: FnOnce(BlocksAssertion<'a>),
    {
        let Some(cell) = self.table.rows.get(row).and_then(|r| r.cells.get(column)) else {
            panic!("{}: no cell at ({}, {})", self.context, row, column);
        };
        assertion(BlocksAssertion::new(
            &cell.blocks,
            format!("{}.rows[{}].cells[{}]", self.context, row, column),
        ));
        self
    }
}

pub struct TemplateAssertion<'a> {
    template: &'a TemplateInvocation,
    context: String,
}

impl TemplateAssertion<'_> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(self.template.name, expected, "{}: template name", self.context);
        self
    }

    pub fn param(self, key: &str, expected: &str) -> Self {
        let value = self.template.get(key).map(|v| plain_text(v));
        assert_eq!(
            value.as_deref(),
            Some(expected),
            "{}: template parameter {:?}",
            self.context,
            key
        );
        self
    }

    pub fn param_keys(self, expected: &[&str]) -> Self {
        let keys: Vec<&str> = self.template.params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, expected, "{}: template parameter keys", self.context);
        self
    }
}

pub struct SectionAssertion<'a> {
    section: &'a Section,
    context: String,
}

impl<'a> SectionAssertion<'a> {
    pub fn kind(self, expected: SectionKind) -> Self {
        assert_eq!(self.section.kind, expected, "{}: section kind", self.context);
        self
    }

    pub fn label(self, expected: &str) -> Self {
        assert_eq!(self.section.label, expected, "{}: section label", self.context);
        self
    }

    pub fn level(self, expected: u8) -> Self {
        assert_eq!(self.section.level, expected, "{}: section level", self.context);
        self
    }

    pub fn children(self) -> BlocksAssertion<'a> {
        BlocksAssertion::new(&self.section.blocks, format!("{}.blocks", self.context))
    }
}

// ============================================================================
// Inline Assertions
// ============================================================================

pub struct InlineAssertion<'a> {
    inline: &'a Inline,
    context: String,
}

impl<'a> InlineAssertion<'a> {
    fn wrong(&self, expected: &str) -> ! {
        panic!(
            "{}: Expected {}, found {} ({})",
            self.context,
            expected,
            self.inline.node_type(),
            self.inline.display_label()
        )
    }

    pub fn assert_text(self, expected: &str) {
        match self.inline {
            Inline::Text(text) => assert_eq!(text.text, expected, "{}: text", self.context),
            _ => self.wrong("Text"),
        }
    }

    pub fn assert_emphasis(self, kind: EmphasisKind, text: &str) {
        match self.inline {
            Inline::Emphasis(emphasis) => {
                assert_eq!(emphasis.kind, kind, "{}: emphasis kind", self.context);
                assert_eq!(plain_text(&emphasis.content), text, "{}: emphasis text", self.context);
            }
            _ => self.wrong("Emphasis"),
        }
    }

    pub fn assert_internal_link(self) -> LinkAssertion<'a> {
        match self.inline {
            Inline::InternalLink(link) => LinkAssertion {
                link,
                context: self.context,
            },
            _ => self.wrong("InternalLink"),
        }
    }

    pub fn assert_external_link(self, url: &str, text: Option<&str>) {
        match self.inline {
            Inline::ExternalLink(link) => {
                assert_eq!(link.url, url, "{}: url", self.context);
                let actual = link.text.as_deref().map(plain_text);
                assert_eq!(actual.as_deref(), text, "{}: link text", self.context);
            }
            _ => self.wrong("ExternalLink"),
        }
    }

    pub fn assert_template(self) -> TemplateAssertion<'a> {
        match self.inline {
            Inline::Template(template) => TemplateAssertion {
                template,
                context: self.context,
            },
            _ => self.wrong("Template"),
        }
    }

    pub fn assert_code(self, tag: CodeTag, text: &str) {
        match self.inline {
            Inline::Code(code) => {
                assert_eq!(code.tag, tag, "{}: code tag", self.context);
                assert_eq!(plain_text(&code.content), text, "{}: code text", self.context);
            }
            _ => self.wrong("Code"),
        }
    }

    pub fn assert_footnote(self, number: usize, text: &str) {
        match self.inline {
            Inline::Footnote(note) => {
                assert_eq!(note.number, number, "{}: footnote number", self.context);
                assert_eq!(plain_text(&note.content), text, "{}: footnote text", self.context);
            }
            _ => self.wrong("Footnote"),
        }
    }

    pub fn assert_line_break(self) {
        if !matches!(self.inline, Inline::LineBreak) {
            self.wrong("LineBreak")
        }
    }
}

pub struct LinkAssertion<'a> {
    link: &'a InternalLink,
    context: String,
}

impl LinkAssertion<'_> {
    pub fn target(self, expected: &str) -> Self {
        assert_eq!(self.link.target, expected, "{}: link target", self.context);
        self
    }

    pub fn display(self, expected: &str) -> Self {
        assert_eq!(self.link.display_text(), expected, "{}: link display", self.context);
        self
    }

    pub fn hidden(self, expected: bool) -> Self {
        assert_eq!(self.link.is_hidden(), expected, "{}: link hidden", self.context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::parsing::parse_document;

    #[test]
    fn test_fluent_shape() {
        let doc = parse_document("== H ==\n* a [[B|c]]\n* d\n");
        assert_doc(&doc)
            .block_count(2)
            .block(0, |b| {
                b.assert_heading().level(2).title("H");
            })
            .block(1, |b| {
                b.assert_list()
                    .unordered()
                    .item_count(2)
                    .item(0, |item| {
                        item.block(0, |b| {
                            b.assert_paragraph()
                                .text("a c")
                                .inline(1, |i| {
                                    i.assert_internal_link().target("B").display("c");
                                });
                        });
                    })
                    .item(1, |item| {
                        item.single_paragraph("d");
                    });
            });
    }

    #[test]
    #[should_panic(expected = "blocks[0]: Expected List, found Paragraph")]
    fn test_wrong_variant_names_the_path() {
        let doc = parse_document("text");
        assert_doc(&doc).block(0, |b| {
            b.assert_list();
        });
    }
}

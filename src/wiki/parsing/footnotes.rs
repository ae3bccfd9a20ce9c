//! Footnote numbering
//!
//!     `<ref>` nodes are numbered in document order, starting at 1. A named ref that was seen
//!     before shares the earlier number. Each References block takes the notes cited since the
//!     previous one. Notes still pending at the end go into a References block appended to the
//!     document.

use crate::wiki::ast::{Block, Footnote, Inline, Note, References};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Numbering {
    last: usize,
    names: HashMap<String, usize>,
    pending: Vec<Note>,
}

/// Number every footnote and fill the References blocks.
pub fn number_footnotes(blocks: &mut Vec<Block>) {
    let mut numbering = Numbering::default();
    numbering.blocks(blocks);
    if !numbering.pending.is_empty() {
        blocks.push(Block::References(References {
            notes: numbering.pending,
        }));
    }
}

impl Numbering {
    fn cite(&mut self, note: &mut Footnote) {
        if let Some(number) = note.name.as_ref().and_then(|name| self.names.get(name)) {
            note.number = *number;
            if !note.content.is_empty() {
                // A reuse came first; this is the definition.
                if let Some(pending) = self
                    .pending
                    .iter_mut()
                    .find(|n| n.number == note.number && n.content.is_empty())
                {
                    pending.content = note.content.clone();
                }
            }
            return;
        }

        self.last += 1;
        note.number = self.last;
        if let Some(name) = &note.name {
            self.names.insert(name.clone(), self.last);
        }
        self.pending.push(Note {
            number: self.last,
            content: note.content.clone(),
        });
    }

    fn blocks(&mut self, blocks: &mut [Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &mut Block) {
        match block {
            Block::Heading(heading) => self.inlines(&mut heading.content),
            Block::Paragraph(paragraph) => self.inlines(&mut paragraph.content),
            Block::List(list) => {
                for item in &mut list.items {
                    self.blocks(&mut item.blocks);
                }
            }
            Block::DefinitionList(list) => {
                for entry in &mut list.entries {
                    if let Some(term) = &mut entry.term {
                        self.inlines(term);
                    }
                    for definition in &mut entry.definitions {
                        self.blocks(&mut definition.blocks);
                    }
                }
            }
            Block::Table(table) => {
                if let Some(caption) = &mut table.caption {
                    self.inlines(caption);
                }
                for row in &mut table.rows {
                    for cell in &mut row.cells {
                        self.blocks(&mut cell.blocks);
                    }
                }
            }
            Block::Template(template) => {
                for param in &mut template.params {
                    self.inlines(&mut param.value);
                }
            }
            Block::Section(section) => self.blocks(&mut section.blocks),
            Block::References(references) => references.notes = std::mem::take(&mut self.pending),
            Block::Preformatted(_) | Block::HorizontalRule => {}
        }
    }

    fn inlines(&mut self, content: &mut [Inline]) {
        for node in content {
            match node {
                Inline::Footnote(note) => self.cite(note),
                Inline::Emphasis(emphasis) => self.inlines(&mut emphasis.content),
                Inline::Code(code) => self.inlines(&mut code.content),
                Inline::InternalLink(link) => {
                    if let Some(text) = &mut link.text {
                        self.inlines(text);
                    }
                }
                Inline::ExternalLink(link) => {
                    if let Some(text) = &mut link.text {
                        self.inlines(text);
                    }
                }
                Inline::Template(template) => {
                    for param in &mut template.params {
                        self.inlines(&mut param.value);
                    }
                }
                Inline::Text(_) | Inline::LineBreak => {}
            }
        }
    }
}

//! Block nodes
//!
//! `Block` is the common wrapper for every structural element that can appear at document level
//! or inside a container (list item, definition, table cell, dictionary section).

use super::definition::DefinitionList;
use super::inlines::{plain_text, InlineContent};
use super::list::List;
use super::section::Section;
use super::table::Table;
use super::template::TemplateInvocation;
use serde::Serialize;

pub const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    List(List),
    DefinitionList(DefinitionList),
    Table(Table),
    Preformatted(Preformatted),
    HorizontalRule,
    Template(TemplateInvocation),
    Section(Section),
    References(References),
}

impl Block {
    pub fn as_heading(&self) -> Option<&Heading> {
        match self {
            Block::Heading(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Block::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_definition_list(&self) -> Option<&DefinitionList> {
        match self {
            Block::DefinitionList(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Block::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Block::Section(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub content: InlineContent,
}

impl Heading {
    /// Create a heading; the level is clamped to `1..=6`.
    pub fn new(level: usize, content: InlineContent) -> Self {
        let level = level.clamp(1, MAX_HEADING_LEVEL as usize) as u8;
        Self { level, content }
    }

    pub fn title(&self) -> String {
        plain_text(&self.content).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub content: InlineContent,
}

impl Paragraph {
    pub fn new(content: InlineContent) -> Self {
        Self { content }
    }

    pub fn text(&self) -> String {
        plain_text(&self.content)
    }
}

/// Raw preformatted text. Inline markup inside it is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preformatted {
    pub text: String,
}

impl Preformatted {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A `<references/>` list: the footnotes cited since the previous list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct References {
    pub notes: Vec<Note>,
}

/// One entry of a references list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub number: usize,
    pub content: InlineContent,
}

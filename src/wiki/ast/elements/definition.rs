//! Definition lists: `; term` lines followed by `: definition` lines.
//!
//! A `:` line with no preceding term produces an entry without a term; this is how wiki pages
//! express plain indentation.

use super::block::Block;
use super::inlines::InlineContent;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionList {
    pub entries: Vec<DefinitionEntry>,
}

impl DefinitionList {
    pub fn new(entries: Vec<DefinitionEntry>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DefinitionEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<InlineContent>,
    pub definitions: Vec<Definition>,
}

impl DefinitionEntry {
    pub fn with_term(term: InlineContent) -> Self {
        Self {
            term: Some(term),
            definitions: Vec::new(),
        }
    }

    pub fn without_term() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Definition {
    pub blocks: Vec<Block>,
}

impl Definition {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

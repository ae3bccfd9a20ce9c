//! Dictionary sections
//!
//! Dictionary pages organise entries under headings that name a part of speech, an etymology or
//! a pronunciation. The dictionary dialect turns such a heading into a `Section` that owns the
//! blocks following it, up to the next heading of the same or a shallower level.

use super::block::Block;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    PartOfSpeech,
    Etymology,
    Pronunciation,
}

impl SectionKind {
    /// CSS class / short name used by renderers.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::PartOfSpeech => "part-of-speech",
            SectionKind::Etymology => "etymology",
            SectionKind::Pronunciation => "pronunciation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub label: String,
    pub level: u8,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(kind: SectionKind, label: impl Into<String>, level: u8) -> Self {
        Self {
            kind,
            label: label.into(),
            level,
            blocks: Vec::new(),
        }
    }
}

//! Dialect overlay
//!
//!     The default dialect is plain MediaWiki markup. The dictionary dialect (Wiktionary-style
//!     pages) shares the scanner alphabet and block grammar, and changes three things:
//!
//!     1. After parsing, headings that name a part of speech, an etymology or a pronunciation
//!        become [`Section`] nodes owning the blocks that follow them ([`group_sections`]).
//!     2. The Texinfo output for this dialect is produced by the plain-text renderer (see the
//!        registry in `formats::registry`).
//!     3. The default link base points at the dictionary wiki ([`Dialect::link_base_template`]).

use crate::wiki::ast::{Block, Heading, Section, SectionKind};
use crate::wiki::error::TranslateError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Default,
    #[serde(alias = "wiktionary")]
    Dictionary,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Default, Dialect::Dictionary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Default => "default",
            Dialect::Dictionary => "dictionary",
        }
    }

    /// Link base used when none is configured. `{lang}` stands for the language tag.
    pub fn link_base_template(&self) -> &'static str {
        match self {
            Dialect::Default => "http://{lang}.wikipedia.org/wiki/",
            Dialect::Dictionary => "http://{lang}.wiktionary.org/wiki/",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "wikipedia" => Ok(Dialect::Default),
            "dictionary" | "wiktionary" => Ok(Dialect::Dictionary),
            other => Err(TranslateError::InvalidConfig(format!(
                "unknown dialect '{other}'"
            ))),
        }
    }
}

const PARTS_OF_SPEECH: &[&str] = &[
    "noun",
    "verb",
    "adjective",
    "adverb",
    "pronoun",
    "preposition",
    "conjunction",
    "interjection",
    "article",
    "determiner",
    "numeral",
    "particle",
    "proper noun",
    "phrase",
    "prefix",
    "suffix",
    "abbreviation",
    "idiom",
    "proverb",
    "letter",
    "symbol",
];

/// Classify a heading title as a dictionary section, if it names one.
pub fn classify_section(title: &str) -> Option<SectionKind> {
    let normalized = title.trim().to_lowercase();
    if PARTS_OF_SPEECH.contains(&normalized.as_str()) {
        return Some(SectionKind::PartOfSpeech);
    }
    if normalized == "pronunciation" {
        return Some(SectionKind::Pronunciation);
    }
    match normalized.strip_prefix("etymology") {
        Some("") => Some(SectionKind::Etymology),
        Some(rest) if rest.starts_with(' ') && rest.trim().chars().all(|c| c.is_ascii_digit()) => {
            Some(SectionKind::Etymology)
        }
        _ => None,
    }
}

/// Regroup a flat block sequence into dictionary sections.
///
/// A recognised heading opens a section that owns every following block up to the next heading
/// of the same or a shallower level. Deeper recognised headings open nested sections;
/// unrecognised headings stay ordinary blocks inside whatever section is open.
pub fn group_sections(blocks: Vec<Block>) -> Vec<Block> {
    let mut stack: Vec<Section> = Vec::new();
    let mut top: Vec<Block> = Vec::new();

    for block in blocks {
        if let Block::Heading(heading) = &block {
            close_sections(&mut stack, &mut top, heading.level);
            if let Some(section) = section_for(heading) {
                stack.push(section);
                continue;
            }
        }
        match stack.last_mut() {
            Some(open) => open.blocks.push(block),
            None => top.push(block),
        }
    }
    close_sections(&mut stack, &mut top, 0);
    top
}

fn section_for(heading: &Heading) -> Option<Section> {
    let label = heading.title();
    classify_section(&label).map(|kind| Section::new(kind, label, heading.level))
}

/// Close every open section whose level is at or below `level` (0 closes all).
fn close_sections(stack: &mut Vec<Section>, top: &mut Vec<Block>, level: u8) {
    while let Some(open) = stack.last() {
        if level != 0 && open.level < level {
            break;
        }
        let Some(closed) = stack.pop() else { break };
        match stack.last_mut() {
            Some(parent) => parent.blocks.push(Block::Section(closed)),
            None => top.push(Block::Section(closed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::ast::{Inline, Paragraph};
    use rstest::rstest;

    fn heading(level: usize, title: &str) -> Block {
        Block::Heading(Heading::new(level, vec![Inline::text(title)]))
    }

    fn para(text: &str) -> Block {
        Block::Paragraph(Paragraph::new(vec![Inline::text(text)]))
    }

    #[rstest]
    #[case("Noun", Some(SectionKind::PartOfSpeech))]
    #[case(" proper noun ", Some(SectionKind::PartOfSpeech))]
    #[case("Etymology", Some(SectionKind::Etymology))]
    #[case("Etymology 2", Some(SectionKind::Etymology))]
    #[case("Etymologyx", None)]
    #[case("Pronunciation", Some(SectionKind::Pronunciation))]
    #[case("Translations", None)]
    fn test_classify_section(#[case] title: &str, #[case] expected: Option<SectionKind>) {
        assert_eq!(classify_section(title), expected);
    }

    #[test]
    fn test_dialect_from_str_accepts_aliases() {
        assert_eq!("wiktionary".parse::<Dialect>().unwrap(), Dialect::Dictionary);
        assert_eq!("Default".parse::<Dialect>().unwrap(), Dialect::Default);
        assert!("klingon".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_group_sections_nests_by_level() {
        let blocks = vec![
            heading(2, "English"),
            heading(3, "Etymology 1"),
            para("From Latin."),
            heading(4, "Noun"),
            para("a thing"),
            heading(3, "Etymology 2"),
            para("From Greek."),
        ];

        let grouped = group_sections(blocks);
        assert_eq!(grouped.len(), 3);
        assert!(grouped[0].as_heading().is_some());

        let ety1 = grouped[1].as_section().unwrap();
        assert_eq!(ety1.label, "Etymology 1");
        assert_eq!(ety1.blocks.len(), 2);
        let noun = ety1.blocks[1].as_section().unwrap();
        assert_eq!(noun.kind, SectionKind::PartOfSpeech);
        assert_eq!(noun.blocks, vec![para("a thing")]);

        let ety2 = grouped[2].as_section().unwrap();
        assert_eq!(ety2.blocks, vec![para("From Greek.")]);
    }

    #[test]
    fn test_unrecognised_heading_closes_deeper_sections() {
        let blocks = vec![
            heading(3, "Verb"),
            para("to run"),
            heading(3, "Translations"),
            para("x"),
        ];
        let grouped = group_sections(blocks);
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0].as_section().unwrap().blocks.len(), 1);
        assert_eq!(grouped[2], para("x"));
    }
}

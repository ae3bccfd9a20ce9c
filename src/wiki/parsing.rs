//! Parsing
//!
//!     The parser turns the scanner's token stream into a [`Document`]. It works in three
//!     steps:
//!
//!         1. Line grouping: tokens are cut at `Newline` tokens into classified [`Line`]s, with
//!            blank lines made explicit. See [lines](lines).
//!         2. Block parsing: consecutive lines sharing a marker are grouped into containers
//!            (paragraphs, lists, definition lists, tables, preformatted blocks) by recursive
//!            descent over the line sequence. See [blocks](blocks).
//!         3. Inline parsing: the tokens of each line are parsed into emphasis, links,
//!             templates and text. See [inlines](inlines).
//!
//!     The dictionary dialect adds a regrouping pass that turns recognised headings into
//!     sections (see `crate::wiki::dialect::group_sections`). Last, `<ref>` footnotes are
//!     numbered and the references lists filled (see [footnotes](footnotes)).
//!
//! Recovery
//!
//!     Parsing never fails. A construct whose closing delimiter never appears (a link, a
//!     template, an emphasis run, a table) is kept as literal text, and a [`Recovery`] record
//!     with the opener's span is added to the outcome.
//!
//! Debug output
//!
//!     `debug_level` gates `tracing` events only; the parse result is the same for every level.
//!
//!         >= 20   lookahead: the first token of each block
//!         >= 70   the finished tree
//!         >= 80   enter/leave of block and inline constructs, recoveries
//!         >= 90   the full token stream before parsing

pub mod blocks;
pub mod footnotes;
pub mod inlines;
pub mod lines;

use crate::wiki::ast::{snapshot_from_document, Document, Metadata};
use crate::wiki::config::TranslateConfig;
use crate::wiki::dialect::{group_sections, Dialect};
use crate::wiki::lexing::{Scanner, SpannedToken};
use serde::Serialize;
use std::fmt;

pub use lines::{group_lines, Line, LineKind};

/// Construct kinds that can be recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Construct {
    Emphasis,
    InternalLink,
    ExternalLink,
    Template,
    Table,
    Footnote,
    Code,
}

impl Construct {
    pub fn as_str(&self) -> &'static str {
        match self {
            Construct::Emphasis => "emphasis",
            Construct::InternalLink => "internal link",
            Construct::ExternalLink => "external link",
            Construct::Template => "template",
            Construct::Table => "table",
            Construct::Footnote => "reference",
            Construct::Code => "code",
        }
    }
}

/// An unterminated construct that was kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recovery {
    pub construct: Construct,
    pub span: logos::Span,
}

impl fmt::Display for Recovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed {} at {}..{}, kept as text",
            self.construct.as_str(),
            self.span.start,
            self.span.end
        )
    }
}

/// What the parser needs from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub dialect: Dialect,
    pub language: String,
    pub link_base: Option<String>,
    pub debug_level: u8,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Default,
            language: "en".to_string(),
            link_base: None,
            debug_level: 0,
        }
    }
}

impl From<&TranslateConfig> for ParseOptions {
    fn from(config: &TranslateConfig) -> Self {
        Self {
            dialect: config.dialect,
            language: config.language_tag.clone(),
            link_base: config.effective_link_base(),
            debug_level: config.debug_level,
        }
    }
}

impl ParseOptions {
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub document: Document,
    pub recoveries: Vec<Recovery>,
}

/// Decides which debug events are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DebugGate {
    level: u8,
}

impl DebugGate {
    pub const LOOKAHEAD: u8 = 20;
    pub const TREE: u8 = 70;
    pub const ENTER_LEAVE: u8 = 80;
    pub const TOKENS: u8 = 90;

    pub fn new(level: u8) -> Self {
        Self { level }
    }

    pub fn at(&self, threshold: u8) -> bool {
        self.level >= threshold
    }
}

/// Parse wiki source with the given options.
pub fn parse(source: &str, options: &ParseOptions) -> ParseOutcome {
    parse_tokens(Scanner::new(source).collect(), options)
}

/// Parse wiki source with default options.
pub fn parse_document(source: &str) -> Document {
    parse(source, &ParseOptions::default()).document
}

/// Parse an already scanned token stream.
pub fn parse_tokens(tokens: Vec<SpannedToken>, options: &ParseOptions) -> ParseOutcome {
    let gate = DebugGate::new(options.debug_level);
    if gate.at(DebugGate::TOKENS) {
        for (token, span) in &tokens {
            tracing::trace!(target: "wikitrans::scanner", "{:>5}..{:<5} {}", span.start, span.end, token);
        }
    }

    let lines = group_lines(tokens);
    let mut recoveries = Vec::new();
    let mut blocks = blocks::BlockParser::new(gate, &mut recoveries).parse(&lines);
    if options.dialect == Dialect::Dictionary {
        blocks = group_sections(blocks);
    }
    footnotes::number_footnotes(&mut blocks);

    let metadata = Metadata {
        language: options.language.clone(),
        link_base: options.link_base.clone(),
        dialect: options.dialect,
    };
    let document = Document::with_metadata(metadata, blocks);

    if gate.at(DebugGate::TREE) {
        let snapshot = snapshot_from_document(&document);
        tracing::debug!(target: "wikitrans::parser", nodes = snapshot.node_count(), "parsed document");
        if let Ok(json) = serde_json::to_string(&snapshot) {
            tracing::debug!(target: "wikitrans::parser", tree = %json);
        }
    }
    for recovery in &recoveries {
        if gate.at(DebugGate::ENTER_LEAVE) {
            tracing::debug!(target: "wikitrans::parser", "recovered: {recovery}");
        }
    }

    ParseOutcome {
        document,
        recoveries,
    }
}

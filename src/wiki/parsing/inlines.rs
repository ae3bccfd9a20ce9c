//! Inline parsing
//!
//!     Parses the tokens of one line into [`InlineContent`]. Links, external links, templates,
//!     `<ref>` footnotes and `<code>`/`<tt>` runs are parsed by recursive descent; each has a
//!     fixed closing delimiter, so the result of parsing an opener does not depend on where it
//!     is nested.
//!
//!     An opener whose closer never shows up is backtracked: the opener becomes literal text
//!     and parsing resumes right after it. Failed opener positions are remembered so that
//!     deeply nested unterminated input does not get re-parsed over and over.
//!
//! Emphasis
//!
//!     Emphasis delimiters are collected as markers while a sequence is parsed and resolved at
//!     the end of that sequence, so emphasis never crosses a link or template boundary. The
//!     resolution follows MediaWiki: closing an outer delimiter while an inner one is open
//!     closes the inner one too and reopens it afterwards. A delimiter that is still open at
//!     the end of the sequence is literal text.

use crate::wiki::ast::{
    Code, CodeTag, Emphasis, EmphasisKind, ExternalLink, Footnote, Inline, InlineContent,
    InternalLink, TemplateInvocation,
};
use crate::wiki::lexing::{EmphasisDelimiter, SpannedToken, Token};
use crate::wiki::parsing::{Construct, DebugGate, Recovery};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Openers nested deeper than this are kept as literal text.
const MAX_DEPTH: usize = 64;

static URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

/// True when `text` starts with a `scheme://` prefix.
pub fn has_url_scheme(text: &str) -> bool {
    URL_SCHEME.is_match(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Pipe,
    LinkClose,
    ExtLinkClose,
    TemplateClose,
    RefClose,
    CodeClose(&'static str),
}

impl Stop {
    fn matches(self, token: &Token) -> bool {
        match (self, token) {
            (Stop::Pipe, Token::Pipe)
            | (Stop::LinkClose, Token::LinkClose)
            | (Stop::ExtLinkClose, Token::ExtLinkClose)
            | (Stop::TemplateClose, Token::TemplateClose)
            | (Stop::RefClose, Token::RefClose) => true,
            (Stop::CodeClose(open), Token::CodeClose(close)) => open == *close,
            _ => false,
        }
    }
}

enum Piece {
    Node(Inline),
    Delim(EmphasisDelimiter, logos::Span),
}

struct Frame {
    kind: EmphasisKind,
    /// Source delimiter and span; `None` for a frame reopened after a forced close.
    opener: Option<(&'static str, logos::Span)>,
    content: InlineContent,
}

pub struct InlineParser<'t, 'r> {
    tokens: &'t [SpannedToken],
    pos: usize,
    depth: usize,
    gate: DebugGate,
    recoveries: &'r mut Vec<Recovery>,
    failed: HashSet<usize>,
}

/// Parse one line of inline tokens, trimming surrounding whitespace.
pub fn parse_inline(
    tokens: &[SpannedToken],
    gate: DebugGate,
    recoveries: &mut Vec<Recovery>,
) -> InlineContent {
    InlineParser::new(tokens, gate, recoveries).parse_line()
}

impl<'t, 'r> InlineParser<'t, 'r> {
    pub fn new(tokens: &'t [SpannedToken], gate: DebugGate, recoveries: &'r mut Vec<Recovery>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            gate,
            recoveries,
            failed: HashSet::new(),
        }
    }

    pub fn parse_line(mut self) -> InlineContent {
        let content = self.parse_sequence(&[]);
        trim_content(content)
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn parse_sequence(&mut self, stops: &[Stop]) -> InlineContent {
        let tokens = self.tokens;
        let mut pieces = Vec::new();

        while let Some((token, span)) = tokens.get(self.pos) {
            if stops.iter().any(|stop| stop.matches(token)) {
                break;
            }
            match token {
                Token::Emphasis(delim) => {
                    pieces.push(Piece::Delim(*delim, span.clone()));
                    self.pos += 1;
                }
                Token::LinkOpen => {
                    let nodes = self.attempt(Construct::InternalLink, Self::internal_link);
                    pieces.extend(nodes.into_iter().map(Piece::Node));
                }
                Token::ExtLinkOpen if self.external_link_ahead() => {
                    let nodes = self.attempt(Construct::ExternalLink, Self::external_link);
                    pieces.extend(nodes.into_iter().map(Piece::Node));
                }
                Token::TemplateOpen => {
                    let nodes = self.attempt(Construct::Template, Self::template);
                    pieces.extend(nodes.into_iter().map(Piece::Node));
                }
                Token::RefOpen(_) => {
                    let nodes = self.attempt(Construct::Footnote, Self::footnote);
                    pieces.extend(nodes.into_iter().map(Piece::Node));
                }
                Token::RefReuse(name) => {
                    let note = Footnote::new(Some(name.clone()), InlineContent::new());
                    pieces.push(Piece::Node(Inline::Footnote(note)));
                    self.pos += 1;
                }
                Token::CodeOpen(_) => {
                    let nodes = self.attempt(Construct::Code, Self::code);
                    pieces.extend(nodes.into_iter().map(Piece::Node));
                }
                Token::LineBreak => {
                    pieces.push(Piece::Node(Inline::LineBreak));
                    self.pos += 1;
                }
                Token::Text(text) => {
                    pieces.push(Piece::Node(Inline::text(text.clone())));
                    self.pos += 1;
                }
                other => {
                    pieces.push(Piece::Node(Inline::text(other.literal())));
                    self.pos += 1;
                }
            }
        }

        self.resolve_emphasis(pieces)
    }

    /// Run a construct parser at the current opener, backtracking to literal text on failure.
    fn attempt(
        &mut self,
        construct: Construct,
        parse: fn(&mut Self) -> Option<Vec<Inline>>,
    ) -> Vec<Inline> {
        let tokens = self.tokens;
        let start = self.pos;
        let Some((opener, span)) = tokens.get(start) else {
            return Vec::new();
        };

        if self.depth >= MAX_DEPTH || self.failed.contains(&start) {
            self.recover(construct, span.clone());
            self.pos = start + 1;
            return vec![Inline::text(opener.literal())];
        }

        if self.gate.at(DebugGate::ENTER_LEAVE) {
            tracing::trace!(target: "wikitrans::parser", construct = construct.as_str(), at = span.start, "enter");
        }
        let mark = self.recoveries.len();
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        if self.gate.at(DebugGate::ENTER_LEAVE) {
            tracing::trace!(target: "wikitrans::parser", construct = construct.as_str(), ok = result.is_some(), "leave");
        }

        match result {
            Some(nodes) => nodes,
            None => {
                self.recoveries.truncate(mark);
                self.failed.insert(start);
                self.recover(construct, span.clone());
                self.pos = start + 1;
                vec![Inline::text(opener.literal())]
            }
        }
    }

    fn recover(&mut self, construct: Construct, span: logos::Span) {
        self.recoveries.push(Recovery { construct, span });
    }

    /// `[[target]]`, `[[target|text]]`, plus an optional link trail.
    fn internal_link(&mut self) -> Option<Vec<Inline>> {
        self.pos += 1;
        let mut target = String::new();
        loop {
            match self.peek()? {
                Token::Pipe | Token::LinkClose => break,
                Token::LinkOpen => return None,
                other => {
                    target.push_str(&other.literal());
                    self.pos += 1;
                }
            }
        }

        let text = if self.peek() == Some(&Token::Pipe) {
            self.pos += 1;
            Some(trim_content(self.parse_sequence(&[Stop::LinkClose])))
        } else {
            None
        };
        if self.peek() != Some(&Token::LinkClose) {
            return None;
        }
        self.pos += 1;

        let target = target.trim();
        let (target, leading_colon) = match target.strip_prefix(':') {
            Some(rest) => (rest.trim_start(), true),
            None => (target, false),
        };

        if has_url_scheme(target) {
            let link = ExternalLink::new(target, text);
            return Some(vec![Inline::ExternalLink(link)]);
        }

        let (trail, rest) = self.link_trail();
        let text = match (text, trail.is_empty()) {
            (text, true) => text,
            (Some(mut text), false) => {
                push_inline(&mut text, Inline::text(trail));
                Some(text)
            }
            (None, false) => Some(vec![Inline::text(format!("{target}{trail}"))]),
        };

        let mut link = InternalLink::new(target, text)?;
        if leading_colon {
            link = link.with_leading_colon();
        }
        let mut nodes = vec![Inline::InternalLink(link)];
        if let Some(rest) = rest {
            nodes.push(Inline::text(rest));
        }
        Some(nodes)
    }

    /// Letters directly after `]]` join the link text. Returns the trail and what is left of
    /// the text token it came from.
    fn link_trail(&mut self) -> (String, Option<String>) {
        let Some(Token::Text(text)) = self.peek() else {
            return (String::new(), None);
        };
        let split = text
            .char_indices()
            .find(|(_, c)| !c.is_alphabetic())
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        if split == 0 {
            return (String::new(), None);
        }
        self.pos += 1;
        let rest = &text[split..];
        let rest = (!rest.is_empty()).then(|| rest.to_string());
        (text[..split].to_string(), rest)
    }

    fn external_link_ahead(&self) -> bool {
        matches!(
            self.tokens.get(self.pos + 1),
            Some((Token::Text(text), _)) if has_url_scheme(text)
        )
    }

    /// `[scheme://url text]` or `[scheme://url]`.
    fn external_link(&mut self) -> Option<Vec<Inline>> {
        self.pos += 1;
        let mut url = String::new();
        let mut text = InlineContent::new();

        while let Some(token) = self.peek() {
            match token {
                Token::Text(chunk) => {
                    self.pos += 1;
                    if let Some(ws) = chunk.find(char::is_whitespace) {
                        url.push_str(&chunk[..ws]);
                        push_inline(&mut text, Inline::text(&chunk[ws..]));
                        break;
                    }
                    url.push_str(chunk);
                }
                Token::Equals => {
                    self.pos += 1;
                    url.push('=');
                }
                _ => break,
            }
        }

        for node in self.parse_sequence(&[Stop::ExtLinkClose]) {
            push_inline(&mut text, node);
        }
        if self.peek() != Some(&Token::ExtLinkClose) {
            return None;
        }
        self.pos += 1;

        let link = ExternalLink::new(url, Some(trim_content(text)));
        Some(vec![Inline::ExternalLink(link)])
    }

    /// `{{name|positional|key=value}}`.
    fn template(&mut self) -> Option<Vec<Inline>> {
        self.pos += 1;
        let mut name = String::new();
        loop {
            match self.peek()? {
                Token::Pipe | Token::TemplateClose => break,
                Token::TemplateOpen | Token::LinkOpen => return None,
                other => {
                    name.push_str(&other.literal());
                    self.pos += 1;
                }
            }
        }
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut template = TemplateInvocation::new(name);
        while self.peek() == Some(&Token::Pipe) {
            self.pos += 1;
            let key = self.named_key();
            let value = self.parse_sequence(&[Stop::Pipe, Stop::TemplateClose]);
            match key {
                Some(key) => template.push_named(key, trim_content(value)),
                None => template.push_positional(value),
            }
        }
        if self.peek() != Some(&Token::TemplateClose) {
            return None;
        }
        self.pos += 1;
        Some(vec![Inline::Template(template)])
    }

    /// `<ref>text</ref>`. An empty named ref cites the same note as its name.
    fn footnote(&mut self) -> Option<Vec<Inline>> {
        let Some(Token::RefOpen(name)) = self.peek() else {
            return None;
        };
        let name = name.clone();
        self.pos += 1;
        let content = trim_content(self.parse_sequence(&[Stop::RefClose]));
        if self.peek() != Some(&Token::RefClose) {
            return None;
        }
        self.pos += 1;
        if content.is_empty() && name.is_none() {
            return Some(Vec::new());
        }
        Some(vec![Inline::Footnote(Footnote::new(name, content))])
    }

    /// `<code>text</code>` or `<tt>text</tt>`; the closing tag must match the opening one.
    fn code(&mut self) -> Option<Vec<Inline>> {
        let Some(Token::CodeOpen(tag)) = self.peek() else {
            return None;
        };
        let tag = *tag;
        self.pos += 1;
        let content = self.parse_sequence(&[Stop::CodeClose(tag)]);
        if self.peek() != Some(&Token::CodeClose(tag)) {
            return None;
        }
        self.pos += 1;
        let tag = CodeTag::from_name(tag)?;
        Some(vec![Inline::Code(Code::new(tag, content))])
    }

    /// Consume `key=` when the parameter starts with plain text followed by `=`.
    fn named_key(&mut self) -> Option<String> {
        let mut key = String::new();
        let mut ahead = self.pos;
        while let Some((Token::Text(text), _)) = self.tokens.get(ahead) {
            key.push_str(text);
            ahead += 1;
        }
        if !matches!(self.tokens.get(ahead), Some((Token::Equals, _))) {
            return None;
        }
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.pos = ahead + 1;
        Some(key.to_string())
    }

    fn resolve_emphasis(&mut self, pieces: Vec<Piece>) -> InlineContent {
        let mut base = InlineContent::new();
        let mut frames: Vec<Frame> = Vec::new();

        for piece in pieces {
            match piece {
                Piece::Node(node) => push_inline(top_content(&mut frames, &mut base), node),
                Piece::Delim(EmphasisDelimiter::Italic, span) => {
                    toggle(&mut frames, &mut base, EmphasisKind::Italic, ("''", span))
                }
                Piece::Delim(EmphasisDelimiter::Strong, span) => {
                    toggle(&mut frames, &mut base, EmphasisKind::Strong, ("'''", span))
                }
                Piece::Delim(EmphasisDelimiter::Both, span) => {
                    let italic = is_open(&frames, EmphasisKind::Italic);
                    let strong = is_open(&frames, EmphasisKind::Strong);
                    let mid = span.start + 3;
                    let strong_part = ("'''", span.start..mid);
                    let italic_part = ("''", mid..span.end);
                    match (italic, strong) {
                        (true, true) => {
                            let inner = frames.last().map(|f| f.kind).unwrap_or(EmphasisKind::Italic);
                            let outer = other_kind(inner);
                            toggle(&mut frames, &mut base, inner, italic_part);
                            toggle(&mut frames, &mut base, outer, strong_part);
                        }
                        (true, false) => {
                            toggle(&mut frames, &mut base, EmphasisKind::Italic, italic_part);
                            toggle(&mut frames, &mut base, EmphasisKind::Strong, strong_part);
                        }
                        (false, true) => {
                            toggle(&mut frames, &mut base, EmphasisKind::Strong, strong_part);
                            toggle(&mut frames, &mut base, EmphasisKind::Italic, italic_part);
                        }
                        (false, false) => {
                            toggle(&mut frames, &mut base, EmphasisKind::Strong, strong_part);
                            toggle(&mut frames, &mut base, EmphasisKind::Italic, italic_part);
                        }
                    }
                }
            }
        }

        // Whatever is still open had no closing delimiter.
        while let Some(frame) = frames.pop() {
            let parent = top_content(&mut frames, &mut base);
            match frame.opener {
                Some((literal, span)) => {
                    push_inline(parent, Inline::text(literal));
                    for node in frame.content {
                        push_inline(parent, node);
                    }
                    self.recover(Construct::Emphasis, span);
                }
                None => {
                    if let Some(node) = make_emphasis(frame.kind, frame.content) {
                        push_inline(parent, node);
                    }
                }
            }
        }
        base
    }
}

fn top_content<'a>(frames: &'a mut [Frame], base: &'a mut InlineContent) -> &'a mut InlineContent {
    match frames.last_mut() {
        Some(frame) => &mut frame.content,
        None => base,
    }
}

fn is_open(frames: &[Frame], kind: EmphasisKind) -> bool {
    frames.iter().any(|f| f.kind == kind)
}

fn other_kind(kind: EmphasisKind) -> EmphasisKind {
    match kind {
        EmphasisKind::Italic => EmphasisKind::Strong,
        _ => EmphasisKind::Italic,
    }
}

/// Open `kind`, or close it if it is already open (closing and reopening anything nested
/// inside it).
fn toggle(
    frames: &mut Vec<Frame>,
    base: &mut InlineContent,
    kind: EmphasisKind,
    opener: (&'static str, logos::Span),
) {
    let Some(index) = frames.iter().rposition(|f| f.kind == kind) else {
        frames.push(Frame {
            kind,
            opener: Some(opener),
            content: InlineContent::new(),
        });
        return;
    };

    let mut reopen = Vec::new();
    while frames.len() > index {
        let Some(frame) = frames.pop() else { break };
        if frames.len() > index {
            reopen.push(frame.kind);
        }
        if let Some(node) = make_emphasis(frame.kind, frame.content) {
            push_inline(top_content(frames, base), node);
        }
    }
    for kind in reopen.into_iter().rev() {
        frames.push(Frame {
            kind,
            opener: None,
            content: InlineContent::new(),
        });
    }
}

/// Build an emphasis node, collapsing strong-over-italic (or the reverse) into `Both`.
fn make_emphasis(kind: EmphasisKind, content: InlineContent) -> Option<Inline> {
    if content.is_empty() {
        return None;
    }
    if let [Inline::Emphasis(inner)] = content.as_slice() {
        let complementary = matches!(
            (kind, inner.kind),
            (EmphasisKind::Italic, EmphasisKind::Strong) | (EmphasisKind::Strong, EmphasisKind::Italic)
        );
        if complementary {
            return Some(Inline::Emphasis(Emphasis::new(
                EmphasisKind::Both,
                inner.content.clone(),
            )));
        }
    }
    Some(Inline::Emphasis(Emphasis::new(kind, content)))
}

/// Append a node, merging adjacent text runs and dropping empty ones.
pub fn push_inline(content: &mut InlineContent, node: Inline) {
    if let Inline::Text(text) = &node {
        if text.text.is_empty() {
            return;
        }
        if let Some(Inline::Text(last)) = content.last_mut() {
            last.text.push_str(&text.text);
            return;
        }
    }
    content.push(node);
}

/// Strip leading and trailing whitespace text.
pub fn trim_content(mut content: InlineContent) -> InlineContent {
    while let Some(Inline::Text(first)) = content.first_mut() {
        let trimmed = first.text.trim_start().to_string();
        if trimmed.is_empty() {
            content.remove(0);
        } else {
            first.text = trimmed;
            break;
        }
    }
    while let Some(Inline::Text(last)) = content.last_mut() {
        let trimmed = last.text.trim_end().to_string();
        if trimmed.is_empty() {
            content.pop();
        } else {
            last.text = trimmed;
            break;
        }
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::lexing::tokenize_inline;

    fn parse(line: &str) -> (InlineContent, Vec<Recovery>) {
        let tokens = tokenize_inline(line, 0);
        let mut recoveries = Vec::new();
        let content = parse_inline(&tokens, DebugGate::default(), &mut recoveries);
        (content, recoveries)
    }

    fn content(line: &str) -> InlineContent {
        parse(line).0
    }

    fn emph(kind: EmphasisKind, content: InlineContent) -> Inline {
        Inline::Emphasis(Emphasis::new(kind, content))
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(content("  hello world "), vec![Inline::text("hello world")]);
    }

    #[test]
    fn test_italic_and_strong() {
        assert_eq!(
            content("a ''b'' '''c'''"),
            vec![
                Inline::text("a "),
                emph(EmphasisKind::Italic, vec![Inline::text("b")]),
                Inline::text(" "),
                emph(EmphasisKind::Strong, vec![Inline::text("c")]),
            ]
        );
    }

    #[test]
    fn test_both_collapses() {
        assert_eq!(
            content("'''''x'''''"),
            vec![emph(EmphasisKind::Both, vec![Inline::text("x")])]
        );
    }

    #[test]
    fn test_overlapping_emphasis_reopens() {
        // ''a '''b'' c''' : italic(a, strong(b)), strong(c)
        assert_eq!(
            content("''a '''b'' c'''"),
            vec![
                emph(
                    EmphasisKind::Italic,
                    vec![
                        Inline::text("a "),
                        emph(EmphasisKind::Strong, vec![Inline::text("b")]),
                    ]
                ),
                emph(EmphasisKind::Strong, vec![Inline::text(" c")]),
            ]
        );
    }

    #[test]
    fn test_unclosed_emphasis_is_literal() {
        let (content, recoveries) = parse("''open");
        assert_eq!(content, vec![Inline::text("''open")]);
        assert_eq!(recoveries.len(), 1);
        assert_eq!(recoveries[0].construct, Construct::Emphasis);
        assert_eq!(recoveries[0].span, 0..2);
    }

    #[test]
    fn test_internal_link_forms() {
        let link = |target: &str, text: Option<&str>| {
            Inline::InternalLink(
                InternalLink::new(target, text.map(|t| vec![Inline::text(t)])).unwrap(),
            )
        };
        assert_eq!(content("[[Target]]"), vec![link("Target", None)]);
        assert_eq!(content("[[Target|Text]]"), vec![link("Target", Some("Text"))]);
        assert_eq!(
            content("[[word]]s, x"),
            vec![link("word", Some("words")), Inline::text(", x")]
        );
    }

    #[test]
    fn test_leading_colon_link() {
        let content = content("[[:Category:Birds]]");
        match &content[0] {
            Inline::InternalLink(link) => {
                assert_eq!(link.target, "Category:Birds");
                assert!(link.leading_colon);
                assert!(!link.is_hidden());
            }
            other => panic!("expected link, got {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_link_is_literal() {
        let (content, recoveries) = parse("[[unterminated");
        assert_eq!(content, vec![Inline::text("[[unterminated")]);
        assert_eq!(recoveries.len(), 1);
        assert_eq!(recoveries[0].construct, Construct::InternalLink);
    }

    #[test]
    fn test_external_links() {
        assert_eq!(
            content("[http://x.org/?a=b the site]"),
            vec![Inline::ExternalLink(ExternalLink::new(
                "http://x.org/?a=b",
                Some(vec![Inline::text("the site")])
            ))]
        );
        assert_eq!(
            content("[https://x.org]"),
            vec![Inline::ExternalLink(ExternalLink::new("https://x.org", None))]
        );
        assert_eq!(content("[not a link]"), vec![Inline::text("[not a link]")]);
    }

    #[test]
    fn test_template_params() {
        let content = content("{{t|a|k = v |b}}");
        let Inline::Template(template) = &content[0] else {
            panic!("expected template, got {content:?}");
        };
        assert_eq!(template.name, "t");
        let keys: Vec<_> = template.params.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "k", "2"]);
        assert_eq!(template.get("k"), Some(&vec![Inline::text("v")]));
    }

    #[test]
    fn test_nested_link_inside_template() {
        let content = content("{{t|[[a|b]]}}");
        let Inline::Template(template) = &content[0] else {
            panic!("expected template");
        };
        assert!(matches!(template.get("1").unwrap()[0], Inline::InternalLink(_)));
    }

    #[test]
    fn test_deep_unterminated_nesting_does_not_blow_up() {
        let source = "[[".repeat(200);
        let (content, _) = parse(&source);
        assert_eq!(content, vec![Inline::text(source)]);
    }
}

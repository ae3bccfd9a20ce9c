//! Token definitions for wiki markup
//!
//! [`InlineToken`] is the raw logos alphabet used inside a line. [`Token`] is the scanner's
//! output: inline tokens with their text attached, plus the block-level markers produced by
//! line classification.

use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static REF_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bname\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'/>]+))"#).unwrap()
});

/// A token paired with its byte range in the source.
pub type SpannedToken = (Token, logos::Span);

/// Raw inline delimiters. Text runs stop at every character that may start a delimiter; a lone
/// delimiter character that forms no token is a lexer error and is turned into text.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum InlineToken {
    #[token("'''''")]
    BoldItalic,
    #[token("'''")]
    Bold,
    #[token("''")]
    Italic,

    #[token("[[")]
    LinkOpen,
    #[token("]]")]
    LinkClose,
    #[token("[")]
    ExtLinkOpen,
    #[token("]")]
    ExtLinkClose,

    #[token("{{")]
    TemplateOpen,
    #[token("}}")]
    TemplateClose,

    #[token("||")]
    DoublePipe,
    #[token("|")]
    Pipe,
    #[token("!!")]
    DoubleBang,
    #[token("=")]
    Equals,

    #[regex(r"<[bB][rR] */?>")]
    LineBreak,

    #[regex(r"<nowiki>[^<]*</nowiki>")]
    Nowiki,
    #[token("<nowiki/>")]
    EmptyNowiki,

    #[regex(r"<[rR][eE][fF]([ \t][^>/]*)?>")]
    RefOpen,
    #[regex(r"<[rR][eE][fF][ \t][^>/]*/>")]
    RefSelfClosing,
    #[regex(r"</[rR][eE][fF] *>")]
    RefClose,
    #[regex(r"<(code|tt)>")]
    CodeOpen,
    #[regex(r"</(code|tt)>")]
    CodeClose,

    #[regex(r"[^'\[\]{}|!=<\n]+")]
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmphasisDelimiter {
    /// `''`
    Italic,
    /// `'''`
    Strong,
    /// `'''''`
    Both,
}

impl EmphasisDelimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmphasisDelimiter::Italic => "''",
            EmphasisDelimiter::Strong => "'''",
            EmphasisDelimiter::Both => "'''''",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableMarker {
    /// `{|`
    Open,
    /// `|}`
    Close,
    /// `|-`
    Row,
    /// `|+`
    Caption,
    /// `|` at line start
    Cell,
    /// `!` at line start
    Header,
}

impl TableMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableMarker::Open => "{|",
            TableMarker::Close => "|}",
            TableMarker::Row => "|-",
            TableMarker::Caption => "|+",
            TableMarker::Cell => "|",
            TableMarker::Header => "!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of literal text.
    Text(String),

    // Line-start markers
    /// Opening `=` run of a heading; the level is the shorter of the two runs.
    HeadingStart(u8),
    /// Closing `=` run of a heading.
    HeadingEnd(u8),
    /// Full list prefix, e.g. `*`, `#:`, `;`.
    ListMarker(String),
    Table(TableMarker),
    HorizontalRule,
    /// One space-indented line, without its leading space.
    PreLine(String),
    /// The raw body of a `<pre>...</pre>` block.
    PreBlock(String),

    // Inline delimiters
    Emphasis(EmphasisDelimiter),
    LinkOpen,
    LinkClose,
    ExtLinkOpen,
    ExtLinkClose,
    TemplateOpen,
    TemplateClose,
    Pipe,
    DoublePipe,
    DoubleBang,
    Equals,
    LineBreak,
    /// `<ref>` with its `name` attribute, if any.
    RefOpen(Option<String>),
    /// `<ref name="..."/>`: cites an earlier named `<ref>` again.
    RefReuse(String),
    RefClose,
    /// `<code>` or `<tt>`.
    CodeOpen(&'static str),
    CodeClose(&'static str),
    /// A line holding only `<references/>`.
    References,

    /// End of a line. The count is the number of line ends crossed; more than one means the
    /// line was followed by blank lines.
    Newline(usize),
}

impl Token {
    pub fn text(s: impl Into<String>) -> Self {
        Token::Text(s.into())
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, Token::Newline(_))
    }

    /// Source spelling of an inline token, used when an unmatched opener degrades to text.
    pub fn literal(&self) -> String {
        match self {
            Token::Text(s) | Token::PreLine(s) | Token::PreBlock(s) => s.clone(),
            Token::HeadingStart(level) | Token::HeadingEnd(level) => "=".repeat(*level as usize),
            Token::ListMarker(prefix) => prefix.clone(),
            Token::Table(marker) => marker.as_str().to_string(),
            Token::HorizontalRule => "----".to_string(),
            Token::Emphasis(delim) => delim.as_str().to_string(),
            Token::LinkOpen => "[[".to_string(),
            Token::LinkClose => "]]".to_string(),
            Token::ExtLinkOpen => "[".to_string(),
            Token::ExtLinkClose => "]".to_string(),
            Token::TemplateOpen => "{{".to_string(),
            Token::TemplateClose => "}}".to_string(),
            Token::Pipe => "|".to_string(),
            Token::DoublePipe => "||".to_string(),
            Token::DoubleBang => "!!".to_string(),
            Token::Equals => "=".to_string(),
            Token::LineBreak => "<br>".to_string(),
            Token::RefOpen(None) => "<ref>".to_string(),
            Token::RefOpen(Some(name)) => format!("<ref name=\"{name}\">"),
            Token::RefReuse(name) => format!("<ref name=\"{name}\"/>"),
            Token::RefClose => "</ref>".to_string(),
            Token::CodeOpen(tag) => format!("<{tag}>"),
            Token::CodeClose(tag) => format!("</{tag}>"),
            Token::References => "<references/>".to_string(),
            Token::Newline(_) => "\n".to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(s) => write!(f, "TEXT {s:?}"),
            Token::HeadingStart(level) => write!(f, "HEADING_START {level}"),
            Token::HeadingEnd(level) => write!(f, "HEADING_END {level}"),
            Token::ListMarker(prefix) => write!(f, "LIST {prefix}"),
            Token::Table(marker) => write!(f, "TABLE {}", marker.as_str()),
            Token::PreLine(s) => write!(f, "PRE_LINE {s:?}"),
            Token::PreBlock(s) => write!(f, "PRE_BLOCK {s:?}"),
            Token::Newline(count) => write!(f, "NEWLINE {count}"),
            other => write!(f, "DELIM {}", other.literal()),
        }
    }
}

/// Tokenize the inside of a line with the inline alphabet.
///
/// Spans are offset by `base` so they point into the full source.
pub fn tokenize_inline(line: &str, base: usize) -> Vec<SpannedToken> {
    let mut lexer = InlineToken::lexer(line);
    let mut tokens: Vec<SpannedToken> = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let token = match result {
            Ok(InlineToken::BoldItalic) => Token::Emphasis(EmphasisDelimiter::Both),
            Ok(InlineToken::Bold) => Token::Emphasis(EmphasisDelimiter::Strong),
            Ok(InlineToken::Italic) => Token::Emphasis(EmphasisDelimiter::Italic),
            Ok(InlineToken::LinkOpen) => Token::LinkOpen,
            Ok(InlineToken::LinkClose) => Token::LinkClose,
            Ok(InlineToken::ExtLinkOpen) => Token::ExtLinkOpen,
            Ok(InlineToken::ExtLinkClose) => Token::ExtLinkClose,
            Ok(InlineToken::TemplateOpen) => Token::TemplateOpen,
            Ok(InlineToken::TemplateClose) => Token::TemplateClose,
            Ok(InlineToken::DoublePipe) => Token::DoublePipe,
            Ok(InlineToken::Pipe) => Token::Pipe,
            Ok(InlineToken::DoubleBang) => Token::DoubleBang,
            Ok(InlineToken::Equals) => Token::Equals,
            Ok(InlineToken::LineBreak) => Token::LineBreak,
            Ok(InlineToken::Nowiki) => {
                let inner = &slice["<nowiki>".len()..slice.len() - "</nowiki>".len()];
                if inner.is_empty() {
                    continue;
                }
                Token::Text(inner.to_string())
            }
            Ok(InlineToken::EmptyNowiki) => continue,
            Ok(InlineToken::RefOpen) => Token::RefOpen(ref_name(slice)),
            Ok(InlineToken::RefSelfClosing) => match ref_name(slice) {
                Some(name) => Token::RefReuse(name),
                None => continue,
            },
            Ok(InlineToken::RefClose) => Token::RefClose,
            Ok(InlineToken::CodeOpen) => Token::CodeOpen(code_tag(slice)),
            Ok(InlineToken::CodeClose) => Token::CodeClose(code_tag(slice)),
            Ok(InlineToken::Text) | Err(_) => Token::Text(slice.to_string()),
        };
        let span = span.start + base..span.end + base;
        push_merging_text(&mut tokens, token, span);
    }

    tokens
}

/// The `name` attribute of a `<ref ...>` tag.
fn ref_name(tag: &str) -> Option<String> {
    let caps = REF_NAME.captures(tag)?;
    let name = caps.get(1).or(caps.get(2)).or(caps.get(3))?.as_str().trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn code_tag(tag: &str) -> &'static str {
    if tag.contains("tt") {
        "tt"
    } else {
        "code"
    }
}

/// Push a token, merging adjacent text runs into one.
pub(crate) fn push_merging_text(tokens: &mut Vec<SpannedToken>, token: Token, span: logos::Span) {
    if let Token::Text(text) = &token {
        if let Some((Token::Text(prev), prev_span)) = tokens.last_mut() {
            if prev_span.end == span.start {
                prev.push_str(text);
                prev_span.end = span.end;
                return;
            }
        }
    }
    tokens.push((token, span));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<Token> {
        tokenize_inline(line, 0).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_emphasis_longest_match() {
        assert_eq!(
            kinds("'''''a''b'''"),
            vec![
                Token::Emphasis(EmphasisDelimiter::Both),
                Token::text("a"),
                Token::Emphasis(EmphasisDelimiter::Italic),
                Token::text("b"),
                Token::Emphasis(EmphasisDelimiter::Strong),
            ]
        );
    }

    #[test]
    fn test_lone_delimiter_chars_are_text() {
        assert_eq!(kinds("it's {x} <b>!"), vec![Token::text("it's {x} <b>!")]);
    }

    #[test]
    fn test_links_and_templates() {
        assert_eq!(
            kinds("[[a|b]] {{t|k=v}}"),
            vec![
                Token::LinkOpen,
                Token::text("a"),
                Token::Pipe,
                Token::text("b"),
                Token::LinkClose,
                Token::text(" "),
                Token::TemplateOpen,
                Token::text("t"),
                Token::Pipe,
                Token::text("k"),
                Token::Equals,
                Token::text("v"),
                Token::TemplateClose,
            ]
        );
    }

    #[test]
    fn test_nowiki_is_literal_text() {
        assert_eq!(kinds("a <nowiki>[[b]]</nowiki> c"), vec![Token::text("a [[b]] c")]);
        assert_eq!(kinds("a<nowiki/>b"), vec![Token::text("a"), Token::text("b")]);
    }

    #[test]
    fn test_line_break_variants() {
        assert_eq!(
            kinds("a<br>b<BR/>c<br />"),
            vec![
                Token::text("a"),
                Token::LineBreak,
                Token::text("b"),
                Token::LineBreak,
                Token::text("c"),
                Token::LineBreak,
            ]
        );
    }

    #[test]
    fn test_ref_tags() {
        assert_eq!(
            kinds("a<ref>b</ref><ref name=\"x\">c</REF><ref name=x />"),
            vec![
                Token::text("a"),
                Token::RefOpen(None),
                Token::text("b"),
                Token::RefClose,
                Token::RefOpen(Some("x".to_string())),
                Token::text("c"),
                Token::RefClose,
                Token::RefReuse("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_nameless_self_closing_ref_is_dropped() {
        assert_eq!(kinds("a<ref group=g/>b"), vec![Token::text("a"), Token::text("b")]);
    }

    #[test]
    fn test_code_tags() {
        assert_eq!(
            kinds("<code>x</code> <tt>y</tt>"),
            vec![
                Token::CodeOpen("code"),
                Token::text("x"),
                Token::CodeClose("code"),
                Token::text(" "),
                Token::CodeOpen("tt"),
                Token::text("y"),
                Token::CodeClose("tt"),
            ]
        );
    }

    #[test]
    fn test_spans_are_offset() {
        let tokens = tokenize_inline("[[x]]", 10);
        assert_eq!(tokens[0].1, 10..12);
        assert_eq!(tokens[1].1, 12..13);
    }
}

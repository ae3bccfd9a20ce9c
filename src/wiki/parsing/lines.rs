//! Line Grouping
//!
//! Groups the flat token stream into classified [`Line`]s. A line's kind comes from its
//! line-start marker; its tokens are the inline tokens that follow the marker. Blank lines are
//! made explicit as `LineKind::Blank` entries so the block parser can end paragraphs and lists
//! on them.

use crate::wiki::lexing::{SpannedToken, TableMarker, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Paragraph,
    Heading(u8),
    List(String),
    Table(TableMarker),
    Rule,
    Pre(String),
    PreBlock(String),
    References,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub tokens: Vec<SpannedToken>,
    pub span: logos::Span,
}

impl Line {
    pub fn new(kind: LineKind, span: logos::Span) -> Self {
        Self {
            kind,
            tokens: Vec::new(),
            span,
        }
    }

    /// A paragraph line built from already scanned tokens (e.g. one table cell).
    pub fn paragraph(tokens: Vec<SpannedToken>) -> Self {
        let span = match (tokens.first(), tokens.last()) {
            (Some((_, first)), Some((_, last))) => first.start..last.end,
            _ => 0..0,
        };
        Self {
            kind: LineKind::Paragraph,
            tokens,
            span,
        }
    }

    fn push(&mut self, token: Token, span: logos::Span) {
        self.span.end = self.span.end.max(span.end);
        self.tokens.push((token, span));
    }

    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }
}

/// Group flat tokens into classified lines.
pub fn group_lines(tokens: Vec<SpannedToken>) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Option<Line> = None;

    for (token, span) in tokens {
        match token {
            Token::Newline(count) => {
                lines.extend(current.take());
                if count > 1 {
                    lines.push(Line::new(LineKind::Blank, span));
                }
            }
            Token::HeadingStart(level) if current.is_none() => {
                current = Some(Line::new(LineKind::Heading(level), span));
            }
            Token::HeadingEnd(_) if current.is_some() => {
                if let Some(line) = current.as_mut() {
                    line.span.end = span.end;
                }
            }
            Token::ListMarker(prefix) if current.is_none() => {
                current = Some(Line::new(LineKind::List(prefix), span));
            }
            Token::Table(marker) if current.is_none() => {
                current = Some(Line::new(LineKind::Table(marker), span));
            }
            // The rest of a rule or `<pre>` line starts a new paragraph line.
            Token::HorizontalRule => {
                lines.extend(current.take());
                lines.push(Line::new(LineKind::Rule, span));
            }
            Token::PreBlock(text) => {
                lines.extend(current.take());
                lines.push(Line::new(LineKind::PreBlock(text), span));
            }
            Token::References => {
                lines.extend(current.take());
                lines.push(Line::new(LineKind::References, span));
            }
            Token::PreLine(text) if current.is_none() => {
                lines.push(Line::new(LineKind::Pre(text), span));
            }
            other => match current.as_mut() {
                Some(line) => line.push(other, span),
                None => {
                    let mut line = Line::new(LineKind::Paragraph, span.clone());
                    line.push(other, span);
                    current = Some(line);
                }
            },
        }
    }
    lines.extend(current);
    lines
}

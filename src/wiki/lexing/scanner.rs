//! Line-classifying scanner
//!
//!     The scanner walks the source one line at a time. It decides what kind of line it is
//!     looking at from the line start, emits the matching block marker, hands the remainder of
//!     the line to [`tokenize_inline`], and finally folds the line end together with any blank
//!     lines after it into a single `Newline(n)` token.
//!
//!     Line classification order:
//!
//!         1. Continuation of a template left open on the previous line (no markers apply)
//!         2. Blank line (whitespace only)
//!         3. `<pre>` opening a block that is closed by `</pre>` somewhere later
//!         4. Heading: `=`-run, title, `=`-run
//!         5. Horizontal rule: four or more `-`
//!         6. A line holding only `<references/>`
//!         7. Table markers: `{|` anywhere, `|}` `|-` `|+` `|` `!` only inside a table
//!         8. List prefix: a run of `*`, `#`, `;`, `:`
//!         9. Leading space: preformatted line
//!        10. Anything else: paragraph text
//!
//!     A template whose `{{` is still open at the end of a line swallows the next line as well,
//!     as long as its `}}` turns up before the next blank line. A stray `{{` with no closing
//!     braces ahead is left open and the line ends normally. The line end becomes a `Text("\n")` token inside the
//!     template instead of a `Newline`.
//!
//!     The scanner is an `Iterator` and is `Clone`, so it can be restarted from the start by
//!     cloning a fresh instance.

use super::tokens::{tokenize_inline, SpannedToken, TableMarker, Token};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::VecDeque;

const MAX_HEADING_LEVEL: usize = 6;

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(=+)(.+?)(=+)[ \t]*$").unwrap());

static REFERENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*<references\s*(?:/>|>\s*</references\s*>)\s*$").unwrap()
});

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    pending: VecDeque<SpannedToken>,
    template_depth: usize,
    table_depth: usize,
    continuation: bool,
}

/// Scan the whole source into a token vector.
pub fn scan(source: &str) -> Vec<SpannedToken> {
    Scanner::new(source).collect()
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            pending: VecDeque::new(),
            template_depth: 0,
            table_depth: 0,
            continuation: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    fn emit(&mut self, token: Token, span: logos::Span) {
        self.pending.push_back((token, span));
    }

    fn emit_inline(&mut self, text: &str, base: usize) {
        for (token, span) in tokenize_inline(text, base) {
            match token {
                Token::TemplateOpen => self.template_depth += 1,
                Token::TemplateClose => self.template_depth = self.template_depth.saturating_sub(1),
                _ => {}
            }
            self.emit(token, span);
        }
    }

    /// Emit the remainder of a marker line, if it has any content.
    fn emit_rest(&mut self, line: &str, offset: usize, base: usize) {
        let rest = &line[offset..];
        if !rest.trim().is_empty() {
            self.emit_inline(rest, base + offset);
        }
    }

    /// Emit the remainder of a marker line as one uninterpreted text run.
    fn emit_rest_raw(&mut self, line: &str, offset: usize, base: usize) {
        let rest = &line[offset..];
        if !rest.trim().is_empty() {
            self.emit(Token::text(rest), base + offset..base + line.len());
        }
    }

    fn scan_line(&mut self) {
        let start = self.pos;
        let rest = &self.source[start..];
        let (raw_len, has_newline) = match rest.find('\n') {
            Some(i) => (i, true),
            None => (rest.len(), false),
        };
        let line = rest[..raw_len].strip_suffix('\r').unwrap_or(&rest[..raw_len]);
        let line_end = start + raw_len;

        if self.continuation {
            self.continuation = false;
            self.emit_inline(line, start);
        } else if line.trim().is_empty() {
            // blank
        } else if let Some(end) = self.scan_pre_block(line, start) {
            self.finish_pre_block(end);
            return;
        } else if !self.scan_heading(line, start) {
            self.classify_line(line, start);
        }

        self.finish_line(line_end, has_newline);
    }

    fn classify_line(&mut self, line: &str, start: usize) {
        let dashes = line.chars().take_while(|&c| c == '-').count();
        if dashes >= 4 {
            self.emit(Token::HorizontalRule, start..start + dashes);
            self.emit_rest(line, dashes, start);
            return;
        }

        if REFERENCES.is_match(line) {
            self.emit(Token::References, start..start + line.len());
            return;
        }

        let indent = line.len() - line.trim_start().len();
        let trimmed = &line[indent..];
        if let Some(marker) = self.table_marker(trimmed) {
            let marker_len = marker.as_str().len();
            let offset = indent + marker_len;
            self.emit(Token::Table(marker), start + indent..start + offset);
            match marker {
                TableMarker::Open => {
                    self.table_depth += 1;
                    self.emit_rest_raw(line, offset, start);
                }
                TableMarker::Row => self.emit_rest_raw(line, offset, start),
                TableMarker::Close => {
                    self.table_depth = self.table_depth.saturating_sub(1);
                    self.emit_rest(line, offset, start);
                }
                TableMarker::Caption | TableMarker::Cell | TableMarker::Header => {
                    self.emit_rest(line, offset, start)
                }
            }
            return;
        }

        let prefix = line
            .chars()
            .take_while(|c| matches!(c, '*' | '#' | ';' | ':'))
            .count();
        if prefix > 0 {
            self.emit(Token::ListMarker(line[..prefix].to_string()), start..start + prefix);
            self.emit_rest(line, prefix, start);
            return;
        }

        if let Some(pre) = line.strip_prefix(' ') {
            self.emit(Token::PreLine(pre.to_string()), start..start + line.len());
            return;
        }

        self.emit_inline(line, start);
    }

    fn table_marker(&self, trimmed: &str) -> Option<TableMarker> {
        if trimmed.starts_with("{|") {
            return Some(TableMarker::Open);
        }
        if self.table_depth == 0 {
            return None;
        }
        if trimmed.starts_with("|}") {
            Some(TableMarker::Close)
        } else if trimmed.starts_with("|-") {
            Some(TableMarker::Row)
        } else if trimmed.starts_with("|+") {
            Some(TableMarker::Caption)
        } else if trimmed.starts_with('|') {
            Some(TableMarker::Cell)
        } else if trimmed.starts_with('!') {
            Some(TableMarker::Header)
        } else {
            None
        }
    }

    /// Recognise `== Title ==`. Returns false when the line is not a heading.
    fn scan_heading(&mut self, line: &str, start: usize) -> bool {
        if !line.starts_with('=') {
            return false;
        }
        let Some(caps) = HEADING.captures(line) else {
            return false;
        };
        let (Some(open), Some(title), Some(close)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            return false;
        };
        if title.as_str().trim().chars().all(|c| c == '=') {
            return false;
        }

        let level = open.len().min(close.len()).min(MAX_HEADING_LEVEL);
        let open_extra = open.len() - level;
        let close_extra = close.len() - level;

        self.emit(Token::HeadingStart(level as u8), start..start + level);
        if open_extra > 0 {
            self.emit(
                Token::text("=".repeat(open_extra)),
                start + level..start + open.end(),
            );
        }
        self.emit_inline(title.as_str(), start + title.start());
        if close_extra > 0 {
            let extra_start = start + close.start();
            self.emit(
                Token::text("=".repeat(close_extra)),
                extra_start..extra_start + close_extra,
            );
        }
        self.emit(
            Token::HeadingEnd(level as u8),
            start + close.end() - level..start + close.end(),
        );
        true
    }

    /// Recognise `<pre>` with a matching `</pre>`. Returns the byte offset just past the
    /// closing tag; unterminated `<pre>` is left to be scanned as text.
    fn scan_pre_block(&mut self, line: &str, start: usize) -> Option<usize> {
        let indent = line.len() - line.trim_start().len();
        let open = start + indent;
        if !self.source[open..]
            .get(..5)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("<pre>"))
        {
            return None;
        }
        let body_start = open + 5;
        let lowered = self.source[body_start..].to_ascii_lowercase();
        let close = body_start + lowered.find("</pre>")?;
        let body = &self.source[body_start..close];
        let body = body.strip_prefix("\r\n").or_else(|| body.strip_prefix('\n')).unwrap_or(body);
        let end = close + "</pre>".len();
        self.emit(Token::PreBlock(body.to_string()), open..end);
        Some(end)
    }

    /// After a `<pre>` block, the rest of its closing line is paragraph text.
    fn finish_pre_block(&mut self, end: usize) {
        let rest = &self.source[end..];
        let (tail_len, has_newline) = match rest.find('\n') {
            Some(i) => (i, true),
            None => (rest.len(), false),
        };
        let tail = rest[..tail_len].strip_suffix('\r').unwrap_or(&rest[..tail_len]);
        if !tail.trim().is_empty() {
            self.emit_inline(tail, end);
        }
        self.finish_line(end + tail_len, has_newline);
    }

    /// Consume the line end at `line_end` plus any blank lines after it.
    fn finish_line(&mut self, line_end: usize, has_newline: bool) {
        if !has_newline {
            self.pos = self.source.len();
            return;
        }

        let mut count = 1;
        let mut next = line_end + 1;
        while next < self.source.len() {
            let rest = &self.source[next..];
            let (len, more) = match rest.find('\n') {
                Some(i) => (i, true),
                None => (rest.len(), false),
            };
            if !rest[..len].trim().is_empty() {
                break;
            }
            count += 1;
            next = if more { next + len + 1 } else { self.source.len() };
        }

        if self.template_depth > 0
            && count == 1
            && next < self.source.len()
            && self.template_closes_ahead(next)
        {
            self.continuation = true;
            self.emit(Token::text("\n"), line_end..line_end + 1);
        } else {
            self.template_depth = 0;
            self.emit(Token::Newline(count), line_end..next);
        }
        self.pos = next;
    }

    /// Whether the open templates are closed by a `}}` before the next blank line.
    fn template_closes_ahead(&self, from: usize) -> bool {
        let mut depth = self.template_depth;
        for line in self.source[from..].lines() {
            if line.trim().is_empty() {
                return false;
            }
            for (token, _) in tokenize_inline(line, 0) {
                match token {
                    Token::TemplateOpen => depth += 1,
                    Token::TemplateClose => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            return true;
                        }
                    }
                    _ => {}
                }
            }
        }
        false
    }
}

impl Iterator for Scanner<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.pos >= self.source.len() {
                return None;
            }
            self.scan_line();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::lexing::tokens::EmphasisDelimiter;

    fn kinds(source: &str) -> Vec<Token> {
        scan(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_heading() {
        assert_eq!(
            kinds("== Title ==\n"),
            vec![
                Token::HeadingStart(2),
                Token::text(" Title "),
                Token::HeadingEnd(2),
                Token::Newline(1),
            ]
        );
    }

    #[test]
    fn test_unbalanced_heading_keeps_excess_as_text() {
        assert_eq!(
            kinds("=== T =="),
            vec![
                Token::HeadingStart(2),
                Token::text("="),
                Token::text(" T "),
                Token::HeadingEnd(2),
            ]
        );
    }

    #[test]
    fn test_heading_spans() {
        let tokens = scan("==a===");
        assert_eq!(tokens[0], (Token::HeadingStart(2), 0..2));
        assert_eq!(tokens[1], (Token::text("a"), 2..3));
        assert_eq!(tokens[2], (Token::text("="), 3..4));
        assert_eq!(tokens[3], (Token::HeadingEnd(2), 4..6));
    }

    #[test]
    fn test_lone_equals_is_not_heading() {
        assert_eq!(
            kinds("==="),
            vec![Token::Equals, Token::Equals, Token::Equals]
        );
    }

    #[test]
    fn test_blank_lines_fold_into_newline_count() {
        assert_eq!(
            kinds("a\n\n  \nb"),
            vec![Token::text("a"), Token::Newline(3), Token::text("b")]
        );
    }

    #[test]
    fn test_list_markers_keep_full_prefix() {
        assert_eq!(
            kinds("*# item\n"),
            vec![
                Token::ListMarker("*#".to_string()),
                Token::text(" item"),
                Token::Newline(1),
            ]
        );
    }

    #[test]
    fn test_rule_and_preformatted() {
        assert_eq!(
            kinds("-----\n code  here\n"),
            vec![
                Token::HorizontalRule,
                Token::Newline(1),
                Token::PreLine("code  here".to_string()),
                Token::Newline(1),
            ]
        );
    }

    #[test]
    fn test_pre_block_spans_lines() {
        assert_eq!(
            kinds("<pre>\n[[a]]\n  b\n</pre>\nc"),
            vec![
                Token::PreBlock("[[a]]\n  b\n".to_string()),
                Token::Newline(1),
                Token::text("c"),
            ]
        );
    }

    #[test]
    fn test_unterminated_pre_is_text() {
        let tokens = kinds("<pre>x");
        assert_eq!(tokens, vec![Token::text("<pre>x")]);
    }

    #[test]
    fn test_table_markers_only_inside_table() {
        assert_eq!(
            kinds("| a\n{| class=x\n|-\n! h !! i\n| c\n|}\n"),
            vec![
                Token::Pipe,
                Token::text(" a"),
                Token::Newline(1),
                Token::Table(TableMarker::Open),
                Token::text(" class=x"),
                Token::Newline(1),
                Token::Table(TableMarker::Row),
                Token::Newline(1),
                Token::Table(TableMarker::Header),
                Token::text(" h "),
                Token::DoubleBang,
                Token::text(" i"),
                Token::Newline(1),
                Token::Table(TableMarker::Cell),
                Token::text(" c"),
                Token::Newline(1),
                Token::Table(TableMarker::Close),
                Token::Newline(1),
            ]
        );
    }

    #[test]
    fn test_template_continues_across_lines() {
        assert_eq!(
            kinds("{{t\n|a}}\n* x"),
            vec![
                Token::TemplateOpen,
                Token::text("t"),
                Token::text("\n"),
                Token::Pipe,
                Token::text("a"),
                Token::TemplateClose,
                Token::Newline(1),
                Token::ListMarker("*".to_string()),
                Token::text(" x"),
            ]
        );
    }

    #[test]
    fn test_blank_line_ends_open_template() {
        assert_eq!(
            kinds("{{t\n\n* x"),
            vec![
                Token::TemplateOpen,
                Token::text("t"),
                Token::Newline(2),
                Token::ListMarker("*".to_string()),
                Token::text(" x"),
            ]
        );
    }

    #[test]
    fn test_unclosed_template_does_not_swallow_lines() {
        assert_eq!(
            kinds("intro {{oops\n* a\n* b\n"),
            vec![
                Token::text("intro "),
                Token::TemplateOpen,
                Token::text("oops"),
                Token::Newline(1),
                Token::ListMarker("*".to_string()),
                Token::text(" a"),
                Token::Newline(1),
                Token::ListMarker("*".to_string()),
                Token::text(" b"),
                Token::Newline(1),
            ]
        );
    }

    #[test]
    fn test_unclosed_template_in_heading_ends_at_line() {
        let tokens = kinds("== {{t ==\n* a\n== Next ==\n");
        assert_eq!(
            &tokens[..7],
            &[
                Token::HeadingStart(2),
                Token::text(" "),
                Token::TemplateOpen,
                Token::text("t "),
                Token::HeadingEnd(2),
                Token::Newline(1),
                Token::ListMarker("*".to_string()),
            ]
        );
        assert_eq!(
            tokens.iter().filter(|t| matches!(t, Token::HeadingStart(_))).count(),
            2
        );
    }

    #[test]
    fn test_template_closing_two_lines_later_continues() {
        let tokens = kinds("{{t\n|a\n|b}}\nafter");
        assert_eq!(
            tokens.iter().filter(|t| t.is_newline()).count(),
            1
        );
        assert_eq!(tokens.last(), Some(&Token::text("after")));
    }

    #[test]
    fn test_references_line() {
        assert_eq!(
            kinds("a\n<references />\n<references></references>"),
            vec![
                Token::text("a"),
                Token::Newline(1),
                Token::References,
                Token::Newline(1),
                Token::References,
            ]
        );
        assert!(!kinds("see <references/>").contains(&Token::References));
    }

    #[test]
    fn test_scanner_is_restartable() {
        let scanner = Scanner::new("''a''\n");
        let first: Vec<_> = scanner.clone().collect();
        let second: Vec<_> = scanner.collect();
        assert_eq!(first, second);
        assert_eq!(first[0].0, Token::Emphasis(EmphasisDelimiter::Italic));
    }

    #[test]
    fn test_crlf_line_ends() {
        assert_eq!(
            kinds("a\r\nb"),
            vec![Token::text("a"), Token::Newline(1), Token::text("b")]
        );
    }
}

//! Scanner behaviour on whole documents
//!
//! Unit tests beside the scanner cover single line kinds; these check how line kinds interact
//! across a page and that spans always point back into the source.

use rstest::rstest;
use wikitrans::wiki::lexing::{scan, EmphasisDelimiter, Scanner, TableMarker, Token};

fn kinds(source: &str) -> Vec<Token> {
    scan(source).into_iter().map(|(t, _)| t).collect()
}

#[rstest]
#[case("= A =", 1)]
#[case("== A ==", 2)]
#[case("====== A ======", 6)]
#[case("======= A =======", 6)]
#[case("==== A ==", 2)]
fn test_heading_levels(#[case] source: &str, #[case] level: u8) {
    let tokens = kinds(source);
    assert_eq!(tokens.first(), Some(&Token::HeadingStart(level)));
    assert_eq!(tokens.last(), Some(&Token::HeadingEnd(level)));
}

#[test]
fn test_page_token_sequence() {
    assert_eq!(
        kinds("== Noun ==\n# a '''cat'''\n\n[[Target|Text]]"),
        vec![
            Token::HeadingStart(2),
            Token::text(" Noun "),
            Token::HeadingEnd(2),
            Token::Newline(1),
            Token::ListMarker("#".to_string()),
            Token::text(" a "),
            Token::Emphasis(EmphasisDelimiter::Strong),
            Token::text("cat"),
            Token::Emphasis(EmphasisDelimiter::Strong),
            Token::Newline(2),
            Token::LinkOpen,
            Token::text("Target"),
            Token::Pipe,
            Token::text("Text"),
            Token::LinkClose,
        ]
    );
}

#[test]
fn test_table_marker_lines() {
    let tokens = kinds("{|\n|+ cap\n|-\n| x\n|}");
    let markers: Vec<_> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Table(m) => Some(*m),
            _ => None,
        })
        .collect();
    assert_eq!(
        markers,
        vec![
            TableMarker::Open,
            TableMarker::Caption,
            TableMarker::Row,
            TableMarker::Cell,
            TableMarker::Close,
        ]
    );
}

#[test]
fn test_text_tokens_cover_their_spans() {
    let source = "Intro ''x'' [[a|b]]\n* item {{t|1}}\n== H ==\nend";
    for (token, span) in scan(source) {
        if let Token::Text(text) = token {
            assert_eq!(&source[span], text);
        }
    }
}

#[test]
fn test_spans_are_ordered_and_in_bounds() {
    let source = "a\n\n\n; t : d\n----\n <pre>\n<pre>x\ny</pre> z";
    let mut last = 0;
    for (_, span) in scan(source) {
        assert!(span.start >= last, "span {span:?} starts before {last}");
        assert!(span.end <= source.len());
        last = span.start;
    }
}

#[test]
fn test_restart_by_cloning() {
    let scanner = Scanner::new("* a\n{{t|\nb}}\n");
    let first: Vec<_> = scanner.clone().collect();
    let again: Vec<_> = scanner.collect();
    assert_eq!(first, again);
}

#[test]
fn test_unknown_bytes_are_text() {
    let tokens = kinds("<div>&amp; ~~~~ §</div>");
    assert!(tokens.iter().all(|t| matches!(t, Token::Text(_))), "{tokens:?}");
}

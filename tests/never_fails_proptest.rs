//! Property-based tests: arbitrary wiki-ish input never makes the engine fail
//!
//! Inputs are built from fragments of the markup alphabet so that unbalanced and interleaved
//! delimiters show up far more often than in uniformly random strings.

use proptest::prelude::*;
use wikitrans::wiki::lexing::scan;
use wikitrans::wiki::parsing::{parse, ParseOptions};
use wikitrans::{translate, Dialect, OutputFormat, TranslateConfig};

fn fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("''".to_string()),
        Just("'''".to_string()),
        Just("'''''".to_string()),
        Just("[[".to_string()),
        Just("]]".to_string()),
        Just("[".to_string()),
        Just("]".to_string()),
        Just("{{".to_string()),
        Just("}}".to_string()),
        Just("|".to_string()),
        Just("||".to_string()),
        Just("!!".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
        Just("\n".to_string()),
        Just("\n\n".to_string()),
        Just("\n* ".to_string()),
        Just("\n#: ".to_string()),
        Just("\n; ".to_string()),
        Just("\n{|".to_string()),
        Just("\n|-".to_string()),
        Just("\n|}".to_string()),
        Just("\n ".to_string()),
        Just("<br>".to_string()),
        Just("<pre>".to_string()),
        Just("</pre>".to_string()),
        Just("http://x.org ".to_string()),
        Just("File:".to_string()),
        Just("<ref>".to_string()),
        Just("<ref name=a/>".to_string()),
        Just("</ref>".to_string()),
        Just("\n<references/>\n".to_string()),
        Just("<code>".to_string()),
        Just("</tt>".to_string()),
        Just("fr:".to_string()),
        "[a-zA-Z .,:]{1,8}",
    ]
}

fn wiki_source() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_scanner_spans_stay_in_bounds(source in wiki_source()) {
        for (_, span) in scan(&source) {
            prop_assert!(span.start <= span.end);
            prop_assert!(span.end <= source.len());
        }
    }

    #[test]
    fn test_parse_never_panics_and_is_deterministic(source in wiki_source()) {
        let options = ParseOptions::default();
        let first = parse(&source, &options);
        let second = parse(&source, &options);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_every_default_format_renders(source in wiki_source()) {
        for format in OutputFormat::ALL {
            let config = TranslateConfig::new(format, Dialect::Default);
            let out = translate(&source, &config);
            prop_assert!(out.is_ok(), "{} failed: {:?}", format, out);
        }
    }

    #[test]
    fn test_dictionary_rendering_is_deterministic(source in wiki_source()) {
        let config = TranslateConfig::new(OutputFormat::Html, Dialect::Dictionary);
        prop_assert_eq!(translate(&source, &config), translate(&source, &config));
    }

    #[test]
    fn test_arbitrary_unicode_never_panics(source in "\\PC{0,200}") {
        let config = TranslateConfig::new(OutputFormat::Text, Dialect::Default);
        prop_assert!(translate(&source, &config).is_ok());
    }
}

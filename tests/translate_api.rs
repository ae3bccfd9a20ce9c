//! End-to-end translation through the public entry points

use rstest::rstest;
use wikitrans::wiki::formats::RendererRegistry;
use wikitrans::wiki::parsing::Construct;
use wikitrans::{
    derive_html_base, translate, translate_bytes, Dialect, OutputFormat, TranslateConfig,
    TranslateError, Translator,
};

fn config(format: OutputFormat, dialect: Dialect) -> TranslateConfig {
    TranslateConfig::new(format, dialect)
}

#[test]
fn test_level_two_heading_in_html_and_texinfo() {
    let html = translate("== Title ==", &config(OutputFormat::Html, Dialect::Default)).unwrap();
    assert!(html.contains("<h2 id=\"section-1\">Title</h2>"), "{html}");

    let texi = translate("== Title ==", &config(OutputFormat::Texi, Dialect::Default)).unwrap();
    assert!(texi.contains("@section Title"), "{texi}");
    assert!(!texi.contains("@chapter"), "{texi}");
}

#[test]
fn test_plain_text_list_keeps_order() {
    let out = translate("* a\n* b\n", &config(OutputFormat::Text, Dialect::Default)).unwrap();
    assert_eq!(out, " - a\n - b\n");
}

#[test]
fn test_unterminated_link_survives_every_format() {
    for format in OutputFormat::ALL {
        let translator = match Translator::new(&config(format, Dialect::Default)) {
            Ok(t) => t,
            Err(e) => panic!("{format}: {e}"),
        };
        let translation = translator.translate("[[unterminated");
        assert_eq!(translation.recoveries.len(), 1, "{format}");
        assert_eq!(translation.recoveries[0].construct, Construct::InternalLink);
        if matches!(format, OutputFormat::Html | OutputFormat::Text) {
            assert!(translation.output.contains("[[unterminated"), "{format}");
        }
    }
}

#[test]
fn test_dictionary_dump_fails_before_scanning() {
    // Invalid UTF-8 would be reported if the input were looked at.
    let err = translate_bytes(&[0xff, 0xfe], &config(OutputFormat::Dump, Dialect::Dictionary))
        .unwrap_err();
    assert_eq!(
        err,
        TranslateError::UnsupportedDialectForFormat {
            format: "dump".to_string(),
            dialect: "dictionary".to_string(),
        }
    );
}

#[test]
fn test_unknown_format_name() {
    let err = "pdf".parse::<OutputFormat>().unwrap_err();
    assert_eq!(err, TranslateError::UnsupportedOutputFormat("pdf".to_string()));
}

#[test]
fn test_empty_registry_reports_unsupported_format() {
    let registry = RendererRegistry::new();
    let result = Translator::with_registry(&TranslateConfig::default(), &registry);
    assert!(matches!(
        result.err(),
        Some(TranslateError::UnsupportedOutputFormat(_))
    ));
}

#[test]
fn test_dictionary_texinfo_is_plain_text() {
    let source = "== Title ==\n* a\n";
    let dictionary = translate(source, &config(OutputFormat::Texi, Dialect::Dictionary)).unwrap();
    let text = translate(source, &config(OutputFormat::Text, Dialect::Dictionary)).unwrap();
    assert_eq!(dictionary, text);
    assert!(!dictionary.contains('@'));
}

#[test]
fn test_dictionary_html_links_to_wiktionary() {
    let mut cfg = config(OutputFormat::Html, Dialect::Dictionary);
    cfg.language_tag = "fr".to_string();
    let out = translate("# [[chat]]", &cfg).unwrap();
    assert!(
        out.contains("href=\"http://fr.wiktionary.org/wiki/chat\""),
        "{out}"
    );
}

#[test]
fn test_dictionary_sections_in_html_and_text() {
    let source = "===Noun===\n# A cat.\n";
    let html = translate(source, &config(OutputFormat::Html, Dialect::Dictionary)).unwrap();
    assert!(html.starts_with("<section class=\"part-of-speech\">\n<h3 id=\"section-1\">Noun</h3>\n"), "{html}");
    assert!(html.ends_with("</section>\n"), "{html}");

    let text = translate(source, &config(OutputFormat::Text, Dialect::Dictionary)).unwrap();
    assert_eq!(text, "*** Noun\n\n 1. A cat.\n");
}

#[test]
fn test_configured_base_and_derived_base() {
    let mut cfg = config(OutputFormat::Html, Dialect::Default);
    cfg.html_base = Some(
        derive_html_base(
            Some("https://en.wikipedia.org/wiki/Rust?action=raw"),
            Dialect::Default,
            "en",
        )
        .unwrap(),
    );
    let out = translate("[[Borrow checker]]", &cfg).unwrap();
    assert!(
        out.contains("href=\"https://en.wikipedia.org/wiki/Borrow%20checker\""),
        "{out}"
    );
}

#[rstest]
#[case(0)]
#[case(20)]
#[case(70)]
#[case(80)]
#[case(90)]
#[case(100)]
fn test_debug_level_does_not_change_output(#[case] level: u8) {
    let source = "== H ==\n''a [[b|c]] {{t|x=1}}\n{| \n| x\n|}\n[[open";
    for format in [OutputFormat::Html, OutputFormat::Dump, OutputFormat::Texi] {
        let quiet = config(format, Dialect::Default);
        let mut loud = quiet.clone();
        loud.debug_level = level;
        assert_eq!(
            translate(source, &quiet).unwrap(),
            translate(source, &loud).unwrap(),
            "{format} at debug level {level}"
        );
    }
}

#[test]
fn test_debug_level_out_of_range() {
    let mut cfg = TranslateConfig::default();
    cfg.debug_level = 101;
    assert!(matches!(
        translate("x", &cfg),
        Err(TranslateError::InvalidConfig(_))
    ));
}

#[test]
fn test_yaml_config_drives_translation() {
    let cfg = TranslateConfig::from_yaml_str("output_format: dump\nindent: 0\n").unwrap();
    let out = translate("x", &cfg).unwrap();
    assert_eq!(out.lines().count(), 1);
    assert!(out.starts_with('{'));
}

#[test]
fn test_invalid_utf8_reports_offset() {
    let err = translate_bytes(b"ok \xc3(", &TranslateConfig::default()).unwrap_err();
    assert_eq!(err, TranslateError::InvalidUtf8 { offset: 3 });
}

#[test]
fn test_translator_is_shareable_across_threads() {
    let translator = Translator::new(&config(OutputFormat::Text, Dialect::Default)).unwrap_or_else(|e| panic!("{e}"));
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let translator = &translator;
                scope.spawn(move || translator.translate(&format!("* item {i}")).output)
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!(" - item {i}\n"));
        }
    });
}

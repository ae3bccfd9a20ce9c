//! Rendering whole pages through each renderer

use rstest::rstest;
use wikitrans::wiki::formats::{
    DumpRenderer, HtmlRenderer, PlainTextRenderer, Renderer, TexinfoRenderer, TreevizRenderer,
};
use wikitrans::{parse_document, SectioningModel};

const PAGE: &str = "== Title ==\nIntro with [[Target|Text]].\n* a\n* b\n";

#[test]
fn test_html_page() {
    let out = HtmlRenderer::default().render(&parse_document(PAGE));
    insta::assert_snapshot!(out, @r###"
    <h2 id="section-1">Title</h2>
    <p>Intro with <a href="#Target">Text</a>.</p>
    <ul>
    <li>a</li>
    <li>b</li>
    </ul>
    "###);
}

#[test]
fn test_html_link_base_is_percent_encoded() {
    let renderer = HtmlRenderer::new(Some("https://wiki.example/{lang}/".to_string()));
    let out = renderer.render(&parse_document("[[A & B/C?]]"));
    assert_eq!(
        out,
        "<p><a href=\"https://wiki.example/en/A%20%26%20B/C%3F\">A &amp; B/C?</a></p>\n"
    );
}

#[rstest]
#[case("= T =", "<h1 id=\"section-1\">T</h1>")]
#[case("== T ==", "<h2 id=\"section-1\">T</h2>")]
#[case("====== T ======", "<h6 id=\"section-1\">T</h6>")]
fn test_html_heading_levels(#[case] source: &str, #[case] expected: &str) {
    let out = HtmlRenderer::default().render(&parse_document(source));
    assert_eq!(out.trim_end(), expected);
}

#[test]
fn test_plain_text_page() {
    let out = PlainTextRenderer::default().render(&parse_document(PAGE));
    insta::assert_snapshot!(out, @r###"
    ** Title

    Intro with Text (Target).

     - a
     - b
    "###);
}

#[test]
fn test_plain_text_link_forms() {
    let render = |s: &str| PlainTextRenderer::default().render(&parse_document(s));
    assert_eq!(render("[[Target|Text]]"), "Text (Target)\n");
    assert_eq!(render("[[Target]]"), "Target\n");
    assert_eq!(render("[[Target|Target]]"), "Target\n");
}

#[test]
fn test_texinfo_page() {
    let out = TexinfoRenderer::default().render(&parse_document(PAGE));
    insta::assert_snapshot!(out, @r###"
    @node Title
    @section Title

    Intro with @ref{Target,Text}.

    @itemize @bullet
    @item a
    @item b
    @end itemize
    "###);
}

#[rstest]
#[case(SectioningModel::Numbered, "@chapter")]
#[case(SectioningModel::Unnumbered, "@unnumbered")]
#[case(SectioningModel::Appendix, "@appendix")]
fn test_texinfo_level_one_heading(#[case] model: SectioningModel, #[case] command: &str) {
    let out = TexinfoRenderer::new(model, 0).render(&parse_document("= Top ="));
    assert!(out.contains(&format!("{command} Top\n")), "{out}");
}

#[test]
fn test_texinfo_escapes_specials() {
    let out = TexinfoRenderer::default().render(&parse_document("a@b {c}"));
    assert_eq!(out, "a@@b @{c@}\n");
}

#[test]
fn test_dump_render_twice_is_identical() {
    let doc = parse_document(PAGE);
    let renderer = DumpRenderer::default();
    let first = renderer.render(&doc);
    let second = renderer.render(&doc);
    assert_eq!(first, second);
    assert!(first.ends_with("}\n"));
}

#[test]
fn test_dump_compact_and_indented_hold_the_same_tree() {
    let doc = parse_document(PAGE);
    let compact: serde_json::Value =
        serde_json::from_str(&DumpRenderer::new(0).render(&doc)).unwrap();
    let pretty: serde_json::Value =
        serde_json::from_str(&DumpRenderer::new(3).render(&doc)).unwrap();
    assert_eq!(compact, pretty);
}

#[test]
fn test_treeviz_page() {
    let out = TreevizRenderer.render(&parse_document(PAGE));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "├─ ⊤ h2 Title");
    assert!(lines.iter().any(|l| l.contains("2 items (unordered)")), "{out}");
    assert!(lines.last().unwrap().starts_with("  "), "{out}");
}

#[test]
fn test_renderers_are_named() {
    let renderers: Vec<Box<dyn Renderer>> = vec![
        Box::new(HtmlRenderer::default()),
        Box::new(PlainTextRenderer::default()),
        Box::new(TexinfoRenderer::default()),
        Box::new(DumpRenderer::default()),
        Box::new(TreevizRenderer),
    ];
    let names: Vec<&str> = renderers.iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["html", "text", "texi", "dump", "treeviz"]);
}

const CITED: &str = "Fact.<ref>Source, page 3</ref> Use <code>ls</code>.\n\n<references/>\n";

#[test]
fn test_footnotes_in_every_format() {
    let doc = parse_document(CITED);

    let html = HtmlRenderer::default().render(&doc);
    assert!(html.contains("<a href=\"#cite_note-1\">[1]</a></sup>"), "{html}");
    assert!(html.contains("<ol class=\"references\">"), "{html}");
    assert!(html.contains("<code>ls</code>"), "{html}");

    let text = PlainTextRenderer::default().render(&doc);
    assert_eq!(text, "Fact.[1] Use ls.\n\nReferences:\n[1]. Source, page 3\n");

    let texi = TexinfoRenderer::default().render(&doc);
    assert_eq!(texi, "Fact.@footnote{Source, page 3} Use @code{ls}.\n");
}

#[test]
fn test_treeviz_shows_footnotes() {
    let out = TreevizRenderer.render(&parse_document(CITED));
    assert!(out.contains("† [1]"), "{out}");
    assert!(out.contains("※ 1 notes"), "{out}");
}

//! HTML renderer
//!
//!     Block nodes map to the usual tag pairs (`<h2>`, `<p>`, `<ul>`/`<ol>`, `<dl>`, `<table>`,
//!     `<pre>`, `<hr/>`). List items, definitions and table cells whose only content is one
//!     paragraph are written tight, without a `<p>` wrapper.
//!
//!     Headings get `id="section-N"` anchors, numbered in document order during the single
//!     rendering pass. Internal links point at `link_base + percent-encoded target`, where
//!     `{lang}` in the base is replaced by the document language; with no base they become
//!     in-page `#target` anchors. Links into the File, Image, Media and Category namespaces are
//!     omitted. An interlanguage link such as `[[fr:Chat]]` points at the same base with the
//!     link's language in place of `{lang}`, and shows the language name when it has no text.
//!
//!     Footnotes are superscript links `cite_ref-N` → `cite_note-N`; a references list is an
//!     `<ol class="references">` whose items link back.

use super::registry::Renderer;
use crate::wiki::ast::{
    Block, DefinitionList, Document, EmphasisKind, Footnote, Inline, InternalLink, List,
    References, Section, Table, TemplateInvocation,
};
use crate::wiki::config::TranslateConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Characters left as-is in link targets: alphanumerics plus `-_.~/`.
const TARGET_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    link_base: Option<String>,
}

impl HtmlRenderer {
    pub fn new(link_base: Option<String>) -> Self {
        Self { link_base }
    }

    pub fn from_config(config: &TranslateConfig) -> Self {
        Self::new(config.effective_link_base())
    }
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &str {
        "html"
    }

    fn render(&self, doc: &Document) -> String {
        let template = self
            .link_base
            .as_deref()
            .or(doc.metadata.link_base.as_deref());
        let mut writer = HtmlWriter {
            out: String::new(),
            link_base: template.map(|base| base.replace("{lang}", &doc.metadata.language)),
            link_template: template.map(str::to_string),
            next_anchor: 1,
        };
        writer.blocks(&doc.blocks);
        writer.out
    }

    fn description(&self) -> &str {
        "HTML fragment"
    }
}

/// Escape text content: `&`, `<` and `>`.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape(text, false)
}

/// Escape an attribute value: text escapes plus `"`.
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    escape(text, true)
}

fn escape(text: &str, quotes: bool) -> Cow<'_, str> {
    let needs = |c: char| matches!(c, '&' | '<' | '>') || (quotes && c == '"');
    if !text.contains(needs) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Href for an internal link target.
pub fn link_href(link_base: Option<&str>, target: &str) -> String {
    let encoded = utf8_percent_encode(target.trim(), TARGET_ENCODE_SET).to_string();
    match link_base {
        Some(base) => format!("{base}{encoded}"),
        None => format!("#{encoded}"),
    }
}

struct HtmlWriter {
    out: String,
    link_base: Option<String>,
    /// The link base before `{lang}` is filled in, for interlanguage links.
    link_template: Option<String>,
    next_anchor: usize,
}

impl HtmlWriter {
    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading(heading) => {
                self.heading_open(heading.level);
                self.inlines(&heading.content);
                self.out.push_str(&format!("</h{}>\n", heading.level));
            }
            Block::Paragraph(paragraph) => {
                self.out.push_str("<p>");
                self.inlines(&paragraph.content);
                self.out.push_str("</p>\n");
            }
            Block::List(list) => self.list(list),
            Block::DefinitionList(list) => self.definition_list(list),
            Block::Table(table) => self.table(table),
            Block::Preformatted(pre) => {
                self.out.push_str("<pre>");
                self.out.push_str(&escape_text(&pre.text));
                self.out.push_str("</pre>\n");
            }
            Block::HorizontalRule => self.out.push_str("<hr/>\n"),
            Block::Template(template) => {
                self.out.push_str("<div>");
                self.template(template);
                self.out.push_str("</div>\n");
            }
            Block::Section(section) => self.section(section),
            Block::References(references) => self.references(references),
        }
    }

    fn heading_open(&mut self, level: u8) {
        self.out
            .push_str(&format!("<h{level} id=\"section-{}\">", self.next_anchor));
        self.next_anchor += 1;
    }

    fn section(&mut self, section: &Section) {
        self.out
            .push_str(&format!("<section class=\"{}\">\n", section.kind.as_str()));
        self.heading_open(section.level);
        self.out.push_str(&escape_text(&section.label));
        self.out.push_str(&format!("</h{}>\n", section.level));
        self.blocks(&section.blocks);
        self.out.push_str("</section>\n");
    }

    /// Container content: a lone leading paragraph is written inline.
    fn tight(&mut self, blocks: &[Block]) {
        let mut rest = blocks;
        if let Some((Block::Paragraph(first), tail)) = blocks.split_first() {
            self.inlines(&first.content);
            rest = tail;
            if !rest.is_empty() {
                self.out.push('\n');
            }
        }
        self.blocks(rest);
    }

    fn list(&mut self, list: &List) {
        let tag = if list.is_ordered() { "ol" } else { "ul" };
        self.out.push_str(&format!("<{tag}>\n"));
        for item in &list.items {
            self.out.push_str("<li>");
            self.tight(&item.blocks);
            self.out.push_str("</li>\n");
        }
        self.out.push_str(&format!("</{tag}>\n"));
    }

    fn definition_list(&mut self, list: &DefinitionList) {
        self.out.push_str("<dl>\n");
        for entry in &list.entries {
            if let Some(term) = &entry.term {
                self.out.push_str("<dt>");
                self.inlines(term);
                self.out.push_str("</dt>\n");
            }
            for definition in &entry.definitions {
                self.out.push_str("<dd>");
                self.tight(&definition.blocks);
                self.out.push_str("</dd>\n");
            }
        }
        self.out.push_str("</dl>\n");
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<table>\n");
        if let Some(caption) = &table.caption {
            self.out.push_str("<caption>");
            self.inlines(caption);
            self.out.push_str("</caption>\n");
        }
        for row in &table.rows {
            self.out.push_str("<tr>");
            for cell in &row.cells {
                let tag = if cell.header { "th" } else { "td" };
                self.out.push_str(&format!("<{tag}>"));
                self.tight(&cell.blocks);
                self.out.push_str(&format!("</{tag}>"));
            }
            self.out.push_str("</tr>\n");
        }
        self.out.push_str("</table>\n");
    }

    fn inlines(&mut self, content: &[Inline]) {
        for node in content {
            self.inline(node);
        }
    }

    fn inline(&mut self, node: &Inline) {
        match node {
            Inline::Text(text) => self.out.push_str(&escape_text(&text.text)),
            Inline::Emphasis(emphasis) => {
                let (open, close) = match emphasis.kind {
                    EmphasisKind::Italic => ("<i>", "</i>"),
                    EmphasisKind::Strong => ("<b>", "</b>"),
                    EmphasisKind::Both => ("<b><i>", "</i></b>"),
                };
                self.out.push_str(open);
                self.inlines(&emphasis.content);
                self.out.push_str(close);
            }
            Inline::InternalLink(link) => self.internal_link(link),
            Inline::ExternalLink(link) => {
                self.out
                    .push_str(&format!("<a href=\"{}\">", escape_attribute(&link.url)));
                match &link.text {
                    Some(text) => self.inlines(text),
                    None => self.out.push_str(&escape_text(&link.url)),
                }
                self.out.push_str("</a>");
            }
            Inline::Template(template) => self.template(template),
            Inline::LineBreak => self.out.push_str("<br/>"),
            Inline::Code(code) => {
                self.out.push_str("<code>");
                self.inlines(&code.content);
                self.out.push_str("</code>");
            }
            Inline::Footnote(note) => self.footnote(note),
        }
    }

    fn footnote(&mut self, note: &Footnote) {
        let n = note.number;
        if note.is_reuse() {
            self.out.push_str("<sup class=\"reference\">");
        } else {
            self.out
                .push_str(&format!("<sup id=\"cite_ref-{n}\" class=\"reference\">"));
        }
        self.out
            .push_str(&format!("<a href=\"#cite_note-{n}\">[{n}]</a></sup>"));
    }

    fn references(&mut self, references: &References) {
        if references.notes.is_empty() {
            return;
        }
        self.out
            .push_str("<div class=\"references\">\n<ol class=\"references\">\n");
        for note in &references.notes {
            let n = note.number;
            self.out.push_str(&format!(
                "<li id=\"cite_note-{n}\"><span class=\"mw-cite-backlink\"><b><a href=\"#cite_ref-{n}\">^</a></b></span> <span class=\"reference-text\">"
            ));
            self.inlines(&note.content);
            self.out.push_str("</span></li>\n");
        }
        self.out.push_str("</ol>\n</div>\n");
    }

    fn internal_link(&mut self, link: &InternalLink) {
        if link.is_hidden() {
            return;
        }
        if let Some((code, name, page)) = link.interlanguage() {
            let base = self
                .link_template
                .as_deref()
                .map(|template| template.replace("{lang}", code));
            let href = match base {
                Some(base) => link_href(Some(base.as_str()), page),
                None => link_href(None, &link.target),
            };
            self.out
                .push_str(&format!("<a href=\"{}\">", escape_attribute(&href)));
            match &link.text {
                Some(text) => self.inlines(text),
                None => self.out.push_str(&escape_text(name)),
            }
            self.out.push_str("</a>");
            return;
        }
        let href = link_href(self.link_base.as_deref(), &link.target);
        self.out
            .push_str(&format!("<a href=\"{}\">", escape_attribute(&href)));
        self.inlines(&link.display());
        self.out.push_str("</a>");
    }

    /// Templates are not expanded; the first positional argument (or the name) is shown.
    fn template(&mut self, template: &TemplateInvocation) {
        self.out.push_str(&format!(
            "<span class=\"template\" title=\"{}\">",
            escape_attribute(&template.name)
        ));
        match template.get("1") {
            Some(value) if !value.is_empty() => self.inlines(value),
            _ => self.out.push_str(&escape_text(&template.name)),
        }
        self.out.push_str("</span>");
    }
}

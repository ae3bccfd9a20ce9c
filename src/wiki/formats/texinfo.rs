//! Texinfo renderer
//!
//!     Headings become sectioning commands chosen by the sectioning model, shifted by
//!     `sectioning_start`. With the numbered model, `= A =` is `@chapter`, `== A ==` is
//!     `@section` and so on. Headings deeper than the model allows become a forced line break
//!     followed by the title.
//!
//!     Every model except `heading` makes nodes: each heading is preceded by `@node`, and a node
//!     with child nodes gets a `@menu` of them just before the first child. Node parents are
//!     found in a prepass over the headings, so rendering stays a single walk.
//!
//!     `<ref>` footnotes become `@footnote`, which Texinfo numbers and collects itself, so a
//!     references list renders as nothing. `<code>` and `<tt>` become `@code`.

use super::registry::Renderer;
use crate::wiki::ast::{Block, DefinitionList, Document, EmphasisKind, Inline, List, Table};
use crate::wiki::config::{SectioningModel, TranslateConfig};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct TexinfoRenderer {
    model: SectioningModel,
    start: usize,
}

impl TexinfoRenderer {
    pub fn new(model: SectioningModel, start: usize) -> Self {
        Self { model, start }
    }

    pub fn from_config(config: &TranslateConfig) -> Self {
        Self::new(config.sectioning_model, config.sectioning_start)
    }
}

/// Sectioning commands by heading level, index 0 being the document top.
fn sectioning_commands(model: SectioningModel) -> [&'static str; 5] {
    match model {
        SectioningModel::Numbered => [
            "@top",
            "@chapter",
            "@section",
            "@subsection",
            "@subsubsection",
        ],
        SectioningModel::Unnumbered => [
            "@top",
            "@unnumbered",
            "@unnumberedsec",
            "@unnumberedsubsec",
            "@unnumberedsubsubsec",
        ],
        SectioningModel::Appendix => [
            "@top",
            "@appendix",
            "@appendixsec",
            "@appendixsubsec",
            "@appendixsubsubsec",
        ],
        SectioningModel::Heading => [
            "@majorheading",
            "@chapheading",
            "@heading",
            "@subheading",
            "@subsubheading",
        ],
    }
}

impl Renderer for TexinfoRenderer {
    fn name(&self) -> &str {
        "texi"
    }

    fn render(&self, doc: &Document) -> String {
        let makes_nodes = self.model != SectioningModel::Heading;
        let outline = if makes_nodes {
            Outline::build(&doc.blocks, self.start)
        } else {
            Outline::default()
        };
        let mut writer = TexiWriter {
            commands: sectioning_commands(self.model),
            start: self.start,
            outline,
            next_node: 0,
        };
        let chunks = writer.blocks(&doc.blocks);
        if chunks.is_empty() {
            return String::new();
        }
        let mut out = chunks.join("\n\n");
        out.push('\n');
        out
    }

    fn description(&self) -> &str {
        "Texinfo source"
    }
}

/// Escape Texinfo specials: `@`, `{` and `}`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '@' | '{' | '}') {
            out.push('@');
        }
        out.push(c);
    }
    out
}

/// Escape a cross-reference argument, where a bare comma separates arguments.
fn escape_arg(rendered: &str) -> String {
    rendered.replace(',', "@comma{}")
}

/// Node names cannot contain commas or colons.
fn node_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| if matches!(c, ',' | ':') { ' ' } else { c })
        .collect();
    escape(&cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Node names and menus, indexed by node number in document order.
#[derive(Debug, Default)]
struct Outline {
    names: Vec<String>,
    /// Menus to emit just before the given node (the parent's first child).
    menus: HashMap<usize, Vec<String>>,
}

impl Outline {
    fn build(blocks: &[Block], start: usize) -> Self {
        let mut headings = Vec::new();
        collect_headings(blocks, &mut headings);
        // Headings past the last sectioning command are not nodes.
        headings.retain(|(level, _)| (*level as usize + start) < 5);

        let mut outline = Outline::default();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut stack: Vec<(usize, usize)> = Vec::new();
        let mut children: Vec<Vec<usize>> = Vec::new();

        for (index, (level, title)) in headings.iter().enumerate() {
            let level = *level as usize + start;
            let mut name = node_name(title);
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                name = format!("{name} {count}");
            }
            outline.names.push(name);
            children.push(Vec::new());

            while stack.last().is_some_and(|(l, _)| *l >= level) {
                stack.pop();
            }
            if let Some((_, parent)) = stack.last() {
                children[*parent].push(index);
            }
            stack.push((level, index));
        }

        for kids in children {
            if let Some(first) = kids.first() {
                let entries = kids.iter().map(|k| outline.names[*k].clone()).collect();
                outline.menus.insert(*first, entries);
            }
        }
        outline
    }
}

/// Headings in rendering order: `(level, title)`.
fn collect_headings(blocks: &[Block], out: &mut Vec<(u8, String)>) {
    for block in blocks {
        match block {
            Block::Heading(h) => out.push((h.level, h.title())),
            Block::Section(s) => {
                out.push((s.level, s.label.clone()));
                collect_headings(&s.blocks, out);
            }
            Block::List(list) => {
                for item in &list.items {
                    collect_headings(&item.blocks, out);
                }
            }
            Block::DefinitionList(list) => {
                for entry in &list.entries {
                    for definition in &entry.definitions {
                        collect_headings(&definition.blocks, out);
                    }
                }
            }
            // Table cells are flattened to text, so their headings are not nodes.
            _ => {}
        }
    }
}

struct TexiWriter {
    commands: [&'static str; 5],
    start: usize,
    outline: Outline,
    next_node: usize,
}

impl TexiWriter {
    fn blocks(&mut self, blocks: &[Block]) -> Vec<String> {
        let mut chunks = Vec::new();
        for block in blocks {
            match block {
                Block::Section(section) => {
                    let title = escape(&section.label);
                    chunks.push(self.heading(section.level, title));
                    chunks.extend(self.blocks(&section.blocks));
                }
                other => {
                    let chunk = self.block(other);
                    if !chunk.is_empty() {
                        chunks.push(chunk);
                    }
                }
            }
        }
        chunks
    }

    fn block(&mut self, block: &Block) -> String {
        match block {
            Block::Heading(heading) => {
                let title = heading_title(&heading.content);
                self.heading(heading.level, title)
            }
            Block::Paragraph(paragraph) => inlines(&paragraph.content),
            Block::List(list) => self.list(list),
            Block::DefinitionList(list) => self.definition_list(list),
            Block::Table(table) => table_block(table),
            Block::Preformatted(pre) => {
                format!("@example\n{}\n@end example", escape(&pre.text))
            }
            Block::HorizontalRule => "-----".to_string(),
            Block::Template(template) => format!("[{}]", escape(&template.name)),
            Block::Section(_) => self.blocks(std::slice::from_ref(block)).join("\n\n"),
            Block::References(_) => String::new(),
        }
    }

    fn heading(&mut self, level: u8, title: String) -> String {
        let index = level as usize + self.start;
        let Some(command) = self.commands.get(index) else {
            // Deeper than the model has commands for.
            return format!("@*\n{title}");
        };

        let node = self.next_node;
        self.next_node += 1;
        let mut out = String::new();
        if let Some(entries) = self.outline.menus.get(&node) {
            out.push_str("@menu\n");
            for entry in entries {
                out.push_str(&format!("* {entry}::\n"));
            }
            out.push_str("@end menu\n\n");
        }
        if let Some(name) = self.outline.names.get(node) {
            out.push_str(&format!("@node {name}\n"));
        }
        out.push_str(&format!("{command} {title}"));
        out
    }

    fn list(&mut self, list: &List) -> String {
        let (open, close) = if list.is_ordered() {
            ("@enumerate", "@end enumerate")
        } else {
            ("@itemize @bullet", "@end itemize")
        };
        let mut out = vec![open.to_string()];
        for item in &list.items {
            let (first, rest) = leading_paragraph(&item.blocks);
            out.push(format!("@item {first}").trim_end().to_string());
            out.extend(self.blocks(rest));
        }
        out.push(close.to_string());
        out.join("\n")
    }

    fn definition_list(&mut self, list: &DefinitionList) -> String {
        let mut out = vec!["@table @asis".to_string()];
        for entry in &list.entries {
            match &entry.term {
                Some(term) => out.push(format!("@item {}", inlines(term))),
                None => out.push("@item".to_string()),
            }
            for definition in &entry.definitions {
                out.extend(self.blocks(&definition.blocks));
            }
        }
        out.push("@end table".to_string());
        out.join("\n")
    }
}

/// The leading paragraph of an item goes on its `@item` line.
fn leading_paragraph(blocks: &[Block]) -> (String, &[Block]) {
    match blocks.split_first() {
        Some((Block::Paragraph(p), rest)) => (inlines(&p.content), rest),
        _ => (String::new(), blocks),
    }
}

fn table_block(table: &Table) -> String {
    let columns = table.column_count().max(1);
    let fraction = format!("{:.2}", 1.0 / columns as f64);
    let mut out = Vec::new();
    if let Some(caption) = &table.caption {
        out.push(inlines(caption));
        out.push(String::new());
    }
    out.push(format!(
        "@multitable @columnfractions {}",
        vec![fraction; columns].join(" ")
    ));
    for row in &table.rows {
        let command = if row.is_header() { "@headitem" } else { "@item" };
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| {
                cell.blocks
                    .iter()
                    .filter_map(|b| b.as_paragraph())
                    .map(|p| inlines(&p.content).replace('\n', " "))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        out.push(format!("{command} {}", cells.join(" @tab ")).trim_end().to_string());
    }
    out.push("@end multitable".to_string());
    out.join("\n")
}

/// Sectioning commands take the rest of their line, so line breaks become spaces.
fn heading_title(content: &[Inline]) -> String {
    let flat: Vec<Inline> = content
        .iter()
        .map(|node| match node {
            Inline::LineBreak => Inline::text(" "),
            other => other.clone(),
        })
        .collect();
    inlines(&flat).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn inlines(content: &[Inline]) -> String {
    let mut out = String::new();
    for node in content {
        inline(node, &mut out);
    }
    out
}

fn inline(node: &Inline, out: &mut String) {
    match node {
        Inline::Text(text) => out.push_str(&escape(&text.text)),
        Inline::Emphasis(emphasis) => {
            let body = inlines(&emphasis.content);
            match emphasis.kind {
                EmphasisKind::Italic => out.push_str(&format!("@emph{{{body}}}")),
                EmphasisKind::Strong => out.push_str(&format!("@strong{{{body}}}")),
                EmphasisKind::Both => out.push_str(&format!("@strong{{@emph{{{body}}}}}")),
            }
        }
        Inline::InternalLink(link) => {
            if link.is_hidden() {
                return;
            }
            if let Some((_, name, page)) = link.interlanguage() {
                out.push_str(&escape(&format!("{name}: {page}")));
                return;
            }
            let target = node_name(&link.target);
            match &link.text {
                Some(text) => {
                    out.push_str(&format!("@ref{{{target},{}}}", escape_arg(&inlines(text))))
                }
                None => out.push_str(&format!("@ref{{{target}}}")),
            }
        }
        Inline::ExternalLink(link) => {
            let url = escape_arg(&escape(&link.url));
            match &link.text {
                Some(text) => {
                    out.push_str(&format!("@uref{{{url},{}}}", escape_arg(&inlines(text))))
                }
                None => out.push_str(&format!("@uref{{{url}}}")),
            }
        }
        Inline::Template(template) => out.push_str(&format!("[{}]", escape(&template.name))),
        Inline::LineBreak => out.push_str("@*\n"),
        Inline::Code(code) => out.push_str(&format!("@code{{{}}}", inlines(&code.content))),
        // A reuse has no text of its own and Texinfo cannot cite a footnote twice.
        Inline::Footnote(note) if note.is_reuse() => {}
        Inline::Footnote(note) => {
            out.push_str(&format!("@footnote{{{}}}", inlines(&note.content)))
        }
    }
}

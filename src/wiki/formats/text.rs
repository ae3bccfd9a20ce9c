//! Plain-text renderer
//!
//!     All markup is stripped. Structure survives only as layout:
//!
//!         ** Heading            heading level as a run of `*`
//!         filled paragraph      wrapped to `width`, two spaces after a full stop
//!          - item               unordered items, `N. ` for ordered ones
//!         term                  definition terms at the current indent,
//!             definition        bodies four columns further in
//!         a | b                 table rows
//!
//!     Links show their display text, followed by `(target)` when the two differ. Interlanguage
//!     links show as `Language: Page`. Templates show as `[name]`, footnotes as `[N]`, and a
//!     references list as `References:` followed by one `[N]. text` line per note.

use super::registry::Renderer;
use crate::wiki::ast::{Block, DefinitionList, Document, Inline, List, References, Table};
use crate::wiki::config::{TranslateConfig, MIN_WIDTH};

#[derive(Debug, Clone)]
pub struct PlainTextRenderer {
    width: usize,
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new(TranslateConfig::default().width)
    }
}

impl PlainTextRenderer {
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(MIN_WIDTH),
        }
    }

    pub fn from_config(config: &TranslateConfig) -> Self {
        Self::new(config.width)
    }

    /// Blocks as separate chunks of lines, each chunk indented by `indent`.
    fn blocks(&self, blocks: &[Block], indent: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        for block in blocks {
            match block {
                Block::Section(section) => {
                    chunks.push(heading_line(section.level, &section.label, indent));
                    chunks.extend(self.blocks(&section.blocks, indent));
                }
                other => chunks.extend(self.block(other, indent)),
            }
        }
        chunks
    }

    fn block(&self, block: &Block, indent: usize) -> Option<String> {
        let chunk = match block {
            Block::Heading(heading) => {
                heading_line(heading.level, &inline_text(&heading.content), indent)
            }
            Block::Paragraph(paragraph) => self.paragraph(&paragraph.content, indent, indent),
            Block::List(list) => self.list(list, indent),
            Block::DefinitionList(list) => self.definition_list(list, indent),
            Block::Table(table) => table_lines(table, indent),
            Block::Preformatted(pre) => pre
                .text
                .lines()
                .map(|line| format!("{}{line}", pad(indent)))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::HorizontalRule => format!("  {}", "-".repeat(self.width - MIN_WIDTH)),
            Block::Template(template) => format!("{}[{}]", pad(indent), template.name),
            Block::Section(_) => self.blocks(std::slice::from_ref(block), indent).join("\n\n"),
            Block::References(references) => self.references(references, indent),
        };
        (!chunk.is_empty()).then_some(chunk)
    }

    /// Fill inline content; the first line starts at `first`, the rest at `rest`.
    fn paragraph(&self, content: &[Inline], first: usize, rest: usize) -> String {
        let mut lines = Vec::new();
        for segment in inline_segments(content) {
            let width = self.width.saturating_sub(rest).max(MIN_WIDTH);
            for line in fill(&segment, width) {
                let indent = if lines.is_empty() { first } else { rest };
                lines.push(format!("{}{line}", pad(indent)));
            }
        }
        lines.join("\n")
    }

    fn list(&self, list: &List, indent: usize) -> String {
        let item_indent = indent.max(1);
        let mut lines = Vec::new();
        for (n, item) in list.items.iter().enumerate() {
            let marker = if list.is_ordered() {
                format!("{}. ", n + 1)
            } else {
                "- ".to_string()
            };
            let text_column = item_indent + marker.len();
            let mut rest = item.blocks.as_slice();
            let mut first = match item.blocks.split_first() {
                Some((Block::Paragraph(p), tail)) => {
                    rest = tail;
                    self.paragraph(&p.content, 0, text_column)
                }
                _ => String::new(),
            };
            first.insert_str(0, &format!("{}{marker}", pad(item_indent)));
            lines.push(first.trim_end().to_string());
            lines.extend(self.blocks(rest, text_column));
        }
        lines.join("\n")
    }

    fn references(&self, references: &References, indent: usize) -> String {
        if references.notes.is_empty() {
            return String::new();
        }
        let mut lines = vec![format!("{}References:", pad(indent))];
        for note in &references.notes {
            let label = format!("[{}]. ", note.number);
            let text = self.paragraph(&note.content, 0, indent + label.len());
            lines.push(format!("{}{label}{text}", pad(indent)).trim_end().to_string());
        }
        lines.join("\n")
    }

    fn definition_list(&self, list: &DefinitionList, indent: usize) -> String {
        let mut lines = Vec::new();
        for entry in &list.entries {
            if let Some(term) = &entry.term {
                lines.push(self.paragraph(term, indent, indent));
            }
            for definition in &entry.definitions {
                lines.extend(self.blocks(&definition.blocks, indent + 4));
            }
        }
        lines.retain(|line| !line.is_empty());
        lines.join("\n")
    }
}

impl Renderer for PlainTextRenderer {
    fn name(&self) -> &str {
        "text"
    }

    fn render(&self, doc: &Document) -> String {
        let chunks = self.blocks(&doc.blocks, 0);
        if chunks.is_empty() {
            return String::new();
        }
        let mut out = chunks.join("\n\n");
        out.push('\n');
        out
    }

    fn description(&self) -> &str {
        "Plain text, filled to a fixed width"
    }
}

fn pad(indent: usize) -> String {
    " ".repeat(indent)
}

fn heading_line(level: u8, title: &str, indent: usize) -> String {
    format!("{}{} {}", pad(indent), "*".repeat(level as usize), title.trim())
}

fn table_lines(table: &Table, indent: usize) -> String {
    let mut lines = Vec::new();
    if let Some(caption) = &table.caption {
        lines.push(format!("{}{}", pad(indent), collapse(&inline_text(caption))));
    }
    for row in &table.rows {
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| collapse(&blocks_text(&cell.blocks)))
            .collect();
        lines.push(format!("{}{}", pad(indent), cells.join(" | ")));
    }
    lines.join("\n")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Flat text of nested blocks, for table cells.
fn blocks_text(blocks: &[Block]) -> String {
    let mut parts = Vec::new();
    for block in blocks {
        match block {
            Block::Heading(h) => parts.push(inline_text(&h.content)),
            Block::Paragraph(p) => parts.push(inline_text(&p.content)),
            Block::List(list) => parts.extend(list.items.iter().map(|i| blocks_text(&i.blocks))),
            Block::DefinitionList(list) => {
                for entry in &list.entries {
                    parts.extend(entry.term.as_deref().map(inline_text));
                    parts.extend(entry.definitions.iter().map(|d| blocks_text(&d.blocks)));
                }
            }
            Block::Table(table) => {
                for row in &table.rows {
                    parts.extend(row.cells.iter().map(|c| blocks_text(&c.blocks)));
                }
            }
            Block::Preformatted(pre) => parts.push(pre.text.clone()),
            Block::HorizontalRule => {}
            Block::Template(t) => parts.push(format!("[{}]", t.name)),
            Block::Section(s) => {
                parts.push(s.label.clone());
                parts.push(blocks_text(&s.blocks));
            }
            Block::References(r) => {
                parts.extend(
                    r.notes
                        .iter()
                        .map(|n| format!("[{}]. {}", n.number, inline_text(&n.content))),
                );
            }
        }
    }
    parts.join(" ")
}

/// Markup-free text of inline content, with forced line breaks as `\n`.
pub fn inline_text(content: &[Inline]) -> String {
    inline_segments(content).join("\n")
}

/// Inline content split at line breaks.
fn inline_segments(content: &[Inline]) -> Vec<String> {
    let mut segments = vec![String::new()];
    push_segments(content, &mut segments);
    segments
}

fn push_segments(content: &[Inline], segments: &mut Vec<String>) {
    for node in content {
        match node {
            Inline::Text(text) => current(segments).push_str(&text.text),
            Inline::Emphasis(emphasis) => push_segments(&emphasis.content, segments),
            Inline::InternalLink(link) => {
                if link.is_hidden() {
                    continue;
                }
                if let Some((_, name, page)) = link.interlanguage() {
                    current(segments).push_str(&format!("{name}: {page}"));
                    continue;
                }
                let display = link.display_text();
                current(segments).push_str(&display);
                if display.trim() != link.target.trim() {
                    current(segments).push_str(&format!(" ({})", link.target.trim()));
                }
            }
            Inline::ExternalLink(link) => match &link.text {
                Some(text) => {
                    push_segments(text, segments);
                    current(segments).push_str(&format!(" ({})", link.url));
                }
                None => current(segments).push_str(&link.url),
            },
            Inline::Template(template) => {
                current(segments).push_str(&format!("[{}]", template.name))
            }
            Inline::LineBreak => segments.push(String::new()),
            Inline::Code(code) => push_segments(&code.content, segments),
            Inline::Footnote(note) => current(segments).push_str(&format!("[{}]", note.number)),
        }
    }
}

fn current(segments: &mut Vec<String>) -> &mut String {
    if segments.is_empty() {
        segments.push(String::new());
    }
    let last = segments.len() - 1;
    &mut segments[last]
}

/// Greedy fill to `width` columns. A word ending in `.` is followed by two spaces.
pub fn fill(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut length = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let gap = if line.is_empty() {
            0
        } else if line.ends_with('.') {
            2
        } else {
            1
        };
        if !line.is_empty() && length + gap + word_len > width {
            lines.push(std::mem::take(&mut line));
            length = 0;
        } else {
            line.push_str(&" ".repeat(gap));
            length += gap;
        }
        line.push_str(word);
        length += word_len;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

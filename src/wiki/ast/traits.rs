//! Common interface for uniform node access
//!
//! Tree views and debug traces only need a node's type name and a short human label; this trait
//! provides both without matching on every concrete type at each call site.

use super::elements::{
    Block, Definition, DefinitionEntry, Document, Inline, ListItem, TableCell, TableRow,
};

pub trait AstNode {
    fn node_type(&self) -> &'static str;
    fn display_label(&self) -> String;
}

impl AstNode for Document {
    fn node_type(&self) -> &'static str {
        "Document"
    }

    fn display_label(&self) -> String {
        format!(
            "Document ({}, {} blocks)",
            self.metadata.dialect.as_str(),
            self.blocks.len()
        )
    }
}

impl AstNode for Block {
    fn node_type(&self) -> &'static str {
        match self {
            Block::Heading(_) => "Heading",
            Block::Paragraph(_) => "Paragraph",
            Block::List(_) => "List",
            Block::DefinitionList(_) => "DefinitionList",
            Block::Table(_) => "Table",
            Block::Preformatted(_) => "Preformatted",
            Block::HorizontalRule => "HorizontalRule",
            Block::Template(_) => "Template",
            Block::Section(_) => "Section",
            Block::References(_) => "References",
        }
    }

    fn display_label(&self) -> String {
        match self {
            Block::Heading(h) => format!("h{} {}", h.level, h.title()),
            Block::Paragraph(p) => p.text(),
            Block::List(list) => {
                let kind = if list.is_ordered() { "ordered" } else { "unordered" };
                format!("{} items ({})", list.items.len(), kind)
            }
            Block::DefinitionList(dl) => format!("{} entries", dl.entries.len()),
            Block::Table(t) => format!("{} rows x {} cols", t.rows.len(), t.column_count()),
            Block::Preformatted(p) => p.text.clone(),
            Block::HorizontalRule => "----".to_string(),
            Block::Template(t) => format!("{{{{{}}}}}", t.name),
            Block::Section(s) => format!("{} ({})", s.label, s.kind.as_str()),
            Block::References(r) => format!("{} notes", r.notes.len()),
        }
    }
}

impl AstNode for Inline {
    fn node_type(&self) -> &'static str {
        match self {
            Inline::Text(_) => "Text",
            Inline::Emphasis(_) => "Emphasis",
            Inline::InternalLink(_) => "InternalLink",
            Inline::ExternalLink(_) => "ExternalLink",
            Inline::Template(_) => "Template",
            Inline::LineBreak => "LineBreak",
            Inline::Code(_) => "Code",
            Inline::Footnote(_) => "Footnote",
        }
    }

    fn display_label(&self) -> String {
        match self {
            Inline::Text(t) => t.text.clone(),
            Inline::Emphasis(e) => format!("{} {}", e.kind.as_str(), self.plain_text()),
            Inline::InternalLink(link) => link.target.clone(),
            Inline::ExternalLink(link) => link.url.clone(),
            Inline::Template(t) => format!("{{{{{}}}}}", t.name),
            Inline::LineBreak => "<br>".to_string(),
            Inline::Code(c) => format!("{} {}", c.tag.as_str(), self.plain_text()),
            Inline::Footnote(f) => format!("[{}]", f.number),
        }
    }
}

impl AstNode for ListItem {
    fn node_type(&self) -> &'static str {
        "ListItem"
    }

    fn display_label(&self) -> String {
        self.blocks
            .first()
            .map(|b| b.display_label())
            .unwrap_or_default()
    }
}

impl AstNode for DefinitionEntry {
    fn node_type(&self) -> &'static str {
        "DefinitionEntry"
    }

    fn display_label(&self) -> String {
        match &self.term {
            Some(term) => super::elements::plain_text(term),
            None => "(no term)".to_string(),
        }
    }
}

impl AstNode for Definition {
    fn node_type(&self) -> &'static str {
        "Definition"
    }

    fn display_label(&self) -> String {
        format!("{} blocks", self.blocks.len())
    }
}

impl AstNode for TableRow {
    fn node_type(&self) -> &'static str {
        "TableRow"
    }

    fn display_label(&self) -> String {
        format!("{} cells", self.cells.len())
    }
}

impl AstNode for TableCell {
    fn node_type(&self) -> &'static str {
        "TableCell"
    }

    fn display_label(&self) -> String {
        let kind = if self.header { "header" } else { "data" };
        format!("{} ({} blocks)", kind, self.blocks.len())
    }
}

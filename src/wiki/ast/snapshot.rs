//! AST Snapshot - a normalized intermediate representation of the document tree
//!
//! The snapshot captures node types, labels, attributes and children in one format-agnostic
//! shape, so tree views only deal with presentation. Build one with `snapshot_from_document()`
//! rather than walking `Block`/`Inline` again.

use super::elements::{Block, Document, Inline};
use super::traits::AstNode;
use serde::Serialize;
use std::collections::BTreeMap;

/// A snapshot of an AST node in a normalized, serializable form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AstSnapshot {
    /// The type of node (e.g., "Paragraph", "List", "InternalLink")
    pub node_type: String,

    /// The primary label or text content of the node
    pub label: String,

    /// Additional attributes specific to the node type
    pub attributes: BTreeMap<String, String>,

    /// Child nodes in the tree
    pub children: Vec<AstSnapshot>,
}

impl AstSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<AstSnapshot>) -> Self {
        self.children.extend(children);
        self
    }

    /// Total number of nodes in this subtree, including the root.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}

fn leaf<T: AstNode>(node: &T) -> AstSnapshot {
    AstSnapshot::new(node.node_type(), node.display_label())
}

/// Build a snapshot for the document root. Metadata becomes attributes, blocks become children.
pub fn snapshot_from_document(doc: &Document) -> AstSnapshot {
    let mut snapshot = leaf(doc)
        .with_attribute("language", doc.metadata.language.clone())
        .with_attribute("dialect", doc.metadata.dialect.as_str());
    if let Some(base) = &doc.metadata.link_base {
        snapshot = snapshot.with_attribute("link_base", base.clone());
    }
    snapshot.with_children(doc.blocks.iter().map(snapshot_from_block).collect())
}

pub fn snapshot_from_block(block: &Block) -> AstSnapshot {
    let snapshot = leaf(block);
    match block {
        Block::Heading(h) => snapshot
            .with_attribute("level", h.level.to_string())
            .with_children(snapshot_inlines(&h.content)),
        Block::Paragraph(p) => snapshot.with_children(snapshot_inlines(&p.content)),
        Block::List(list) => snapshot.with_children(
            list.items
                .iter()
                .map(|item| leaf(item).with_children(snapshot_blocks(&item.blocks)))
                .collect(),
        ),
        Block::DefinitionList(dl) => snapshot.with_children(
            dl.entries
                .iter()
                .map(|entry| {
                    leaf(entry).with_children(
                        entry
                            .definitions
                            .iter()
                            .map(|def| leaf(def).with_children(snapshot_blocks(&def.blocks)))
                            .collect(),
                    )
                })
                .collect(),
        ),
        Block::Table(table) => {
            let mut children = Vec::new();
            if let Some(caption) = &table.caption {
                children.push(
                    AstSnapshot::new("Caption", super::elements::plain_text(caption))
                        .with_children(snapshot_inlines(caption)),
                );
            }
            children.extend(table.rows.iter().map(|row| {
                leaf(row).with_children(
                    row.cells
                        .iter()
                        .map(|cell| leaf(cell).with_children(snapshot_blocks(&cell.blocks)))
                        .collect(),
                )
            }));
            snapshot.with_children(children)
        }
        Block::Template(t) => snapshot.with_children(
            t.params
                .iter()
                .map(|p| {
                    AstSnapshot::new("Param", p.key.clone()).with_children(snapshot_inlines(&p.value))
                })
                .collect(),
        ),
        Block::Section(s) => snapshot
            .with_attribute("kind", s.kind.as_str())
            .with_attribute("level", s.level.to_string())
            .with_children(snapshot_blocks(&s.blocks)),
        Block::References(r) => snapshot.with_children(
            r.notes
                .iter()
                .map(|note| {
                    AstSnapshot::new("Note", format!("[{}]", note.number))
                        .with_children(snapshot_inlines(&note.content))
                })
                .collect(),
        ),
        Block::Preformatted(_) | Block::HorizontalRule => snapshot,
    }
}

pub fn snapshot_from_inline(inline: &Inline) -> AstSnapshot {
    let snapshot = leaf(inline);
    match inline {
        Inline::Emphasis(e) => snapshot
            .with_attribute("kind", e.kind.as_str())
            .with_children(snapshot_inlines(&e.content)),
        Inline::InternalLink(link) => match &link.text {
            Some(text) => snapshot.with_children(snapshot_inlines(text)),
            None => snapshot,
        },
        Inline::ExternalLink(link) => match &link.text {
            Some(text) => snapshot.with_children(snapshot_inlines(text)),
            None => snapshot,
        },
        Inline::Template(t) => snapshot.with_attribute("params", t.params.len().to_string()),
        Inline::Code(c) => snapshot
            .with_attribute("tag", c.tag.as_str())
            .with_children(snapshot_inlines(&c.content)),
        Inline::Footnote(f) => {
            let snapshot = match &f.name {
                Some(name) => snapshot.with_attribute("name", name.clone()),
                None => snapshot,
            };
            snapshot.with_children(snapshot_inlines(&f.content))
        }
        Inline::Text(_) | Inline::LineBreak => snapshot,
    }
}

fn snapshot_blocks(blocks: &[Block]) -> Vec<AstSnapshot> {
    blocks.iter().map(snapshot_from_block).collect()
}

fn snapshot_inlines(content: &[Inline]) -> Vec<AstSnapshot> {
    content.iter().map(snapshot_from_inline).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::ast::{List, ListItem, ListKind, Paragraph};

    #[test]
    fn test_snapshot_from_document_empty() {
        let doc = Document::new();
        let snapshot = snapshot_from_document(&doc);

        assert_eq!(snapshot.node_type, "Document");
        assert_eq!(snapshot.label, "Document (default, 0 blocks)");
        assert_eq!(snapshot.attributes.get("language").map(String::as_str), Some("en"));
        assert!(snapshot.children.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_structure() {
        let item = ListItem::new(vec![Block::Paragraph(Paragraph::new(vec![Inline::text("a")]))]);
        let list = List::new(ListKind::Unordered, vec![item]).unwrap();
        let doc = Document::with_blocks(vec![Block::List(list)]);

        let snapshot = snapshot_from_document(&doc);
        let list_snapshot = &snapshot.children[0];
        assert_eq!(list_snapshot.node_type, "List");
        assert_eq!(list_snapshot.children[0].node_type, "ListItem");
        assert_eq!(list_snapshot.children[0].children[0].node_type, "Paragraph");
        assert_eq!(snapshot.node_count(), 5);
    }
}

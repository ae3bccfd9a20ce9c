//! Ordered (`#`) and unordered (`*`) lists.

use super::block::Block;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '#' => Some(ListKind::Ordered),
            '*' => Some(ListKind::Unordered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

impl List {
    /// Build a list; `None` when there are no items.
    pub fn new(kind: ListKind, items: Vec<ListItem>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self { kind, items })
        }
    }

    pub fn is_ordered(&self) -> bool {
        self.kind == ListKind::Ordered
    }
}

/// A list item owns the blocks on its line plus any nested containers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

impl ListItem {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }
}

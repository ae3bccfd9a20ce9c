//! Tables: `{| ... |}` with rows (`|-`), data cells (`|`, `||`) and header cells (`!`, `!!`).
//!
//! Attribute prefixes in the source (`{| class="wikitable"`, `| style="..." | cell`) are not
//! part of the model.

use super::block::Block;
use super::inlines::InlineContent;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<InlineContent>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Build a table from its rows, dropping empty rows. `None` when nothing is left.
    pub fn new(caption: Option<InlineContent>, rows: Vec<TableRow>) -> Option<Self> {
        let rows: Vec<_> = rows.into_iter().filter(|r| !r.cells.is_empty()).collect();
        if rows.is_empty() {
            None
        } else {
            Some(Self { caption, rows })
        }
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn is_header(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.header)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TableCell {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub header: bool,
    pub blocks: Vec<Block>,
}

impl TableCell {
    pub fn new(header: bool, blocks: Vec<Block>) -> Self {
        Self { header, blocks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rows_are_dropped() {
        assert!(Table::new(None, vec![TableRow::default()]).is_none());

        let row = TableRow {
            cells: vec![TableCell::new(true, vec![]), TableCell::new(true, vec![])],
        };
        let table = Table::new(None, vec![TableRow::default(), row]).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.column_count(), 2);
        assert!(table.rows[0].is_header());
    }
}

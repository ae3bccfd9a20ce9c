//! Document root
//!
//!     The document owns its top-level blocks and carries the metadata renderers need:
//!     the language tag, the link base for internal hrefs and the dialect it was parsed with.
//!     It is built once per translation and never mutated after parsing.

use super::block::Block;
use crate::wiki::dialect::Dialect;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_base: Option<String>,
    pub dialect: Dialect,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            link_base: None,
            dialect: Dialect::Default,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Document {
    pub metadata: Metadata,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            metadata: Metadata::default(),
            blocks,
        }
    }

    pub fn with_metadata(metadata: Metadata, blocks: Vec<Block>) -> Self {
        Self { metadata, blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

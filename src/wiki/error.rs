//! Error types for translation
//!
//! Only configuration problems are errors. They are all detected before any scanning happens,
//! so a failed request never produces partial output. Malformed markup is recovered from
//! during parsing and reported as [`crate::wiki::parsing::Recovery`] records instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// The requested output format has no renderer at all.
    #[error("unsupported output format '{0}'")]
    UnsupportedOutputFormat(String),

    /// The format exists, but not for the requested dialect.
    #[error("output format '{format}' is not available for the {dialect} dialect")]
    UnsupportedDialectForFormat { format: String, dialect: String },

    /// A byte buffer handed to the engine was not valid UTF-8.
    #[error("input is not valid UTF-8 (invalid byte sequence at offset {offset})")]
    InvalidUtf8 { offset: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TranslateError>;

//! Renderer registry
//!
//! Renderers are registered per `(format, dialect)` pair as factories taking the translation
//! config, since most of them read a few options from it (link base, width, indent). A format
//! that exists for one dialect but not another reports `UnsupportedDialectForFormat`; a format
//! with no registration at all reports `UnsupportedOutputFormat`.

use crate::wiki::ast::Document;
use crate::wiki::config::{OutputFormat, TranslateConfig};
use crate::wiki::dialect::Dialect;
use crate::wiki::error::{Result, TranslateError};
use std::collections::HashMap;

/// Trait for document renderers
///
/// Rendering is total: every `Document` the parser can build renders without failing.
pub trait Renderer: Send + Sync {
    /// The name of this renderer (e.g., "html", "treeviz")
    fn name(&self) -> &str;

    /// Render a document to this format
    fn render(&self, doc: &Document) -> String;

    /// Optional description of this renderer
    fn description(&self) -> &str {
        ""
    }
}

pub type RendererFactory = fn(&TranslateConfig) -> Box<dyn Renderer>;

pub struct RendererRegistry {
    factories: HashMap<(OutputFormat, Dialect), RendererFactory>,
}

impl RendererRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        RendererRegistry {
            factories: HashMap::new(),
        }
    }

    /// Register a factory. An existing registration for the same pair is replaced.
    pub fn register(&mut self, format: OutputFormat, dialect: Dialect, factory: RendererFactory) {
        self.factories.insert((format, dialect), factory);
    }

    pub fn has(&self, format: OutputFormat, dialect: Dialect) -> bool {
        self.factories.contains_key(&(format, dialect))
    }

    /// Build the renderer for a pair, distinguishing an unknown format from a known format
    /// that lacks the requested dialect.
    pub fn resolve(
        &self,
        format: OutputFormat,
        dialect: Dialect,
        config: &TranslateConfig,
    ) -> Result<Box<dyn Renderer>> {
        if let Some(factory) = self.factories.get(&(format, dialect)) {
            return Ok(factory(config));
        }
        if self.factories.keys().any(|(f, _)| *f == format) {
            Err(TranslateError::UnsupportedDialectForFormat {
                format: format.to_string(),
                dialect: dialect.to_string(),
            })
        } else {
            Err(TranslateError::UnsupportedOutputFormat(format.to_string()))
        }
    }

    /// All registered pairs, sorted by format then dialect name.
    pub fn list_formats(&self) -> Vec<(OutputFormat, Dialect)> {
        let mut pairs: Vec<_> = self.factories.keys().copied().collect();
        pairs.sort_by_key(|(format, dialect)| (format.as_str(), dialect.as_str()));
        pairs
    }

    /// Create a registry with the built-in renderers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for dialect in Dialect::ALL {
            registry.register(OutputFormat::Html, dialect, |config| {
                Box::new(super::HtmlRenderer::from_config(config))
            });
            registry.register(OutputFormat::Text, dialect, |config| {
                Box::new(super::PlainTextRenderer::from_config(config))
            });
            registry.register(OutputFormat::Treeviz, dialect, |_| {
                Box::new(super::TreevizRenderer)
            });
        }

        registry.register(OutputFormat::Texi, Dialect::Default, |config| {
            Box::new(super::TexinfoRenderer::from_config(config))
        });
        // Dictionary pages get plain text for Texinfo output.
        registry.register(OutputFormat::Texi, Dialect::Dictionary, |config| {
            Box::new(super::PlainTextRenderer::from_config(config))
        });
        registry.register(OutputFormat::Dump, Dialect::Default, |config| {
            Box::new(super::DumpRenderer::from_config(config))
        });

        registry
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

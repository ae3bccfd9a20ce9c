//! Translation entry point
//!
//!     source text + [`TranslateConfig`] → scan → parse → render → output string
//!
//! [`Translator::new`] validates the configuration and resolves the renderer for the
//! `(format, dialect)` pair up front, so a bad request fails before any source is scanned and
//! never yields partial output. A translator holds no per-document state; one instance can be
//! shared across threads, each call parsing into its own `Document`.

use crate::wiki::config::TranslateConfig;
use crate::wiki::error::{Result, TranslateError};
use crate::wiki::formats::{Renderer, RendererRegistry};
use crate::wiki::parsing::{self, DebugGate, ParseOptions, Recovery};

/// Rendered output plus the recoveries made while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub output: String,
    pub recoveries: Vec<Recovery>,
}

pub struct Translator {
    renderer: Box<dyn Renderer>,
    options: ParseOptions,
}

impl Translator {
    /// Build a translator from the built-in renderer registry.
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        Self::with_registry(config, &RendererRegistry::with_defaults())
    }

    pub fn with_registry(config: &TranslateConfig, registry: &RendererRegistry) -> Result<Self> {
        config.validate()?;
        let renderer = registry.resolve(config.output_format, config.dialect, config)?;
        Ok(Self {
            renderer,
            options: ParseOptions::from(config),
        })
    }

    pub fn renderer_name(&self) -> &str {
        self.renderer.name()
    }

    pub fn translate(&self, source: &str) -> Translation {
        let gate = DebugGate::new(self.options.debug_level);
        if gate.at(1) {
            tracing::debug!(
                target: "wikitrans::processor",
                renderer = self.renderer.name(),
                dialect = %self.options.dialect,
                bytes = source.len(),
                "translating"
            );
        }

        let outcome = parsing::parse(source, &self.options);
        let output = self.renderer.render(&outcome.document);

        if gate.at(1) {
            tracing::debug!(
                target: "wikitrans::processor",
                blocks = outcome.document.blocks.len(),
                recoveries = outcome.recoveries.len(),
                output_bytes = output.len(),
                "translated"
            );
        }
        Translation {
            output,
            recoveries: outcome.recoveries,
        }
    }

    /// Translate a raw byte buffer, validating UTF-8 first.
    pub fn translate_bytes(&self, bytes: &[u8]) -> Result<Translation> {
        Ok(self.translate(decode_input(bytes)?))
    }
}

/// Validate that input bytes are UTF-8. A leading byte-order mark is dropped.
pub fn decode_input(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes).map_err(|e| TranslateError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Translate `source` with `config`, returning only the rendered output.
pub fn translate(source: &str, config: &TranslateConfig) -> Result<String> {
    Ok(Translator::new(config)?.translate(source).output)
}

pub fn translate_bytes(bytes: &[u8], config: &TranslateConfig) -> Result<String> {
    let translator = Translator::new(config)?;
    Ok(translator.translate_bytes(bytes)?.output)
}

//! Translation configuration
//!
//!     [`TranslateConfig`] is the single record the engine consumes alongside the source text.
//!     Every field has a default, so a YAML file only needs the keys it changes:
//!
//!         dialect: dictionary
//!         language_tag: fr
//!         output_format: text
//!         width: 72
//!
//!     Values are checked by [`TranslateConfig::validate`] before any scanning starts.

use crate::wiki::dialect::Dialect;
use crate::wiki::error::{Result, TranslateError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use url::Url;

pub const MIN_WIDTH: usize = 5;
pub const MAX_DEBUG_LEVEL: u8 = 100;
pub const MAX_SECTIONING_START: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
    #[serde(alias = "texinfo")]
    Texi,
    Dump,
    Treeviz,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Html,
        OutputFormat::Text,
        OutputFormat::Texi,
        OutputFormat::Dump,
        OutputFormat::Treeviz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Text => "text",
            OutputFormat::Texi => "texi",
            OutputFormat::Dump => "dump",
            OutputFormat::Treeviz => "treeviz",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "text" | "txt" => Ok(OutputFormat::Text),
            "texi" | "texinfo" => Ok(OutputFormat::Texi),
            "dump" => Ok(OutputFormat::Dump),
            "treeviz" => Ok(OutputFormat::Treeviz),
            _ => Err(TranslateError::UnsupportedOutputFormat(s.to_string())),
        }
    }
}

/// How Texinfo headings are sectioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectioningModel {
    #[default]
    Numbered,
    Unnumbered,
    Appendix,
    Heading,
}

impl FromStr for SectioningModel {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numbered" => Ok(SectioningModel::Numbered),
            "unnumbered" => Ok(SectioningModel::Unnumbered),
            "appendix" => Ok(SectioningModel::Appendix),
            "heading" => Ok(SectioningModel::Heading),
            other => Err(TranslateError::InvalidConfig(format!(
                "unknown sectioning model '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslateConfig {
    pub dialect: Dialect,
    pub language_tag: String,
    pub html_base: Option<String>,
    pub indent: usize,
    pub debug_level: u8,
    pub output_format: OutputFormat,
    pub width: usize,
    pub sectioning_model: SectioningModel,
    pub sectioning_start: usize,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Default,
            language_tag: "en".to_string(),
            html_base: None,
            indent: 2,
            debug_level: 0,
            output_format: OutputFormat::Html,
            width: 78,
            sectioning_model: SectioningModel::Numbered,
            sectioning_start: 0,
        }
    }
}

impl TranslateConfig {
    pub fn new(output_format: OutputFormat, dialect: Dialect) -> Self {
        Self {
            output_format,
            dialect,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| TranslateError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TranslateError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.debug_level > MAX_DEBUG_LEVEL {
            return Err(TranslateError::InvalidConfig(format!(
                "debug_level must be between 0 and {MAX_DEBUG_LEVEL}, got {}",
                self.debug_level
            )));
        }
        if self.sectioning_start > MAX_SECTIONING_START {
            return Err(TranslateError::InvalidConfig(format!(
                "sectioning_start must be between 0 and {MAX_SECTIONING_START}, got {}",
                self.sectioning_start
            )));
        }
        if self.width < MIN_WIDTH {
            return Err(TranslateError::InvalidConfig(format!(
                "width must be at least {MIN_WIDTH}, got {}",
                self.width
            )));
        }
        if self.language_tag.trim().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "language_tag must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Link base renderers should use: the configured one, or the dictionary wiki for the
    /// dictionary dialect. The default dialect has none unless configured.
    pub fn effective_link_base(&self) -> Option<String> {
        match (&self.html_base, self.dialect) {
            (Some(base), _) => Some(base.clone()),
            (None, Dialect::Dictionary) => Some(self.dialect.link_base_template().to_string()),
            (None, Dialect::Default) => None,
        }
    }
}

/// Derive an internal-link base.
///
/// With a source URL, its scheme and host (and port) are kept and `/wiki/` appended, so
/// `https://en.wiktionary.org/wiki/Foo?action=raw` gives `https://en.wiktionary.org/wiki/`.
/// Without one, the dialect's public wiki is used with `{lang}` filled in.
pub fn derive_html_base(source_url: Option<&str>, dialect: Dialect, language: &str) -> Result<String> {
    match source_url {
        Some(source) => {
            let url = Url::parse(source)
                .map_err(|e| TranslateError::InvalidConfig(format!("bad source URL '{source}': {e}")))?;
            let host = url.host_str().ok_or_else(|| {
                TranslateError::InvalidConfig(format!("source URL '{source}' has no host"))
            })?;
            let port = url.port().map(|p| format!(":{p}")).unwrap_or_default();
            Ok(format!("{}://{host}{port}/wiki/", url.scheme()))
        }
        None => Ok(dialect.link_base_template().replace("{lang}", language)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = TranslateConfig::default();
        assert_eq!(config.language_tag, "en");
        assert_eq!(config.indent, 2);
        assert_eq!(config.width, 78);
        assert_eq!(config.output_format, OutputFormat::Html);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_str_layers_over_defaults() {
        let config = TranslateConfig::from_yaml_str(
            "dialect: wiktionary\noutput_format: texinfo\nwidth: 40\n",
        )
        .unwrap();
        assert_eq!(config.dialect, Dialect::Dictionary);
        assert_eq!(config.output_format, OutputFormat::Texi);
        assert_eq!(config.width, 40);
        assert_eq!(config.indent, 2);
    }

    #[rstest]
    #[case("sectioning_start: 5\n")]
    #[case("debug_level: 101\n")]
    #[case("width: 2\n")]
    #[case("output_format: pdf\n")]
    #[case("colour: blue\n")]
    fn test_invalid_yaml_config(#[case] yaml: &str) {
        let err = TranslateConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidConfig(_)), "{err:?}");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("texinfo".parse::<OutputFormat>().unwrap(), OutputFormat::Texi);
        assert_eq!("HTML".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert_eq!(
            "pdf".parse::<OutputFormat>().unwrap_err(),
            TranslateError::UnsupportedOutputFormat("pdf".to_string())
        );
    }

    #[rstest]
    #[case(Some("https://en.wiktionary.org/wiki/Foo?action=raw"), Dialect::Dictionary, "https://en.wiktionary.org/wiki/")]
    #[case(Some("http://localhost:8080/index.php?title=X"), Dialect::Default, "http://localhost:8080/wiki/")]
    #[case(None, Dialect::Default, "http://de.wikipedia.org/wiki/")]
    #[case(None, Dialect::Dictionary, "http://de.wiktionary.org/wiki/")]
    fn test_derive_html_base(
        #[case] source: Option<&str>,
        #[case] dialect: Dialect,
        #[case] expected: &str,
    ) {
        assert_eq!(derive_html_base(source, dialect, "de").unwrap(), expected);
    }

    #[test]
    fn test_effective_link_base() {
        let mut config = TranslateConfig::default();
        assert_eq!(config.effective_link_base(), None);
        config.dialect = Dialect::Dictionary;
        assert_eq!(
            config.effective_link_base().as_deref(),
            Some("http://{lang}.wiktionary.org/wiki/")
        );
        config.html_base = Some("/w/".to_string());
        assert_eq!(config.effective_link_base().as_deref(), Some("/w/"));
    }
}

//! Template invocations: `{{name|positional|key=value}}`.
//!
//! Parameters keep their source order. Unnamed parameters get the keys `1`, `2`, ... counting
//! unnamed parameters only, so `{{t|a|x=1|b}}` has keys `1`, `x`, `2`.

use super::inlines::{plain_text, InlineContent};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInvocation {
    pub name: String,
    pub params: Vec<TemplateParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParam {
    pub key: String,
    /// True when the key was assigned by position rather than written as `key=`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub positional: bool,
    pub value: InlineContent,
}

impl TemplateInvocation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Append a positional parameter, numbering it after the existing positional ones.
    pub fn push_positional(&mut self, value: InlineContent) {
        let index = self.params.iter().filter(|p| p.positional).count() + 1;
        self.params.push(TemplateParam {
            key: index.to_string(),
            positional: true,
            value,
        });
    }

    pub fn push_named(&mut self, key: impl Into<String>, value: InlineContent) {
        self.params.push(TemplateParam {
            key: key.into(),
            positional: false,
            value,
        });
    }

    pub fn get(&self, key: &str) -> Option<&InlineContent> {
        // Later duplicates win, as in MediaWiki.
        self.params
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(|p| &p.value)
    }

    /// Plain text of the first positional parameter, if it has any.
    pub fn first_positional_text(&self) -> Option<String> {
        self.get("1")
            .map(|value| plain_text(value).trim().to_string())
            .filter(|text| !text.is_empty())
    }
}

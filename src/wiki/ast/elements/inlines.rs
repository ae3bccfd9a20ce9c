//! Inline nodes: text-level markup inside blocks.

use super::template::TemplateInvocation;
use crate::wiki::languages::language_name;
use serde::Serialize;

/// Sequence of inline nodes, in source order.
pub type InlineContent = Vec<Inline>;

/// Namespaces whose links are metadata or embedded media rather than visible links.
const HIDDEN_NAMESPACES: &[&str] = &["file", "image", "media", "category"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text(Text),
    Emphasis(Emphasis),
    InternalLink(InternalLink),
    ExternalLink(ExternalLink),
    Template(TemplateInvocation),
    LineBreak,
    Code(Code),
    Footnote(Footnote),
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text(Text::new(text))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Inline::Text(t) => Some(&t.text),
            _ => None,
        }
    }

    pub fn is_whitespace_text(&self) -> bool {
        matches!(self, Inline::Text(t) if t.text.trim().is_empty())
    }

    /// Text of this node with all markup removed.
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Text(t) => t.text.clone(),
            Inline::Emphasis(e) => plain_text(&e.content),
            Inline::InternalLink(link) => link.display_text(),
            Inline::ExternalLink(link) => match &link.text {
                Some(text) => plain_text(text),
                None => link.url.clone(),
            },
            Inline::Template(_) | Inline::Footnote(_) => String::new(),
            Inline::LineBreak => "\n".to_string(),
            Inline::Code(code) => plain_text(&code.content),
        }
    }
}

/// Concatenated markup-free text of an inline sequence.
pub fn plain_text(content: &[Inline]) -> String {
    content.iter().map(Inline::plain_text).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisKind {
    Italic,
    Strong,
    Both,
}

impl EmphasisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmphasisKind::Italic => "italic",
            EmphasisKind::Strong => "strong",
            EmphasisKind::Both => "both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Emphasis {
    pub kind: EmphasisKind,
    pub content: InlineContent,
}

impl Emphasis {
    pub fn new(kind: EmphasisKind, content: InlineContent) -> Self {
        Self { kind, content }
    }
}

/// Link to another page of the same wiki: `[[Target]]` or `[[Target|text]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InternalLink {
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<InlineContent>,
    /// Set for `[[:Category:Foo]]`, which links to the page instead of classifying it.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub leading_colon: bool,
}

impl InternalLink {
    /// Build a link, refusing an empty target.
    pub fn new(target: impl Into<String>, text: Option<InlineContent>) -> Option<Self> {
        let target = target.into();
        let target = target.trim();
        if target.is_empty() {
            return None;
        }
        let text = text.filter(|t| !t.iter().all(Inline::is_whitespace_text));
        Some(Self {
            target: target.to_string(),
            text,
            leading_colon: false,
        })
    }

    pub fn with_leading_colon(mut self) -> Self {
        self.leading_colon = true;
        self
    }

    /// Display content; the target itself when no text was given.
    pub fn display(&self) -> InlineContent {
        match &self.text {
            Some(text) => text.clone(),
            None => vec![Inline::text(self.target.clone())],
        }
    }

    pub fn display_text(&self) -> String {
        match &self.text {
            Some(text) => plain_text(text),
            None => self.target.clone(),
        }
    }

    /// Namespace prefix of the target (`Category` in `Category:Birds`), if any.
    pub fn namespace(&self) -> Option<&str> {
        let (ns, rest) = self.target.split_once(':')?;
        if ns.trim().is_empty() || rest.is_empty() {
            return None;
        }
        Some(ns.trim())
    }

    /// Language code, language name and foreign page of an interlanguage link such as
    /// `[[fr:Chat]]`.
    pub fn interlanguage(&self) -> Option<(&str, &'static str, &str)> {
        if self.leading_colon {
            return None;
        }
        let (code, page) = self.target.split_once(':')?;
        let code = code.trim();
        let page = page.trim();
        if page.is_empty() {
            return None;
        }
        language_name(code).map(|name| (code, name, page))
    }

    /// Media embeds and category tags are not rendered as visible links.
    pub fn is_hidden(&self) -> bool {
        if self.leading_colon {
            return false;
        }
        self.namespace()
            .map(|ns| HIDDEN_NAMESPACES.contains(&ns.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}

/// Link with an explicit URL scheme: `[https://example.org text]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalLink {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<InlineContent>,
}

impl ExternalLink {
    pub fn new(url: impl Into<String>, text: Option<InlineContent>) -> Self {
        Self {
            url: url.into(),
            text: text.filter(|t| !t.is_empty()),
        }
    }
}

/// Inline tags set in a fixed-width font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeTag {
    Code,
    Tt,
}

impl CodeTag {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "code" => Some(CodeTag::Code),
            "tt" => Some(CodeTag::Tt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeTag::Code => "code",
            CodeTag::Tt => "tt",
        }
    }
}

/// `<code>...</code>` or `<tt>...</tt>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Code {
    pub tag: CodeTag,
    pub content: InlineContent,
}

impl Code {
    pub fn new(tag: CodeTag, content: InlineContent) -> Self {
        Self { tag, content }
    }
}

/// A `<ref>` citation.
///
/// Numbers are given out in document order after parsing, starting at 1; a fresh node has
/// number 0. A named reuse (`<ref name="a"/>`) has no content of its own and shares the
/// number of the first `<ref>` with that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footnote {
    pub number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: InlineContent,
}

impl Footnote {
    pub fn new(name: Option<String>, content: InlineContent) -> Self {
        Self {
            number: 0,
            name,
            content,
        }
    }

    pub fn is_reuse(&self) -> bool {
        self.content.is_empty()
    }
}

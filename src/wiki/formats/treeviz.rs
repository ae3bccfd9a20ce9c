//! Treeviz renderer
//!
//! Treeviz is a visual representation of the parse tree, one line per node, which makes it quick
//! to scan when checking how a page was understood.
//!
//! It encodes the node structure with tree connectors, two columns per level of nesting.
//!
//! So the format is :
//! <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example:
//!
//! ├─ ⊤ h2 Noun
//! ├─ ☰ 2 items (ordered)
//! │ ├─ • a small domesticated feline
//! │ │ └─ ¶ a small domesticated feline
//! │ │   └─ ◦ a small domesticated feline
//! │ └─ • a person
//! └─ ¶ See also
//!   └─ ◦ See also
//!
//! Icons
//!     Blocks:
//!         Heading: ⊤
//!         Section: §
//!         Paragraph: ¶
//!         List: ☰
//!         ListItem: •
//!         DefinitionList: ≡
//!         DefinitionEntry: ≔
//!         Definition: ➔
//!         Table: ▦
//!         Caption: ⊏
//!         TableRow: ═
//!         TableCell: ▫
//!         Preformatted: 𝒱
//!         HorizontalRule: ―
//!         Template: ⊕
//!         Param: ∙
//!         References: ※
//!         Note: ⁿ
//!     Inlines:
//!         Text: ◦
//!         Emphasis: 𝐼
//!         InternalLink: #
//!         ExternalLink: /
//!         LineBreak: ↵
//!         Code: ⌨
//!         Footnote: †

use super::registry::Renderer;
use crate::wiki::ast::{snapshot_from_document, AstSnapshot, Document};

const LABEL_WIDTH: usize = 30;

fn icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Heading" => "⊤",
        "Section" => "§",
        "Paragraph" => "¶",
        "List" => "☰",
        "ListItem" => "•",
        "DefinitionList" => "≡",
        "DefinitionEntry" => "≔",
        "Definition" => "➔",
        "Table" => "▦",
        "Caption" => "⊏",
        "TableRow" => "═",
        "TableCell" => "▫",
        "Preformatted" => "𝒱",
        "HorizontalRule" => "―",
        "Template" => "⊕",
        "Param" => "∙",
        "References" => "※",
        "Note" => "ⁿ",
        "Text" => "◦",
        "Emphasis" => "𝐼",
        "InternalLink" => "#",
        "ExternalLink" => "/",
        "LineBreak" => "↵",
        "Code" => "⌨",
        "Footnote" => "†",
        _ => "?",
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    let root = snapshot_from_document(doc);
    let mut result = String::new();
    append_children(&mut result, &root.children, "");
    result
}

fn append_node(result: &mut String, node: &AstSnapshot, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let label = truncate(&node.label.replace('\n', " "), LABEL_WIDTH);

    result.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        icon(&node.node_type),
        label
    ));

    let new_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    append_children(result, &node.children, &new_prefix);
}

fn append_children(result: &mut String, children: &[AstSnapshot], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        append_node(result, child, prefix, is_last);
    }
}

pub struct TreevizRenderer;

impl Renderer for TreevizRenderer {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn render(&self, doc: &Document) -> String {
        to_treeviz_str(doc)
    }

    fn description(&self) -> &str {
        "One line per node tree view"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::parsing::parse_document;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_treeviz_lines() {
        insta::assert_snapshot!(to_treeviz_str(&parse_document("== Noun ==\n# a\n# b\nEnd")), @r###"
        ├─ ⊤ h2 Noun
        │ └─ ◦ Noun
        ├─ ☰ 2 items (ordered)
        │ ├─ • a
        │ │ └─ ¶ a
        │ │   └─ ◦ a
        │ └─ • b
        │   └─ ¶ b
        │     └─ ◦ b
        └─ ¶ End
          └─ ◦ End
        "###);
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let out = to_treeviz_str(&parse_document(&"word ".repeat(20)));
        let first = out.lines().next().unwrap();
        assert!(first.ends_with("..."));
        assert_eq!(first.chars().count(), "└─ ¶ ".chars().count() + 33);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(TreevizRenderer.render(&parse_document("")), "");
    }
}

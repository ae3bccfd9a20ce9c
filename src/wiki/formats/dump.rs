//! JSON dump of the parse tree
//!
//! Nodes serialize with a `type` tag; object keys come out sorted, so two dumps of the same
//! document are byte-identical. `indent` sets the pretty-printing width; 0 gives compact output.

use super::registry::Renderer;
use crate::wiki::ast::Document;
use crate::wiki::config::TranslateConfig;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct DumpRenderer {
    indent: usize,
}

impl Default for DumpRenderer {
    fn default() -> Self {
        Self::new(TranslateConfig::default().indent)
    }
}

impl DumpRenderer {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    pub fn from_config(config: &TranslateConfig) -> Self {
        Self::new(config.indent)
    }

    pub fn dump(&self, doc: &Document) -> serde_json::Result<String> {
        // Going through `Value` sorts object keys.
        let value = serde_json::to_value(doc)?;
        if self.indent == 0 {
            return serde_json::to_string(&value);
        }

        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;
        // serde_json only writes valid UTF-8.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Renderer for DumpRenderer {
    fn name(&self) -> &str {
        "dump"
    }

    fn render(&self, doc: &Document) -> String {
        match self.dump(doc) {
            Ok(mut json) => {
                json.push('\n');
                json
            }
            Err(err) => {
                tracing::error!(target: "wikitrans::formats", %err, "document dump failed");
                String::new()
            }
        }
    }

    fn description(&self) -> &str {
        "JSON dump of the parse tree"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wiki::parsing::parse_document;
    use serde_json::Value;

    #[test]
    fn test_dump_is_tagged_json() {
        let doc = parse_document("== T ==\n* [[A|b]]\n");
        let out = DumpRenderer::default().render(&doc);
        let value: Value = serde_json::from_str(&out).unwrap();

        let blocks = value["blocks"].as_array().unwrap();
        assert_eq!(blocks[0]["type"], "heading");
        assert_eq!(blocks[0]["level"], 2);
        assert_eq!(blocks[1]["type"], "list");
        assert_eq!(blocks[1]["kind"], "unordered");
        let link = &blocks[1]["items"][0]["blocks"][0]["content"][0];
        assert_eq!(link["type"], "internal_link");
        assert_eq!(link["target"], "A");
        assert_eq!(value["metadata"]["language"], "en");
    }

    #[test]
    fn test_indent_width() {
        let doc = parse_document("x");
        let pretty = DumpRenderer::new(4).render(&doc);
        assert!(pretty.starts_with("{\n    \"blocks\""), "{pretty}");

        let compact = DumpRenderer::new(0).render(&doc);
        assert_eq!(compact.lines().count(), 1);
        assert!(compact.starts_with("{\"blocks\":"));
    }

    #[test]
    fn test_dump_is_deterministic() {
        let doc = parse_document("; a : b\n{|\n| c\n|}\n{{t|x=1|y}}");
        let renderer = DumpRenderer::default();
        assert_eq!(renderer.render(&doc), renderer.render(&doc));
    }
}

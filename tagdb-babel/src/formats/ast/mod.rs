//! AST format: the document as JSON
//!
//! The JSON shape is the serde representation of [Node](tagdb_parser::Node): an array of
//! objects tagged by `type`. Lossless in both directions.

use crate::error::FormatError;
use crate::format::Format;
use tagdb_parser::{Document, TagRefResolver};

pub struct AstFormat;

impl Format for AstFormat {
    fn name(&self) -> &str {
        "ast"
    }

    fn description(&self) -> &str {
        "JSON syntax tree"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        serde_json::from_str(source).map_err(|e| FormatError::ParseError(e.to_string()))
    }

    fn serialize(
        &self,
        doc: &Document,
        _resolver: &dyn TagRefResolver,
    ) -> Result<String, FormatError> {
        serde_json::to_string(doc).map_err(|e| FormatError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagdb_parser::{Node, Nsfw, UnresolvedTags};

    #[test]
    fn test_json_shape() {
        let doc = Document::new(vec![Node::text("a"), Node::br()]);
        let json = AstFormat.serialize(&doc, &UnresolvedTags).unwrap();
        assert_eq!(json, r#"[{"type":"text","text":"a"},{"type":"br"}]"#);
    }

    #[test]
    fn test_parse_back() {
        let doc = Document::new(vec![Node::image(
            "https://e/x.jpg",
            Some("t".to_string()),
            Some(Nsfw::R18G),
            vec![Node::text("alt")],
        )]);
        let json = AstFormat.serialize(&doc, &UnresolvedTags).unwrap();
        assert_eq!(AstFormat.parse(&json).unwrap(), doc);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            AstFormat.parse("{"),
            Err(FormatError::ParseError(_))
        ));
    }
}

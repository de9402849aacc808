//! Markdown serialization (AST → cell text)
//!
//! Pipeline: Document → Comrak AST → Markdown string

use crate::error::FormatError;
use comrak::nodes::{Ast, AstNode, NodeCode, NodeLink, NodeValue};
use comrak::{format_commonmark, Arena};
use std::cell::RefCell;
use tagdb_parser::inline::comrak_options;
use tagdb_parser::{Document, Node};

/// Serialize a document to single-line inline markdown.
pub fn serialize_to_markdown(doc: &Document) -> Result<String, FormatError> {
    let arena = Arena::new();
    let root = alloc(&arena, NodeValue::Document);
    let paragraph = alloc(&arena, NodeValue::Paragraph);
    root.append(paragraph);

    let mut has_content = false;
    for node in &doc.content {
        append_inline(&arena, paragraph, node, &mut has_content);
    }

    let mut output = Vec::new();
    format_commonmark(root, &comrak_options(), &mut output).map_err(|e| {
        FormatError::SerializationError(format!("Comrak serialization failed: {}", e))
    })?;

    let markdown = String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {}", e)))?;

    Ok(markdown.trim_end_matches('\n').to_string())
}

fn alloc<'a>(arena: &'a Arena<AstNode<'a>>, value: NodeValue) -> &'a AstNode<'a> {
    arena.alloc(AstNode::new(RefCell::new(Ast::new(value, (0, 0).into()))))
}

fn append_children<'a>(arena: &'a Arena<AstNode<'a>>, parent: &'a AstNode<'a>, nodes: &[Node]) {
    let mut has_content = false;
    for node in nodes {
        append_inline(arena, parent, node, &mut has_content);
    }
}

fn append_inline<'a>(
    arena: &'a Arena<AstNode<'a>>,
    parent: &'a AstNode<'a>,
    node: &Node,
    has_content: &mut bool,
) {
    match node {
        Node::Text { text } => {
            // A newline would end the table row
            let text = text.replace(['\r', '\n'], " ");
            parent.append(alloc(arena, NodeValue::Text(text)));
        }

        Node::Br => parent.append(alloc(arena, NodeValue::HtmlInline("<br>".to_string()))),

        Node::Paragraph { content } => {
            if *has_content {
                parent.append(alloc(arena, NodeValue::HtmlInline("<br>".to_string())));
            }
            append_children(arena, parent, content);
        }

        Node::Strong { content } => {
            let strong = alloc(arena, NodeValue::Strong);
            parent.append(strong);
            append_children(arena, strong, content);
        }

        Node::Emphasis { content } => {
            let emph = alloc(arena, NodeValue::Emph);
            parent.append(emph);
            append_children(arena, emph, content);
        }

        Node::Link {
            url,
            title,
            content,
        } => {
            let link = alloc(
                arena,
                NodeValue::Link(NodeLink {
                    url: url.clone(),
                    title: title.clone().unwrap_or_default(),
                }),
            );
            parent.append(link);
            append_children(arena, link, content);
        }

        Node::Image {
            url,
            title,
            nsfw,
            content,
        } => {
            // Flagged images keep their url in the title, see Nsfw::decode
            let (url, title) = match nsfw {
                Some(flag) => (flag.placeholder().to_string(), url.clone()),
                None => (url.clone(), title.clone().unwrap_or_default()),
            };
            let image = alloc(arena, NodeValue::Image(NodeLink { url, title }));
            parent.append(image);
            append_children(arena, image, content);
        }

        Node::TagRef { text } => parent.append(alloc(
            arena,
            NodeValue::Code(NodeCode {
                num_backticks: 1,
                literal: text.clone(),
            }),
        )),

        Node::Element {
            name,
            attrs,
            content,
        } => {
            let mut open = format!("<{}", name);
            for (key, value) in attrs {
                open.push_str(&format!(" {}=\"{}\"", key, value.replace('"', "&quot;")));
            }
            open.push('>');
            parent.append(alloc(arena, NodeValue::HtmlInline(open)));
            append_children(arena, parent, content);
            parent.append(alloc(arena, NodeValue::HtmlInline(format!("</{}>", name))));
        }
    }
    *has_content = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagdb_parser::inline::parse_inline;
    use tagdb_parser::Nsfw;

    fn md(nodes: Vec<Node>) -> String {
        serialize_to_markdown(&Document::new(nodes)).unwrap()
    }

    #[test]
    fn test_empty() {
        assert_eq!(md(vec![]), "");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(md(vec![Node::text("John Doe")]), "John Doe");
    }

    #[test]
    fn test_br_and_tagref() {
        assert_eq!(
            md(vec![
                Node::text("a"),
                Node::br(),
                Node::tagref("artist:john")
            ]),
            "a<br>`artist:john`"
        );
    }

    #[test]
    fn test_flagged_image_is_encoded() {
        let out = md(vec![Node::image(
            "https://e/x.jpg",
            None,
            Some(Nsfw::R18),
            vec![Node::text("x")],
        )]);
        assert_eq!(out, r#"![x](# "https://e/x.jpg")"#);
    }

    #[test]
    fn test_newlines_are_flattened() {
        assert_eq!(md(vec![Node::text("a\nb")]), "a b");
    }

    #[test]
    fn test_round_trip_through_parser() {
        let sources = [
            "a **b** *c*",
            r#"[Pixiv](https://pixiv.net/u/1 "home")"#,
            r#"![cover](## "https://e/x.jpg")"#,
            "see `artist:john doe`<br>next",
            r"1\*2",
        ];
        for source in sources {
            let doc = parse_inline(source);
            let written = serialize_to_markdown(&doc).unwrap();
            assert_eq!(parse_inline(&written), doc, "{}", source);
        }
    }
}

//! Cell tests (markdown ↔ AST)

use tagdb_babel::formats::MarkdownFormat;
use tagdb_babel::{Format, FormatRegistry};
use tagdb_parser::{Document, Node, UnresolvedTags};

#[test]
fn test_paragraphs_flatten_to_br() {
    let doc = Document::new(vec![
        Node::paragraph(vec![Node::text("one")]),
        Node::paragraph(vec![Node::text("two")]),
    ]);
    let markdown = MarkdownFormat.serialize(&doc, &UnresolvedTags).unwrap();
    assert_eq!(markdown, "one<br>two");
    assert_eq!(
        MarkdownFormat.parse(&markdown).unwrap().content,
        vec![Node::text("one"), Node::br(), Node::text("two")]
    );
}

#[test]
fn test_raw_element_is_written_as_inline_html() {
    let mut span = Node::element("span", vec![("class".into(), "x".into())]);
    span.append(Node::text("y"));
    let markdown = MarkdownFormat
        .serialize(&Document::new(vec![span]), &UnresolvedTags)
        .unwrap();
    assert_eq!(markdown, r#"<span class="x">y</span>"#);
}

#[test]
fn test_text_format_flattens() {
    let registry = FormatRegistry::with_defaults();
    let doc = registry
        .parse("**John** `artist:jd`<br>[site](https://e)", "markdown")
        .unwrap();
    insta::assert_snapshot!(
        registry.serialize(&doc, "text", &UnresolvedTags).unwrap(),
        @r"
    John artist:jd
    site
    "
    );
}

#[test]
fn test_ast_format_dump() {
    let registry = FormatRegistry::with_defaults();
    let doc = registry.parse("*a*<br>`b`", "markdown").unwrap();
    insta::assert_snapshot!(
        registry.serialize(&doc, "ast", &UnresolvedTags).unwrap(),
        @r#"[{"type":"emphasis","content":[{"type":"text","text":"a"}]},{"type":"br"},{"type":"tagref","text":"b"}]"#
    );
}

//! Import tests (HTML → AST)

use rstest::rstest;
use tagdb_babel::formats::{HtmlFormat, MarkdownFormat};
use tagdb_babel::{Format, FormatRegistry};
use tagdb_parser::{Document, Node, Nsfw, UnresolvedTags};

fn parse(html: &str) -> Vec<Node> {
    HtmlFormat::new().parse(html).unwrap().content
}

#[test]
fn test_bold_and_italic_aliases() {
    assert_eq!(
        parse("<b>x</b><i>y</i>"),
        vec![
            Node::strong(vec![Node::text("x")]),
            Node::emphasis(vec![Node::text("y")])
        ]
    );
}

#[test]
fn test_link_without_title() {
    assert_eq!(
        parse(r#"<a href="https://e">e</a>"#),
        vec![Node::link("https://e", None, vec![Node::text("e")])]
    );
}

#[test]
fn test_flagged_image() {
    assert_eq!(
        parse(r#"<img src="https://e/x.jpg" nsfw="R18">"#),
        vec![Node::image("https://e/x.jpg", None, Some(Nsfw::R18), vec![])]
    );
}

#[test]
fn test_unknown_nsfw_value_is_ignored() {
    assert_eq!(
        parse(r#"<img src="https://e/x.jpg" nsfw="yes">"#),
        vec![Node::image("https://e/x.jpg", None, None, vec![])]
    );
}

#[test]
fn test_empty_input() {
    assert!(parse("").is_empty());
}

#[rstest]
#[case("plain")]
#[case("a **b** *c*<br>d")]
#[case(r#"[Pixiv](https://pixiv.net/u/1 "home")"#)]
#[case(r#"![cover](# "https://e/x.jpg")"#)]
#[case(r#"![cover](## "https://e/x.jpg")"#)]
#[case("see `artist:john doe` & `x`")]
fn test_markdown_html_round_trip(#[case] markdown: &str) {
    let registry = FormatRegistry::with_defaults();
    let doc = MarkdownFormat.parse(markdown).unwrap();
    let html = registry.serialize(&doc, "html", &UnresolvedTags).unwrap();
    assert_eq!(registry.parse(&html, "html").unwrap(), doc);
}

#[rstest]
#[case::leading_space(vec![Node::text("  a "), Node::strong(vec![Node::text("b")])])]
#[case::leading_newline(vec![Node::text("\nx"), Node::br(), Node::text(" y")])]
#[case::title_first(vec![
    {
        let mut title = Node::element("title", Vec::new());
        title.append(Node::text("t"));
        title
    },
    Node::text("x"),
])]
fn test_html_round_trip_keeps_leading_content(#[case] content: Vec<Node>) {
    let registry = FormatRegistry::with_defaults();
    let doc = Document::new(content);
    let html = registry.serialize(&doc, "html", &UnresolvedTags).unwrap();
    assert_eq!(registry.parse(&html, "html").unwrap(), doc);
}

//! Export tests (AST → HTML)

use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use rstest::rstest;
use tagdb_babel::formats::html::{serialize_html, HtmlAdapter, HtmlFormat, TreeAdapter};
use tagdb_babel::formats::MarkdownFormat;
use tagdb_babel::Format;
use tagdb_parser::namespace::split_qualified;
use tagdb_parser::{
    Document, Namespace, Node, NodeKind, RawTag, ResolvedTagRef, TagRefResolver, UnresolvedTags,
};

/// Knows a single record, `artist:john doe`.
struct OneArtist;

impl TagRefResolver for OneArtist {
    fn resolve(&self, text: &str) -> ResolvedTagRef {
        let (namespace, raw) = split_qualified(text);
        let tag = (raw.trim() == "john doe")
            .then(|| (Namespace::Artist, RawTag::parse("john doe").unwrap()));
        ResolvedTagRef {
            tag,
            namespace,
            explicit_namespace: namespace.is_some(),
        }
    }
}

fn to_html(markdown: &str, resolver: &dyn TagRefResolver) -> String {
    let doc = MarkdownFormat.parse(markdown).unwrap();
    HtmlFormat::new().serialize(&doc, resolver).unwrap()
}

fn find(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: qual, .. } = &handle.data {
        if &*qual.local == name {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find(child, name))
}

/// Reparse with html5ever's own DOM and serialize its body again. Output that is already
/// well formed comes back unchanged.
fn reserialize(html: &str) -> String {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let body = find(&dom.document, "body").expect("html5ever always creates a body");
    let mut out = Vec::new();
    serialize(
        &mut out,
        &SerializableHandle::from(body),
        SerializeOpts::default(),
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_inline_markup() {
    insta::assert_snapshot!(
        to_html("A **prolific** *artist*<br>[Pixiv](https://pixiv.net/u/1 \"home\")", &UnresolvedTags),
        @r#"A <strong>prolific</strong> <em>artist</em><br><a href="https://pixiv.net/u/1" title="home">Pixiv</a>"#
    );
}

#[test]
fn test_r18_image() {
    insta::assert_snapshot!(
        to_html(r#"![cover](# "https://e/x.jpg")"#, &UnresolvedTags),
        @r#"<img src="https://e/x.jpg" alt="cover" nsfw="R18">"#
    );
}

#[test]
fn test_r18g_image() {
    insta::assert_snapshot!(
        to_html(r#"![cover](## "https://e/x.jpg")"#, &UnresolvedTags),
        @r#"<img src="https://e/x.jpg" alt="cover" nsfw="R18G">"#
    );
}

#[test]
fn test_hash_url_without_http_title_is_plain() {
    insta::assert_snapshot!(
        to_html(r#"![x](# "not a url")"#, &UnresolvedTags),
        @r##"<img src="#" title="not a url" alt="x">"##
    );
}

#[rstest]
#[case::bare("john doe", r#"<abbr title="john doe" ns="artist">john doe</abbr>"#)]
#[case::matching("artist:john doe", r#"<abbr title="john doe" ns="artist">artist:john doe</abbr>"#)]
#[case::abbreviated("a:john doe", r#"<abbr title="john doe" ns="artist">a:john doe</abbr>"#)]
#[case::mismatched(
    "group:john doe",
    r#"<abbr title="artist:john doe" ns="artist">group:john doe</abbr>"#
)]
#[case::unresolved("nobody", "<abbr>nobody</abbr>")]
fn test_tagref_titles(#[case] reference: &str, #[case] expected: &str) {
    assert_eq!(to_html(&format!("`{}`", reference), &OneArtist), expected);
}

#[rstest]
#[case("plain text")]
#[case("a **b** *c* <br> d")]
#[case(r#"[Pixiv](https://pixiv.net/u/1 "home") & `artist:john doe`"#)]
#[case(r#"![cover](## "https://e/x.jpg") trailing < text"#)]
fn test_output_is_well_formed(#[case] markdown: &str) {
    let html = to_html(markdown, &OneArtist);
    assert_eq!(reserialize(&html), html);
}

#[test]
fn test_serialization_is_deterministic() {
    let markdown = r#"**x** [a](https://e "t") ![i](# "https://e/i.png") `john doe`"#;
    let first = to_html(markdown, &OneArtist);
    for _ in 0..10 {
        assert_eq!(to_html(markdown, &OneArtist), first);
    }
}

/// A BBCode-ish dialect, to check the serializer only talks to the adapter.
struct ForumAdapter;

impl TreeAdapter for ForumAdapter {
    fn element_name(&self, kind: NodeKind) -> Option<&'static str> {
        match kind {
            NodeKind::Strong => Some("b"),
            NodeKind::Emphasis => Some("i"),
            NodeKind::TagRef => Some("code"),
            other => HtmlAdapter.element_name(other),
        }
    }

    fn node_kind(&self, name: &str) -> NodeKind {
        match name {
            "code" => NodeKind::TagRef,
            "abbr" => NodeKind::Element,
            other => HtmlAdapter.node_kind(other),
        }
    }

    fn attributes(&self, node: &Node, resolver: &dyn TagRefResolver) -> Vec<(String, String)> {
        match node {
            Node::TagRef { .. } => Vec::new(),
            other => HtmlAdapter.attributes(other, resolver),
        }
    }

    fn build_node(&self, kind: NodeKind, name: &str, attrs: &[(String, String)]) -> Node {
        HtmlAdapter.build_node(kind, name, attrs)
    }
}

#[test]
fn test_alternate_adapter() {
    let doc = Document::new(vec![
        Node::strong(vec![Node::text("x")]),
        Node::emphasis(vec![Node::text("y")]),
        Node::tagref("john doe"),
    ]);
    let html = serialize_html(&doc, &ForumAdapter, &OneArtist).unwrap();
    assert_eq!(html, "<b>x</b><i>y</i><code>john doe</code>");

    let format = HtmlFormat::with_adapter(ForumAdapter);
    assert_eq!(format.parse(&html).unwrap(), doc);
}

//! Inline markdown parsing (cell text → AST)
//!
//! Pipeline: cell string → Comrak AST → [Document]
//!
//!     Comrak does the CommonMark work; this module only maps its inline nodes onto ours
//!     and applies the tagdb conventions (code spans as tag references, flagged images,
//!     `<br>` as a hard break). Adjacent text is merged while mapping, so a cell always
//!     produces the same tree no matter how comrak chose to split its text runs.
//!
//!     A cell is a single line, so the Comrak document normally holds one paragraph.
//!     Other blocks (a cell starting with `# ` becomes a heading) are flattened to their
//!     inline content.

use crate::ast::{Document, Node, Nsfw};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// Comrak options shared by parsing and markdown serialization.
pub fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    // `<br>` must survive serialization as raw inline html
    options.render.unsafe_ = true;
    options
}

/// Parse one cell of inline markdown.
pub fn parse_inline(source: &str) -> Document {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut content = Vec::new();
    let mut first_block = true;
    for block in root.children() {
        if !first_block {
            content.push(Node::br());
        }
        first_block = false;
        collect_block(block, &mut content);
    }
    Document::new(content)
}

fn collect_block<'a>(node: &'a AstNode<'a>, content: &mut Vec<Node>) {
    let is_leaf_block = matches!(
        node.data.borrow().value,
        NodeValue::Paragraph | NodeValue::Heading(_)
    );
    if is_leaf_block {
        for child in node.children() {
            collect_inline(child, content);
        }
    } else {
        for child in node.children() {
            collect_block(child, content);
        }
    }
}

fn collect_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let mut children = Vec::new();
    for child in node.children() {
        collect_inline(child, &mut children);
    }
    children
}

fn collect_inline<'a>(node: &'a AstNode<'a>, content: &mut Vec<Node>) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Text(text) => push_text(content, &text),

        NodeValue::SoftBreak => push_text(content, " "),

        NodeValue::LineBreak => content.push(Node::br()),

        NodeValue::Code(code) => content.push(Node::tagref(code.literal.trim())),

        NodeValue::HtmlInline(html) => {
            if is_br_tag(&html) {
                content.push(Node::br());
            } else {
                push_text(content, &html);
            }
        }

        NodeValue::Emph => content.push(Node::emphasis(collect_children(node))),

        NodeValue::Strong => content.push(Node::strong(collect_children(node))),

        NodeValue::Link(link) => content.push(Node::link(
            link.url,
            Some(link.title),
            collect_children(node),
        )),

        NodeValue::Image(link) => {
            let (url, title, nsfw) = Nsfw::decode(&link.url, &link.title);
            content.push(Node::image(url, Some(title), nsfw, collect_children(node)));
        }

        _ => {
            // Unknown inline: keep whatever text it carries
            for child in node.children() {
                collect_inline(child, content);
            }
        }
    }
}

fn push_text(content: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text { text: last }) = content.last_mut() {
        last.push_str(text);
    } else {
        content.push(Node::text(text));
    }
}

fn is_br_tag(html: &str) -> bool {
    let compact: String = html
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact == "<br>" || compact == "<br/>"
}

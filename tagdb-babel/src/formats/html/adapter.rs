//! Tree adapters
//!
//!     An adapter is the only place that knows a markup dialect. The serializer asks it
//!     which element and attributes a node becomes, and the sink asks it the reverse when
//!     reading markup back. Tree bookkeeping (children, parents, element namespaces)
//!     belongs to the node type and the sink, so a new dialect is just a new adapter.

use crate::formats::text::plain_text;
use tagdb_parser::{Node, NodeKind, Nsfw, TagRefResolver};

pub trait TreeAdapter {
    /// Element name for a node kind. `None` for text and for raw elements, which carry
    /// their own name.
    fn element_name(&self, kind: NodeKind) -> Option<&'static str>;

    /// Node kind an element of this name imports as.
    fn node_kind(&self, name: &str) -> NodeKind;

    /// Attributes of a node, in emission order.
    fn attributes(&self, node: &Node, resolver: &dyn TagRefResolver) -> Vec<(String, String)>;

    /// Build an empty node from an element; children are appended afterwards.
    fn build_node(&self, kind: NodeKind, name: &str, attrs: &[(String, String)]) -> Node;
}

/// HTML as shown to readers of the database.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlAdapter;

impl TreeAdapter for HtmlAdapter {
    fn element_name(&self, kind: NodeKind) -> Option<&'static str> {
        match kind {
            NodeKind::Paragraph => Some("p"),
            NodeKind::Strong => Some("strong"),
            NodeKind::Emphasis => Some("em"),
            NodeKind::Br => Some("br"),
            NodeKind::Link => Some("a"),
            NodeKind::Image => Some("img"),
            NodeKind::TagRef => Some("abbr"),
            NodeKind::Text | NodeKind::Element => None,
        }
    }

    fn node_kind(&self, name: &str) -> NodeKind {
        match name {
            "p" => NodeKind::Paragraph,
            "strong" | "b" => NodeKind::Strong,
            "em" | "i" => NodeKind::Emphasis,
            "br" => NodeKind::Br,
            "a" => NodeKind::Link,
            "img" => NodeKind::Image,
            "abbr" => NodeKind::TagRef,
            _ => NodeKind::Element,
        }
    }

    fn attributes(&self, node: &Node, resolver: &dyn TagRefResolver) -> Vec<(String, String)> {
        let mut attrs = Vec::new();
        match node {
            Node::Link { url, title, .. } => {
                attrs.push(("href".to_string(), url.clone()));
                if let Some(title) = title {
                    attrs.push(("title".to_string(), title.clone()));
                }
            }
            Node::Image {
                url,
                title,
                nsfw,
                content,
            } => {
                // Images built by hand may still use the `#` url convention
                let (url, title, nsfw) = match nsfw {
                    Some(flag) => (url.clone(), title.clone().unwrap_or_default(), Some(*flag)),
                    None => Nsfw::decode(url, title.as_deref().unwrap_or_default()),
                };
                attrs.push(("src".to_string(), url));
                if !title.is_empty() {
                    attrs.push(("title".to_string(), title));
                }
                let alt = plain_text(content);
                if !alt.is_empty() {
                    attrs.push(("alt".to_string(), alt));
                }
                if let Some(flag) = nsfw {
                    attrs.push(("nsfw".to_string(), flag.as_str().to_string()));
                }
            }
            Node::TagRef { text } => {
                let resolved = resolver.resolve(text);
                if let (Some(title), Some((ns, _))) = (resolved.title(), resolved.tag.as_ref()) {
                    attrs.push(("title".to_string(), title));
                    attrs.push(("ns".to_string(), ns.as_str().to_string()));
                }
            }
            Node::Element { attrs: raw, .. } => attrs.extend(raw.iter().cloned()),
            Node::Text { .. }
            | Node::Paragraph { .. }
            | Node::Strong { .. }
            | Node::Emphasis { .. }
            | Node::Br => {}
        }
        attrs
    }

    fn build_node(&self, kind: NodeKind, name: &str, attrs: &[(String, String)]) -> Node {
        let attr = |key: &str| {
            attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };
        match kind {
            NodeKind::Text => Node::text(""),
            NodeKind::Paragraph => Node::paragraph(Vec::new()),
            NodeKind::Strong => Node::strong(Vec::new()),
            NodeKind::Emphasis => Node::emphasis(Vec::new()),
            NodeKind::Br => Node::br(),
            NodeKind::Link => Node::link(attr("href").unwrap_or_default(), attr("title"), Vec::new()),
            NodeKind::Image => {
                let content = attr("alt")
                    .filter(|alt| !alt.is_empty())
                    .map(|alt| vec![Node::text(alt)])
                    .unwrap_or_default();
                Node::image(
                    attr("src").unwrap_or_default(),
                    attr("title"),
                    attr("nsfw").and_then(|v| Nsfw::parse(&v)),
                    content,
                )
            }
            NodeKind::TagRef => Node::tagref(""),
            NodeKind::Element => Node::element(name, attrs.to_vec()),
        }
    }
}

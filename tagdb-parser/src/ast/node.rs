//! Node taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flag carried by images that shouldn't be shown by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nsfw {
    R18,
    R18G,
}

impl Nsfw {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nsfw::R18 => "R18",
            Nsfw::R18G => "R18G",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "R18" => Some(Nsfw::R18),
            "R18G" => Some(Nsfw::R18G),
            _ => None,
        }
    }

    /// The url placeholder that flags an image in the text dialect.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Nsfw::R18 => "#",
            Nsfw::R18G => "##",
        }
    }

    /// Decode the text dialect convention.
    ///
    /// `![alt](# "https://x/y.jpg")` is an R18 image of `https://x/y.jpg` and `##` marks
    /// R18G. The title only stands in for the url when it is an http(s) url; anything
    /// else is an ordinary image with a literal `#` url.
    ///
    /// Returns `(url, title, nsfw)`.
    pub fn decode(url: &str, title: &str) -> (String, String, Option<Nsfw>) {
        let flag = match url {
            "#" => Some(Nsfw::R18),
            "##" => Some(Nsfw::R18G),
            _ => None,
        };
        match flag {
            Some(nsfw) if title.starts_with("http://") || title.starts_with("https://") => {
                (title.to_string(), String::new(), Some(nsfw))
            }
            _ => (url.to_string(), title.to_string(), None),
        }
    }
}

impl fmt::Display for Nsfw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind discriminator, for dispatch tables that don't need the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Paragraph,
    Strong,
    Emphasis,
    Br,
    Link,
    Image,
    TagRef,
    Element,
}

/// A node of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Text {
        text: String,
    },
    Paragraph {
        content: Vec<Node>,
    },
    Strong {
        content: Vec<Node>,
    },
    Emphasis {
        content: Vec<Node>,
    },
    Br,
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        content: Vec<Node>,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nsfw: Option<Nsfw>,
        content: Vec<Node>,
    },
    #[serde(rename = "tagref")]
    TagRef {
        text: String,
    },
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        content: Vec<Node>,
    },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Node::Paragraph { content }
    }

    pub fn strong(content: Vec<Node>) -> Self {
        Node::Strong { content }
    }

    pub fn emphasis(content: Vec<Node>) -> Self {
        Node::Emphasis { content }
    }

    pub fn br() -> Self {
        Node::Br
    }

    pub fn link(url: impl Into<String>, title: Option<String>, content: Vec<Node>) -> Self {
        Node::Link {
            url: url.into(),
            title: title.filter(|t| !t.is_empty()),
            content,
        }
    }

    pub fn image(
        url: impl Into<String>,
        title: Option<String>,
        nsfw: Option<Nsfw>,
        content: Vec<Node>,
    ) -> Self {
        Node::Image {
            url: url.into(),
            title: title.filter(|t| !t.is_empty()),
            nsfw,
            content,
        }
    }

    pub fn tagref(text: impl Into<String>) -> Self {
        Node::TagRef { text: text.into() }
    }

    pub fn element(name: impl Into<String>, attrs: Vec<(String, String)>) -> Self {
        Node::Element {
            name: name.into(),
            attrs,
            content: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text { .. } => NodeKind::Text,
            Node::Paragraph { .. } => NodeKind::Paragraph,
            Node::Strong { .. } => NodeKind::Strong,
            Node::Emphasis { .. } => NodeKind::Emphasis,
            Node::Br => NodeKind::Br,
            Node::Link { .. } => NodeKind::Link,
            Node::Image { .. } => NodeKind::Image,
            Node::TagRef { .. } => NodeKind::TagRef,
            Node::Element { .. } => NodeKind::Element,
        }
    }

    /// Child sequence of container nodes, `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Paragraph { content }
            | Node::Strong { content }
            | Node::Emphasis { content }
            | Node::Link { content, .. }
            | Node::Image { content, .. }
            | Node::Element { content, .. } => Some(content),
            Node::Text { .. } | Node::Br | Node::TagRef { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Paragraph { content }
            | Node::Strong { content }
            | Node::Emphasis { content }
            | Node::Link { content, .. }
            | Node::Image { content, .. }
            | Node::Element { content, .. } => Some(content),
            Node::Text { .. } | Node::Br | Node::TagRef { .. } => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.children().is_some()
    }

    /// Text payload of text and tagref nodes.
    pub fn text_payload(&self) -> Option<&str> {
        match self {
            Node::Text { text } | Node::TagRef { text } => Some(text),
            _ => None,
        }
    }

    /// Append a child.
    ///
    /// # Panics
    ///
    /// Panics when called on a leaf.
    pub fn append(&mut self, child: Node) {
        match self.children_mut() {
            Some(children) => children.push(child),
            None => panic!("append on leaf node {:?}", self.kind()),
        }
    }

    /// Insert text.
    ///
    /// Containers get a new text child. A tagref concatenates onto its reference text,
    /// since it holds exactly one payload rather than children.
    ///
    /// # Panics
    ///
    /// Panics on text and br nodes.
    pub fn insert_text(&mut self, text: &str) {
        match self {
            Node::TagRef { text: payload } => payload.push_str(text),
            Node::Text { .. } | Node::Br => {
                panic!("insert_text on leaf node {:?}", self.kind())
            }
            _ => self.append(Node::text(text)),
        }
    }

    /// Remove and return the child at `index`, leaving it unattached.
    ///
    /// # Panics
    ///
    /// Panics on leaves and when `index` is out of bounds.
    pub fn detach(&mut self, index: usize) -> Node {
        match self.children_mut() {
            Some(children) => children.remove(index),
            None => panic!("detach on leaf node {:?}", self.kind()),
        }
    }
}

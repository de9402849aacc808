use super::node::Node;
use serde::{Deserialize, Serialize};

/// Ordered list of sibling nodes, the content of one record field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub content: Vec<Node>,
}

impl Document {
    pub fn new(content: Vec<Node>) -> Self {
        Self { content }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn push(&mut self, node: Node) {
        self.content.push(node);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.content.iter()
    }

    /// Depth-first walk over every node, parents before children.
    pub fn walk(&self, visit: &mut dyn FnMut(&Node)) {
        fn walk_nodes(nodes: &[Node], visit: &mut dyn FnMut(&Node)) {
            for node in nodes {
                visit(node);
                if let Some(children) = node.children() {
                    walk_nodes(children, visit);
                }
            }
        }
        walk_nodes(&self.content, visit);
    }

    /// Every tag reference text in document order.
    pub fn tag_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        fn collect<'a>(nodes: &'a [Node], refs: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    Node::TagRef { text } => refs.push(text),
                    _ => {
                        if let Some(children) = node.children() {
                            collect(children, refs);
                        }
                    }
                }
            }
        }
        collect(&self.content, &mut refs);
        refs
    }
}

impl From<Vec<Node>> for Document {
    fn from(content: Vec<Node>) -> Self {
        Self { content }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.iter()
    }
}

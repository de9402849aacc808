//! HTML serialization (AST → markup)
//!
//! Pipeline: Document → [HtmlFragment] → html5ever serializer → HTML string
//!
//!     The document is never copied into a DOM. [HtmlFragment] walks the AST directly and
//!     feeds html5ever's serializer start/end events, asking the adapter for element
//!     names and attributes on the way. Escaping and void elements are html5ever's job.

use super::adapter::TreeAdapter;
use crate::error::FormatError;
use html5ever::serialize::{serialize, Serialize, SerializeOpts, Serializer, TraversalScope};
use html5ever::{ns, LocalName, QualName};
use std::io;
use tagdb_parser::{Document, Node, TagRefResolver};

/// A sibling list viewed as the children of an implicit root.
pub struct HtmlFragment<'a, A: TreeAdapter> {
    nodes: &'a [Node],
    adapter: &'a A,
    resolver: &'a dyn TagRefResolver,
}

impl<'a, A: TreeAdapter> HtmlFragment<'a, A> {
    pub fn new(nodes: &'a [Node], adapter: &'a A, resolver: &'a dyn TagRefResolver) -> Self {
        Self {
            nodes,
            adapter,
            resolver,
        }
    }

    fn serialize_node<S: Serializer>(&self, node: &Node, serializer: &mut S) -> io::Result<()> {
        let name = match node {
            Node::Text { text } => return serializer.write_text(text),
            Node::Element { name, .. } => name.as_str(),
            _ => self.adapter.element_name(node.kind()).unwrap_or("span"),
        };

        let qual_name = QualName::new(None, ns!(html), LocalName::from(name));
        let attrs = self.adapter.attributes(node, self.resolver);
        let attr_names: Vec<QualName> = attrs
            .iter()
            .map(|(key, _)| QualName::new(None, ns!(), LocalName::from(key.as_str())))
            .collect();

        serializer.start_elem(
            qual_name.clone(),
            attr_names
                .iter()
                .zip(attrs.iter())
                .map(|(name, (_, value))| (name, value.as_str())),
        )?;

        match node {
            Node::TagRef { text } => serializer.write_text(text)?,
            // Image content is flattened into `alt`
            Node::Image { .. } => {}
            _ => {
                for child in node.children().unwrap_or_default() {
                    self.serialize_node(child, serializer)?;
                }
            }
        }

        serializer.end_elem(qual_name)
    }
}

impl<A: TreeAdapter> Serialize for HtmlFragment<'_, A> {
    fn serialize<S>(&self, serializer: &mut S, _traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        // The implicit root has no markup of its own in either scope
        for node in self.nodes {
            self.serialize_node(node, serializer)?;
        }
        Ok(())
    }
}

/// Serialize a document to an HTML fragment.
pub fn serialize_html<A: TreeAdapter>(
    doc: &Document,
    adapter: &A,
    resolver: &dyn TagRefResolver,
) -> Result<String, FormatError> {
    let fragment = HtmlFragment::new(&doc.content, adapter, resolver);
    let mut output = Vec::new();
    serialize(&mut output, &fragment, SerializeOpts::default()).map_err(|e| {
        FormatError::SerializationError(format!("HTML serialization failed: {}", e))
    })?;

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {}", e)))
}

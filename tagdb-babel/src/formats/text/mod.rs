//! Plain text format
//!
//! Flattens a document to the text a reader would see, with no markup at all. Used on its
//! own as the `text` render type and by the html adapter for image `alt` attributes.
//!
//! | Node      | Text                         |
//! |-----------|------------------------------|
//! | text      | the text                     |
//! | br        | newline                      |
//! | paragraph | content, newline-separated   |
//! | tagref    | the reference as typed       |
//! | image     | its alt content              |
//! | others    | their content                |

use crate::error::FormatError;
use crate::format::Format;
use tagdb_parser::{Document, Node, TagRefResolver};

pub struct TextFormat;

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text without markup"
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(
        &self,
        doc: &Document,
        _resolver: &dyn TagRefResolver,
    ) -> Result<String, FormatError> {
        Ok(plain_text(&doc.content))
    }
}

/// Flatten nodes to plain text.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    write_plain(nodes, &mut out);
    out
}

fn write_plain(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { text } | Node::TagRef { text } => out.push_str(text),
            Node::Br => out.push('\n'),
            Node::Paragraph { content } => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                write_plain(content, out);
            }
            _ => {
                if let Some(children) = node.children() {
                    write_plain(children, out);
                }
            }
        }
    }
}

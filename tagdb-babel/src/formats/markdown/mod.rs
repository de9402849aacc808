//! Markdown format implementation
//!
//! Data Model:
//!
//!     This is the text dialect of the database files: one cell of inline markdown per
//!     field. The mapping is the one the grammar crate parses:
//!
//!     | Markdown              | AST       | Notes                                   |
//!     | `**x**` / `*x*`       | strong / emphasis |                                 |
//!     | `[x](url "title")`    | link      |                                         |
//!     | `![x](url "title")`   | image     | `#` / `##` urls flag R18 / R18G images  |
//!     | `` `ns:raw` ``        | tagref    |                                         |
//!     | `<br>`                | br        | cells can't contain newlines            |
//!
//!     Paragraphs have no place in a single-line cell. They are written as their content
//!     separated by `<br>`, so a paragraph does not survive a round trip, its text does.
//!     Unrecognized elements are written as raw inline html and come back as text.
//!
//! Library
//!
//!     Parsing lives in [tagdb_parser::inline] and serialization goes through comrak's
//!     CommonMark formatter with the same options, so escaping is comrak's job.

mod serializer;

use crate::error::FormatError;
use crate::format::Format;
use tagdb_parser::inline::parse_inline;
use tagdb_parser::{Document, TagRefResolver};

pub use serializer::serialize_to_markdown;

pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Inline markdown as stored in namespace files"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_inline(source))
    }

    fn serialize(
        &self,
        doc: &Document,
        _resolver: &dyn TagRefResolver,
    ) -> Result<String, FormatError> {
        serialize_to_markdown(doc)
    }
}

//! HTML format implementation
//!
//!     HTML is how records are shown to readers. The mapping lives in [HtmlAdapter]:
//!
//!     | AST        | HTML                                      |
//!     | paragraph  | `<p>`                                     |
//!     | strong     | `<strong>` (`<b>` on import)              |
//!     | emphasis   | `<em>` (`<i>` on import)                  |
//!     | br         | `<br>`                                    |
//!     | link       | `<a href title>`                          |
//!     | image      | `<img src title alt nsfw>`                |
//!     | tagref     | `<abbr title ns>` when it resolves        |
//!     | element    | itself, attributes unchanged              |
//!
//!     Serialization and parsing are written against [TreeAdapter], not HTML, so another
//!     dialect only needs another adapter: `HtmlFormat::with_adapter(MyAdapter)`.
//!
//! Library
//!
//!     Both directions use html5ever. Serialization implements its `Serialize` trait
//!     over the AST (see [serializer]); parsing implements its `TreeSink` (see [sink]).

pub mod adapter;
pub mod serializer;
pub mod sink;

use crate::error::FormatError;
use crate::format::Format;
use tagdb_parser::{Document, TagRefResolver};

pub use adapter::{HtmlAdapter, TreeAdapter};
pub use serializer::{serialize_html, HtmlFragment};
pub use sink::{parse_html, AstSink};

/// Markup format over a tree adapter, HTML by default.
pub struct HtmlFormat<A = HtmlAdapter> {
    adapter: A,
}

impl HtmlFormat {
    pub fn new() -> Self {
        Self {
            adapter: HtmlAdapter,
        }
    }
}

impl Default for HtmlFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: TreeAdapter> HtmlFormat<A> {
    pub fn with_adapter(adapter: A) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }
}

impl<A: TreeAdapter + Send + Sync> Format for HtmlFormat<A> {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "HTML fragment for display"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<Document, FormatError> {
        Ok(parse_html(source, &self.adapter))
    }

    fn serialize(
        &self,
        doc: &Document,
        resolver: &dyn TagRefResolver,
    ) -> Result<String, FormatError> {
        serialize_html(doc, &self.adapter, resolver)
    }
}

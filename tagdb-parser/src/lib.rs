//! Grammar and AST for tagdb namespace files
//!
//!     A tagdb database is a directory of namespace files. Each file is a markdown table in
//!     which every row describes one raw tag: its translated name, a description and a list
//!     of external links. Every cell holds inline markdown, so the interesting part of the
//!     grammar is not the table but the inline content it carries.
//!
//!     This crate turns that text into structured data and nothing more. It knows about
//!     namespaces and raw tags because the grammar has to validate them, but it knows
//!     nothing about stores, files on disk or rendering. See the tagdb-babel crate for
//!     output formats and the root tagdb crate for the database itself.
//!
//! Layout
//!
//!     .
//!     ├── ast.rs              # Node taxonomy for inline content
//!     ├── ast
//!     │   ├── node.rs         # Node, NodeKind, Nsfw
//!     │   ├── document.rs     # Document (implicit root fragment)
//!     │   └── tagref.rs       # Tag reference text and its resolution
//!     ├── namespace.rs        # Namespace enum and RawTag keys
//!     ├── inline.rs           # Inline markdown -> AST (via comrak)
//!     ├── table.rs            # Namespace file -> rows
//!     ├── table
//!     │   └── lexer.rs        # Row lexer (logos)
//!     └── error.rs
//!
//! The Inline Grammar
//!
//!     Cells are CommonMark inlines. Emphasis, strong emphasis, links and images map to
//!     their AST counterparts directly. Two conventions are specific to tagdb:
//!
//!         - Code spans are tag references: `` `artist:john doe` `` becomes a tagref node.
//!         - Images whose url is `#` or `##` and whose title is an http(s) url are flagged
//!           images. See [Nsfw](ast::Nsfw) for the exact rule.
//!
//!     Hard breaks are written as `<br>` since a table cell can't span lines.

pub mod ast;
pub mod error;
pub mod inline;
pub mod namespace;
pub mod table;

pub use ast::{Document, Node, NodeKind, Nsfw, ResolvedTagRef, TagRefResolver, UnresolvedTags};
pub use error::{NamespaceError, ParseError, RawTagError};
pub use namespace::{Namespace, RawTag};
pub use table::{NamespaceFile, Row};

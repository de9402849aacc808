//! Format interoperability for tagdb record content
//!
//!     Record fields (name, description, links) are stored as inline markdown and shown as
//!     HTML. This crate converts between the tagdb AST ([tagdb_parser::Document]) and
//!     those representations.
//!
//! Architecture
//!
//!     - Format trait: Uniform interface for all formats (parsing and/or serialization)
//!     - FormatRegistry: Centralized discovery and selection of formats
//!     - Format implementations: Concrete implementations for each supported format
//!
//!     This is a pure lib: no filesystem, no environment, no printing. The database crate
//!     owns all of that and calls in here with strings.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── formats
//!     │   ├── ast                 # JSON dump of the AST
//!     │   ├── html
//!     │   │   ├── adapter.rs      # TreeAdapter and the HTML mapping
//!     │   │   ├── serializer.rs   # html5ever Serialize over the AST
//!     │   │   ├── sink.rs         # html5ever TreeSink building the AST
//!     │   │   └── mod.rs
//!     │   ├── markdown            # the text dialect of namespace files
//!     │   └── text                # plain text flattening
//!     ├── lib.rs
//!
//! Testing
//!     tests
//!     ├── formats.rs
//!     └── <format>
//!         └── <testname>.rs
//!
//! Implementation Principles
//!
//!     As in the rest of tagdb, the heavy lifting is done by specialized crates: comrak for
//!     markdown, html5ever for HTML. This crate only adapts their trees to ours and back.
//!     Tag references are the one thing no library knows about; formats that care about
//!     what a reference points to get a [tagdb_parser::TagRefResolver] at serialization
//!     time.
//!
//!     Round tripping is exact for markdown cells and HTML produced by this crate. Anything
//!     richer than the AST (lists, tables, headings in HTML) is flattened on import.

pub mod error;
pub mod format;
pub mod formats;
pub mod registry;

pub use error::FormatError;
pub use format::Format;
pub use registry::FormatRegistry;

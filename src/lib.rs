//! tagdb: a namespaced tag translation database
//!
//!     A database is a directory of namespace files (see tagdb_parser for their grammar).
//!     Every row is a [LabelRecord]: a raw tag, its translated name, a description, links,
//!     and optionally a master that turns it into an alias. This crate loads those files
//!     into memory, validates them, writes them back and renders them for consumers.
//!
//! Layout
//!
//!     .
//!     ├── database.rs     # Database: open, load/save fan-out, lookup, check, reports
//!     ├── store.rs        # NamespaceStore: one file, its records and prefix
//!     ├── record.rs       # LabelRecord and MasterRef
//!     ├── context.rs      # Diagnostics, Context and loggers
//!     ├── render.rs       # RenderType and JSON snapshots
//!     ├── provenance.rs   # Commit and remote info (git2)
//!     ├── suggest.rs      # Label suggestions with an LRU cache
//!     ├── logging.rs      # tracing subscriber setup
//!     └── error.rs
//!
//! Rendering
//!
//!     Content is stored as inline markdown and parsed into a [Document] once, on load.
//!     Output formats live in tagdb_babel; the database is the [TagRefResolver] they use
//!     to title tag references. See [RenderType] for what each render mode produces.
//!
//! Concurrency
//!
//!     Loading and saving run one tokio task per namespace. Either every namespace
//!     succeeds or the database is left as it was (see [Database::load]).
//!
//! [Document]: tagdb_parser::Document
//! [TagRefResolver]: tagdb_parser::TagRefResolver

pub mod context;
pub mod database;
pub mod error;
pub mod logging;
pub mod provenance;
pub mod record;
pub mod render;
pub mod store;
pub mod suggest;

pub use context::{Context, Diagnostic, Level, Logger, MemoryLogger, TracingLogger};
pub use database::{Database, DatabaseInfo, DatabaseSnapshot, SUPPORTED_VERSION};
pub use error::{DatabaseError, ProvenanceError, RecordError, StoreError, SuggestError};
pub use provenance::{GitProvenance, HeadCommit, ProvenanceProvider, RepoProvenance, Signature};
pub use record::{LabelRecord, MasterRef};
pub use render::{RecordSnapshot, RenderType, StoreInfo, StoreSnapshot};
pub use store::NamespaceStore;
pub use suggest::{Label, LabelGraph, LabelSearch, SearchResponse, SuggestCache, TagDescriptor};

pub use tagdb_parser::{Namespace, RawTag};

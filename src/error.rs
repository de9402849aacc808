//! Error types for the database layer
//!
//! Every error carries enough context to find the fault: the namespace, the file, and
//! where it makes sense the raw key and line.

use std::io;
use std::path::PathBuf;
use tagdb_babel::FormatError;
use tagdb_config::ConfigError;
use tagdb_parser::{Namespace, ParseError, RawTag};
use thiserror::Error;

/// A record that can't be accepted into a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("{namespace}:{raw}: master points at the record itself")]
    SelfReference { namespace: Namespace, raw: RawTag },

    #[error("{raw}: record belongs to {found}, not {expected}")]
    NamespaceMismatch {
        expected: Namespace,
        found: Namespace,
        raw: RawTag,
    },

    #[error("{namespace}:{raw}: defined twice")]
    Duplicate { namespace: Namespace, raw: RawTag },
}

/// Failure to load or save one namespace store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{namespace}: cannot access {path}: {source}")]
    Io {
        namespace: Namespace,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{namespace}: {path}: {source}")]
    Parse {
        namespace: Namespace,
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{namespace}: line {line}: {source}")]
    Invalid {
        namespace: Namespace,
        line: usize,
        #[source]
        source: RecordError,
    },

    #[error("{namespace}:{raw}: {source}")]
    Format {
        namespace: Namespace,
        raw: RawTag,
        #[source]
        source: FormatError,
    },
}

/// Failure to read repository provenance.
#[derive(Debug, Error)]
pub enum ProvenanceError {
    #[error("not a git repository: {path}")]
    NotARepo { path: PathBuf },

    #[error("repository has no commits")]
    NoHead,

    #[error("remote not found: {name}")]
    RemoteNotFound { name: String },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

/// Failure of a database level operation.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("version file {path} not found (database root {root})")]
    MissingVersion { path: PathBuf, root: PathBuf },

    #[error("version file {path} does not hold a version number: {value:?}")]
    InvalidVersion { path: PathBuf, value: String },

    #[error("database version {version} is not supported, expected {supported}.x")]
    UnsupportedVersion { version: f64, supported: u32 },

    #[error("namespace {namespace}: {path} not found (database root {root})")]
    MissingNamespace {
        namespace: Namespace,
        path: PathBuf,
        root: PathBuf,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("database is not in a version-controlled working copy")]
    NoProvenance,

    #[error(transparent)]
    Provenance(#[from] ProvenanceError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("namespace task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Boxed error returned by a label search backend.
pub type SearchFailure = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a suggestion lookup.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("label search for {query:?} failed: {source}")]
    Search {
        query: String,
        #[source]
        source: SearchFailure,
    },
}

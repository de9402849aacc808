//! Error types for the tagdb grammar

use thiserror::Error;

/// A string that can't be used as a raw tag key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawTagError {
    #[error("raw tag is empty")]
    Empty,
    #[error("raw tag {raw:?} contains invalid character {found:?}")]
    InvalidCharacter { raw: String, found: char },
}

/// A string that doesn't name a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown namespace: {0}")]
pub struct NamespaceError(pub String);

/// Error produced while parsing a namespace file.
///
/// Lines are 1-based, matching what an editor shows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

//! Error types for format conversion

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format not found: {0}")]
    FormatNotFound(String),
    #[error("not supported: {0}")]
    NotSupported(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("serialization error: {0}")]
    SerializationError(String),
}

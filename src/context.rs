//! Validation context and loggers
//!
//!     A [Context] says where a diagnostic comes from: the namespace, optionally the line
//!     of the namespace file and the raw key being looked at. Messages are rendered as
//!
//!         <namespace>:[L<line>:]<raw>: <message>
//!
//!     for example `artist:L12:john doe: alias has a name of its own`, and handed to a
//!     [Logger]. The default logger forwards to `tracing`; [MemoryLogger] keeps entries
//!     for callers (and tests) that want to inspect them.

use crate::record::LabelRecord;
use crate::store::NamespaceStore;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tagdb_parser::Namespace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        })
    }
}

/// A rendered diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub namespace: Namespace,
    pub line: Option<usize>,
    pub raw: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.namespace)?;
        if let Some(line) = self.line {
            write!(f, "L{}:", line)?;
        }
        write!(
            f,
            "{}: {}",
            self.raw.as_deref().unwrap_or_default(),
            self.message
        )
    }
}

pub trait Logger: Send + Sync {
    fn log(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to `tracing` at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, diagnostic: &Diagnostic) {
        match diagnostic.level {
            Level::Info => tracing::info!("{}", diagnostic),
            Level::Warn => tracing::warn!("{}", diagnostic),
            Level::Error => tracing::error!("{}", diagnostic),
        }
    }
}

/// Collects diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rendered messages, in logging order.
    pub fn messages(&self) -> Vec<String> {
        self.entries().iter().map(ToString::to_string).collect()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, diagnostic: &Diagnostic) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}

#[derive(Clone)]
pub struct Context {
    namespace: Namespace,
    line: Option<usize>,
    raw: Option<String>,
    logger: Arc<dyn Logger>,
}

impl Context {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            line: None,
            raw: None,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Context of a store, logging through the store's logger.
    pub fn for_store(store: &NamespaceStore) -> Self {
        Self::new(store.namespace()).with_logger(store.logger())
    }

    pub fn for_record(record: &LabelRecord) -> Self {
        Self::new(record.namespace).with_raw(record.raw.as_str())
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn info(&self, message: impl Into<String>) -> Diagnostic {
        self.log(Level::Info, message.into())
    }

    pub fn warn(&self, message: impl Into<String>) -> Diagnostic {
        self.log(Level::Warn, message.into())
    }

    pub fn error(&self, message: impl Into<String>) -> Diagnostic {
        self.log(Level::Error, message.into())
    }

    fn log(&self, level: Level, message: String) -> Diagnostic {
        let diagnostic = Diagnostic {
            level,
            namespace: self.namespace,
            line: self.line,
            raw: self.raw.clone(),
            message,
        };
        self.logger.log(&diagnostic);
        diagnostic
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("namespace", &self.namespace)
            .field("line", &self.line)
            .field("raw", &self.raw)
            .finish_non_exhaustive()
    }
}

//! Label records
//!
//!     One record is one row of a namespace file. A record with a master is a pure alias:
//!     whatever it says itself, readers are sent to the master's translation.

use crate::context::{Context, Diagnostic};
use crate::error::RecordError;
use serde::Serialize;
use std::fmt;
use tagdb_babel::formats::markdown::serialize_to_markdown;
use tagdb_babel::FormatError;
use tagdb_parser::{Document, Namespace, RawTag, Row};

/// Reference from an alias to its master.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MasterRef {
    pub namespace: Namespace,
    pub raw: RawTag,
}

impl MasterRef {
    pub fn new(namespace: Namespace, raw: RawTag) -> Self {
        Self { namespace, raw }
    }
}

impl fmt::Display for MasterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelRecord {
    pub namespace: Namespace,
    pub raw: RawTag,
    pub name: Document,
    pub intro: Document,
    pub links: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<MasterRef>,
}

impl LabelRecord {
    /// An empty record.
    pub fn new(namespace: Namespace, raw: RawTag) -> Self {
        Self {
            namespace,
            raw,
            name: Document::default(),
            intro: Document::default(),
            links: Document::default(),
            master: None,
        }
    }

    /// An alias of `master`.
    pub fn alias(namespace: Namespace, raw: RawTag, master: MasterRef) -> Self {
        Self {
            master: Some(master),
            ..Self::new(namespace, raw)
        }
    }

    pub fn with_name(mut self, name: Document) -> Self {
        self.name = name;
        self
    }

    pub fn with_intro(mut self, intro: Document) -> Self {
        self.intro = intro;
        self
    }

    pub fn with_links(mut self, links: Document) -> Self {
        self.links = links;
        self
    }

    pub fn is_alias(&self) -> bool {
        self.master.is_some()
    }

    pub fn from_row(namespace: Namespace, row: Row) -> Self {
        Self {
            namespace,
            raw: row.raw,
            name: row.name,
            intro: row.intro,
            links: row.links,
            master: row.master.map(|(ns, raw)| MasterRef::new(ns, raw)),
        }
    }

    /// Cells of the namespace file row, unescaped.
    pub fn to_cells(&self) -> Result<[String; 5], FormatError> {
        Ok([
            self.raw.to_string(),
            serialize_to_markdown(&self.name)?,
            serialize_to_markdown(&self.intro)?,
            serialize_to_markdown(&self.links)?,
            self.master
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ])
    }

    /// Check the record on its own.
    ///
    /// Problems that make the record unusable are logged as errors and returned as
    /// `Err`; the rest are logged as warnings and returned.
    pub fn validate(&self, ctx: &Context) -> Result<Vec<Diagnostic>, RecordError> {
        let mut warnings = Vec::new();
        match &self.master {
            Some(master) if master.namespace == self.namespace && master.raw == self.raw => {
                ctx.error("master points at the record itself");
                return Err(RecordError::SelfReference {
                    namespace: self.namespace,
                    raw: self.raw.clone(),
                });
            }
            Some(master) => {
                if !self.name.is_empty() {
                    warnings.push(ctx.warn(format!(
                        "alias has a name of its own, {} is shown instead",
                        master
                    )));
                }
            }
            None => {
                if self.name.is_empty() {
                    warnings.push(ctx.warn("record has no name"));
                }
            }
        }
        Ok(warnings)
    }
}

//! Rendered snapshots
//!
//!     Rendering turns records into serde values for display or export without touching
//!     the stores. Every document field is rendered the same way, chosen by [RenderType]:
//!
//!     | Type | Field value                                   |
//!     |------|-----------------------------------------------|
//!     | raw  | the markdown cell, as stored                  |
//!     | text | plain text                                    |
//!     | html | HTML fragment, tag references resolved        |
//!     | ast  | the AST as JSON                               |
//!     | full | an object with all four                       |
//!
//!     Maps are ordered, so a snapshot of the same data always serializes the same way.

use crate::record::LabelRecord;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tagdb_babel::{FormatError, FormatRegistry};
use tagdb_parser::{Document, Namespace, TagRefResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderType {
    Raw,
    Text,
    Html,
    Ast,
    Full,
}

impl RenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderType::Raw => "raw",
            RenderType::Text => "text",
            RenderType::Html => "html",
            RenderType::Ast => "ast",
            RenderType::Full => "full",
        }
    }

    /// Render one document field.
    pub fn render(
        &self,
        doc: &Document,
        registry: &FormatRegistry,
        resolver: &dyn TagRefResolver,
    ) -> Result<Value, FormatError> {
        let string = |format: &str| -> Result<Value, FormatError> {
            registry.serialize(doc, format, resolver).map(Value::String)
        };
        match self {
            RenderType::Raw => string("markdown"),
            RenderType::Text => string("text"),
            RenderType::Html => string("html"),
            RenderType::Ast => serde_json::to_value(doc)
                .map_err(|e| FormatError::SerializationError(e.to_string())),
            RenderType::Full => Ok(json!({
                "raw": RenderType::Raw.render(doc, registry, resolver)?,
                "text": RenderType::Text.render(doc, registry, resolver)?,
                "html": RenderType::Html.render(doc, registry, resolver)?,
                "ast": RenderType::Ast.render(doc, registry, resolver)?,
            })),
        }
    }
}

impl fmt::Display for RenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderType {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(RenderType::Raw),
            "text" => Ok(RenderType::Text),
            "html" => Ok(RenderType::Html),
            "ast" => Ok(RenderType::Ast),
            "full" => Ok(RenderType::Full),
            other => Err(FormatError::FormatNotFound(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSnapshot {
    pub name: Value,
    pub intro: Value,
    pub links: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<String>,
}

impl RecordSnapshot {
    pub fn render(
        record: &LabelRecord,
        render_type: RenderType,
        registry: &FormatRegistry,
        resolver: &dyn TagRefResolver,
    ) -> Result<Self, FormatError> {
        Ok(Self {
            name: render_type.render(&record.name, registry, resolver)?,
            intro: render_type.render(&record.intro, registry, resolver)?,
            links: render_type.render(&record.links, registry, resolver)?,
            master: record.master.as_ref().map(ToString::to_string),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub namespace: Namespace,
    pub count: usize,
    pub prefix: String,
    pub data: BTreeMap<String, RecordSnapshot>,
}

/// Counts of one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreInfo {
    pub namespace: Namespace,
    pub count: usize,
    pub masters: usize,
    pub aliases: usize,
}

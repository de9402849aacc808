//! Namespace stores
//!
//!     A store owns the records of one namespace and the file they live in. Loading is
//!     all or nothing: the file is read, parsed and validated completely before any of it
//!     replaces what the store holds, so a broken file leaves the previous records in
//!     place. Saving writes the prefix back verbatim, then the table sorted by raw key.
//!
//!     Stores do no locking. `load` and `save` take `&mut self` and `&self`, so the
//!     borrow checker already keeps a store from being loaded while it is being saved.

use crate::context::{Context, Logger, TracingLogger};
use crate::error::{RecordError, StoreError};
use crate::record::LabelRecord;
use crate::render::{RecordSnapshot, RenderType, StoreInfo, StoreSnapshot};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tagdb_babel::FormatRegistry;
use tagdb_parser::table::write_table;
use tagdb_parser::{Namespace, NamespaceFile, RawTag, TagRefResolver};
use tracing::debug;

/// Parsed and validated contents of a namespace file, not yet applied to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFile {
    pub prefix: String,
    pub records: BTreeMap<RawTag, LabelRecord>,
}

pub struct NamespaceStore {
    namespace: Namespace,
    path: PathBuf,
    prefix: String,
    records: BTreeMap<RawTag, LabelRecord>,
    logger: Arc<dyn Logger>,
}

impl NamespaceStore {
    pub fn new(namespace: Namespace, path: impl Into<PathBuf>) -> Self {
        Self {
            namespace,
            path: path.into(),
            prefix: String::new(),
            records: BTreeMap::new(),
            logger: Arc::new(TracingLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger = logger;
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Free-form text preceding the table.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }

    /// Replace the records with the contents of the file.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        let loaded = Self::read(self.namespace, self.path.clone(), self.logger.clone()).await?;
        self.apply(loaded);
        Ok(())
    }

    /// Write the records back to the file.
    pub async fn save(&self) -> Result<(), StoreError> {
        let source = self.to_source()?;
        Self::write(self.namespace, self.path.clone(), source).await
    }

    pub(crate) async fn read(
        namespace: Namespace,
        path: PathBuf,
        logger: Arc<dyn Logger>,
    ) -> Result<LoadedFile, StoreError> {
        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| StoreError::Io {
                namespace,
                path: path.clone(),
                source,
            })?;
        Self::parse(namespace, &path, &source, logger)
    }

    pub(crate) async fn write(
        namespace: Namespace,
        path: PathBuf,
        source: String,
    ) -> Result<(), StoreError> {
        tokio::fs::write(&path, source)
            .await
            .map_err(|source| StoreError::Io {
                namespace,
                path: path.clone(),
                source,
            })?;
        debug!(%namespace, path = %path.display(), "saved namespace");
        Ok(())
    }

    /// Parse and validate the text of a namespace file.
    pub fn parse(
        namespace: Namespace,
        path: &Path,
        source: &str,
        logger: Arc<dyn Logger>,
    ) -> Result<LoadedFile, StoreError> {
        let file = NamespaceFile::parse(source).map_err(|source| StoreError::Parse {
            namespace,
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = BTreeMap::new();
        for row in file.rows {
            let line = row.line;
            let record = LabelRecord::from_row(namespace, row);
            let ctx = Context::new(namespace)
                .with_logger(logger.clone())
                .at_line(line)
                .with_raw(record.raw.as_str());

            record
                .validate(&ctx)
                .map_err(|source| StoreError::Invalid {
                    namespace,
                    line,
                    source,
                })?;
            if records.contains_key(&record.raw) {
                ctx.error("defined twice");
                return Err(StoreError::Invalid {
                    namespace,
                    line,
                    source: RecordError::Duplicate {
                        namespace,
                        raw: record.raw,
                    },
                });
            }
            records.insert(record.raw.clone(), record);
        }

        debug!(%namespace, records = records.len(), "parsed namespace");
        Ok(LoadedFile {
            prefix: file.prefix,
            records,
        })
    }

    pub(crate) fn apply(&mut self, loaded: LoadedFile) {
        self.prefix = loaded.prefix;
        self.records = loaded.records;
    }

    /// The file contents `save` would write.
    pub fn to_source(&self) -> Result<String, StoreError> {
        let rows = self
            .records
            .values()
            .map(|record| {
                record.to_cells().map_err(|source| StoreError::Format {
                    namespace: self.namespace,
                    raw: record.raw.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(write_table(&self.prefix, rows))
    }

    pub fn get(&self, raw: &RawTag) -> Option<&LabelRecord> {
        self.records.get(raw)
    }

    /// Validate `record` and replace whatever is stored under its raw key.
    ///
    /// Returns the replaced record.
    pub fn insert(
        &mut self,
        record: LabelRecord,
        ctx: &Context,
    ) -> Result<Option<LabelRecord>, RecordError> {
        if record.namespace != self.namespace {
            ctx.error(format!("record belongs to {}", record.namespace));
            return Err(RecordError::NamespaceMismatch {
                expected: self.namespace,
                found: record.namespace,
                raw: record.raw,
            });
        }
        record.validate(ctx)?;
        Ok(self.records.insert(record.raw.clone(), record))
    }

    pub fn remove(&mut self, raw: &RawTag) -> Option<LabelRecord> {
        self.records.remove(raw)
    }

    /// Records in raw key order.
    pub fn iter(&self) -> impl Iterator<Item = &LabelRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn info(&self) -> StoreInfo {
        let aliases = self.iter().filter(|r| r.is_alias()).count();
        StoreInfo {
            namespace: self.namespace,
            count: self.len(),
            masters: self.len() - aliases,
            aliases,
        }
    }

    pub fn render(
        &self,
        render_type: RenderType,
        registry: &FormatRegistry,
        resolver: &dyn TagRefResolver,
    ) -> Result<StoreSnapshot, StoreError> {
        let mut data = BTreeMap::new();
        for record in self.iter() {
            let snapshot = RecordSnapshot::render(record, render_type, registry, resolver)
                .map_err(|source| StoreError::Format {
                    namespace: self.namespace,
                    raw: record.raw.clone(),
                    source,
                })?;
            data.insert(record.raw.to_string(), snapshot);
        }
        Ok(StoreSnapshot {
            namespace: self.namespace,
            count: self.len(),
            prefix: self.prefix.clone(),
            data,
        })
    }
}

impl fmt::Debug for NamespaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceStore")
            .field("namespace", &self.namespace)
            .field("path", &self.path)
            .field("records", &self.records.len())
            .finish_non_exhaustive()
    }
}

//! The database
//!
//!     A database is a directory:
//!
//!         <root>/version              format version, a single number
//!         <root>/database/<ns>.md     one namespace file per namespace
//!
//!     (both names come from [DatabaseConfig]). Opening checks the version and that every
//!     namespace file exists, then loads all namespaces concurrently. There is no half
//!     open database: any failure aborts [Database::create].
//!
//!     [Database::load] and [Database::save] fan out one tokio task per namespace and
//!     succeed only when every namespace does. A load applies nothing unless all files
//!     parsed; a save bumps the revision only when all files were written.

use crate::context::{Context, Diagnostic, Logger};
use crate::error::{DatabaseError, StoreError};
use crate::provenance::{normalize_remote_url, HeadCommit, ProvenanceProvider, RepoProvenance};
use crate::record::LabelRecord;
use crate::render::{RenderType, StoreInfo, StoreSnapshot};
use crate::store::{LoadedFile, NamespaceStore};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tagdb_babel::FormatRegistry;
use tagdb_config::DatabaseConfig;
use tagdb_parser::namespace::split_qualified;
use tagdb_parser::{Namespace, RawTag, ResolvedTagRef, TagRefResolver};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Major database format version this crate reads and writes. Any version in
/// `[SUPPORTED_VERSION, SUPPORTED_VERSION + 1)` is accepted.
pub const SUPPORTED_VERSION: u32 = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseInfo {
    pub version: f64,
    pub revision: u64,
    pub namespaces: Vec<StoreInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<RepoProvenance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseSnapshot {
    pub version: f64,
    pub revision: u64,
    pub head: HeadCommit,
    pub repo: String,
    pub data: BTreeMap<Namespace, StoreSnapshot>,
}

pub struct Database {
    root: PathBuf,
    version: f64,
    revision: u64,
    stores: BTreeMap<Namespace, NamespaceStore>,
    provider: Option<Box<dyn ProvenanceProvider>>,
    registry: FormatRegistry,
}

impl Database {
    /// Open the database at `root` with the default layout.
    pub async fn create(
        root: impl AsRef<Path>,
        provider: Option<Box<dyn ProvenanceProvider>>,
    ) -> Result<Self, DatabaseError> {
        let config = tagdb_config::load_defaults()?;
        Self::create_with(root, &config.database, provider).await
    }

    pub async fn create_with(
        root: impl AsRef<Path>,
        options: &DatabaseConfig,
        provider: Option<Box<dyn ProvenanceProvider>>,
    ) -> Result<Self, DatabaseError> {
        let root = root.as_ref().to_path_buf();
        let version = read_version(&root, &root.join(&options.version_file)).await?;

        let data_dir = root.join(&options.data_dir);
        let mut stores = BTreeMap::new();
        for namespace in Namespace::ALL {
            let path = data_dir.join(namespace.file_name());
            if let Err(source) = tokio::fs::metadata(&path).await {
                return Err(if source.kind() == io::ErrorKind::NotFound {
                    DatabaseError::MissingNamespace {
                        namespace,
                        path,
                        root,
                    }
                } else {
                    DatabaseError::Io { path, source }
                });
            }
            stores.insert(namespace, NamespaceStore::new(namespace, path));
        }

        let mut database = Self {
            root,
            version,
            revision: 1,
            stores,
            provider,
            registry: FormatRegistry::with_defaults(),
        };
        database.load().await?;

        info!(
            root = %database.root.display(),
            version,
            records = database.stores.values().map(NamespaceStore::len).sum::<usize>(),
            "database opened"
        );
        Ok(database)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    /// Starts at 1 and grows by one with every successful save.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    /// Route every store's diagnostics to `logger`.
    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        for store in self.stores.values_mut() {
            store.set_logger(logger.clone());
        }
    }

    /// Reload every namespace from disk.
    pub async fn load(&mut self) -> Result<(), DatabaseError> {
        let mut tasks = JoinSet::new();
        for store in self.stores.values() {
            let namespace = store.namespace();
            let path = store.path().to_path_buf();
            let logger = store.logger();
            tasks.spawn(async move {
                (
                    namespace,
                    NamespaceStore::read(namespace, path, logger).await,
                )
            });
        }

        let mut loaded: Vec<(Namespace, LoadedFile)> = Vec::new();
        let mut errors: BTreeMap<Namespace, StoreError> = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined? {
                (namespace, Ok(file)) => loaded.push((namespace, file)),
                (namespace, Err(e)) => {
                    errors.insert(namespace, e);
                }
            }
        }
        if let Some((_, e)) = errors.into_iter().next() {
            return Err(e.into());
        }

        for (namespace, file) in loaded {
            if let Some(store) = self.stores.get_mut(&namespace) {
                store.apply(file);
            }
        }
        debug!(namespaces = self.stores.len(), "database loaded");
        Ok(())
    }

    /// Write every namespace back to disk.
    pub async fn save(&mut self) -> Result<(), DatabaseError> {
        let mut sources = Vec::with_capacity(self.stores.len());
        for store in self.stores.values() {
            sources.push((store.namespace(), store.path().to_path_buf(), store.to_source()?));
        }

        let mut tasks = JoinSet::new();
        for (namespace, path, source) in sources {
            tasks.spawn(async move { (namespace, NamespaceStore::write(namespace, path, source).await) });
        }

        let mut errors: BTreeMap<Namespace, StoreError> = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            if let (namespace, Err(e)) = joined? {
                errors.insert(namespace, e);
            }
        }
        if let Some((_, e)) = errors.into_iter().next() {
            return Err(e.into());
        }

        self.revision += 1;
        info!(revision = self.revision, "database saved");
        Ok(())
    }

    /// Look `raw` up in every namespace, in probe order, and return the first match.
    pub fn get(&self, raw: &str) -> Option<&LabelRecord> {
        let raw = RawTag::parse(raw).ok()?;
        self.probe(&raw)
    }

    pub fn get_in(&self, namespace: Namespace, raw: &str) -> Option<&LabelRecord> {
        let raw = RawTag::parse(raw).ok()?;
        self.store(namespace)?.get(&raw)
    }

    fn probe(&self, raw: &RawTag) -> Option<&LabelRecord> {
        Namespace::ALL
            .iter()
            .find_map(|namespace| self.store(*namespace)?.get(raw))
    }

    /// The store of a persisted namespace.
    pub fn store(&self, namespace: Namespace) -> Option<&NamespaceStore> {
        self.stores.get(&namespace)
    }

    pub fn store_mut(&mut self, namespace: Namespace) -> Option<&mut NamespaceStore> {
        self.stores.get_mut(&namespace)
    }

    pub fn stores(&self) -> impl Iterator<Item = &NamespaceStore> {
        self.stores.values()
    }

    /// Check references between records.
    ///
    /// A master must exist and must not be an alias itself; it may live in another
    /// namespace. Problems are logged through each store's logger and returned.
    pub fn check(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for store in self.stores.values() {
            for record in store.iter() {
                let Some(master) = &record.master else {
                    continue;
                };
                let ctx = Context::for_record(record).with_logger(store.logger());
                match self.store(master.namespace).and_then(|s| s.get(&master.raw)) {
                    None => {
                        diagnostics.push(ctx.error(format!("master {} does not exist", master)))
                    }
                    Some(target) => {
                        if let Some(next) = &target.master {
                            diagnostics.push(ctx.error(format!(
                                "master {} is itself an alias of {}",
                                master, next
                            )));
                        }
                    }
                }
            }
        }
        diagnostics
    }

    fn provider(&self) -> Result<&dyn ProvenanceProvider, DatabaseError> {
        self.provider.as_deref().ok_or(DatabaseError::NoProvenance)
    }

    pub fn head(&self) -> Result<HeadCommit, DatabaseError> {
        Ok(self.provider()?.head()?)
    }

    /// Upstream repository url, normalized for display.
    pub fn remote(&self) -> Result<String, DatabaseError> {
        Ok(normalize_remote_url(&self.provider()?.repo()?))
    }

    pub fn provenance(&self) -> Result<RepoProvenance, DatabaseError> {
        Ok(RepoProvenance {
            head: self.head()?,
            remote_url: self.remote()?,
        })
    }

    pub fn info(&self) -> Result<DatabaseInfo, DatabaseError> {
        let provenance = match self.provider {
            Some(_) => Some(self.provenance()?),
            None => None,
        };
        Ok(DatabaseInfo {
            version: self.version,
            revision: self.revision,
            namespaces: self.stores.values().map(NamespaceStore::info).collect(),
            provenance,
        })
    }

    /// Snapshot of the whole database. Needs provenance.
    pub fn render(&self, render_type: RenderType) -> Result<DatabaseSnapshot, DatabaseError> {
        let provenance = self.provenance()?;
        let mut data = BTreeMap::new();
        for store in self.stores.values() {
            data.insert(
                store.namespace(),
                store.render(render_type, &self.registry, self)?,
            );
        }
        Ok(DatabaseSnapshot {
            version: self.version,
            revision: self.revision,
            head: provenance.head,
            repo: provenance.remote_url,
            data,
        })
    }
}

impl TagRefResolver for Database {
    /// A typed namespace is tried first; without one, or when it has no such record,
    /// the namespaces are probed in order.
    fn resolve(&self, text: &str) -> ResolvedTagRef {
        let (namespace, raw) = split_qualified(text);
        let record = RawTag::parse(raw).ok().and_then(|raw| {
            namespace
                .and_then(|ns| self.store(ns)?.get(&raw))
                .or_else(|| self.probe(&raw))
        });
        ResolvedTagRef {
            tag: record.map(|r| (r.namespace, r.raw.clone())),
            namespace,
            explicit_namespace: namespace.is_some(),
        }
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("root", &self.root)
            .field("version", &self.version)
            .field("revision", &self.revision)
            .field("stores", &self.stores.len())
            .field("provenance", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}

async fn read_version(root: &Path, path: &Path) -> Result<f64, DatabaseError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DatabaseError::MissingVersion {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(DatabaseError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    parse_version(path, &text)
}

fn parse_version(path: &Path, text: &str) -> Result<f64, DatabaseError> {
    let value = text.trim();
    let version = value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DatabaseError::InvalidVersion {
            path: path.to_path_buf(),
            value: value.to_string(),
        })?;
    let supported = f64::from(SUPPORTED_VERSION);
    if !(supported..supported + 1.0).contains(&version) {
        return Err(DatabaseError::UnsupportedVersion {
            version,
            supported: SUPPORTED_VERSION,
        });
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn version_of(contents: &str) -> Result<f64, DatabaseError> {
        parse_version(Path::new("db/version"), contents)
    }

    #[rstest(
        contents,
        expected,
        case("6", 6.0),
        case("6\n", 6.0),
        case("  6 \n", 6.0),
        case("6.1", 6.1),
        case("6.99", 6.99)
    )]
    fn test_supported_version(contents: &str, expected: f64) {
        assert_eq!(version_of(contents).unwrap(), expected);
    }

    #[rstest(
        contents,
        case("5"),
        case("5.99"),
        case("7"),
        case("7.0"),
        case("0"),
        case("-6")
    )]
    fn test_unsupported_version(contents: &str) {
        assert!(matches!(
            version_of(contents),
            Err(DatabaseError::UnsupportedVersion { supported: 6, .. })
        ));
    }

    #[rstest(contents, case(""), case("six"), case("NaN"), case("inf"), case("6.1.2"))]
    fn test_invalid_version(contents: &str) {
        assert!(matches!(
            version_of(contents),
            Err(DatabaseError::InvalidVersion { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_version() {
        let dir = TempDir::new().unwrap();
        let err = read_version(dir.path(), &dir.path().join("version"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::MissingVersion { .. }));
    }
}

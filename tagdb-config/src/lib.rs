//! Shared configuration loader for tagdb.
//!
//! `defaults/tagdb.default.toml` is embedded into the crate so that docs and runtime
//! behavior stay in sync. Applications layer user-specific files on top of those
//! defaults via [`Loader`] before deserializing into [`TagdbConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/tagdb.default.toml");

/// Top-level configuration consumed by tagdb.
#[derive(Debug, Clone, Deserialize)]
pub struct TagdbConfig {
    pub database: DatabaseConfig,
    pub suggest: SuggestConfig,
    pub logging: LoggingConfig,
}

/// On-disk layout of a database checkout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    pub data_dir: String,
    pub version_file: String,
    pub remote_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SuggestConfig {
    pub capacity: NonZeroUsize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
    pub with_target: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TagdbConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<TagdbConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.database.data_dir, "database");
        assert_eq!(config.database.version_file, "version");
        assert_eq!(config.database.remote_name, "origin");
        assert_eq!(config.suggest.capacity.get(), 512);
        assert_eq!(config.logging.filter, "info");
        assert!(!config.logging.with_target);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("database.remote_name", "upstream")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.database.remote_name, "upstream");
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[suggest]\ncapacity = 8").unwrap();

        let config = Loader::new().with_file(file.path()).build().unwrap();
        assert_eq!(config.suggest.capacity.get(), 8);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/tagdb.toml")
            .build()
            .unwrap();
        assert_eq!(config.suggest.capacity.get(), 512);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let result = Loader::new()
            .set_override("suggest.capacity", 0i64)
            .unwrap()
            .build();
        assert!(result.is_err());
    }
}

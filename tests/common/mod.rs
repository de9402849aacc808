//! Database directories for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tagdb::provenance::{HeadCommit, ProvenanceProvider, Signature};
use tagdb::{Namespace, ProvenanceError};
use tempfile::TempDir;

pub const ARTISTS: &str = "\
# Artists

| Raw | Name | Description | Links | Master |
| --- | ---- | ----------- | ----- | ------ |
| bar | Bar | A **prolific** artist | [Pixiv](https://pixiv.net/u/1) |  |
| foo |  |  |  | artist:bar |
";

/// A complete version 6 database in a temporary directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("version"), "6\n").unwrap();
        fs::create_dir(dir.path().join("database")).unwrap();
        let fixture = Self { dir };
        for namespace in Namespace::ALL {
            let contents = match namespace {
                Namespace::Artist => ARTISTS.to_string(),
                other => format!("# {}\n", other),
            };
            fixture.write(namespace, &contents);
        }
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, namespace: Namespace) -> PathBuf {
        self.root().join("database").join(namespace.file_name())
    }

    pub fn write(&self, namespace: Namespace, contents: &str) {
        fs::write(self.path(namespace), contents).unwrap();
    }

    pub fn read(&self, namespace: Namespace) -> String {
        fs::read_to_string(self.path(namespace)).unwrap()
    }
}

/// Provenance with fixed answers.
pub struct FixedProvenance;

pub fn fixed_head() -> HeadCommit {
    let signature = Signature {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        when: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
    };
    HeadCommit {
        sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
        message: "Initial import\n".to_string(),
        author: signature.clone(),
        committer: signature,
    }
}

impl ProvenanceProvider for FixedProvenance {
    fn head(&self) -> Result<HeadCommit, ProvenanceError> {
        Ok(fixed_head())
    }

    fn repo(&self) -> Result<String, ProvenanceError> {
        Ok("git@github.com:owner/db.git".to_string())
    }
}

//! Repository provenance
//!
//!     A database usually lives in a git checkout, and reports (`info`, `render`) say
//!     which commit they were made from. The database never looks at git itself: it asks
//!     an injected [ProvenanceProvider]. [GitProvenance] is the git2 implementation.
//!
//!     Remote urls are normalized before anyone sees them: scp-style ssh remotes
//!     (`git@host:path`) become `https://host/path`, and credentials embedded in http(s)
//!     urls are dropped.

use crate::error::ProvenanceError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tagdb_config::DatabaseConfig;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadCommit {
    pub sha: String,
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoProvenance {
    pub head: HeadCommit,
    pub remote_url: String,
}

/// Source of commit and remote information for a database checkout.
pub trait ProvenanceProvider: Send + Sync {
    fn head(&self) -> Result<HeadCommit, ProvenanceError>;

    /// Url of the upstream repository, as configured.
    fn repo(&self) -> Result<String, ProvenanceError>;
}

/// Provenance read from the git repository containing a path.
#[derive(Debug, Clone)]
pub struct GitProvenance {
    path: PathBuf,
    remote_name: String,
}

impl GitProvenance {
    /// Find the repository containing `path`.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, ProvenanceError> {
        let path = path.as_ref().to_path_buf();
        let provenance = Self {
            path,
            remote_name: "origin".to_string(),
        };
        provenance.open()?;
        Ok(provenance)
    }

    /// Find the repository containing `path`, reading the remote configured in `config`.
    pub fn discover_with(
        path: impl AsRef<Path>,
        config: &DatabaseConfig,
    ) -> Result<Self, ProvenanceError> {
        Ok(Self::discover(path)?.with_remote(config.remote_name.clone()))
    }

    pub fn with_remote(mut self, name: impl Into<String>) -> Self {
        self.remote_name = name.into();
        self
    }

    pub fn remote_name(&self) -> &str {
        &self.remote_name
    }

    // git2 repositories aren't Sync, so one is opened per call
    fn open(&self) -> Result<git2::Repository, ProvenanceError> {
        git2::Repository::discover(&self.path).map_err(|_| ProvenanceError::NotARepo {
            path: self.path.clone(),
        })
    }
}

fn signature(sig: &git2::Signature<'_>) -> Signature {
    Signature {
        name: sig.name().unwrap_or("").to_string(),
        email: sig.email().unwrap_or("").to_string(),
        when: DateTime::from_timestamp(sig.when().seconds(), 0).unwrap_or(DateTime::UNIX_EPOCH),
    }
}

impl ProvenanceProvider for GitProvenance {
    fn head(&self) -> Result<HeadCommit, ProvenanceError> {
        let repo = self.open()?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Err(ProvenanceError::NoHead)
            }
            Err(e) => return Err(e.into()),
        };
        let commit = head.peel_to_commit()?;
        let author = signature(&commit.author());
        let committer = signature(&commit.committer());

        Ok(HeadCommit {
            sha: commit.id().to_string(),
            message: commit.message().unwrap_or("").to_string(),
            author,
            committer,
        })
    }

    fn repo(&self) -> Result<String, ProvenanceError> {
        let repo = self.open()?;
        let not_found = || ProvenanceError::RemoteNotFound {
            name: self.remote_name.clone(),
        };
        let remote = match repo.find_remote(&self.remote_name) {
            Ok(remote) => remote,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };
        remote.url().map(String::from).ok_or_else(not_found)
    }
}

/// Normalize a remote url for display.
pub fn normalize_remote_url(remote: &str) -> String {
    let remote = remote.trim();

    if !remote.contains("://") {
        if let Some((user_host, path)) = remote.split_once(':') {
            if let Some((_, host)) = user_host.split_once('@') {
                return format!("https://{}/{}", host, path.trim_start_matches('/'));
            }
        }
        return remote.to_string();
    }

    match Url::parse(remote) {
        Ok(mut url) if matches!(url.scheme(), "http" | "https") => {
            // Both setters only fail for urls that can't have credentials
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        _ => remote.to_string(),
    }
}

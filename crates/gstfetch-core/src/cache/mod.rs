//! Cache of verified packages keyed by (kind, version).
//!
//! The coordinator only depends on `CacheStore`; the storage behind it is
//! swappable. `DirCache` keeps entries in a local directory, `NoCache`
//! disables caching.

mod dir;
mod none;

pub use dir::DirCache;
pub use none::NoCache;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;
use crate::package::{LocalArtifact, PackageSpec};

/// A persisted, previously verified package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub spec: PackageSpec,
    pub path: PathBuf,
    pub size: u64,
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Candidate for `spec`, or `None` on a miss. Never fails: a lookup that
    /// cannot be completed is reported as a miss.
    async fn lookup(&self, spec: &PackageSpec) -> Option<LocalArtifact>;

    /// Store a verified artifact under its spec. Either the whole entry becomes
    /// visible or the call fails with nothing visible; concurrent writers for
    /// the same key resolve last-writer-wins.
    async fn persist(&self, artifact: &LocalArtifact) -> Result<CacheEntry>;

    /// Drop the entry for `spec`. A missing entry is not an error.
    async fn evict(&self, spec: &PackageSpec) -> Result<()>;
}

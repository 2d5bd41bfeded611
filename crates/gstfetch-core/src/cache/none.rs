//! Cache backend that never stores anything.

use async_trait::async_trait;

use super::{CacheEntry, CacheStore};
use crate::error::{Error, Result};
use crate::package::{LocalArtifact, PackageSpec};

/// Always misses; `persist` records the artifact in place without copying.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

#[async_trait]
impl CacheStore for NoCache {
    async fn lookup(&self, _spec: &PackageSpec) -> Option<LocalArtifact> {
        None
    }

    async fn persist(&self, artifact: &LocalArtifact) -> Result<CacheEntry> {
        let meta = tokio::fs::metadata(&artifact.path)
            .await
            .map_err(|e| Error::io("stat", &artifact.path, e))?;
        Ok(CacheEntry {
            spec: artifact.spec.clone(),
            path: artifact.path.clone(),
            size: meta.len(),
        })
    }

    async fn evict(&self, _spec: &PackageSpec) -> Result<()> {
        Ok(())
    }
}

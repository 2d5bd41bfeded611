//! Local directory cache: `<root>/<kind>/<version>/<kind>-<version>.pkg`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{CacheEntry, CacheStore};
use crate::error::{Error, Result};
use crate::package::{LocalArtifact, Origin, PackageSpec};
use crate::storage;

#[derive(Debug, Clone)]
pub struct DirCache {
    root: PathBuf,
}

impl DirCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default root: `~/.cache/gstfetch/packages`.
    pub fn default_root() -> anyhow::Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("gstfetch")?;
        Ok(xdg_dirs.get_cache_home().join("packages"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Slot path for `spec`. The version is escaped for the filesystem, so
    /// distinct versions never share a slot.
    pub fn entry_path(&self, spec: &PackageSpec) -> PathBuf {
        let kind = spec.kind.as_str();
        let version = sanitize_segment(spec.version.as_str());
        self.root
            .join(kind)
            .join(&version)
            .join(format!("{kind}-{version}.pkg"))
    }
}

/// Keep `[A-Za-z0-9._+-]` and percent-encode every other byte, so the mapping
/// is reversible. `.` and `..` are encoded whole and never name a directory link.
fn sanitize_segment(raw: &str) -> String {
    if raw == "." || raw == ".." {
        return raw.bytes().map(|b| format!("%{:02X}", b)).collect();
    }
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'+' | b'-') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

#[async_trait]
impl CacheStore for DirCache {
    async fn lookup(&self, spec: &PackageSpec) -> Option<LocalArtifact> {
        let path = self.entry_path(spec);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {
                tracing::debug!(%spec, path = %path.display(), "cache hit");
                Some(LocalArtifact::new(spec.clone(), path, Origin::Cache))
            }
            Ok(_) => {
                tracing::warn!(path = %path.display(), "cache slot is not a regular file; ignoring");
                None
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(%spec, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "cache lookup failed, treating as miss: {}", e);
                None
            }
        }
    }

    async fn persist(&self, artifact: &LocalArtifact) -> Result<CacheEntry> {
        let dest = self.entry_path(&artifact.spec);
        let size = if artifact.path == dest {
            tokio::fs::metadata(&dest)
                .await
                .map_err(|e| Error::io("stat", &dest, e))?
                .len()
        } else {
            let src = artifact.path.clone();
            let dest = dest.clone();
            tokio::task::spawn_blocking(move || storage::atomic_copy(&src, &dest)).await??
        };
        tracing::info!(spec = %artifact.spec, path = %dest.display(), size, "cached package");
        Ok(CacheEntry {
            spec: artifact.spec.clone(),
            path: dest,
            size,
        })
    }

    async fn evict(&self, spec: &PackageSpec) -> Result<()> {
        let path = self.entry_path(spec);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(%spec, path = %path.display(), "evicted cache entry");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io("remove", &path, e)),
        }
    }
}

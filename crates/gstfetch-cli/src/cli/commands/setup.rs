//! Setup command: acquire both packages and hand them to the installer.

use anyhow::{Context, Result};
use gstfetch_core::cache::{CacheStore, DirCache, NoCache};
use gstfetch_core::config::GstConfig;
use gstfetch_core::coordinator::{AcquiredPackages, Coordinator};
use gstfetch_core::installer;
use gstfetch_core::package::{PackageKind, Version};
use gstfetch_core::remote::HttpRemote;
use std::path::Path;
use std::sync::Arc;

/// Acquire verified runtime and development packages for `version`.
/// Fresh downloads land in `staging`, which must outlive the returned paths.
pub async fn acquire(
    cfg: &GstConfig,
    version: &Version,
    staging: &Path,
    use_cache: bool,
) -> Result<AcquiredPackages> {
    if use_cache {
        let root = cfg.cache_root()?;
        tracing::debug!(root = %root.display(), "using package cache");
        acquire_with(cfg, version, staging, DirCache::new(root)).await
    } else {
        acquire_with(cfg, version, staging, NoCache).await
    }
}

async fn acquire_with<C: CacheStore>(
    cfg: &GstConfig,
    version: &Version,
    staging: &Path,
    cache: C,
) -> Result<AcquiredPackages> {
    let remote = Arc::new(HttpRemote::new(cfg.http_options()));
    let coordinator = Coordinator::new(remote, cfg.layout(), cache, staging)
        .with_strict_filename(cfg.verify.strict_filename);
    let packages = coordinator.acquire(version).await?;
    for kind in PackageKind::ALL {
        let report = packages.get(kind);
        println!(
            "{} {}: verified ({}) {}",
            kind,
            version,
            report.artifact.origin,
            report.artifact.path.display()
        );
    }
    Ok(packages)
}

pub async fn run_setup(
    cfg: &GstConfig,
    version: &Version,
    no_install: bool,
    no_cache: bool,
) -> Result<()> {
    let staging = tempfile::Builder::new()
        .prefix("gstfetch-")
        .tempdir()
        .context("creating staging directory")?;
    let packages = acquire(cfg, version, staging.path(), !no_cache).await?;

    if no_install {
        tracing::info!(%version, "skipping installation (--no-install)");
        return Ok(());
    }

    let pkg_installer = cfg.installer();
    let outcomes = installer::install_verified(&pkg_installer, &packages).await?;
    for (kind, outcome) in outcomes {
        print!("{}", outcome.stdout);
        println!("{} {}: installed", kind, version);
    }
    // `staging` is removed here, after the installer has read the packages.
    Ok(())
}

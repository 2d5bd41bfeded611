//! Fetch command: acquire both packages and copy them to an output directory.

use anyhow::{Context, Result};
use gstfetch_core::config::GstConfig;
use gstfetch_core::package::{PackageSpec, Version};
use gstfetch_core::storage;
use std::path::Path;

use super::acquire;

pub async fn run_fetch(cfg: &GstConfig, version: &Version, out: &Path) -> Result<()> {
    let staging = tempfile::Builder::new()
        .prefix("gstfetch-")
        .tempdir()
        .context("creating staging directory")?;
    let packages = acquire(cfg, version, staging.path(), true).await?;

    tokio::fs::create_dir_all(out)
        .await
        .with_context(|| format!("creating {}", out.display()))?;

    let layout = cfg.layout();
    for (kind, src) in packages.paths() {
        let name = layout.file_name(&PackageSpec::new(kind, version.clone()));
        let dest = out.join(name);
        let (src_owned, dest_owned) = (src.to_path_buf(), dest.clone());
        let bytes =
            tokio::task::spawn_blocking(move || storage::atomic_copy(&src_owned, &dest_owned))
                .await??;
        tracing::info!(%kind, bytes, dest = %dest.display(), "copied package");
        println!("{}", dest.display());
    }
    Ok(())
}

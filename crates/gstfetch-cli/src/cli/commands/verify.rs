//! Verify command: check a local file against the published checksum.

use anyhow::{bail, Result};
use gstfetch_core::config::GstConfig;
use gstfetch_core::package::{PackageKind, PackageSpec, Version};
use gstfetch_core::remote::HttpRemote;
use gstfetch_core::verifier::Verifier;
use std::path::Path;
use std::sync::Arc;

/// Prints `<path>: OK` or `<path>: FAILED` like `sha256sum -c`; FAILED is an error.
pub async fn run_verify(
    cfg: &GstConfig,
    path: &Path,
    version: &Version,
    kind: PackageKind,
) -> Result<()> {
    let remote = Arc::new(HttpRemote::new(cfg.http_options()));
    let verifier =
        Verifier::new(remote, cfg.layout()).with_strict_filename(cfg.verify.strict_filename);
    let spec = PackageSpec::new(kind, version.clone());
    let verification = verifier.verify(path, &spec).await?;

    if verification.verified {
        println!("{}: OK", path.display());
        return Ok(());
    }
    println!("{}: FAILED", path.display());
    bail!(
        "{} does not match the published {} checksum (expected {}, computed {})",
        path.display(),
        spec,
        if verification.expected.is_empty() {
            "<empty checksum file>"
        } else {
            verification.expected.as_str()
        },
        verification.computed
    )
}

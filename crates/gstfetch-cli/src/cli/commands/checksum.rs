//! Checksum command: compute SHA-256 of a file.

use anyhow::Result;
use gstfetch_core::checksum;
use std::path::Path;

/// Print the digest in `sha256sum` format.
pub async fn run_checksum(path: &Path) -> Result<()> {
    let digest = checksum::sha256_path_async(path.to_path_buf()).await?;
    println!("{}  {}", digest, path.display());
    Ok(())
}

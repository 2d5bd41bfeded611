//! SHA-256 computation and checksum-file parsing.
//!
//! Hashing reads the file in bounded chunks so large packages never sit in
//! memory; the async wrapper moves that work onto a blocking thread.

mod record;

pub use record::ChecksumRecord;

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const BUF_SIZE: usize = 64 * 1024;

/// Length of a hex-encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).map_err(|e| Error::io("open", path, e))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf).map_err(|e| Error::io("read", path, e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// `sha256_path` on the blocking pool.
pub async fn sha256_path_async(path: PathBuf) -> Result<String> {
    tokio::task::spawn_blocking(move || sha256_path(&path)).await?
}

/// Case-insensitive comparison of two hex digests. Anything that is not a
/// well-formed SHA-256 hex string never matches.
pub fn digests_match(computed: &str, expected: &str) -> bool {
    is_sha256_hex(computed) && is_sha256_hex(expected) && computed.eq_ignore_ascii_case(expected)
}

pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == SHA256_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}

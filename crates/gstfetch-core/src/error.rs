//! Error taxonomy shared by the verifier, fetcher and cache.
//!
//! A checksum mismatch is not an error here; it is a `false` verification
//! result that the coordinator handles itself.

use std::io;
use std::path::{Path, PathBuf};

/// A failed or non-success remote request.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Connect, overall, or low-speed timeout expired.
    #[error("request to {url} timed out")]
    Timeout { url: String },
    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },
    /// Transport-level failure reported by curl (DNS, connection reset, TLS, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// The response body could not be decoded.
    #[error("response from {url} is not valid UTF-8")]
    Body { url: String },
}

impl NetworkError {
    pub fn url(&self) -> &str {
        match self {
            NetworkError::Timeout { url }
            | NetworkError::Status { url, .. }
            | NetworkError::Transport { url, .. }
            | NetworkError::Body { url } => url,
        }
    }
}

/// Errors from the acquisition components.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// Local file unreadable or unwritable while hashing, staging, or caching.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A blocking worker panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    pub(crate) fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        Error::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

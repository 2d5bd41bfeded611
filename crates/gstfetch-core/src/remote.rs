//! Access to the distribution host.
//!
//! The verifier and fetcher only talk to the host through `Remote`, so tests
//! can substitute an in-memory origin.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::http::{self, HttpOptions};

#[async_trait]
pub trait Remote: Send + Sync {
    /// GET `url` and return the body as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// GET `url` into the file at `dest` (created or truncated). Returns the
    /// number of bytes written. The file is complete and synced on `Ok`.
    async fn download(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// libcurl-backed remote; every transfer runs on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct HttpRemote {
    opts: HttpOptions,
}

impl HttpRemote {
    pub fn new(opts: HttpOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &HttpOptions {
        &self.opts
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let url = url.to_string();
        let opts = self.opts;
        let text = tokio::task::spawn_blocking(move || http::get_text(&url, &opts)).await??;
        Ok(text)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let url = url.to_string();
        let dest: PathBuf = dest.to_path_buf();
        let opts = self.opts;
        tokio::task::spawn_blocking(move || http::download_to_path(&url, &opts, &dest)).await?
    }
}

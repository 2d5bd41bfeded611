//! In-memory origin for unit tests.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::error::{Error, NetworkError, Result};
use crate::package::{PackageSpec, RemoteLayout};
use crate::remote::Remote;

/// Serves bodies from a URL map and counts every request per URL.
/// Unknown URLs answer HTTP 404.
#[derive(Default)]
pub struct FakeRemote {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    hits: Mutex<HashMap<String, u32>>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bytes(&self, url: &str, body: &[u8]) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_vec());
    }

    pub fn set_text(&self, url: &str, body: &str) {
        self.set_bytes(url, body.as_bytes());
    }

    pub fn remove(&self, url: &str) {
        self.bodies.lock().unwrap().remove(url);
    }

    /// Serve `body` as the package and a matching `.sha256sum` with the resource path.
    pub fn publish(&self, layout: &RemoteLayout, spec: &PackageSpec, body: &[u8]) {
        self.publish_with_digest_of(layout, spec, body, body);
    }

    /// Serve `body` as the package but publish the digest of `digest_of`.
    pub fn publish_with_digest_of(
        &self,
        layout: &RemoteLayout,
        spec: &PackageSpec,
        body: &[u8],
        digest_of: &[u8],
    ) {
        let digest = hex::encode(Sha256::digest(digest_of));
        self.set_bytes(&layout.package_url(spec), body);
        self.set_text(
            &layout.checksum_url(spec),
            &format!("{}  {}\n", digest, layout.package_path(spec)),
        );
    }

    pub fn hits(&self, url: &str) -> u32 {
        self.hits.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        *self.hits.lock().unwrap().entry(url.to_string()).or_default() += 1;
        self.bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| NetworkError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[async_trait]
impl Remote for FakeRemote {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let body = self.get(url)?;
        String::from_utf8(body).map_err(|_| {
            Error::Network(NetworkError::Body {
                url: url.to_string(),
            })
        })
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        let body = self.get(url)?;
        tokio::fs::write(dest, &body)
            .await
            .map_err(|e| Error::io("write", dest, e))?;
        Ok(body.len() as u64)
    }
}

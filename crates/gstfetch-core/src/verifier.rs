//! Checksum verification of a local package file against the published digest.

use std::path::Path;
use std::sync::Arc;

use crate::checksum::{self, ChecksumRecord};
use crate::error::Result;
use crate::package::{PackageSpec, RemoteLayout};
use crate::remote::Remote;

/// Outcome of one verification. A mismatch is `verified == false`, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub verified: bool,
    /// Lowercase hex SHA-256 of the local file.
    pub computed: String,
    /// First token of the checksum file; empty when the file was empty.
    pub expected: String,
    /// Whether the optional resource token named this package; `None` when absent.
    pub resource_matched: Option<bool>,
}

/// Verifies files by fetching `<package url>.sha256sum` and hashing the file.
pub struct Verifier<R: ?Sized> {
    remote: Arc<R>,
    layout: RemoteLayout,
    strict_filename: bool,
}

impl<R: Remote + ?Sized> Verifier<R> {
    pub fn new(remote: Arc<R>, layout: RemoteLayout) -> Self {
        Self {
            remote,
            layout,
            strict_filename: false,
        }
    }

    /// When set, a checksum file naming a different resource fails verification
    /// instead of only logging a warning.
    pub fn with_strict_filename(mut self, strict: bool) -> Self {
        self.strict_filename = strict;
        self
    }

    /// Verify `path` against the published checksum for `spec`.
    ///
    /// Network failures fetching the checksum and I/O failures reading the
    /// file propagate as errors. The comparison only happens after both the
    /// remote digest and the local hash are available.
    pub async fn verify(&self, path: &Path, spec: &PackageSpec) -> Result<Verification> {
        let checksum_url = self.layout.checksum_url(spec);
        tracing::debug!(url = %checksum_url, "downloading checksum");
        let body = self.remote.fetch_text(&checksum_url).await?;

        let computed = checksum::sha256_path_async(path.to_path_buf()).await?;
        tracing::debug!(%spec, path = %path.display(), computed = %computed, "computed file checksum");

        let Some(record) = ChecksumRecord::parse(&body) else {
            tracing::warn!(url = %checksum_url, "checksum file is empty");
            return Ok(Verification {
                verified: false,
                computed,
                expected: String::new(),
                resource_matched: None,
            });
        };
        tracing::debug!(
            expected = %record.digest,
            resource = record.resource.as_deref().unwrap_or("-"),
            "parsed remote checksum"
        );

        let resource_matched = record.resource_matches(
            &self.layout.package_path(spec),
            &self.layout.file_name(spec),
        );
        if resource_matched == Some(false) {
            tracing::warn!(
                %spec,
                resource = record.resource.as_deref().unwrap_or_default(),
                "checksum file names a different resource"
            );
        }

        let mut verified = checksum::digests_match(&computed, &record.digest);
        if self.strict_filename && resource_matched == Some(false) {
            verified = false;
        }
        if verified {
            tracing::debug!(%spec, "checksum validation passed");
        } else {
            tracing::debug!(%spec, "checksum validation failed");
        }

        Ok(Verification {
            verified,
            computed,
            expected: record.digest,
            resource_matched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::package::{PackageKind, Version};
    use crate::testing::FakeRemote;
    use sha2::{Digest, Sha256};

    fn spec() -> PackageSpec {
        PackageSpec::new(PackageKind::Runtime, Version::new("1.16.2").unwrap())
    }

    fn write_pkg(dir: &Path, body: &[u8]) -> std::path::PathBuf {
        let p = dir.join("pkg.pkg");
        std::fs::write(&p, body).unwrap();
        p
    }

    #[tokio::test]
    async fn matching_digest_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), b"runtime bytes");
        let layout = RemoteLayout::default();
        let remote = Arc::new(FakeRemote::new());
        remote.publish(&layout, &spec(), b"runtime bytes");
        let verifier = Verifier::new(remote, layout);

        let v = verifier.verify(&path, &spec()).await.unwrap();
        assert!(v.verified);
        assert_eq!(v.computed, hex::encode(Sha256::digest(b"runtime bytes")));
        assert_eq!(v.computed, v.expected);
        assert_eq!(v.resource_matched, Some(true));
    }

    #[tokio::test]
    async fn uppercase_remote_digest_still_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), b"abc");
        let layout = RemoteLayout::default();
        let remote = Arc::new(FakeRemote::new());
        let digest = hex::encode(Sha256::digest(b"abc")).to_ascii_uppercase();
        remote.set_text(&layout.checksum_url(&spec()), &digest);
        let verifier = Verifier::new(remote, layout);

        let v = verifier.verify(&path, &spec()).await.unwrap();
        assert!(v.verified);
        assert_eq!(v.resource_matched, None);
    }

    #[tokio::test]
    async fn tampered_file_is_not_verified() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), b"tampered");
        let layout = RemoteLayout::default();
        let remote = Arc::new(FakeRemote::new());
        remote.publish(&layout, &spec(), b"original");
        let verifier = Verifier::new(remote, layout);

        let v = verifier.verify(&path, &spec()).await.unwrap();
        assert!(!v.verified);
        assert_ne!(v.computed, v.expected);
    }

    #[tokio::test]
    async fn verification_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), b"stable");
        let layout = RemoteLayout::default();
        let remote = Arc::new(FakeRemote::new());
        remote.publish(&layout, &spec(), b"stable");
        let verifier = Verifier::new(remote, layout);

        let first = verifier.verify(&path, &spec()).await.unwrap();
        let second = verifier.verify(&path, &spec()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn resource_mismatch_only_fails_in_strict_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), b"abc");
        let layout = RemoteLayout::default();
        let remote = Arc::new(FakeRemote::new());
        let digest = hex::encode(Sha256::digest(b"abc"));
        remote.set_text(
            &layout.checksum_url(&spec()),
            &format!("{digest} /data/pkg/osx/1.16.2/something-else.pkg"),
        );

        let lenient = Verifier::new(Arc::clone(&remote), layout.clone());
        let v = lenient.verify(&path, &spec()).await.unwrap();
        assert!(v.verified);
        assert_eq!(v.resource_matched, Some(false));

        let strict = Verifier::new(remote, layout).with_strict_filename(true);
        assert!(!strict.verify(&path, &spec()).await.unwrap().verified);
    }

    #[tokio::test]
    async fn empty_checksum_body_is_not_verified() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), b"abc");
        let layout = RemoteLayout::default();
        let remote = Arc::new(FakeRemote::new());
        remote.set_text(&layout.checksum_url(&spec()), "\n");
        let verifier = Verifier::new(remote, layout);

        let v = verifier.verify(&path, &spec()).await.unwrap();
        assert!(!v.verified);
        assert!(v.expected.is_empty());
    }

    #[tokio::test]
    async fn missing_checksum_is_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pkg(dir.path(), b"abc");
        let verifier = Verifier::new(Arc::new(FakeRemote::new()), RemoteLayout::default());

        let err = verifier.verify(&path, &spec()).await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }

    #[tokio::test]
    async fn unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RemoteLayout::default();
        let remote = Arc::new(FakeRemote::new());
        remote.publish(&layout, &spec(), b"abc");
        let verifier = Verifier::new(remote, layout);

        let err = verifier
            .verify(&dir.path().join("missing.pkg"), &spec())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}

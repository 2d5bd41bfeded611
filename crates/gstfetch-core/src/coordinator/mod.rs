//! Acquisition coordinator: produces verified runtime and development
//! packages for a version, reusing the cache when it is still trustworthy.
//!
//! Each kind runs its own state machine (see `pipeline`); the two are awaited
//! together and share nothing but the cache store. The result is all or
//! nothing: a single failed kind fails the whole acquisition.

mod failure;
mod pipeline;


pub use failure::{AcquisitionFailed, AcquisitionFailure, FailureReason};
pub use pipeline::{PipelineReport, Stage};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::fetcher::Fetcher;
use crate::package::{PackageKind, PackageSpec, RemoteLayout, Version};
use crate::remote::Remote;
use crate::verifier::Verifier;

pub struct Coordinator<R: ?Sized, C> {
    verifier: Verifier<R>,
    fetcher: Fetcher<R>,
    cache: C,
}

impl<R, C> Coordinator<R, C>
where
    R: Remote + ?Sized,
    C: CacheStore,
{
    /// `staging` receives fresh downloads; it should be private to this run.
    pub fn new(
        remote: Arc<R>,
        layout: RemoteLayout,
        cache: C,
        staging: impl Into<PathBuf>,
    ) -> Self {
        Self {
            verifier: Verifier::new(Arc::clone(&remote), layout.clone()),
            fetcher: Fetcher::new(remote, layout, staging),
            cache,
        }
    }

    pub fn with_strict_filename(mut self, strict: bool) -> Self {
        self.verifier = self.verifier.with_strict_filename(strict);
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn staging_dir(&self) -> &Path {
        self.fetcher.staging_dir()
    }

    /// Acquire both kinds concurrently. Succeeds only if both reach `Done`.
    pub async fn acquire(&self, version: &Version) -> Result<AcquiredPackages, AcquisitionFailed> {
        tracing::info!(%version, "acquiring packages");
        let (runtime, development) = tokio::join!(
            self.acquire_one(PackageSpec::new(PackageKind::Runtime, version.clone())),
            self.acquire_one(PackageSpec::new(PackageKind::Development, version.clone())),
        );
        match (runtime, development) {
            (Ok(runtime), Ok(development)) => Ok(AcquiredPackages {
                version: version.clone(),
                runtime,
                development,
            }),
            (runtime, development) => Err(AcquisitionFailed {
                failures: [runtime.err(), development.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            }),
        }
    }
}

/// Both packages, verified in this run.
#[derive(Debug, Clone)]
pub struct AcquiredPackages {
    pub version: Version,
    pub runtime: PipelineReport,
    pub development: PipelineReport,
}

impl AcquiredPackages {
    pub fn get(&self, kind: PackageKind) -> &PipelineReport {
        match kind {
            PackageKind::Runtime => &self.runtime,
            PackageKind::Development => &self.development,
        }
    }

    pub fn path(&self, kind: PackageKind) -> &Path {
        self.get(kind).artifact.path()
    }

    /// (kind, verified path) in installation order.
    pub fn paths(&self) -> impl Iterator<Item = (PackageKind, &Path)> {
        PackageKind::ALL.into_iter().map(move |kind| (kind, self.path(kind)))
    }
}

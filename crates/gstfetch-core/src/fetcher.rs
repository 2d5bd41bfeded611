//! Fresh package downloads into a private staging directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;
use crate::package::{LocalArtifact, Origin, PackageSpec, RemoteLayout};
use crate::remote::Remote;
use crate::storage::PartFile;

/// Downloads packages into `staging`. Each download goes to a unique `.part`
/// file that is renamed to the package file name only after the transfer
/// completed, so a file under its final name is always whole.
pub struct Fetcher<R: ?Sized> {
    remote: Arc<R>,
    layout: RemoteLayout,
    staging: PathBuf,
}

impl<R: Remote + ?Sized> Fetcher<R> {
    pub fn new(remote: Arc<R>, layout: RemoteLayout, staging: impl Into<PathBuf>) -> Self {
        Self {
            remote,
            layout,
            staging: staging.into(),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging
    }

    pub async fn fetch(&self, spec: &PackageSpec) -> Result<LocalArtifact> {
        let url = self.layout.package_url(spec);
        let final_path = self.staging.join(self.layout.file_name(spec));
        let part = PartFile::create_for(&final_path)?;

        tracing::debug!(%spec, url = %url, "downloading package");
        // On error `part` is dropped here and removes the incomplete file.
        let bytes = self.remote.download(&url, part.path()).await?;
        let path = part.finalize()?;
        tracing::info!(%spec, bytes, path = %path.display(), "downloaded package");

        Ok(LocalArtifact::new(spec.clone(), path, Origin::Fresh))
    }
}

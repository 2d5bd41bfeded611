//! File lifecycle for staged downloads and cache entries.
//!
//! Data is written to a uniquely named `.part` file next to its final
//! location and atomically renamed into place once complete. Readers of the
//! final path therefore see either nothing, the previous file, or the whole
//! new file. A `PartFile` that is dropped without `finalize` deletes itself.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// A temp file that becomes `final_path` on `finalize`.
#[derive(Debug)]
pub struct PartFile {
    temp: TempPath,
    final_path: PathBuf,
}

impl PartFile {
    /// Create an empty temp file in the parent directory of `final_path`
    /// (created if missing). Concurrent callers targeting the same final path
    /// get distinct temp files.
    pub fn create_for(final_path: &Path) -> Result<Self> {
        let dir = final_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| Error::io("create dir", dir, e))?;
        let name = final_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string());
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{name}."))
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)
            .map_err(|e| Error::io("create temp file in", dir, e))?
            .into_temp_path();
        Ok(Self {
            temp,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Path of the temp file; write the content here before `finalize`.
    pub fn path(&self) -> &Path {
        &self.temp
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Atomically rename the temp file to the final path, replacing any
    /// existing file there.
    pub fn finalize(self) -> Result<PathBuf> {
        let final_path = self.final_path;
        self.temp
            .persist(&final_path)
            .map_err(|e| Error::io("rename into", &final_path, e.error))?;
        Ok(final_path)
    }
}

/// Copy `src` to `dest` through a synced part file and an atomic rename.
/// Returns the number of bytes copied.
pub fn atomic_copy(src: &Path, dest: &Path) -> Result<u64> {
    let part = PartFile::create_for(dest)?;
    let copied = std::fs::copy(src, part.path()).map_err(|e| Error::io("copy", src, e))?;
    File::open(part.path())
        .and_then(|f| f.sync_all())
        .map_err(|e| Error::io("sync", part.path(), e))?;
    part.finalize()?;
    Ok(copied)
}

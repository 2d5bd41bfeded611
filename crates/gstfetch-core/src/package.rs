//! Package model: kinds, versions, and the remote file layout derived from them.
//!
//! Everything here is pure: URLs, file names and cache keys are built
//! deterministically from a `PackageSpec` and the configured `RemoteLayout`.

use std::fmt;
use std::path::{Path, PathBuf};

/// The two packages published for every distribution version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    Runtime,
    Development,
}

impl PackageKind {
    /// Both kinds, in installation order.
    pub const ALL: [PackageKind; 2] = [PackageKind::Runtime, PackageKind::Development];

    /// Token inserted between the package name and the version in remote file names.
    pub fn prefix(self) -> &'static str {
        match self {
            PackageKind::Runtime => "",
            PackageKind::Development => "devel-",
        }
    }

    /// Stable lowercase name used for cache directories and CLI values.
    pub fn as_str(self) -> &'static str {
        match self {
            PackageKind::Runtime => "runtime",
            PackageKind::Development => "development",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PackageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "runtime" => Ok(PackageKind::Runtime),
            "development" | "devel" => Ok(PackageKind::Development),
            other => Err(format!("unknown package kind: {other}")),
        }
    }
}

/// Rejected version input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidVersion {
    #[error("version must not be empty")]
    Empty,
    #[error("version {0:?} has leading or trailing whitespace")]
    Whitespace(String),
    #[error("version {version:?} contains {bad:?}, which cannot appear in a URL path segment")]
    BadChar { version: String, bad: char },
}

/// Opaque distribution version. Never parsed or ordered, only substituted
/// into URLs and cache keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidVersion> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidVersion::Empty);
        }
        if raw.trim() != raw {
            return Err(InvalidVersion::Whitespace(raw));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| matches!(c, '/' | '\\' | '?' | '#') || c.is_whitespace())
        {
            return Err(InvalidVersion::BadChar { version: raw, bad });
        }
        Ok(Version(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::new(s)
    }
}

/// A (kind, version) pair. Identifies one remote artifact and one cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    pub kind: PackageKind,
    pub version: Version,
}

impl PackageSpec {
    pub fn new(kind: PackageKind, version: Version) -> Self {
        Self { kind, version }
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.version)
    }
}

/// Default distribution host.
pub const DEFAULT_BASE_URL: &str = "https://gstreamer.freedesktop.org";
/// Default package name stem.
pub const DEFAULT_PACKAGE_NAME: &str = "gstreamer-1.0";
/// Default architecture suffix.
pub const DEFAULT_ARCH: &str = "x86_64";
/// Suffix of the companion checksum file.
pub const CHECKSUM_SUFFIX: &str = ".sha256sum";

/// Where packages live on the distribution host and how their files are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLayout {
    base_url: String,
    package_name: String,
    arch: String,
}

impl Default for RemoteLayout {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_PACKAGE_NAME, DEFAULT_ARCH)
    }
}

impl RemoteLayout {
    /// Trailing slashes on `base_url` are dropped so joined URLs never contain `//`.
    pub fn new(base_url: &str, package_name: &str, arch: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            package_name: package_name.to_string(),
            arch: arch.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Package file name, e.g. `gstreamer-1.0-devel-1.16.2-x86_64.pkg`.
    pub fn file_name(&self, spec: &PackageSpec) -> String {
        format!(
            "{}-{}{}-{}.pkg",
            self.package_name,
            spec.kind.prefix(),
            spec.version,
            self.arch
        )
    }

    /// Path component of the package URL, starting with `/`.
    pub fn package_path(&self, spec: &PackageSpec) -> String {
        format!(
            "/data/pkg/osx/{}/{}",
            spec.version,
            self.file_name(spec)
        )
    }

    pub fn package_url(&self, spec: &PackageSpec) -> String {
        format!("{}{}", self.base_url, self.package_path(spec))
    }

    pub fn checksum_url(&self, spec: &PackageSpec) -> String {
        format!("{}{}", self.package_url(spec), CHECKSUM_SUFFIX)
    }
}

/// Where a candidate artifact came from. Decides how a failed verification is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Cache,
    Fresh,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Cache => f.write_str("cache"),
            Origin::Fresh => f.write_str("fresh download"),
        }
    }
}

/// A package file that exists on disk. Not trusted until verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifact {
    pub spec: PackageSpec,
    pub path: PathBuf,
    pub origin: Origin,
}

impl LocalArtifact {
    pub fn new(spec: PackageSpec, path: impl Into<PathBuf>, origin: Origin) -> Self {
        Self {
            spec,
            path: path.into(),
            origin,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

//! Checksum-verified acquisition of the GStreamer macOS runtime and
//! development packages, with a local cache of verified copies.
//!
//! `coordinator::Coordinator` is the entry point; it drives `verifier`,
//! `fetcher` and a `cache::CacheStore` for both package kinds.

pub mod config;
pub mod logging;

pub mod cache;
pub mod checksum;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod installer;
pub mod package;
pub mod remote;
pub mod storage;
pub mod verifier;

#[cfg(test)]
mod testing;

pub use coordinator::{AcquiredPackages, AcquisitionFailed, Coordinator};
pub use error::{Error, NetworkError};
pub use package::{PackageKind, PackageSpec, RemoteLayout, Version};

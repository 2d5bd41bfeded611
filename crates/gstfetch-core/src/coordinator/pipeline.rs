//! Per-kind acquisition state machine.
//!
//! ```text
//! CacheCheck -> CacheHit  -> Verifying(cache) -> Verified -> Done
//!            \                    | false (once)
//!             -> CacheMiss <------+
//!                   -> Verifying(fresh) -> Verified -> Persisting -> Done
//!                           | false
//!                           -> Failed
//! ```

use std::fmt;
use std::io;

use super::failure::{AcquisitionFailure, FailureReason};
use super::Coordinator;
use crate::cache::{CacheEntry, CacheStore};
use crate::error::Error;
use crate::package::{LocalArtifact, Origin, PackageSpec};
use crate::remote::Remote;
use crate::verifier::Verification;

/// Observable states, recorded in order in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CacheCheck,
    CacheHit,
    CacheMiss,
    Verifying(Origin),
    Verified,
    Unverified,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::CacheCheck => f.write_str("cache check"),
            Stage::CacheHit => f.write_str("cache hit"),
            Stage::CacheMiss => f.write_str("download"),
            Stage::Verifying(origin) => write!(f, "verifying ({})", origin),
            Stage::Verified => f.write_str("verified"),
            Stage::Unverified => f.write_str("unverified"),
            Stage::Persisting => f.write_str("caching"),
            Stage::Done => f.write_str("done"),
            Stage::Failed => f.write_str("failed"),
        }
    }
}

/// A kind that reached `Done`.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// The verified artifact handed to the installer.
    pub artifact: LocalArtifact,
    pub verification: Verification,
    /// Cache entry written in this run; `None` when the cache copy was reused.
    pub cache_entry: Option<CacheEntry>,
    /// Number of package downloads performed (0, 1, or 2 after a stale cache).
    pub fetches: u32,
    pub trace: Vec<Stage>,
}

enum State {
    CacheCheck,
    CacheHit(LocalArtifact),
    CacheMiss,
    Verifying(LocalArtifact),
    Verified(LocalArtifact, Verification),
    Unverified(LocalArtifact, Verification),
    Persisting(LocalArtifact, Verification),
    Done(LocalArtifact, Verification),
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::CacheCheck => Stage::CacheCheck,
            State::CacheHit(_) => Stage::CacheHit,
            State::CacheMiss => Stage::CacheMiss,
            State::Verifying(a) => Stage::Verifying(a.origin),
            State::Verified(..) => Stage::Verified,
            State::Unverified(..) => Stage::Unverified,
            State::Persisting(..) => Stage::Persisting,
            State::Done(..) => Stage::Done,
        }
    }
}

impl<R, C> Coordinator<R, C>
where
    R: Remote + ?Sized,
    C: CacheStore,
{
    /// Drive one kind from `CacheCheck` to `Done` or `Failed`.
    ///
    /// A cached candidate that fails verification, or is gone by the time it
    /// is hashed, falls back to one fresh download; a fresh download that
    /// fails verification is terminal.
    pub async fn acquire_one(
        &self,
        spec: PackageSpec,
    ) -> Result<PipelineReport, AcquisitionFailure> {
        let mut trace = Vec::new();
        let mut fell_back = false;
        let mut fetches = 0u32;
        let mut cache_entry = None;
        let mut state = State::CacheCheck;

        let fail = |trace: &mut Vec<Stage>, stage: Stage, reason: FailureReason| {
            trace.push(Stage::Failed);
            tracing::warn!(%spec, %stage, "acquisition failed: {}", reason);
            AcquisitionFailure {
                spec: spec.clone(),
                stage,
                reason,
                trace: std::mem::take(trace),
            }
        };

        loop {
            let stage = state.stage();
            trace.push(stage);
            tracing::debug!(%spec, %stage, "pipeline state");

            state = match state {
                State::CacheCheck => match self.cache.lookup(&spec).await {
                    Some(candidate) => State::CacheHit(candidate),
                    None => State::CacheMiss,
                },
                State::CacheHit(candidate) => State::Verifying(candidate),
                State::CacheMiss => {
                    fetches += 1;
                    match self.fetcher.fetch(&spec).await {
                        Ok(artifact) => State::Verifying(artifact),
                        Err(e) => return Err(fail(&mut trace, stage, e.into())),
                    }
                }
                State::Verifying(candidate) => {
                    match self.verifier.verify(candidate.path(), &spec).await {
                        Ok(v) if v.verified => State::Verified(candidate, v),
                        Ok(v) => State::Unverified(candidate, v),
                        // The cached copy vanished after lookup (evicted by another run).
                        Err(Error::Io { source, .. })
                            if candidate.origin == Origin::Cache
                                && !fell_back
                                && source.kind() == io::ErrorKind::NotFound =>
                        {
                            fell_back = true;
                            tracing::warn!(
                                %spec,
                                path = %candidate.path.display(),
                                "cached package disappeared, downloading a fresh copy"
                            );
                            State::CacheMiss
                        }
                        Err(e) => return Err(fail(&mut trace, stage, e.into())),
                    }
                }
                State::Unverified(candidate, v) => {
                    if candidate.origin == Origin::Cache && !fell_back {
                        fell_back = true;
                        tracing::warn!(
                            %spec,
                            path = %candidate.path.display(),
                            expected = %v.expected,
                            computed = %v.computed,
                            "cached package is stale, downloading a fresh copy"
                        );
                        if let Err(e) = self.cache.evict(&spec).await {
                            tracing::warn!(%spec, "could not evict stale cache entry: {}", e);
                        }
                        State::CacheMiss
                    } else {
                        let reason = FailureReason::ChecksumMismatch {
                            expected: v.expected,
                            computed: v.computed,
                        };
                        return Err(fail(&mut trace, Stage::Verifying(candidate.origin), reason));
                    }
                }
                State::Verified(artifact, v) => match artifact.origin {
                    Origin::Fresh => State::Persisting(artifact, v),
                    Origin::Cache => State::Done(artifact, v),
                },
                State::Persisting(artifact, v) => match self.cache.persist(&artifact).await {
                    Ok(entry) => {
                        cache_entry = Some(entry);
                        State::Done(artifact, v)
                    }
                    Err(e) => return Err(fail(&mut trace, stage, e.into())),
                },
                State::Done(artifact, verification) => {
                    tracing::info!(
                        %spec,
                        origin = %artifact.origin,
                        path = %artifact.path.display(),
                        "package verified"
                    );
                    return Ok(PipelineReport {
                        artifact,
                        verification,
                        cache_entry,
                        fetches,
                        trace,
                    });
                }
            };
        }
    }
}

//! Terminal failures of the acquisition state machine.

use std::fmt;

use super::pipeline::Stage;
use crate::error::Error;
use crate::package::PackageSpec;

/// Why a pipeline ended in `Failed`.
#[derive(Debug, thiserror::Error)]
pub enum FailureReason {
    #[error(transparent)]
    Error(#[from] Error),
    /// A freshly downloaded package did not match its published digest.
    #[error("checksum mismatch (expected {expected}, computed {computed})")]
    ChecksumMismatch { expected: String, computed: String },
}

/// One package kind could not be acquired.
#[derive(Debug, thiserror::Error)]
#[error("{spec}: failed during {stage}: {reason}")]
pub struct AcquisitionFailure {
    pub spec: PackageSpec,
    /// Stage that was running when the pipeline failed.
    pub stage: Stage,
    pub reason: FailureReason,
    /// States visited, ending with `Failed`.
    pub trace: Vec<Stage>,
}

/// The acquisition as a whole failed; lists every kind that did not reach `Done`.
#[derive(Debug)]
pub struct AcquisitionFailed {
    pub failures: Vec<AcquisitionFailure>,
}

impl fmt::Display for AcquisitionFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not acquire verified packages")?;
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AcquisitionFailed {}

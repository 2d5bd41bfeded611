//! Handoff of verified packages to the system package installer.
//!
//! The installer is opaque: it is asked to apply a package at a path and
//! reports success plus its captured output, which is never interpreted.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::coordinator::AcquiredPackages;
use crate::package::PackageKind;

/// What the installer reported for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub success: bool,
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "exit status {}", code)?,
            None => write!(f, "terminated by signal")?,
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, ": {}", stderr)?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("installing {kind} package {} failed: {outcome}", .path.display())]
    Failed {
        kind: PackageKind,
        path: PathBuf,
        outcome: InstallOutcome,
    },
}

#[async_trait]
pub trait Installer: Send + Sync {
    /// Apply the package at `path`. `Err` only when the installer could not be run.
    async fn apply(&self, path: &Path) -> Result<InstallOutcome, InstallError>;
}

/// macOS `installer -pkg <path> -target <target>`, optionally through `sudo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkgInstaller {
    pub program: String,
    pub target: String,
    pub sudo: bool,
}

impl Default for PkgInstaller {
    fn default() -> Self {
        Self {
            program: "installer".to_string(),
            target: "/".to_string(),
            sudo: true,
        }
    }
}

impl PkgInstaller {
    /// Program and arguments for installing `path`.
    pub fn command_line(&self, path: &Path) -> (String, Vec<String>) {
        let mut args = vec![
            "-pkg".to_string(),
            path.display().to_string(),
            "-target".to_string(),
            self.target.clone(),
        ];
        if self.sudo {
            args.insert(0, self.program.clone());
            ("sudo".to_string(), args)
        } else {
            (self.program.clone(), args)
        }
    }
}

#[async_trait]
impl Installer for PkgInstaller {
    async fn apply(&self, path: &Path) -> Result<InstallOutcome, InstallError> {
        let (program, args) = self.command_line(path);
        tracing::debug!(program = %program, ?args, "running installer");
        let output = tokio::process::Command::new(&program)
            .args(&args)
            .output()
            .await
            .map_err(|source| InstallError::Spawn {
                program: program.clone(),
                source,
            })?;
        Ok(InstallOutcome {
            success: output.status.success(),
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Install runtime then development. Stops at the first failure.
pub async fn install_verified<I: Installer + ?Sized>(
    installer: &I,
    packages: &AcquiredPackages,
) -> Result<Vec<(PackageKind, InstallOutcome)>, InstallError> {
    let mut outcomes = Vec::with_capacity(2);
    for (kind, path) in packages.paths() {
        tracing::info!(%kind, path = %path.display(), "installing package");
        let outcome = installer.apply(path).await?;
        tracing::debug!(%kind, stdout = %outcome.stdout.trim_end(), stderr = %outcome.stderr.trim_end(), "installer output");
        if !outcome.success {
            return Err(InstallError::Failed {
                kind,
                path: path.to_path_buf(),
                outcome,
            });
        }
        outcomes.push((kind, outcome));
    }
    Ok(outcomes)
}

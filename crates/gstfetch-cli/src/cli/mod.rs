//! CLI for gstfetch.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use gstfetch_core::config::{self, GstConfig};
use gstfetch_core::package::{PackageKind, Version};
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_fetch, run_setup, run_verify};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gstfetch")]
#[command(
    about = "Download, verify and install the GStreamer macOS runtime and development packages",
    long_about = None
)]
pub struct Cli {
    /// Read configuration from this file instead of ~/.config/gstfetch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log to stderr instead of the state-dir log file.
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Acquire verified runtime and development packages and install them.
    Setup {
        /// GStreamer version, e.g. 1.16.2.
        #[arg(env = "INPUT_VERSION")]
        version: Version,

        /// Stop after verification; do not run the installer.
        #[arg(long)]
        no_install: bool,

        /// Neither read nor write the package cache.
        #[arg(long)]
        no_cache: bool,
    },

    /// Acquire verified packages and copy them into a directory.
    Fetch {
        #[arg(env = "INPUT_VERSION")]
        version: Version,

        /// Destination directory (created if missing).
        #[arg(long, short, value_name = "DIR")]
        out: PathBuf,
    },

    /// Verify a local package file against its published checksum.
    Verify {
        path: PathBuf,

        #[arg(env = "INPUT_VERSION")]
        version: Version,

        /// Which package the file is: runtime or development.
        #[arg(long, default_value = "runtime")]
        kind: PackageKind,
    },

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    fn load_config(&self) -> Result<GstConfig> {
        let cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    pub async fn run(&self) -> Result<()> {
        match &self.command {
            CliCommand::Setup {
                version,
                no_install,
                no_cache,
            } => {
                let cfg = self.load_config()?;
                run_setup(&cfg, version, *no_install, *no_cache).await?;
            }
            CliCommand::Fetch { version, out } => {
                let cfg = self.load_config()?;
                run_fetch(&cfg, version, out).await?;
            }
            CliCommand::Verify {
                path,
                version,
                kind,
            } => {
                let cfg = self.load_config()?;
                run_verify(&cfg, path, version, *kind).await?;
            }
            CliCommand::Checksum { path } => run_checksum(path).await?,
            CliCommand::Completions { shell } => run_completions(*shell),
        }

        Ok(())
    }
}

/// Single-line message for a CI annotation; annotations end at the first newline.
pub fn annotation_message(err: &anyhow::Error) -> String {
    format!("{:#}", err).replace('\r', "").replace('\n', " ")
}

#[cfg(test)]
mod tests;

//! Tests for verify, checksum, completions and error annotations.

use super::parse;
use crate::cli::{annotation_message, CliCommand};
use clap_complete::Shell;
use gstfetch_core::package::PackageKind;
use std::path::Path;

#[test]
fn cli_parse_verify_defaults_to_runtime() {
    match parse(&["gstfetch", "verify", "gst.pkg", "1.16.2"]) {
        CliCommand::Verify {
            path,
            version,
            kind,
        } => {
            assert_eq!(path, Path::new("gst.pkg"));
            assert_eq!(version.as_str(), "1.16.2");
            assert_eq!(kind, PackageKind::Runtime);
        }
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_verify_development() {
    match parse(&["gstfetch", "verify", "devel.pkg", "1.16.2", "--kind", "devel"]) {
        CliCommand::Verify { kind, .. } => assert_eq!(kind, PackageKind::Development),
        _ => panic!("expected Verify"),
    }
}

#[test]
fn cli_parse_checksum() {
    match parse(&["gstfetch", "checksum", "/path/to/file.pkg"]) {
        CliCommand::Checksum { path } => assert_eq!(path, Path::new("/path/to/file.pkg")),
        _ => panic!("expected Checksum"),
    }
}

#[test]
fn cli_parse_completions() {
    match parse(&["gstfetch", "completions", "zsh"]) {
        CliCommand::Completions { shell } => assert_eq!(shell, Shell::Zsh),
        _ => panic!("expected Completions"),
    }
}

#[test]
fn annotation_is_a_single_line() {
    let err = anyhow::anyhow!("line one\nline two").context("setup failed");
    let msg = annotation_message(&err);
    assert!(!msg.contains('\n'));
    assert!(msg.starts_with("setup failed: line one"));
}

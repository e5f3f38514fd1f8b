//! Centralized error types for pbt
//!
//! Only errors that stop a whole verb live here. Per-file problems while
//! compiling or copying are recorded in the reports and never surface as
//! an `Err`.

use pbt_config::{ArchiverKind, InstallRootError, SettingsError, ToolKind};
use pbt_manifest::{ManifestError, ValidationIssue};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PbtError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Configuration is incomplete: {}", join_issues(.0))]
    ConfigIncomplete(Vec<ValidationIssue>),

    #[error("{0}")]
    NoInstallTarget(#[from] InstallRootError),

    #[error("{0} not found. Check your path or install it")]
    ToolUnavailable(ToolKind),

    #[error("zip or 7z not found. Unable to package the plugin")]
    NoArchiverAvailable,

    #[error("{archiver:?} failed to create {}: {reason}", archive.display())]
    ArchiveFailed {
        archiver: ArchiverKind,
        archive: PathBuf,
        reason: String,
    },

    #[error("{} does not exist; deploy the plugin first or package without --quick", .0.display())]
    NotDeployed(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

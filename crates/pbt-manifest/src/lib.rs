//! Plugin manifest handling
//!
//! This crate loads and validates the declarative manifest (`pbt.toml`) that
//! describes a plugin: its name, the files and directories it is made of, the
//! UI and resource descriptors that must be compiled, its translations and
//! its optional documentation tree.
//!
//! The manifest is loaded once per invocation and passed by reference to
//! every component that needs it.

pub mod artifacts;
pub mod errors;
pub mod manifest;
pub mod scaffold;
pub mod types;
pub mod validation;

pub use artifacts::{ArtifactKind, DerivedArtifact, DERIVED_EXTENSION};
pub use errors::ManifestError;
pub use manifest::{raw_text, DEFAULT_MANIFEST_NAME, TRANSLATION_DIR};
pub use scaffold::{survey_project, write_manifest, ProjectSurvey};
pub use types::{FileSet, HelpSection, Manifest, FILE_KEYS};
pub use validation::{
    blocking_issues, is_plain_name, plugin_name_issue, stays_within, validate, validate_sources,
    ValidationIssue,
};

//! Manifest validation
//!
//! Validation collects every problem instead of stopping at the first one so
//! a caller can show the complete list in one pass. It never mutates the
//! manifest and never aborts; callers decide what is fatal through
//! [`ValidationIssue::is_blocking`].

use crate::types::Manifest;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// `[files]` keys every manifest is expected to declare, even if empty
pub const MANDATORY_FILE_KEYS: &[&str] = &["python_files", "main_dialog", "resource_files", "extras"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ValidationIssue {
    MissingPluginName,
    /// The name is not a single directory name (e.g. `../other` or `a/b`)
    InvalidPluginName { name: String },
    MissingSection { section: String },
    MissingKey { section: String, key: String },
    MissingTranslationSource { locale: String, path: PathBuf },
    /// Absolute, or climbs above the directory it is resolved against
    PathEscapesProject { key: String, path: PathBuf },
}

impl ValidationIssue {
    /// Whether deploy and package must refuse to run
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            ValidationIssue::MissingPluginName | ValidationIssue::InvalidPluginName { .. }
        )
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingPluginName => {
                write!(f, "[plugin] name is missing or empty")
            }
            ValidationIssue::InvalidPluginName { name } => {
                write!(f, "[plugin] name '{}' must be a single directory name", name)
            }
            ValidationIssue::MissingSection { section } => {
                write!(f, "Missing section [{}]", section)
            }
            ValidationIssue::MissingKey { section, key } => {
                write!(f, "Missing option '{}' in section [{}]", key, section)
            }
            ValidationIssue::MissingTranslationSource { locale, path } => {
                write!(
                    f,
                    "Locale '{}' has no translation source at {}",
                    locale,
                    path.display()
                )
            }
            ValidationIssue::PathEscapesProject { key, path } => {
                write!(f, "'{}' in {} escapes the project directory", path.display(), key)
            }
        }
    }
}

/// Whether `name` is exactly one normal path component
pub fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Whether a relative path joined onto a directory stays strictly inside it
pub fn stays_within(path: &Path) -> bool {
    let mut depth = 0usize;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    depth > 0
}

/// The issue with the plugin name, if any
pub fn plugin_name_issue(manifest: &Manifest) -> Option<ValidationIssue> {
    match manifest.plugin_name() {
        None => Some(ValidationIssue::MissingPluginName),
        Some(name) if !is_plain_name(name) => Some(ValidationIssue::InvalidPluginName {
            name: name.to_string(),
        }),
        Some(_) => None,
    }
}

/// Declared paths that would be copied from or to outside the project
fn escaping_paths(manifest: &Manifest) -> Vec<ValidationIssue> {
    let files = &manifest.files;
    let mut declared: Vec<(&str, &Path)> = Vec::new();
    for (key, list) in [
        ("python_files", &files.python_files),
        ("main_dialog", &files.main_dialog_files),
        ("compiled_ui_files", &files.ui_sources),
        ("resource_files", &files.resource_sources),
        ("extras", &files.extra_files),
        ("extra_dirs", &files.extra_dirs),
    ] {
        declared.extend(list.iter().map(|p| (key, p.as_path())));
    }
    if let Some(help) = &manifest.help {
        if let Some(dir) = &help.dir {
            declared.push(("help.dir", dir.as_path()));
        }
        if let Some(target) = &help.target {
            declared.push(("help.target", Path::new(target)));
        }
    }
    declared
        .into_iter()
        .filter(|(_, path)| !stays_within(path))
        .map(|(key, path)| ValidationIssue::PathEscapesProject {
            key: key.to_string(),
            path: path.to_path_buf(),
        })
        .collect()
}

/// Check the manifest for mandatory sections and options
pub fn validate(manifest: &Manifest) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    issues.extend(plugin_name_issue(manifest));

    if manifest.has_files_section {
        for key in MANDATORY_FILE_KEYS {
            if !manifest.files.declared_keys.contains(key) {
                issues.push(ValidationIssue::MissingKey {
                    section: "files".to_string(),
                    key: (*key).to_string(),
                });
            }
        }
    } else {
        issues.push(ValidationIssue::MissingSection {
            section: "files".to_string(),
        });
    }

    if let Some(help) = &manifest.help {
        if help.dir.is_none() {
            issues.push(ValidationIssue::MissingKey {
                section: "help".to_string(),
                key: "dir".to_string(),
            });
        }
        if help.target.is_none() {
            issues.push(ValidationIssue::MissingKey {
                section: "help".to_string(),
                key: "target".to_string(),
            });
        }
    }

    issues.extend(escaping_paths(manifest));
    issues
}

/// Check that every declared locale has a translation source on disk
pub fn validate_sources(manifest: &Manifest) -> Vec<ValidationIssue> {
    manifest
        .translation_sources()
        .into_iter()
        .filter(|(_, path)| !manifest.resolve(path).is_file())
        .map(|(locale, path)| ValidationIssue::MissingTranslationSource { locale, path })
        .collect()
}

/// Issues that stop deploy and package
pub fn blocking_issues(manifest: &Manifest) -> Vec<ValidationIssue> {
    validate(manifest)
        .into_iter()
        .filter(ValidationIssue::is_blocking)
        .collect()
}

//! Manifest types
//!
//! The on-disk layout (`Raw*` structs) mirrors the three TOML sections
//! `[plugin]`, `[files]` and `[help]`. It is converted into [`Manifest`],
//! where every optional list defaults to empty and presence of sections and
//! keys is remembered for validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File-list keys of the `[files]` section, in manifest order
pub const FILE_KEYS: &[&str] = &[
    "python_files",
    "main_dialog",
    "compiled_ui_files",
    "resource_files",
    "extras",
    "extra_dirs",
    "exclude",
    "locales",
];

/// Default documentation project directory (where `make html` runs)
pub const DEFAULT_HELP_SOURCE: &str = "help";

// =============================================================================
// MANIFEST - validated configuration root
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    /// Directory the manifest was loaded from; declared paths are relative to it
    pub root: PathBuf,
    pub plugin_name: Option<String>,
    /// Install root declared in the manifest, overriding the user default
    pub install_root: Option<PathBuf>,
    /// User profile for the profile-based install layout
    pub profile: Option<String>,
    pub files: FileSet,
    pub help: Option<HelpSection>,
    /// Whether a `[files]` section was present at all
    pub has_files_section: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileSet {
    pub python_files: Vec<PathBuf>,
    pub main_dialog_files: Vec<PathBuf>,
    pub ui_sources: Vec<PathBuf>,
    pub resource_sources: Vec<PathBuf>,
    pub extra_files: Vec<PathBuf>,
    pub extra_dirs: Vec<PathBuf>,
    pub exclude_patterns: Vec<String>,
    pub locales: Vec<String>,
    /// Keys written in the `[files]` section, even if their value is empty
    #[serde(skip)]
    pub declared_keys: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpSection {
    /// Built HTML tree copied into the deployment
    pub dir: Option<PathBuf>,
    /// Subdirectory of the deployed plugin receiving `dir`
    pub target: Option<String>,
    /// Documentation project where the builder runs
    pub source: PathBuf,
}

impl HelpSection {
    /// `(dir, target)` when both are declared
    pub fn copy_spec(&self) -> Option<(&Path, &str)> {
        match (self.dir.as_deref(), self.target.as_deref()) {
            (Some(dir), Some(target)) if !target.trim().is_empty() => Some((dir, target)),
            _ => None,
        }
    }
}

// =============================================================================
// RAW - serde view of the TOML file
// =============================================================================

/// A list written either as a whitespace-separated string or as an array
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum FileList {
    Spaced(String),
    Items(Vec<String>),
}

impl FileList {
    pub(crate) fn into_strings(self) -> Vec<String> {
        match self {
            FileList::Spaced(text) => text.split_whitespace().map(str::to_string).collect(),
            FileList::Items(items) => items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawManifest {
    pub plugin: Option<RawPlugin>,
    pub files: Option<RawFiles>,
    pub help: Option<RawHelp>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPlugin {
    pub name: Option<String>,
    #[serde(alias = "plugin_path")]
    pub install_root: Option<PathBuf>,
    pub profile: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFiles {
    pub python_files: Option<FileList>,
    pub main_dialog: Option<FileList>,
    pub compiled_ui_files: Option<FileList>,
    pub resource_files: Option<FileList>,
    pub extras: Option<FileList>,
    pub extra_dirs: Option<FileList>,
    pub exclude: Option<FileList>,
    pub locales: Option<FileList>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawHelp {
    pub dir: Option<PathBuf>,
    pub target: Option<String>,
    pub source: Option<PathBuf>,
}

fn paths(list: Option<FileList>) -> Vec<PathBuf> {
    strings(list).into_iter().map(PathBuf::from).collect()
}

fn strings(list: Option<FileList>) -> Vec<String> {
    list.map(FileList::into_strings).unwrap_or_default()
}

/// Keep the first occurrence of every entry
fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

impl RawFiles {
    fn declared_keys(&self) -> Vec<&'static str> {
        let present = [
            self.python_files.is_some(),
            self.main_dialog.is_some(),
            self.compiled_ui_files.is_some(),
            self.resource_files.is_some(),
            self.extras.is_some(),
            self.extra_dirs.is_some(),
            self.exclude.is_some(),
            self.locales.is_some(),
        ];
        FILE_KEYS
            .iter()
            .zip(present)
            .filter_map(|(key, is_present)| is_present.then_some(*key))
            .collect()
    }
}

impl From<RawFiles> for FileSet {
    fn from(raw: RawFiles) -> Self {
        let declared_keys = raw.declared_keys();
        FileSet {
            python_files: paths(raw.python_files),
            main_dialog_files: paths(raw.main_dialog),
            ui_sources: paths(raw.compiled_ui_files),
            resource_sources: paths(raw.resource_files),
            extra_files: paths(raw.extras),
            extra_dirs: dedup(paths(raw.extra_dirs)),
            exclude_patterns: dedup(strings(raw.exclude)),
            locales: strings(raw.locales),
            declared_keys,
        }
    }
}

impl From<RawHelp> for HelpSection {
    fn from(raw: RawHelp) -> Self {
        HelpSection {
            dir: raw.dir.filter(|d| !d.as_os_str().is_empty()),
            target: raw
                .target
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            source: raw
                .source
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HELP_SOURCE)),
        }
    }
}

impl RawManifest {
    pub(crate) fn into_manifest(self, root: PathBuf) -> Manifest {
        let plugin = self.plugin.unwrap_or_default();
        let has_files_section = self.files.is_some();
        Manifest {
            root,
            plugin_name: plugin
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            install_root: plugin.install_root.filter(|p| !p.as_os_str().is_empty()),
            profile: plugin
                .profile
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            files: self.files.map(FileSet::from).unwrap_or_default(),
            help: self.help.map(HelpSection::from),
            has_files_section,
        }
    }
}

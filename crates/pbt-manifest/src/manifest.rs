//! Manifest operations - loading and the file lists derived from it

use crate::artifacts::{ArtifactKind, DerivedArtifact};
use crate::errors::ManifestError;
use crate::types::{Manifest, RawManifest};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default manifest file name
pub const DEFAULT_MANIFEST_NAME: &str = "pbt.toml";

/// Directory holding translation sources, relative to the project root
pub const TRANSLATION_DIR: &str = "i18n";

impl Manifest {
    /// Load a manifest from `path`.
    ///
    /// Missing optional sections and keys default to empty; only a missing
    /// file or unparsable TOML is an error.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound(path.to_path_buf()));
        }
        debug!("Reading manifest from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content, project_root(path)).map_err(|source| {
            ManifestError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Parse manifest text whose declared paths are relative to `root`
    pub fn from_toml_str(content: &str, root: PathBuf) -> Result<Self, toml::de::Error> {
        let raw: RawManifest = toml::from_str(content)?;
        Ok(raw.into_manifest(root))
    }

    pub fn plugin_name(&self) -> Option<&str> {
        self.plugin_name.as_deref()
    }

    /// Resolve a declared relative path against the project root
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// UI artifacts followed by resource artifacts, in declaration order
    pub fn derived_artifacts(&self) -> Vec<DerivedArtifact> {
        let ui = self
            .files
            .ui_sources
            .iter()
            .map(|s| DerivedArtifact::from_source(s, ArtifactKind::Ui));
        let resources = self
            .files
            .resource_sources
            .iter()
            .map(|s| DerivedArtifact::from_source(s, ArtifactKind::Resource));
        ui.chain(resources).collect()
    }

    /// Plain files to deploy: python files, main dialogs, compiled UI
    /// outputs, compiled resource outputs and extras, in that order.
    pub fn install_files(&self) -> Vec<PathBuf> {
        let files = &self.files;
        let artifacts = self.derived_artifacts();
        files
            .python_files
            .iter()
            .chain(&files.main_dialog_files)
            .cloned()
            .chain(artifacts.into_iter().map(|a| a.output))
            .chain(files.extra_files.iter().cloned())
            .collect()
    }

    /// `(locale, translation source)` pairs. A locale may be written with or
    /// without its `.ts` extension.
    pub fn translation_sources(&self) -> Vec<(String, PathBuf)> {
        self.files
            .locales
            .iter()
            .map(|locale| {
                let stem = locale.strip_suffix(".ts").unwrap_or(locale);
                let path = Path::new(TRANSLATION_DIR).join(format!("{stem}.ts"));
                (stem.to_string(), path)
            })
            .collect()
    }
}

/// Raw manifest text, for display
pub fn raw_text(path: &Path) -> Result<String, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn project_root(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

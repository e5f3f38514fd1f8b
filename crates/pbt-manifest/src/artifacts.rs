//! Derived artifacts: files generated from UI and resource descriptors

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension of every generated output
pub const DERIVED_EXTENSION: &str = "py";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Ui,
    Resource,
}

impl ArtifactKind {
    pub fn label(self) -> &'static str {
        match self {
            ArtifactKind::Ui => "UI",
            ArtifactKind::Resource => "resource",
        }
    }
}

/// A `(source, output, kind)` triple. Paths are relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedArtifact {
    pub source: PathBuf,
    pub output: PathBuf,
    pub kind: ArtifactKind,
}

impl DerivedArtifact {
    /// The output keeps the source's directory and stem and takes the
    /// canonical derived extension, e.g. `dlg.ui` -> `dlg.py`.
    pub fn from_source(source: &Path, kind: ArtifactKind) -> Self {
        DerivedArtifact {
            source: source.to_path_buf(),
            output: source.with_extension(DERIVED_EXTENSION),
            kind,
        }
    }

    /// The same artifact with both paths resolved against `root`
    pub fn rooted(&self, root: &Path) -> Self {
        DerivedArtifact {
            source: root.join(&self.source),
            output: root.join(&self.output),
            kind: self.kind,
        }
    }
}

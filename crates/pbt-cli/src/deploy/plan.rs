//! Turning a manifest into an ordered list of filesystem operations

use crate::context::checked_plugin_name;
use crate::errors::PbtError;
use pbt_manifest::{stays_within, DerivedArtifact, Manifest};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// Remove the old deployment, rebuild, then copy
    Full,
    /// Copy over the existing deployment without rebuilding
    Quick,
}

/// One step of a deployment. Paths are absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    RemoveTree { path: PathBuf },
    CreateDir { path: PathBuf },
    CompileArtifact { artifact: DerivedArtifact },
    BuildDocs { project_dir: PathBuf },
    CopyFile { src: PathBuf, dst: PathBuf },
    CopyTree { src: PathBuf, dst: PathBuf },
    /// A declared path that is absolute or climbs out of its directory.
    /// Always recorded as failed.
    Refuse { path: PathBuf },
}

impl Operation {
    /// Short human description, e.g. `copy a.py`
    pub fn describe(&self) -> String {
        match self {
            Operation::RemoveTree { path } => format!("remove {}", path.display()),
            Operation::CreateDir { path } => format!("create {}", path.display()),
            Operation::CompileArtifact { artifact } => {
                format!("compile {}", artifact.source.display())
            }
            Operation::BuildDocs { project_dir } => {
                format!("build docs in {}", project_dir.display())
            }
            Operation::CopyFile { src, .. } => format!("copy {}", src.display()),
            Operation::CopyTree { src, .. } => format!("copy tree {}", src.display()),
            Operation::Refuse { path } => format!("copy {}", path.display()),
        }
    }
}

/// An immutable, ordered deployment. Consumed once by the executor.
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentPlan {
    pub target: PathBuf,
    /// Project root that exclude patterns are relative to
    pub source_root: PathBuf,
    pub mode: PlanMode,
    pub exclude_patterns: Vec<String>,
    pub operations: Vec<Operation>,
}

impl DeploymentPlan {
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Plan a deployment of `manifest` into `target_root/<plugin name>`.
///
/// Every declared file becomes exactly one copy; whether it exists is only
/// checked when the plan runs. Declared paths that would leave the project
/// or the deployment become [`Operation::Refuse`].
pub fn plan(manifest: &Manifest, target_root: &Path, mode: PlanMode) -> Result<DeploymentPlan, PbtError> {
    let name = checked_plugin_name(manifest)?;
    let target = target_root.join(name);
    let mut operations = Vec::new();

    if mode == PlanMode::Full {
        operations.push(Operation::RemoveTree {
            path: target.clone(),
        });
    }
    operations.push(Operation::CreateDir {
        path: target.clone(),
    });

    if mode == PlanMode::Full {
        operations.extend(
            manifest
                .derived_artifacts()
                .iter()
                // the refused copy of the output reports these
                .filter(|a| stays_within(&a.source))
                .map(|a| Operation::CompileArtifact {
                    artifact: a.rooted(&manifest.root),
                }),
        );
        if let Some(help) = &manifest.help {
            if help.copy_spec().is_some() {
                operations.push(Operation::BuildDocs {
                    project_dir: manifest.resolve(&help.source),
                });
            }
        }
    }

    operations.extend(manifest.install_files().into_iter().map(|file| {
        contained(&file, || Operation::CopyFile {
            src: manifest.resolve(&file),
            dst: target.join(&file),
        })
    }));

    operations.extend(manifest.files.extra_dirs.iter().map(|dir| {
        contained(dir, || Operation::CopyTree {
            src: manifest.resolve(dir),
            dst: target.join(dir),
        })
    }));

    if let Some((dir, help_target)) = manifest.help.as_ref().and_then(|h| h.copy_spec()) {
        let help_target = Path::new(help_target);
        let operation = if stays_within(help_target) {
            contained(dir, || Operation::CopyTree {
                src: manifest.resolve(dir),
                dst: target.join(help_target),
            })
        } else {
            Operation::Refuse {
                path: help_target.to_path_buf(),
            }
        };
        operations.push(operation);
    }

    tracing::debug!("Planned {} operations for {}", operations.len(), target.display());
    Ok(DeploymentPlan {
        target,
        source_root: manifest.root.clone(),
        mode,
        exclude_patterns: manifest.files.exclude_patterns.clone(),
        operations,
    })
}

fn contained(declared: &Path, operation: impl FnOnce() -> Operation) -> Operation {
    if stays_within(declared) {
        operation()
    } else {
        Operation::Refuse {
            path: declared.to_path_buf(),
        }
    }
}

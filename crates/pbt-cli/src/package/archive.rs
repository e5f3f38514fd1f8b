//! Zip archives of a deployed plugin tree
//!
//! The archive always holds a single top-level directory named after the
//! plugin. The work is delegated to `zip` or `7z`, whichever is found first
//! in the user's preference order.

use crate::deploy::copy::{copy_tree, ExcludeFilter};
use crate::errors::PbtError;
use crate::tools::{ToolInvocation, Toolbox};
use pbt_config::ArchiverKind;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct ArchiveResult {
    pub archive: PathBuf,
    pub archiver: ArchiverKind,
    /// Top-level entry inside the archive
    pub entry_name: String,
    pub replaced_existing: bool,
    /// Problems preparing the staged tree that did not stop packaging
    pub warnings: Vec<String>,
}

/// First available archiver in preference order
pub fn select_archiver(toolbox: &Toolbox<'_>) -> Result<(ArchiverKind, PathBuf), PbtError> {
    ArchiverKind::preference(toolbox.settings)
        .into_iter()
        .find_map(|kind| toolbox.locate_program(kind.program()).map(|path| (kind, path)))
        .ok_or(PbtError::NoArchiverAvailable)
}

/// Archive `source_dir` into `destination` with a single top-level entry
/// named `plugin_name`. An existing archive at `destination` is replaced.
pub fn archive(
    source_dir: &Path,
    plugin_name: &str,
    destination: &Path,
    toolbox: &Toolbox<'_>,
) -> Result<ArchiveResult, PbtError> {
    let (archiver, program) = select_archiver(toolbox)?;
    if !source_dir.is_dir() {
        return Err(PbtError::NotDeployed(source_dir.to_path_buf()));
    }

    // The tree must sit in a directory named after the plugin
    let staging;
    let named_tree = if source_dir.file_name().is_some_and(|n| n == plugin_name) {
        source_dir.to_path_buf()
    } else {
        staging = TempDir::new()?;
        let tree = staging.path().join(plugin_name);
        debug!("Staging {} as {}", source_dir.display(), tree.display());
        copy_tree(source_dir, &tree, &ExcludeFilter::empty())?;
        tree
    };
    let Some(parent) = named_tree.parent() else {
        return Err(PbtError::NotDeployed(named_tree.clone()));
    };

    let destination = if destination.is_absolute() {
        destination.to_path_buf()
    } else {
        std::env::current_dir()?.join(destination)
    };
    if let Some(dir) = destination.parent() {
        fs::create_dir_all(dir)?;
    }
    let replaced_existing = destination.exists();
    if replaced_existing {
        debug!("Removing existing archive {}", destination.display());
        fs::remove_file(&destination)?;
    }

    let invocation = match archiver {
        ArchiverKind::Zip => ToolInvocation::new(program).arg("-r").arg("-q"),
        ArchiverKind::SevenZip => ToolInvocation::new(program).arg("a").arg("-tzip").arg("-r"),
    }
    .arg(&destination)
    .arg(plugin_name)
    .current_dir(parent);

    let output = toolbox.run(&invocation);
    if !output.success {
        return Err(PbtError::ArchiveFailed {
            archiver,
            archive: destination,
            reason: output.failure_reason(),
        });
    }

    info!("Created {} with {}", destination.display(), archiver.program());
    Ok(ArchiveResult {
        archive: destination,
        archiver,
        entry_name: plugin_name.to_string(),
        replaced_existing,
        warnings: Vec::new(),
    })
}

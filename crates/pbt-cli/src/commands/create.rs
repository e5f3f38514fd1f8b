use crate::prompt::confirm;
use crate::{GlobalOpts, PbtError};
use colored::*;
use pbt_logger as logger;
use pbt_manifest::{write_manifest, ManifestError};
use std::path::{Path, PathBuf};

/// Write a best-guess manifest for the project in `dir`. Returns the files
/// created.
pub fn scaffold(dir: &Path, file_name: Option<&str>, overwrite: bool) -> Result<Vec<PathBuf>, PbtError> {
    let path = write_manifest(dir, file_name, overwrite)?;
    Ok(vec![path])
}

pub fn handle_create(dir: Option<PathBuf>, yes: bool, opts: &GlobalOpts) -> Result<(), String> {
    let dir = dir.unwrap_or_else(|| PathBuf::from("."));
    let file_name = opts
        .manifest
        .file_name()
        .map(|n| n.to_string_lossy().to_string());

    let created = match scaffold(&dir, file_name.as_deref(), false) {
        Err(PbtError::Manifest(ManifestError::AlreadyExists(path))) => {
            if !yes && !confirm(&format!("File '{}' already exists. Overwrite?", path.display())) {
                println!("Operation cancelled.");
                return Ok(());
            }
            scaffold(&dir, file_name.as_deref(), true)
        }
        other => other,
    }
    .map_err(|e| e.to_string())?;

    for path in &created {
        logger::success(&format!("Created {}", path.display()));
    }
    println!();
    println!("Next steps:");
    println!("  1. Review the guessed file lists in {}", created.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ").bold());
    println!("  2. Check it: pbt validate");
    println!("  3. Deploy it: pbt deploy");
    Ok(())
}

//! Best-guess manifest for an existing plugin project
//!
//! The project directory is surveyed (top level plus `i18n/`) and the
//! findings are substituted into a commented template.

use crate::errors::ManifestError;
use crate::manifest::{DEFAULT_MANIFEST_NAME, TRANSLATION_DIR};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

const MAIN_DIALOG_SUFFIX: &str = "_dialog_base.ui";

static METADATA_NAME: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*name\s*[=:]\s*(.+?)\s*$").ok());

/// What a project directory appears to contain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSurvey {
    pub name: String,
    pub python_files: Vec<String>,
    pub main_dialog: Vec<String>,
    pub ui_files: Vec<String>,
    pub resources: Vec<String>,
    pub extras: Vec<String>,
    pub locales: Vec<String>,
}

/// Survey `dir` for plugin sources. The plugin name comes from
/// `metadata.txt`, falling back to the directory name.
pub fn survey_project(dir: &Path) -> Result<ProjectSurvey, ManifestError> {
    let mut survey = ProjectSurvey {
        name: plugin_name_from_metadata(dir)
            .or_else(|| {
                dir.canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            })
            .unwrap_or_default(),
        ..Default::default()
    };

    for name in file_names(dir)? {
        if name.ends_with(".py") {
            survey.python_files.push(name);
        } else if name.ends_with(MAIN_DIALOG_SUFFIX) {
            survey.main_dialog.push(name);
        } else if name.ends_with(".ui") {
            survey.ui_files.push(name);
        } else if name.ends_with(".qrc") {
            survey.resources.push(name);
        } else if name.ends_with(".png") || name == "metadata.txt" {
            survey.extras.push(name);
        }
    }

    let i18n = dir.join(TRANSLATION_DIR);
    if i18n.is_dir() {
        survey.locales = file_names(&i18n)?
            .into_iter()
            .filter(|n| n.ends_with(".ts"))
            .collect();
    }

    debug!("Surveyed {}: {:?}", dir.display(), survey);
    Ok(survey)
}

/// Sorted names of the regular files directly inside `dir`
fn file_names(dir: &Path) -> Result<Vec<String>, ManifestError> {
    let mut names = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            ManifestError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
            }))
        })?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Read `name` from the `[general]` section of `metadata.txt`
pub fn plugin_name_from_metadata(dir: &Path) -> Option<String> {
    let content = fs::read_to_string(dir.join("metadata.txt")).ok()?;
    let pattern = METADATA_NAME.as_ref()?;
    let mut in_general = false;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_general = trimmed.eq_ignore_ascii_case("[general]");
            continue;
        }
        if in_general {
            if let Some(caps) = pattern.captures(trimmed) {
                return caps.get(1).map(|m| m.as_str().to_string());
            }
        }
    }
    None
}

fn quoted(items: &[String]) -> String {
    format!("\"{}\"", items.join(" "))
}

/// Render the manifest template for a survey
pub fn render(survey: &ProjectSurvey) -> String {
    format!(
        r#"# Configuration file for the plugin build tool (pbt)
# Sane defaults guessed from the files in this directory are set below.
#
# As you add Python source files and UI files to your plugin, add
# them to the appropriate [files] entry below. Lists are written as
# space-separated strings or as TOML arrays.

[plugin]
# Name of the plugin. This is the name of the directory that will
# be created in the plugin install directory.
name = "{name}"
# install_root = "/path/to/plugins"
# profile = "default"

[files]
# Python files that should be deployed with the plugin
python_files = {python_files}

# The main dialog file that is loaded (not compiled)
main_dialog = {main_dialog}

# Other ui files for your dialogs (these will be compiled)
compiled_ui_files = {ui_files}

# Resource file(s) that will be compiled
resource_files = {resources}

# Other files required for the plugin
extras = {extras}

# Other directories to be deployed with the plugin.
# These must be subdirectories under the plugin directory
extra_dirs = ""

# Gitignore-style patterns for files that are never deployed
exclude = ""

# ISO code(s) for any locales (translations), separated by spaces.
# Corresponding .ts files must exist in the i18n directory
locales = {locales}

[help]
# the built help directory that should be deployed with the plugin
dir = "help/build/html"
# the name of the directory to target in the deployed plugin
target = "help"
"#,
        name = survey.name.replace('"', "\\\""),
        python_files = quoted(&survey.python_files),
        main_dialog = quoted(&survey.main_dialog),
        ui_files = quoted(&survey.ui_files),
        resources = quoted(&survey.resources),
        extras = quoted(&survey.extras),
        locales = quoted(&survey.locales),
    )
}

/// Survey `dir` and write a manifest into it. Returns the created file.
pub fn write_manifest(dir: &Path, file_name: Option<&str>, overwrite: bool) -> Result<PathBuf, ManifestError> {
    let path = dir.join(file_name.unwrap_or(DEFAULT_MANIFEST_NAME));
    if path.exists() && !overwrite {
        return Err(ManifestError::AlreadyExists(path));
    }
    let survey = survey_project(dir)?;
    fs::write(&path, render(&survey))?;
    info!("Manifest written to {}", path.display());
    Ok(path)
}

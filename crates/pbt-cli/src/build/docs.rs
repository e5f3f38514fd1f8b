//! Documentation builds through the project's doc makefile

use crate::errors::PbtError;
use crate::tools::{ToolInvocation, ToolOutput, Toolbox};
use pbt_config::ToolKind;
use std::path::Path;
use tracing::info;

/// Run `make <target>` inside the documentation project directory
pub fn run_make(project_dir: &Path, target: &str, toolbox: &Toolbox<'_>) -> Result<ToolOutput, PbtError> {
    if !project_dir.is_dir() {
        return Err(PbtError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("documentation directory {} does not exist", project_dir.display()),
        )));
    }
    let program = toolbox
        .locate(ToolKind::DocBuilder)
        .ok_or(PbtError::ToolUnavailable(ToolKind::DocBuilder))?;
    info!("Running make {} in {}", target, project_dir.display());
    let invocation = ToolInvocation::new(program)
        .arg(target)
        .current_dir(project_dir);
    Ok(toolbox.run(&invocation))
}

pub fn build_html(project_dir: &Path, toolbox: &Toolbox<'_>) -> Result<ToolOutput, PbtError> {
    run_make(project_dir, "html", toolbox)
}

pub fn clean(project_dir: &Path, toolbox: &Toolbox<'_>) -> Result<ToolOutput, PbtError> {
    run_make(project_dir, "clean", toolbox)
}

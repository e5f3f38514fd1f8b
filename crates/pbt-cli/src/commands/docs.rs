use crate::build::docs;
use crate::tools::ToolOutput;
use crate::{Context, GlobalOpts, PbtError};
use pbt_logger as logger;
use pbt_manifest::types::DEFAULT_HELP_SOURCE;
use std::path::PathBuf;

/// The documentation project directory: `[help] source`, or `help`
fn project_dir(ctx: &Context) -> PathBuf {
    let source = ctx
        .manifest
        .help
        .as_ref()
        .map_or_else(|| PathBuf::from(DEFAULT_HELP_SOURCE), |h| h.source.clone());
    ctx.manifest.resolve(&source)
}

pub fn build_docs(ctx: &Context) -> Result<ToolOutput, PbtError> {
    docs::build_html(&project_dir(ctx), &ctx.toolbox())
}

pub fn clean_docs(ctx: &Context) -> Result<ToolOutput, PbtError> {
    docs::clean(&project_dir(ctx), &ctx.toolbox())
}

pub fn handle_doc(clean: bool, opts: &GlobalOpts) -> Result<(), String> {
    let ctx = Context::load(&opts.manifest).map_err(|e| e.to_string())?;
    let dir = project_dir(&ctx);
    if !dir.is_dir() {
        logger::warn(&format!("No help directory exists at {}", dir.display()));
        return Ok(());
    }
    let (verb, output) = if clean {
        logger::info("Removing built HTML from the help documentation");
        ("clean", clean_docs(&ctx))
    } else {
        logger::info("Building the help documentation");
        ("build", build_docs(&ctx))
    };
    let output = output.map_err(|e| e.to_string())?;
    if output.success {
        logger::success(&format!("Documentation {verb} finished"));
        Ok(())
    } else {
        Err(format!("make failed: {}", output.failure_reason()))
    }
}

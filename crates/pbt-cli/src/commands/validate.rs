use crate::tools::Toolbox;
use crate::{Context, GlobalOpts, PbtError};
use colored::*;
use pbt_config::{ArchiverKind, ToolKind};
use pbt_logger as logger;
use pbt_manifest::{validate_sources, Manifest, ValidationIssue};
use std::path::Path;

/// Every problem with the manifest at `manifest_path`, including locales
/// without a translation source
pub fn validate(manifest_path: &Path) -> Result<Vec<ValidationIssue>, PbtError> {
    let manifest = Manifest::load(manifest_path)?;
    let mut issues = pbt_manifest::validate(&manifest);
    issues.extend(validate_sources(&manifest));
    Ok(issues)
}

pub fn handle_validate(opts: &GlobalOpts) -> Result<(), String> {
    logger::debug(&format!("Validating {}", opts.manifest.display()));
    let issues = validate(&opts.manifest).map_err(|e| e.to_string())?;

    if opts.json {
        crate::common::print_json(&issues)?;
    } else {
        println!("{} {}", "Manifest:".bold().green(), opts.manifest.display());
        if issues.is_empty() {
            println!("  {} no problems found", "✔".green());
        }
        for issue in &issues {
            let marker = if issue.is_blocking() { "✘".red() } else { "!".yellow() };
            println!("  {} {}", marker, issue);
        }
        if let Ok(ctx) = Context::load(&opts.manifest) {
            print_tools(&ctx.toolbox());
        }
    }

    let blocking = issues.iter().filter(|i| i.is_blocking()).count();
    if blocking > 0 {
        return Err(format!(
            "{blocking} problem(s) must be fixed before deploying or packaging"
        ));
    }
    Ok(())
}

fn print_tools(toolbox: &Toolbox<'_>) {
    println!("{}", "Tools:".bold().green());
    for kind in [
        ToolKind::UiCompiler,
        ToolKind::ResourceCompiler,
        ToolKind::TranslationLinker,
        ToolKind::DocBuilder,
    ] {
        match toolbox.locate(kind) {
            Some(path) => println!("  {} {}: {}", "✔".green(), kind, path.display()),
            None => println!("  {} {}: {}", "✘".red(), kind, "not found".dimmed()),
        }
    }
    match crate::package::select_archiver(toolbox) {
        Ok((kind, path)) => println!("  {} archiver ({}): {}", "✔".green(), kind.program(), path.display()),
        Err(_) => println!(
            "  {} archiver: {}",
            "✘".red(),
            format!("{} or {} not found", ArchiverKind::Zip.program(), ArchiverKind::SevenZip.program()).dimmed()
        ),
    }
}

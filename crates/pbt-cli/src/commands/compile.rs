use crate::build::{ArtifactCompiler, CompileReport, CompileStatus};
use crate::{Context, GlobalOpts};
use colored::*;
use pbt_logger as logger;
use pbt_manifest::{ArtifactKind, DerivedArtifact};

/// Compile every stale UI and resource artifact declared in the manifest
pub fn compile(ctx: &Context) -> CompileReport {
    let artifacts: Vec<DerivedArtifact> = ctx
        .manifest
        .derived_artifacts()
        .iter()
        .map(|a| a.rooted(&ctx.manifest.root))
        .collect();
    ArtifactCompiler::new(ctx.toolbox()).compile(&artifacts)
}

pub fn handle_compile(opts: &GlobalOpts) -> Result<(), String> {
    let ctx = Context::load(&opts.manifest).map_err(|e| e.to_string())?;
    logger::spinner_start("Compiling UI and resource files");
    let report = compile(&ctx);
    logger::spinner_stop();

    if opts.json {
        return crate::common::print_json(&report);
    }
    print_report(&report);

    let failed = report.failures().count();
    if failed > 0 {
        return Err(format!("{failed} file(s) failed to compile"));
    }
    Ok(())
}

pub(crate) fn print_report(report: &CompileReport) {
    for entry in &report.entries {
        let source = entry.artifact.source.display();
        match &entry.status {
            CompileStatus::Compiled => println!("  {} {}", "compiled".green(), source),
            CompileStatus::Unchanged => logger::debug(&format!("Skipped {source}: up to date")),
            CompileStatus::SourceMissing => println!("  {} {} (source missing)", "skipped".yellow(), source),
            CompileStatus::ToolUnavailable => {}
            CompileStatus::Failed(reason) => println!("  {} {}: {}", "failed".red(), source, reason),
        }
    }
    println!(
        "Compiled {} UI and {} resource files ({} skipped)",
        report.compiled_of_kind(ArtifactKind::Ui),
        report.compiled_of_kind(ArtifactKind::Resource),
        report.skipped_count()
    );
}

use crate::deploy::{plan, DeploymentExecutor, ExecutionReport, Outcome, PlanMode};
use crate::prompt::confirm;
use crate::{Context, GlobalOpts, PbtError};
use clap::Args;
use colored::*;
use pbt_logger as logger;
use pbt_manifest::blocking_issues;
use std::path::{Path, PathBuf};

const REMEDIATION: &str = "One or more files or directories named in the manifest failed to \
deploy. Make sure they exist, or remove them from the manifest if they are not needed. \
Make sure UI and resource files are compiled; running dclean before deploying may also help.";

#[derive(Args, Debug, Clone, Default)]
pub struct DeployArgs {
    /// Copy files over the existing deployment without removing it or
    /// compiling UI, resource and help files
    #[arg(short, long)]
    pub quick: bool,

    /// Plugin directory to deploy into instead of the configured one
    #[arg(short, long, value_name = "DIR")]
    pub plugin_path: Option<PathBuf>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Deploy the plugin. A full deployment deletes the current one first and
/// therefore needs `confirmed`; a quick one does not.
pub fn deploy(
    ctx: &Context,
    target_override: Option<&Path>,
    quick: bool,
    confirmed: bool,
) -> Result<ExecutionReport, PbtError> {
    let issues = blocking_issues(&ctx.manifest);
    if !issues.is_empty() {
        return Err(PbtError::ConfigIncomplete(issues));
    }
    let root = ctx.install_root(target_override)?;
    if !quick && !confirmed {
        return Err(PbtError::Cancelled);
    }
    let mode = if quick { PlanMode::Quick } else { PlanMode::Full };
    let plan = plan(&ctx.manifest, &root.path, mode)?;
    Ok(DeploymentExecutor::new(ctx.toolbox()).execute(plan))
}

pub fn handle_deploy(args: DeployArgs, opts: &GlobalOpts) -> Result<(), String> {
    let ctx = Context::load(&opts.manifest).map_err(|e| e.to_string())?;
    let target = ctx
        .deployment_dir(args.plugin_path.as_deref())
        .map_err(|e| e.to_string())?;

    let confirmed = args.quick
        || args.yes
        || {
            println!("Deploying will:");
            println!("  * Remove the currently deployed version at {}", target.display());
            println!("  * Compile the UI and resource files");
            println!("  * Build the help docs");
            println!("  * Copy everything to {}", target.display());
            confirm("Proceed?")
        };
    if !confirmed {
        println!("Operation cancelled.");
        return Ok(());
    }

    if args.quick {
        logger::info("Doing quick deployment");
    } else {
        logger::info(&format!("Deploying to {}", target.display()));
    }
    let report = deploy(&ctx, args.plugin_path.as_deref(), args.quick, confirmed)
        .map_err(|e| e.to_string())?;

    if opts.json {
        crate::common::print_json(&report)?;
    } else {
        print_report(&report);
    }
    finish(&report, args.quick)
}

pub(crate) fn print_report(report: &ExecutionReport) {
    for entry in &report.entries {
        let line = entry.operation.describe();
        match &entry.outcome {
            Outcome::Succeeded => logger::step(&line),
            Outcome::Skipped(reason) => logger::debug(&format!("{line}: skipped ({reason})")),
            Outcome::Failed(_) => println!("  {} {}", line, "----> ERROR".red()),
        }
    }
}

/// Summarize a finished deployment; failures become the command's error
pub(crate) fn finish(report: &ExecutionReport, quick: bool) -> Result<(), String> {
    if report.is_success() {
        if quick {
            logger::success(
                "Quick deployment complete. If you have problems with your plugin, try doing a full deploy.",
            );
        } else {
            logger::success(&format!(
                "Deployed to {} ({} operations, {} compiled)",
                report.target.display(),
                report.succeeded_count(),
                report.compiled_count()
            ));
        }
        return Ok(());
    }
    eprintln!();
    eprintln!("{}", "ERRORS:".red().bold());
    for line in report.failure_summary() {
        eprintln!("  {line}");
    }
    eprintln!();
    eprintln!("{REMEDIATION}");
    Err(format!("{} operation(s) failed", report.failure_count()))
}

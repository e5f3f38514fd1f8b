use crate::deploy::copy::{copy_tree, ExcludeFilter};
use crate::deploy::{plan, DeploymentExecutor, PlanMode};
use crate::package::{archive, select_archiver, ArchiveResult};
use crate::{Context, GlobalOpts, PbtError};
use clap::Args;
use pbt_logger as logger;
use std::path::Path;
use tempfile::TempDir;

#[derive(Args, Debug, Clone, Default)]
pub struct PackageArgs {
    /// Archive the existing deployment instead of building a fresh copy
    #[arg(short, long)]
    pub quick: bool,
}

/// Package the plugin as `<project root>/<plugin name>.zip`.
///
/// The archive is always made from a throwaway staging copy. Normally that
/// copy is a full deployment into the staging directory; with `quick` it is
/// a copy of the existing deployment, which must exist.
pub fn package(ctx: &Context, quick: bool) -> Result<ArchiveResult, PbtError> {
    let name = ctx.require_plugin_name()?;
    let toolbox = ctx.toolbox();
    select_archiver(&toolbox)?;

    let staging = TempDir::new()?;
    let tree = staging.path().join(name);
    let mut warnings = Vec::new();

    if quick {
        let deployed = ctx.deployment_dir(None)?;
        if !deployed.is_dir() {
            return Err(PbtError::NotDeployed(deployed));
        }
        copy_tree(&deployed, &tree, &ExcludeFilter::empty())?;
    } else {
        let plan = plan(&ctx.manifest, staging.path(), PlanMode::Full)?;
        let report = DeploymentExecutor::new(toolbox).execute(plan);
        warnings = report.failure_summary();
    }

    let destination = ctx.manifest.resolve(Path::new(&format!("{name}.zip")));
    let mut result = archive(&tree, name, &destination, &toolbox)?;
    result.warnings = warnings;
    Ok(result)
}

pub fn handle_package(args: PackageArgs, opts: &GlobalOpts) -> Result<(), String> {
    let ctx = Context::load(&opts.manifest).map_err(|e| e.to_string())?;
    logger::spinner_start("Packaging plugin");
    let result = match package(&ctx, args.quick) {
        Ok(result) => {
            logger::spinner_success(&format!("Packaged {}", result.entry_name));
            result
        }
        Err(e) => {
            logger::spinner_error("Packaging failed");
            return Err(e.to_string());
        }
    };

    if opts.json {
        return crate::common::print_json(&result);
    }
    for warning in &result.warnings {
        logger::warn(&format!("Not packaged: {warning}"));
    }
    logger::success(&format!(
        "The {} archive has been created with {}",
        result.archive.display(),
        result.archiver.program()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use crate::testing::{full_probe, FakeInvoker};
    use std::fs;

    const MANIFEST: &str =
        "[plugin]\nname = \"demo\"\n[files]\npython_files = \"a.py\"\ncompiled_ui_files = \"dlg.ui\"\n";

    #[test]
    fn test_package_builds_fresh_copy() {
        let Some(fixture) = Fixture::new(MANIFEST, &["a.py", "dlg.ui"]) else {
            return;
        };
        let Some(ctx) = fixture.context() else {
            return;
        };
        let Ok(result) = package(&ctx, false) else {
            panic!("package should succeed");
        };
        assert!(result.warnings.is_empty());
        assert_eq!(result.archive, fixture.project().join("demo.zip"));
        let listing = fs::read_to_string(&result.archive).unwrap_or_default();
        assert_eq!(listing.lines().collect::<Vec<_>>(), vec!["demo/a.py", "demo/dlg.py"]);
        // Packaging never touches the real deployment
        assert!(!fixture.plugins().exists());
    }

    #[test]
    fn test_package_replaces_existing_archive() {
        let Some(fixture) = Fixture::new(MANIFEST, &["a.py", "dlg.ui"]) else {
            return;
        };
        let Some(ctx) = fixture.context() else {
            return;
        };
        assert!(fs::write(fixture.project().join("demo.zip"), "stale\n").is_ok());
        let Ok(result) = package(&ctx, false) else {
            panic!("package should succeed");
        };
        assert!(result.replaced_existing);
        let listing = fs::read_to_string(&result.archive).unwrap_or_default();
        assert!(!listing.contains("stale"));
        assert_eq!(listing.lines().count(), 2);
    }

    #[test]
    fn test_quick_package_needs_deployment() {
        let Some(fixture) = Fixture::new(MANIFEST, &["a.py"]) else {
            return;
        };
        let Some(ctx) = fixture.context() else {
            return;
        };
        assert!(matches!(package(&ctx, true), Err(PbtError::NotDeployed(_))));

        assert!(fs::create_dir_all(fixture.plugins().join("demo")).is_ok());
        assert!(fs::write(fixture.plugins().join("demo/a.py"), "").is_ok());
        let Ok(result) = package(&ctx, true) else {
            panic!("quick package should succeed");
        };
        let listing = fs::read_to_string(&result.archive).unwrap_or_default();
        assert_eq!(listing.trim(), "demo/a.py");
    }

    #[test]
    fn test_missing_file_is_a_warning() {
        let Some(fixture) = Fixture::new(MANIFEST, &["dlg.ui"]) else {
            return;
        };
        let Some(ctx) = fixture.context_with(full_probe(), FakeInvoker::new()) else {
            return;
        };
        let Ok(result) = package(&ctx, false) else {
            panic!("package should succeed");
        };
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("a.py"));
    }

    #[test]
    fn test_missing_name_refused() {
        let Some(fixture) = Fixture::new("[files]\npython_files = \"a.py\"\n", &["a.py"]) else {
            return;
        };
        let Some(ctx) = fixture.context() else {
            return;
        };
        assert!(matches!(package(&ctx, false), Err(PbtError::ConfigIncomplete(_))));
    }
}

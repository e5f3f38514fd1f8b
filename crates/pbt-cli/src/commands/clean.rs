use crate::prompt::confirm;
use crate::{Context, GlobalOpts, PbtError};
use colored::*;
use pbt_logger as logger;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled artifacts removed by [`clean`]
#[derive(Debug, Default, Serialize)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Delete the generated outputs of every declared UI and resource source
pub fn clean(ctx: &Context) -> CleanReport {
    let mut report = CleanReport::default();
    for artifact in ctx.manifest.derived_artifacts() {
        let output = ctx.manifest.resolve(&artifact.output);
        if !output.exists() {
            report.missing.push(artifact.output);
            continue;
        }
        match fs::remove_file(&output) {
            Ok(()) => report.removed.push(artifact.output),
            Err(e) => report.failed.push((artifact.output, e.to_string())),
        }
    }
    report
}

/// Remove the deployed plugin directory. Returns whether anything was removed.
pub fn clean_deployment(ctx: &Context, target_override: Option<&Path>) -> Result<bool, PbtError> {
    let dir = ctx.deployment_dir(target_override)?;
    if !dir.exists() {
        tracing::debug!("Nothing deployed at {}", dir.display());
        return Ok(false);
    }
    fs::remove_dir_all(&dir)?;
    Ok(true)
}

pub fn handle_clean(opts: &GlobalOpts) -> Result<(), String> {
    let ctx = Context::load(&opts.manifest).map_err(|e| e.to_string())?;
    let report = clean(&ctx);
    if opts.json {
        return crate::common::print_json(&report);
    }
    for path in &report.removed {
        println!("  {} {}", "deleted".green(), path.display());
    }
    for (path, reason) in &report.failed {
        println!("  {} {}: {}", "couldn't delete".red(), path.display(), reason);
    }
    logger::success(&format!("Removed {} compiled file(s)", report.removed.len()));
    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} file(s) could not be deleted", report.failed.len()))
    }
}

pub fn handle_dclean(plugin_path: Option<PathBuf>, yes: bool, opts: &GlobalOpts) -> Result<(), String> {
    let ctx = Context::load(&opts.manifest).map_err(|e| e.to_string())?;
    let dir = ctx
        .deployment_dir(plugin_path.as_deref())
        .map_err(|e| e.to_string())?;

    if !yes && !confirm(&format!("Delete the deployed plugin from {}?", dir.display())) {
        println!("Plugin was not deleted");
        return Ok(());
    }
    match clean_deployment(&ctx, plugin_path.as_deref()) {
        Ok(true) => {
            logger::success(&format!("Removed plugin from {}", dir.display()));
            Ok(())
        }
        Ok(false) => {
            logger::warn(&format!("No deployed plugin at {}", dir.display()));
            Ok(())
        }
        Err(e) => Err(format!("Plugin was not deleted: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;

    const MANIFEST: &str =
        "[plugin]\nname = \"demo\"\n[files]\npython_files = \"a.py\"\ncompiled_ui_files = \"dlg.ui\"\nresource_files = \"res.qrc\"\n";

    #[test]
    fn test_clean_removes_only_outputs() {
        let Some(fixture) = Fixture::new(MANIFEST, &["a.py", "dlg.ui", "dlg.py"]) else {
            return;
        };
        let Some(ctx) = fixture.context() else {
            return;
        };
        let report = clean(&ctx);
        assert_eq!(report.removed, vec![PathBuf::from("dlg.py")]);
        assert_eq!(report.missing, vec![PathBuf::from("res.py")]);
        assert!(fixture.project().join("dlg.ui").is_file());
        assert!(fixture.project().join("a.py").is_file());
    }

    #[test]
    fn test_clean_deployment() {
        let Some(fixture) = Fixture::new(MANIFEST, &[]) else {
            return;
        };
        let Some(ctx) = fixture.context() else {
            return;
        };
        assert!(clean_deployment(&ctx, None).is_ok_and(|removed| !removed));

        assert!(fs::create_dir_all(fixture.plugins().join("demo/sub")).is_ok());
        assert!(clean_deployment(&ctx, None).is_ok_and(|removed| removed));
        assert!(!fixture.plugins().join("demo").exists());
    }
}

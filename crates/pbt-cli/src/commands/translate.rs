use crate::build::translate::{release_translations, TranslateReport, TranslateStatus};
use crate::{Context, GlobalOpts, PbtError};
use colored::*;
use pbt_logger as logger;

/// Release the translation source of every declared locale
pub fn translate(ctx: &Context) -> Result<TranslateReport, PbtError> {
    release_translations(&ctx.manifest, &ctx.toolbox())
}

pub fn handle_translate(opts: &GlobalOpts) -> Result<(), String> {
    let ctx = Context::load(&opts.manifest).map_err(|e| e.to_string())?;
    if ctx.manifest.files.locales.is_empty() {
        logger::warn(&format!("No translations are specified in {}", opts.manifest.display()));
        return Ok(());
    }
    let report = translate(&ctx).map_err(|e| e.to_string())?;
    if opts.json {
        return crate::common::print_json(&report);
    }
    for entry in &report.entries {
        match &entry.status {
            TranslateStatus::Released => println!("  {} {}", "released".green(), entry.source.display()),
            TranslateStatus::SourceMissing => {
                println!("  {} {} (missing)", "skipped".yellow(), entry.source.display())
            }
            TranslateStatus::Failed(reason) => {
                println!("  {} {}: {}", "failed".red(), entry.source.display(), reason)
            }
        }
    }
    let problems = report.problems().count();
    if problems > 0 {
        return Err(format!("{problems} translation(s) were not released"));
    }
    logger::success(&format!("Released {} translation(s)", report.released_count()));
    Ok(())
}

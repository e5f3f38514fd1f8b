//! Releasing translation sources into binary catalogs

use crate::errors::PbtError;
use crate::tools::{ToolInvocation, Toolbox};
use pbt_config::ToolKind;
use pbt_manifest::Manifest;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum TranslateStatus {
    Released,
    SourceMissing,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateEntry {
    pub locale: String,
    pub source: PathBuf,
    pub status: TranslateStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TranslateReport {
    pub entries: Vec<TranslateEntry>,
}

impl TranslateReport {
    pub fn released_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status == TranslateStatus::Released)
            .count()
    }

    pub fn problems(&self) -> impl Iterator<Item = &TranslateEntry> {
        self.entries
            .iter()
            .filter(|e| e.status != TranslateStatus::Released)
    }
}

/// Run the translation linker on each locale's `.ts` source
pub fn release_translations(manifest: &Manifest, toolbox: &Toolbox<'_>) -> Result<TranslateReport, PbtError> {
    let mut report = TranslateReport::default();
    let sources = manifest.translation_sources();
    if sources.is_empty() {
        return Ok(report);
    }
    let linker = toolbox
        .locate(ToolKind::TranslationLinker)
        .ok_or(PbtError::ToolUnavailable(ToolKind::TranslationLinker))?;

    for (locale, source) in sources {
        let status = if !manifest.resolve(&source).is_file() {
            TranslateStatus::SourceMissing
        } else {
            debug!("Releasing {}", source.display());
            let invocation = ToolInvocation::new(&linker)
                .arg(&source)
                .current_dir(&manifest.root);
            let output = toolbox.run(&invocation);
            if output.success {
                TranslateStatus::Released
            } else {
                TranslateStatus::Failed(output.failure_reason())
            }
        };
        report.entries.push(TranslateEntry {
            locale,
            source,
            status,
        });
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{full_probe, FakeInvoker};
    use pbt_config::{Settings, StaticProbe};
    use std::fs;
    use tempfile::TempDir;

    fn manifest(root: &std::path::Path, locales: &str) -> Option<Manifest> {
        Manifest::from_toml_str(
            &format!("[plugin]\nname = \"demo\"\n[files]\nlocales = \"{locales}\"\n"),
            root.to_path_buf(),
        )
        .ok()
    }

    #[test]
    fn test_each_locale_released() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        assert!(fs::create_dir_all(dir.path().join("i18n")).is_ok());
        assert!(fs::write(dir.path().join("i18n/af.ts"), "<TS/>").is_ok());
        let Some(manifest) = manifest(dir.path(), "af de") else {
            return;
        };
        let settings = Settings::default();
        let probe = full_probe();
        let invoker = FakeInvoker::new();
        let toolbox = Toolbox::new(&settings, &probe, &invoker);

        let Ok(report) = release_translations(&manifest, &toolbox) else {
            panic!("translation should run");
        };
        assert_eq!(report.released_count(), 1);
        assert_eq!(report.problems().count(), 1);
        assert_eq!(invoker.programs(), vec!["lrelease"]);
    }

    #[test]
    fn test_missing_linker_is_an_error() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let Some(manifest) = manifest(dir.path(), "af") else {
            return;
        };
        let settings = Settings::default();
        let probe = StaticProbe::new();
        let invoker = FakeInvoker::new();
        let toolbox = Toolbox::new(&settings, &probe, &invoker);
        assert!(matches!(
            release_translations(&manifest, &toolbox),
            Err(PbtError::ToolUnavailable(ToolKind::TranslationLinker))
        ));
    }

    #[test]
    fn test_no_locales_needs_no_linker() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let Some(manifest) = manifest(dir.path(), "") else {
            return;
        };
        let settings = Settings::default();
        let probe = StaticProbe::new();
        let invoker = FakeInvoker::new();
        let toolbox = Toolbox::new(&settings, &probe, &invoker);
        assert!(release_translations(&manifest, &toolbox).is_ok_and(|r| r.entries.is_empty()));
    }
}

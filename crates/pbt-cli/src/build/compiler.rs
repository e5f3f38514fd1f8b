//! Compiling UI and resource descriptors into importable modules

use crate::build::stale::is_stale;
use crate::tools::{ToolInvocation, Toolbox};
use pbt_config::ToolKind;
use pbt_manifest::{ArtifactKind, DerivedArtifact};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Tool that turns an artifact kind's sources into outputs
pub fn tool_for(kind: ArtifactKind) -> ToolKind {
    match kind {
        ArtifactKind::Ui => ToolKind::UiCompiler,
        ArtifactKind::Resource => ToolKind::ResourceCompiler,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum CompileStatus {
    Compiled,
    Unchanged,
    SourceMissing,
    ToolUnavailable,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct CompileEntry {
    pub artifact: DerivedArtifact,
    pub status: CompileStatus,
}

/// Per-file results of a compile pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompileReport {
    pub entries: Vec<CompileEntry>,
    /// Artifact kinds skipped wholesale because their tool is missing
    pub unavailable: Vec<ArtifactKind>,
}

impl CompileReport {
    pub fn compiled_count(&self) -> usize {
        self.count(|s| *s == CompileStatus::Compiled)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|s| !matches!(s, CompileStatus::Compiled | CompileStatus::Failed(_)))
    }

    pub fn compiled_of_kind(&self, kind: ArtifactKind) -> usize {
        self.entries
            .iter()
            .filter(|e| e.artifact.kind == kind && e.status == CompileStatus::Compiled)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompileEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, CompileStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&CompileStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.status)).count()
    }
}

/// Compiles derived artifacts through the configured external tools.
///
/// Tool availability is looked up once per artifact kind and cached; a
/// missing tool produces a single warning however many artifacts need it.
pub struct ArtifactCompiler<'a> {
    toolbox: Toolbox<'a>,
    tools: HashMap<ArtifactKind, Option<PathBuf>>,
}

impl<'a> ArtifactCompiler<'a> {
    pub fn new(toolbox: Toolbox<'a>) -> Self {
        ArtifactCompiler {
            toolbox,
            tools: HashMap::new(),
        }
    }

    fn tool(&mut self, kind: ArtifactKind) -> Option<PathBuf> {
        let toolbox = self.toolbox;
        self.tools
            .entry(kind)
            .or_insert_with(|| {
                let tool = tool_for(kind);
                let found = toolbox.locate(tool);
                if found.is_none() {
                    warn!(
                        "{} not found; {} files will not be compiled",
                        tool,
                        kind.label()
                    );
                    pbt_logger::warn(&format!(
                        "{} not found. Skipping compilation of {} files",
                        tool,
                        kind.label()
                    ));
                }
                found
            })
            .clone()
    }

    /// Compile one artifact whose paths are already absolute
    pub fn compile_one(&mut self, artifact: &DerivedArtifact) -> CompileStatus {
        let Some(program) = self.tool(artifact.kind) else {
            return CompileStatus::ToolUnavailable;
        };
        if !artifact.source.is_file() {
            debug!("Source {} is missing", artifact.source.display());
            return CompileStatus::SourceMissing;
        }
        if !is_stale(&artifact.source, &artifact.output) {
            debug!("{} is up to date", artifact.output.display());
            return CompileStatus::Unchanged;
        }

        let invocation = ToolInvocation::new(program)
            .arg("-o")
            .arg(&artifact.output)
            .arg(&artifact.source);
        let output = self.toolbox.run(&invocation);
        if output.success {
            debug!("Compiled {}", artifact.source.display());
            CompileStatus::Compiled
        } else {
            CompileStatus::Failed(output.failure_reason())
        }
    }

    /// Compile every artifact in order, never stopping at a failure
    pub fn compile(&mut self, artifacts: &[DerivedArtifact]) -> CompileReport {
        let mut report = CompileReport::default();
        for artifact in artifacts {
            let status = self.compile_one(artifact);
            if status == CompileStatus::ToolUnavailable && !report.unavailable.contains(&artifact.kind) {
                report.unavailable.push(artifact.kind);
            }
            report.entries.push(CompileEntry {
                artifact: artifact.clone(),
                status,
            });
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{full_probe, FakeInvoker};
    use filetime::{set_file_mtime, FileTime};
    use pbt_config::{Settings, StaticProbe};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn artifact(root: &Path, source: &str, kind: ArtifactKind) -> DerivedArtifact {
        DerivedArtifact::from_source(Path::new(source), kind).rooted(root)
    }

    #[test]
    fn test_compiles_stale_and_skips_fresh() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        assert!(fs::write(dir.path().join("dlg.ui"), "<ui/>").is_ok());
        let settings = Settings::default();
        let probe = full_probe();
        let invoker = FakeInvoker::new();
        let mut compiler = ArtifactCompiler::new(Toolbox::new(&settings, &probe, &invoker));
        let artifacts = vec![artifact(dir.path(), "dlg.ui", ArtifactKind::Ui)];

        let first = compiler.compile(&artifacts);
        assert_eq!(first.compiled_count(), 1);
        assert!(dir.path().join("dlg.py").is_file());

        let second = compiler.compile(&artifacts);
        assert_eq!(second.compiled_count(), 0);
        assert_eq!(second.entries[0].status, CompileStatus::Unchanged);
        assert_eq!(invoker.call_count(), 1);
    }

    #[test]
    fn test_invocation_shape() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        assert!(fs::write(dir.path().join("res.qrc"), "<RCC/>").is_ok());
        let settings = Settings::default();
        let probe = full_probe();
        let invoker = FakeInvoker::new();
        let mut compiler = ArtifactCompiler::new(Toolbox::new(&settings, &probe, &invoker));
        compiler.compile(&[artifact(dir.path(), "res.qrc", ArtifactKind::Resource)]);

        let calls = invoker.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, PathBuf::from("/usr/bin/pyrcc5"));
        assert_eq!(
            calls[0].args,
            vec![
                "-o".into(),
                dir.path().join("res.py").into_os_string(),
                dir.path().join("res.qrc").into_os_string(),
            ]
        );
    }

    #[test]
    fn test_missing_ui_tool_skips_only_ui() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        for name in ["a.ui", "b.ui", "res.qrc"] {
            assert!(fs::write(dir.path().join(name), "x").is_ok());
        }
        let settings = Settings::default();
        let probe = StaticProbe::new().with("pyrcc5", "/usr/bin/pyrcc5");
        let invoker = FakeInvoker::new();
        let mut compiler = ArtifactCompiler::new(Toolbox::new(&settings, &probe, &invoker));
        let report = compiler.compile(&[
            artifact(dir.path(), "a.ui", ArtifactKind::Ui),
            artifact(dir.path(), "b.ui", ArtifactKind::Ui),
            artifact(dir.path(), "res.qrc", ArtifactKind::Resource),
        ]);

        assert_eq!(report.unavailable, vec![ArtifactKind::Ui]);
        assert_eq!(report.compiled_of_kind(ArtifactKind::Ui), 0);
        assert_eq!(report.compiled_of_kind(ArtifactKind::Resource), 1);
        assert_eq!(report.skipped_count(), 2);
        assert!(!dir.path().join("a.py").exists());
    }

    #[test]
    fn test_missing_ui_tool_leaves_existing_output_alone() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let source = dir.path().join("dlg.ui");
        let output = dir.path().join("dlg.py");
        assert!(fs::write(&source, "<ui/>").is_ok());
        assert!(fs::write(&output, "# compiled last week").is_ok());
        let old = FileTime::from_unix_time(1_000_000, 0);
        assert!(set_file_mtime(&output, old).is_ok());

        let settings = Settings::default();
        let probe = StaticProbe::new().with("pyrcc5", "/usr/bin/pyrcc5");
        let invoker = FakeInvoker::new();
        let mut compiler = ArtifactCompiler::new(Toolbox::new(&settings, &probe, &invoker));
        let report = compiler.compile(&[artifact(dir.path(), "dlg.ui", ArtifactKind::Ui)]);

        assert_eq!(report.unavailable, vec![ArtifactKind::Ui]);
        assert_eq!(report.entries[0].status, CompileStatus::ToolUnavailable);
        assert_eq!(invoker.call_count(), 0);
        assert!(fs::read_to_string(&output).is_ok_and(|t| t == "# compiled last week"));
        assert!(fs::metadata(&output)
            .is_ok_and(|m| FileTime::from_last_modification_time(&m) == old));
    }

    #[test]
    fn test_failure_does_not_stop_other_files() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        for name in ["bad.ui", "good.ui"] {
            assert!(fs::write(dir.path().join(name), "x").is_ok());
        }
        let settings = Settings::default();
        let probe = full_probe();
        let invoker = FakeInvoker::new().failing_on("bad.ui");
        let mut compiler = ArtifactCompiler::new(Toolbox::new(&settings, &probe, &invoker));
        let report = compiler.compile(&[
            artifact(dir.path(), "bad.ui", ArtifactKind::Ui),
            artifact(dir.path(), "good.ui", ArtifactKind::Ui),
        ]);

        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.compiled_count(), 1);
        assert!(dir.path().join("good.py").is_file());
    }

    #[test]
    fn test_missing_source_skipped() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let settings = Settings::default();
        let probe = full_probe();
        let invoker = FakeInvoker::new();
        let mut compiler = ArtifactCompiler::new(Toolbox::new(&settings, &probe, &invoker));
        let report = compiler.compile(&[artifact(dir.path(), "gone.ui", ArtifactKind::Ui)]);
        assert_eq!(report.entries[0].status, CompileStatus::SourceMissing);
        assert_eq!(invoker.call_count(), 0);
    }
}

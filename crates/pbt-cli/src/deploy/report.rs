//! Per-operation outcomes of a deployment run

use crate::deploy::plan::Operation;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Succeeded,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub operation: Operation,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// One entry per executed operation, in plan order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionReport {
    pub target: PathBuf,
    pub entries: Vec<ReportEntry>,
}

impl ExecutionReport {
    pub fn new(target: PathBuf) -> Self {
        ExecutionReport {
            target,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, operation: Operation, outcome: Outcome) {
        if let Outcome::Failed(reason) = &outcome {
            tracing::warn!("{} failed: {}", operation.describe(), reason);
        }
        self.entries.push(ReportEntry { operation, outcome });
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::Failed(_)))
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn succeeded_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Succeeded)
            .count()
    }

    /// Successfully compiled artifacts
    pub fn compiled_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(e.operation, Operation::CompileArtifact { .. })
                    && e.outcome == Outcome::Succeeded
            })
            .count()
    }

    /// One line per failure, `<operation>: <reason>`
    pub fn failure_summary(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| match &e.outcome {
                Outcome::Failed(reason) => Some(format!("{}: {}", e.operation.describe(), reason)),
                _ => None,
            })
            .collect()
    }
}

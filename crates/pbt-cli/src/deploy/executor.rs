//! Running a deployment plan against the filesystem

use crate::build::compiler::{tool_for, ArtifactCompiler, CompileStatus};
use crate::build::docs;
use crate::deploy::copy::{copy_file, copy_tree, ExcludeFilter};
use crate::deploy::plan::{DeploymentPlan, Operation};
use crate::deploy::report::{ExecutionReport, Outcome};
use crate::errors::PbtError;
use crate::tools::Toolbox;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Executes plans strictly in order. A failing operation is recorded and
/// the run continues with the next one.
pub struct DeploymentExecutor<'a> {
    toolbox: Toolbox<'a>,
    compiler: ArtifactCompiler<'a>,
}

impl<'a> DeploymentExecutor<'a> {
    pub fn new(toolbox: Toolbox<'a>) -> Self {
        DeploymentExecutor {
            toolbox,
            compiler: ArtifactCompiler::new(toolbox),
        }
    }

    pub fn execute(mut self, plan: DeploymentPlan) -> ExecutionReport {
        info!(
            "Executing {} operations into {}",
            plan.len(),
            plan.target.display()
        );
        let filter = ExcludeFilter::new(&plan.source_root, &plan.exclude_patterns);
        let mut report = ExecutionReport::new(plan.target);
        for operation in plan.operations {
            let outcome = self.run(&operation, &filter);
            debug!("{} -> {:?}", operation.describe(), outcome);
            report.record(operation, outcome);
        }
        report
    }

    fn run(&mut self, operation: &Operation, filter: &ExcludeFilter) -> Outcome {
        match operation {
            Operation::RemoveTree { path } => remove_tree(path),
            Operation::CreateDir { path } => match fs::create_dir_all(path) {
                Ok(()) => Outcome::Succeeded,
                Err(e) => Outcome::Failed(e.to_string()),
            },
            Operation::CompileArtifact { artifact } => match self.compiler.compile_one(artifact) {
                CompileStatus::Compiled => Outcome::Succeeded,
                CompileStatus::Unchanged => Outcome::Skipped("unchanged".to_string()),
                CompileStatus::SourceMissing => Outcome::Skipped("source missing".to_string()),
                CompileStatus::ToolUnavailable => {
                    Outcome::Skipped(format!("{} not found", tool_for(artifact.kind)))
                }
                CompileStatus::Failed(reason) => Outcome::Failed(reason),
            },
            Operation::BuildDocs { project_dir } => self.build_docs(project_dir),
            Operation::CopyFile { src, dst } => {
                if filter.is_excluded(src, false) {
                    return Outcome::Skipped("excluded".to_string());
                }
                match copy_file(src, dst) {
                    Ok(_) => Outcome::Succeeded,
                    Err(e) => Outcome::Failed(e.to_string()),
                }
            }
            Operation::CopyTree { src, dst } => match copy_tree(src, dst, filter) {
                Ok(_) => Outcome::Succeeded,
                Err(e) => Outcome::Failed(e.to_string()),
            },
            Operation::Refuse { .. } => Outcome::Failed("path escapes project".to_string()),
        }
    }

    fn build_docs(&self, project_dir: &Path) -> Outcome {
        if !project_dir.is_dir() {
            return Outcome::Skipped(format!("{} does not exist", project_dir.display()));
        }
        match docs::build_html(project_dir, &self.toolbox) {
            Ok(output) if output.success => Outcome::Succeeded,
            Ok(output) => Outcome::Failed(output.failure_reason()),
            Err(PbtError::ToolUnavailable(kind)) => Outcome::Skipped(format!("{} not found", kind)),
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

fn remove_tree(path: &Path) -> Outcome {
    if !path.exists() {
        return Outcome::Skipped("not present".to_string());
    }
    match fs::remove_dir_all(path) {
        Ok(()) => Outcome::Succeeded,
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

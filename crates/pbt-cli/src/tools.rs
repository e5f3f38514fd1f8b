//! Running external tools
//!
//! pbt knows nothing about the compilers, archivers and doc builders it
//! drives beyond their command lines. Spawning goes through [`ToolInvoker`]
//! so that tests can substitute a fake that writes the expected outputs.

use pbt_config::{resolve_tool, Settings, ToolKind, ToolProbe};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::Command;

/// One external program run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ToolInvocation {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Command line for log messages
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().to_string()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().to_string()));
        parts.join(" ")
    }
}

/// What a finished tool reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// A short reason for a failed run: the last stderr line, or the exit code
    pub fn failure_reason(&self) -> String {
        let last_line = self
            .stderr
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty());
        match (last_line, self.code) {
            (Some(line), _) => line.to_string(),
            (None, Some(code)) => format!("exited with status {}", code),
            (None, None) => "terminated by signal".to_string(),
        }
    }
}

/// Runs external programs to completion
pub trait ToolInvoker {
    fn invoke(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput>;
}

/// Spawns real processes and waits for them
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInvoker;

impl ToolInvoker for ProcessInvoker {
    fn invoke(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }
        tracing::debug!("Running: {}", invocation.display());
        let output = command.output()?;
        pbt_logger::capture_output(&invocation.display(), &output);
        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// The services every tool-running component needs
#[derive(Clone, Copy)]
pub struct Toolbox<'a> {
    pub settings: &'a Settings,
    pub probe: &'a dyn ToolProbe,
    pub invoker: &'a dyn ToolInvoker,
}

impl<'a> Toolbox<'a> {
    pub fn new(settings: &'a Settings, probe: &'a dyn ToolProbe, invoker: &'a dyn ToolInvoker) -> Self {
        Toolbox {
            settings,
            probe,
            invoker,
        }
    }

    pub fn locate(&self, kind: ToolKind) -> Option<PathBuf> {
        resolve_tool(kind, self.settings, self.probe)
    }

    pub fn locate_program(&self, program: &str) -> Option<PathBuf> {
        self.probe.locate(program)
    }

    /// Run a tool, folding spawn errors into a failed output
    pub fn run(&self, invocation: &ToolInvocation) -> ToolOutput {
        match self.invoker.invoke(invocation) {
            Ok(output) => output,
            Err(e) => ToolOutput {
                success: false,
                code: None,
                stdout: String::new(),
                stderr: format!("failed to run {}: {}", invocation.program.display(), e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let invocation = ToolInvocation::new("pyuic5").arg("-o").arg("dlg.py").arg("dlg.ui");
        assert_eq!(invocation.display(), "pyuic5 -o dlg.py dlg.ui");
    }

    #[test]
    fn test_failure_reason_prefers_stderr() {
        let output = ToolOutput {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: "warning\nError: bad markup\n\n".to_string(),
        };
        assert_eq!(output.failure_reason(), "Error: bad markup");
    }

    #[test]
    fn test_failure_reason_falls_back_to_code() {
        let output = ToolOutput {
            success: false,
            code: Some(2),
            ..Default::default()
        };
        assert_eq!(output.failure_reason(), "exited with status 2");
    }
}

//! Fakes shared by the unit tests

use crate::tools::{ToolInvocation, ToolInvoker, ToolOutput};
use pbt_config::StaticProbe;
use std::cell::RefCell;
use std::rc::Rc;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every tool pbt knows about, "installed" under /usr/bin
pub(crate) fn full_probe() -> StaticProbe {
    ["pyuic5", "pyrcc5", "lrelease", "make", "zip", "7z"]
        .into_iter()
        .fold(StaticProbe::new(), |probe, name| {
            probe.with(name, Path::new("/usr/bin").join(name))
        })
}

/// Stands in for compilers and archivers.
///
/// `-o <file>` invocations write the output file. `zip`/`7z` invocations
/// append the archived tree's file list to the destination, so a stale
/// archive that was not deleted first shows up as duplicated lines.
/// Clones share their call log.
#[derive(Default, Clone)]
pub(crate) struct FakeInvoker {
    pub calls: Rc<RefCell<Vec<ToolInvocation>>>,
    failing: Vec<String>,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every invocation whose command line contains `pattern`
    pub fn failing_on(mut self, pattern: &str) -> Self {
        self.failing.push(pattern.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| c.program.file_name().map(|n| n.to_string_lossy().to_string()))
            .collect()
    }
}

impl ToolInvoker for FakeInvoker {
    fn invoke(&self, invocation: &ToolInvocation) -> std::io::Result<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.display();
        if self.failing.iter().any(|p| line.contains(p.as_str())) {
            return Ok(ToolOutput {
                success: false,
                code: Some(1),
                stdout: String::new(),
                stderr: format!("fake failure: {line}"),
            });
        }

        let program = invocation
            .program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let args: Vec<PathBuf> = invocation.args.iter().map(PathBuf::from).collect();
        let cwd = invocation.cwd.clone().unwrap_or_default();

        if program == "zip" || program == "7z" {
            if let [.., dest, name] = args.as_slice() {
                let mut file = fs::OpenOptions::new().create(true).append(true).open(cwd.join(dest))?;
                let tree = cwd.join(name);
                let mut entries: Vec<PathBuf> = WalkDir::new(&tree)
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .filter_map(|e| e.path().strip_prefix(&cwd).ok().map(Path::to_path_buf))
                    .collect();
                entries.sort();
                for entry in entries {
                    writeln!(file, "{}", entry.display())?;
                }
            }
        } else if let Some(pos) = args.iter().position(|a| a.as_os_str() == "-o") {
            if let Some(output) = args.get(pos + 1) {
                fs::write(cwd.join(output), "# generated\n")?;
            }
        }

        Ok(ToolOutput {
            success: true,
            code: Some(0),
            ..Default::default()
        })
    }
}

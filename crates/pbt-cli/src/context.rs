//! Per-invocation state shared by the verbs
//!
//! The manifest and the user settings are loaded once and handed to every
//! component by reference. Tool lookup and process spawning are held as
//! trait objects so tests can run whole verbs against fakes.

use crate::errors::PbtError;
use crate::tools::{ProcessInvoker, ToolInvoker, Toolbox};
use pbt_config::{
    resolve_install_root, InstallLayout, InstallRootRequest, PathProbe, ResolvedRoot, Settings,
    ToolProbe,
};
use pbt_manifest::{plugin_name_issue, Manifest, ValidationIssue};
use std::path::{Path, PathBuf};

pub struct Context {
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub settings: Settings,
    probe: Box<dyn ToolProbe>,
    invoker: Box<dyn ToolInvoker>,
}

impl Context {
    /// Load the manifest at `manifest_path` and the user settings, wired to
    /// the real search path and real processes
    pub fn load(manifest_path: &Path) -> Result<Self, PbtError> {
        let manifest = Manifest::load(manifest_path)?;
        let settings = Settings::load()?;
        Ok(Self::with_services(
            manifest_path,
            manifest,
            settings,
            Box::new(PathProbe),
            Box::new(ProcessInvoker),
        ))
    }

    pub fn with_services(
        manifest_path: &Path,
        manifest: Manifest,
        settings: Settings,
        probe: Box<dyn ToolProbe>,
        invoker: Box<dyn ToolInvoker>,
    ) -> Self {
        Context {
            manifest_path: manifest_path.to_path_buf(),
            manifest,
            settings,
            probe,
            invoker,
        }
    }

    pub fn toolbox(&self) -> Toolbox<'_> {
        Toolbox::new(&self.settings, self.probe.as_ref(), self.invoker.as_ref())
    }

    /// The plugin name, or `ConfigIncomplete` when the manifest lacks one or
    /// it is not a single directory name
    pub fn require_plugin_name(&self) -> Result<&str, PbtError> {
        checked_plugin_name(&self.manifest)
    }

    /// Resolve the install root. A relative root in the manifest is taken
    /// relative to the project directory.
    pub fn install_root(&self, invocation: Option<&Path>) -> Result<ResolvedRoot, PbtError> {
        let manifest_root = self.manifest.install_root.as_ref().map(|root| {
            if root.is_relative() && !root.starts_with("~") {
                self.manifest.resolve(root)
            } else {
                root.clone()
            }
        });
        let profile = self
            .manifest
            .profile
            .as_deref()
            .or(self.settings.profile.as_deref());
        let layout = InstallLayout::from_setting(self.settings.layout.as_deref(), profile)?;
        let request = InstallRootRequest {
            invocation,
            manifest: manifest_root.as_deref(),
            settings: self.settings.install_root.as_deref(),
            layout,
        };
        Ok(resolve_install_root(&request)?)
    }

    /// Directory the plugin is deployed to: `<install root>/<plugin name>`
    pub fn deployment_dir(&self, invocation: Option<&Path>) -> Result<PathBuf, PbtError> {
        let name = self.require_plugin_name()?;
        Ok(self.install_root(invocation)?.path.join(name))
    }
}

/// The manifest's plugin name, usable as one directory under an install root
pub(crate) fn checked_plugin_name(manifest: &Manifest) -> Result<&str, PbtError> {
    if let Some(issue) = plugin_name_issue(manifest) {
        return Err(PbtError::ConfigIncomplete(vec![issue]));
    }
    manifest
        .plugin_name()
        .ok_or_else(|| PbtError::ConfigIncomplete(vec![ValidationIssue::MissingPluginName]))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::testing::{full_probe, FakeInvoker};
    use pbt_config::StaticProbe;
    use std::fs;
    use tempfile::TempDir;

    /// A project directory with files, a manifest and a plugins directory
    pub struct Fixture {
        pub dir: TempDir,
    }

    impl Fixture {
        pub fn new(manifest: &str, files: &[&str]) -> Option<Self> {
            let dir = TempDir::new().ok()?;
            let project = dir.path().join("project");
            for file in files {
                let path = project.join(file);
                fs::create_dir_all(path.parent()?).ok()?;
                fs::write(&path, format!("# {file}\n")).ok()?;
            }
            fs::create_dir_all(&project).ok()?;
            fs::write(project.join("pbt.toml"), manifest).ok()?;
            Some(Fixture { dir })
        }

        pub fn project(&self) -> PathBuf {
            self.dir.path().join("project")
        }

        pub fn plugins(&self) -> PathBuf {
            self.dir.path().join("plugins")
        }

        pub fn context_with(&self, probe: StaticProbe, invoker: FakeInvoker) -> Option<Context> {
            let manifest_path = self.project().join("pbt.toml");
            let manifest = Manifest::load(&manifest_path).ok()?;
            let settings = Settings {
                install_root: Some(self.plugins().to_string_lossy().to_string()),
                ..Default::default()
            };
            Some(Context::with_services(
                &manifest_path,
                manifest,
                settings,
                Box::new(probe),
                Box::new(invoker),
            ))
        }

        pub fn context(&self) -> Option<Context> {
            self.context_with(full_probe(), FakeInvoker::new())
        }
    }
}

//! External tool lookup
//!
//! Every external program pbt runs is found through a [`ToolProbe`] so that
//! tests can decide which tools "exist" without touching `PATH`.

use crate::settings::Settings;
use std::collections::HashMap;
use std::path::PathBuf;

/// Answers whether a program can be run, and from where
pub trait ToolProbe {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Looks programs up on the search path with `which`
#[derive(Debug, Default, Clone, Copy)]
pub struct PathProbe;

impl ToolProbe for PathProbe {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        match which::which(program) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!("{} not found: {}", program, e);
                None
            }
        }
    }
}

/// A fixed table of available programs
#[derive(Debug, Default, Clone)]
pub struct StaticProbe {
    programs: HashMap<String, PathBuf>,
}

impl StaticProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, program: &str, path: impl Into<PathBuf>) -> Self {
        self.programs.insert(program.to_string(), path.into());
        self
    }
}

impl ToolProbe for StaticProbe {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs.get(program).cloned()
    }
}

/// The kinds of external tools pbt drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolKind {
    UiCompiler,
    ResourceCompiler,
    TranslationLinker,
    DocBuilder,
}

impl ToolKind {
    /// Program names tried in order when the settings do not pin one
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            ToolKind::UiCompiler => &["pyuic5", "pyuic4"],
            ToolKind::ResourceCompiler => &["pyrcc5", "pyrcc4"],
            ToolKind::TranslationLinker => &["lrelease", "lrelease-qt5", "lrelease-qt4"],
            #[cfg(target_os = "windows")]
            ToolKind::DocBuilder => &["make.bat", "make"],
            #[cfg(not(target_os = "windows"))]
            ToolKind::DocBuilder => &["make"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToolKind::UiCompiler => "UI compiler",
            ToolKind::ResourceCompiler => "resource compiler",
            ToolKind::TranslationLinker => "translation linker",
            ToolKind::DocBuilder => "documentation builder",
        }
    }

    fn setting(self, settings: &Settings) -> Option<&str> {
        let value = match self {
            ToolKind::UiCompiler => settings.ui_compiler.as_deref(),
            ToolKind::ResourceCompiler => settings.resource_compiler.as_deref(),
            ToolKind::TranslationLinker => settings.translation_linker.as_deref(),
            ToolKind::DocBuilder => None,
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Find the program for a tool kind. A program pinned in the settings is
/// the only candidate; otherwise the defaults are tried in order.
pub fn resolve_tool(kind: ToolKind, settings: &Settings, probe: &dyn ToolProbe) -> Option<PathBuf> {
    if let Some(pinned) = kind.setting(settings) {
        return probe.locate(pinned);
    }
    kind.candidates()
        .iter()
        .find_map(|candidate| probe.locate(candidate))
}

/// Archive backends, in default preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiverKind {
    Zip,
    SevenZip,
}

impl ArchiverKind {
    pub fn program(self) -> &'static str {
        match self {
            ArchiverKind::Zip => "zip",
            ArchiverKind::SevenZip => "7z",
        }
    }

    pub fn from_program(name: &str) -> Option<Self> {
        match name.trim() {
            "zip" => Some(ArchiverKind::Zip),
            "7z" | "7za" | "7zip" => Some(ArchiverKind::SevenZip),
            _ => None,
        }
    }

    /// Preference list: the archiver named in the settings first, then the
    /// remaining ones in default order.
    pub fn preference(settings: &Settings) -> Vec<ArchiverKind> {
        let mut order = vec![ArchiverKind::Zip, ArchiverKind::SevenZip];
        if let Some(preferred) = settings.archiver.as_deref().and_then(Self::from_program) {
            order.retain(|kind| *kind != preferred);
            order.insert(0, preferred);
        }
        order
    }
}

//! Machine-level configuration for pbt
//!
//! This crate covers everything that depends on the machine rather than on a
//! plugin manifest:
//! - the user settings file (`settings`)
//! - where plugins get installed (`install_root`)
//! - which external programs are available (`tools`)

pub mod install_root;
pub mod settings;
pub mod tools;

pub use install_root::{
    expand_tilde, resolve_install_root, InstallLayout, InstallRootError, InstallRootRequest,
    ResolvedRoot, RootSource, DEFAULT_PROFILE,
};
pub use settings::{Settings, SettingsError, SETTING_KEYS};
pub use tools::{resolve_tool, ArchiverKind, PathProbe, StaticProbe, ToolKind, ToolProbe};

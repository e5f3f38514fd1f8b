//! Resolution of the directory plugins are deployed into
//!
//! The host application has changed where it looks for user plugins over
//! time. Each convention is an [`InstallLayout`]; the caller picks one
//! explicitly instead of the tool guessing per release:
//!
//! - **Legacy**: `~/.qgis2/python/plugins`
//! - **Profile**: `<data dir>/QGIS/QGIS3/profiles/<profile>/python/plugins`
//!   where `<data dir>` is `~/.local/share` on Linux,
//!   `~/Library/Application Support` on macOS and `%APPDATA%` on Windows.
//!
//! An explicit root always wins over a layout, see [`resolve_install_root`].

use std::path::{Path, PathBuf};

/// Profile used when neither the manifest nor the settings name one
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallLayout {
    Legacy,
    Profile(String),
}

/// Error type for install root resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallRootError {
    /// Neither an explicit root nor a platform directory is available
    NoInstallTarget(String),
    /// The settings name a layout that does not exist
    UnknownLayout(String),
}

impl std::fmt::Display for InstallRootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallRootError::NoInstallTarget(msg) => {
                write!(f, "Cannot resolve an install directory: {}", msg)
            }
            InstallRootError::UnknownLayout(name) => {
                write!(f, "Unknown install layout '{}' (expected 'profile' or 'legacy')", name)
            }
        }
    }
}

impl std::error::Error for InstallRootError {}

impl InstallLayout {
    /// Build a layout from the `layout` setting and an optional profile name
    pub fn from_setting(layout: Option<&str>, profile: Option<&str>) -> Result<Self, InstallRootError> {
        let profile = profile
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROFILE)
            .to_string();
        match layout.map(str::trim) {
            None | Some("") | Some("profile") => Ok(InstallLayout::Profile(profile)),
            Some("legacy") => Ok(InstallLayout::Legacy),
            Some(other) => Err(InstallRootError::UnknownLayout(other.to_string())),
        }
    }

    /// The platform default plugin directory for this layout
    pub fn default_root(&self) -> Result<PathBuf, InstallRootError> {
        match self {
            InstallLayout::Legacy => dirs::home_dir()
                .map(|home| home.join(".qgis2").join("python").join("plugins"))
                .ok_or_else(|| {
                    InstallRootError::NoInstallTarget("home directory is unknown".to_string())
                }),
            InstallLayout::Profile(profile) => dirs::data_dir()
                .map(|data| {
                    data.join("QGIS")
                        .join("QGIS3")
                        .join("profiles")
                        .join(profile)
                        .join("python")
                        .join("plugins")
                })
                .ok_or_else(|| {
                    InstallRootError::NoInstallTarget("user data directory is unknown".to_string())
                }),
        }
    }
}

/// Where a resolved install root came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    Invocation,
    Manifest,
    Settings,
    Layout,
}

/// Candidates for the install root, highest precedence first
#[derive(Debug, Clone)]
pub struct InstallRootRequest<'a> {
    pub invocation: Option<&'a Path>,
    pub manifest: Option<&'a Path>,
    pub settings: Option<&'a str>,
    pub layout: InstallLayout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    pub path: PathBuf,
    pub source: RootSource,
}

/// Resolve the install root: invocation override, then manifest, then user
/// settings, then the layout's platform default.
pub fn resolve_install_root(request: &InstallRootRequest<'_>) -> Result<ResolvedRoot, InstallRootError> {
    if let Some(path) = request.invocation {
        return Ok(ResolvedRoot {
            path: expand_tilde(path),
            source: RootSource::Invocation,
        });
    }
    if let Some(path) = request.manifest {
        return Ok(ResolvedRoot {
            path: expand_tilde(path),
            source: RootSource::Manifest,
        });
    }
    if let Some(value) = request.settings.map(str::trim).filter(|v| !v.is_empty()) {
        return Ok(ResolvedRoot {
            path: expand_tilde(Path::new(value)),
            source: RootSource::Settings,
        });
    }
    let path = request.layout.default_root()?;
    tracing::debug!("Using {:?} layout install root {}", request.layout, path.display());
    Ok(ResolvedRoot {
        path,
        source: RootSource::Layout,
    })
}

/// Expand a leading `~` to the home directory. `~user` forms are left as-is.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };
    if text != "~" && !text.starts_with("~/") && !text.starts_with("~\\") {
        return path.to_path_buf();
    }
    match dirs::home_dir() {
        Some(home) if text == "~" => home,
        Some(home) => home.join(&text[2..]),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(layout: InstallLayout) -> InstallRootRequest<'static> {
        InstallRootRequest {
            invocation: None,
            manifest: None,
            settings: None,
            layout,
        }
    }

    #[test]
    fn test_invocation_override_wins() {
        let req = InstallRootRequest {
            invocation: Some(Path::new("/tmp/override")),
            manifest: Some(Path::new("/tmp/manifest")),
            settings: Some("/tmp/settings"),
            layout: InstallLayout::Legacy,
        };
        let resolved = resolve_install_root(&req);
        assert_eq!(
            resolved,
            Ok(ResolvedRoot {
                path: PathBuf::from("/tmp/override"),
                source: RootSource::Invocation,
            })
        );
    }

    #[test]
    fn test_manifest_before_settings() {
        let req = InstallRootRequest {
            manifest: Some(Path::new("/tmp/manifest")),
            settings: Some("/tmp/settings"),
            ..request(InstallLayout::Legacy)
        };
        assert!(resolve_install_root(&req).is_ok_and(|r| r.source == RootSource::Manifest));
    }

    #[test]
    fn test_blank_settings_fall_through_to_layout() {
        let req = InstallRootRequest {
            settings: Some("   "),
            ..request(InstallLayout::Profile("work".to_string()))
        };
        // Only meaningful where the platform exposes a data directory
        if dirs::data_dir().is_none() {
            return;
        }
        let resolved = resolve_install_root(&req);
        assert!(resolved.is_ok_and(|r| {
            r.source == RootSource::Layout && r.path.ends_with("profiles/work/python/plugins")
        }));
    }

    #[test]
    fn test_legacy_layout_path() {
        if dirs::home_dir().is_none() {
            return;
        }
        let root = InstallLayout::Legacy.default_root();
        assert!(root.is_ok_and(|p| p.ends_with(".qgis2/python/plugins")));
    }

    #[test]
    fn test_layout_from_setting() {
        assert_eq!(
            InstallLayout::from_setting(None, None),
            Ok(InstallLayout::Profile(DEFAULT_PROFILE.to_string()))
        );
        assert_eq!(
            InstallLayout::from_setting(Some("legacy"), Some("work")),
            Ok(InstallLayout::Legacy)
        );
        assert_eq!(
            InstallLayout::from_setting(Some("profile"), Some("work")),
            Ok(InstallLayout::Profile("work".to_string()))
        );
        assert!(matches!(
            InstallLayout::from_setting(Some("qgis4"), None),
            Err(InstallRootError::UnknownLayout(_))
        ));
    }

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde(Path::new("/opt/plugins")), PathBuf::from("/opt/plugins"));
        assert_eq!(expand_tilde(Path::new("~other/x")), PathBuf::from("~other/x"));
    }

    #[test]
    fn test_expand_tilde_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_tilde(Path::new("~/plugins")), home.join("plugins"));
    }
}

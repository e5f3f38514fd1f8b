//! Per-user settings stored in `pbt.toml`
//!
//! Settings hold machine-specific choices that do not belong in a plugin's
//! manifest: where plugins are installed, which user profile to target and
//! which external tool binaries to use.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Keys accepted by `pbt config set`
pub const SETTING_KEYS: &[&str] = &[
    "install-root",
    "layout",
    "profile",
    "ui-compiler",
    "resource-compiler",
    "translation-linker",
    "archiver",
];

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Unknown setting '{0}'. Supported keys: {keys}", keys = SETTING_KEYS.join(", "))]
    UnknownKey(String),

    #[error("Could not determine home directory")]
    NoHome,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_compiler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_compiler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_linker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archiver: Option<String>,
}

impl Settings {
    pub fn path() -> Result<PathBuf, SettingsError> {
        // Honor explicit override via PBT_CONFIG for tests / isolated runs.
        if let Ok(env_path) = std::env::var("PBT_CONFIG") {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir()
            .ok_or(SettingsError::NoHome)?
            .join(".config");

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir().ok_or(SettingsError::NoHome)?;

        Ok(base.join("pbt").join("pbt.toml"))
    }

    /// Load settings, returning the defaults when no settings file exists
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::path()?;
        if !path.exists() {
            tracing::debug!("No settings file at {}", path.display());
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.slot(key).and_then(|v| v.clone())
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), SettingsError> {
        let slot = self
            .slot_mut(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        *slot = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.values_iter().is_empty()
    }

    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        SETTING_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    fn slot(&self, key: &str) -> Option<&Option<String>> {
        match key {
            "install-root" => Some(&self.install_root),
            "layout" => Some(&self.layout),
            "profile" => Some(&self.profile),
            "ui-compiler" => Some(&self.ui_compiler),
            "resource-compiler" => Some(&self.resource_compiler),
            "translation-linker" => Some(&self.translation_linker),
            "archiver" => Some(&self.archiver),
            _ => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "install-root" => Some(&mut self.install_root),
            "layout" => Some(&mut self.layout),
            "profile" => Some(&mut self.profile),
            "ui-compiler" => Some(&mut self.ui_compiler),
            "resource-compiler" => Some(&mut self.resource_compiler),
            "translation-linker" => Some(&mut self.translation_linker),
            "archiver" => Some(&mut self.archiver),
            _ => None,
        }
    }
}

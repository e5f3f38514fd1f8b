use crate::GlobalOpts;
use clap::Subcommand;
use colored::*;
use pbt_config::{Settings, SETTING_KEYS};
use pbt_logger as logger;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the current settings
    Show,
    /// Set a value; an empty value removes the key
    Set { key: String, value: String },
    /// Print the path of the settings file
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<(), String> {
    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let settings = Settings::load().map_err(|e| format!("Failed to load settings: {e}"))?;
            if opts.json {
                return crate::common::print_json(&settings);
            }
            println!("{}", "Settings:".bold().green());
            if settings.is_empty() {
                println!("  {}", "(empty)".yellow());
            } else {
                for (key, value) in settings.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load().map_err(|e| format!("Failed to load settings: {e}"))?;
            settings.set(&key, value.clone()).map_err(|_| {
                format!(
                    "Unknown settings key: {}. Supported keys: {}",
                    key,
                    SETTING_KEYS.join(", ")
                )
            })?;
            let path = settings
                .save()
                .map_err(|e| format!("Failed to save settings: {e}"))?;
            logger::debug(&format!("Settings written to {}", path.display()));
            if value.trim().is_empty() {
                logger::success(&format!("Removed {key}"));
            } else {
                logger::success(&format!("Set {key} = {value}"));
            }
            Ok(())
        }
        ConfigAction::Path => {
            let path = Settings::path().map_err(|e| e.to_string())?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

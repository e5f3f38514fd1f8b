//! Common types and utilities shared across modules

use clap::Parser;
use pbt_manifest::DEFAULT_MANIFEST_NAME;
use std::path::PathBuf;

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    #[arg(long, global = true, help = "Only show warnings and errors")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "config",
        global = true,
        default_value = DEFAULT_MANIFEST_NAME,
        help = "Manifest describing the plugin"
    )]
    pub manifest: PathBuf,

    #[arg(long, global = true, help = "Print reports as JSON")]
    pub json: bool,
}

impl Default for GlobalOpts {
    fn default() -> Self {
        GlobalOpts {
            quiet: false,
            verbose: 0,
            manifest: PathBuf::from(DEFAULT_MANIFEST_NAME),
            json: false,
        }
    }
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Print `value` as pretty JSON on stdout
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("Failed to encode report: {e}"))?;
    println!("{text}");
    Ok(())
}

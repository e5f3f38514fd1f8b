use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a plugin manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Configuration file {} is missing", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

//! Error type for the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

use meridian::ConfigurationError;

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Missing configuration file: {}", .0.display())]
    MissingConfig(PathBuf),

    #[error(transparent)]
    Layout(#[from] ConfigurationError),
}

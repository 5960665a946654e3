//! Typed errors that cross the host seam

use std::path::PathBuf;
use thiserror::Error;

/// Failure to persist a configuration entry
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("no settings file for the active scope (no workspace open and no user config directory)")]
    NoScope,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON, refusing to overwrite it: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("{path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Invalid extension configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("command must contain at least one token")]
    EmptyCommand,

    #[error("no target packages configured")]
    NoPackages,

    #[error("config key must not be empty")]
    EmptyKey,

    #[error("tool name must not be empty")]
    EmptyTool,
}

use std::path::PathBuf;

use thiserror::Error;

use crate::format::FormatError;

/// Why the site configuration file could not be read.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Format(#[from] FormatError),
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead { path: PathBuf, source: ReadError },

    #[error("Failed to write config file {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Invalid edit '{input}': {reason}")]
    InvalidEdit { input: String, reason: String },

    #[error("Failed to clear {path}: {source}")]
    Maintenance {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read version history {path}: {reason}")]
    VersionHistory { path: PathBuf, reason: String },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in settings file")]
    UnknownKeys(Vec<AdminError>),

    #[error("Failed to parse {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),

    #[error("Invalid value for setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("App name is required; call .app_name() on the builder")]
    AppNameRequired,
}

impl AdminError {
    /// True for failures that happened before any write was attempted because
    /// the site configuration could not be read or understood.
    pub fn is_read_error(&self) -> bool {
        matches!(self, AdminError::ConfigRead { .. })
    }

    /// True when a computed configuration could not be written to disk.
    pub fn is_write_error(&self) -> bool {
        matches!(self, AdminError::ConfigWrite { .. })
    }
}

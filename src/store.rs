//! The site configuration file on disk.
//!
//! [`ConfigStore`] is the only place the file is read or written. Every
//! request loads a fresh [`LoadedConfig`]; nothing is cached between calls.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::ConfigDocument;
use crate::error::{AdminError, ReadError};
use crate::format;
use crate::persist;

/// A freshly read configuration: the parsed document and the exact text it
/// came from, which the serializer needs to preserve layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub document: ConfigDocument,
    pub raw: String,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file. A missing, unreadable or malformed file is a
    /// [`AdminError::ConfigRead`].
    pub fn load(&self) -> Result<LoadedConfig, AdminError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| self.read_error(e.into()))?;
        let document = format::parse_document(&raw).map_err(|e| self.read_error(e.into()))?;
        Ok(LoadedConfig { document, raw })
    }

    /// Replace the file with `contents`. See [`persist::write_atomic`].
    pub fn persist(&self, contents: &str) -> Result<(), AdminError> {
        persist::write_atomic(&self.path, contents)?;
        info!(path = %self.path.display(), "site configuration written");
        Ok(())
    }

    pub(crate) fn read_error(&self, source: ReadError) -> AdminError {
        AdminError::ConfigRead {
            path: self.path.clone(),
            source,
        }
    }
}

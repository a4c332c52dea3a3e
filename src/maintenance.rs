//! Collaborators behind the maintenance actions: the admin check, the session
//! store and the caches.
//!
//! The handler only sees the traits. [`DirectoryPurge`] is the stock
//! implementation for file-backed sessions and caches: it empties a directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::AdminError;

/// Approves or rejects the caller before any admin action runs.
pub trait AdminValidator {
    fn validate(&self) -> Result<(), AdminError>;
}

/// Removes every stored user session.
pub trait SessionStore {
    /// Returns how many sessions were removed.
    fn delete_all_sessions(&self) -> Result<usize, AdminError>;
}

/// A cache that can be emptied.
pub trait CacheFlush {
    /// Returns how many entries were removed.
    fn flush(&self) -> Result<usize, AdminError>;
}

/// Approves everyone. For local command-line use, where being able to run the
/// tool already implies access to the files it manages.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOperator;

impl AdminValidator for LocalOperator {
    fn validate(&self) -> Result<(), AdminError> {
        Ok(())
    }
}

/// Approves callers that present the configured admin token.
#[derive(Debug, Clone)]
pub struct RequireToken {
    expected: String,
    presented: Option<String>,
}

impl RequireToken {
    pub fn new(expected: impl Into<String>, presented: Option<String>) -> Self {
        Self {
            expected: expected.into(),
            presented,
        }
    }
}

impl AdminValidator for RequireToken {
    fn validate(&self) -> Result<(), AdminError> {
        match &self.presented {
            None => Err(AdminError::Unauthorized("no admin token presented".into())),
            Some(token) if *token == self.expected => Ok(()),
            Some(_) => Err(AdminError::Unauthorized("admin token does not match".into())),
        }
    }
}

/// Empties a directory. Serves as a session store (one file per session) and
/// as a cache (compiled templates, data cache entries).
#[derive(Debug, Clone)]
pub struct DirectoryPurge {
    dir: PathBuf,
}

impl DirectoryPurge {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove everything inside the directory, keeping the directory itself.
    /// A missing directory counts as already empty.
    pub fn purge(&self) -> Result<usize, AdminError> {
        let failed = |source: std::io::Error| AdminError::Maintenance {
            path: self.dir.clone(),
            source,
        };

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(failed(e)),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(failed)?;
            let path = entry.path();
            if entry.file_type().map_err(failed)?.is_dir() {
                std::fs::remove_dir_all(&path).map_err(failed)?;
            } else {
                std::fs::remove_file(&path).map_err(failed)?;
            }
            removed += 1;
        }

        debug!(dir = %self.dir.display(), removed, "directory purged");
        Ok(removed)
    }
}

impl SessionStore for DirectoryPurge {
    fn delete_all_sessions(&self) -> Result<usize, AdminError> {
        self.purge()
    }
}

impl CacheFlush for DirectoryPurge {
    fn flush(&self) -> Result<usize, AdminError> {
        self.purge()
    }
}

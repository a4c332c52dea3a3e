//! Installed-version history shown on the system information page.
//!
//! History is kept in a TOML file with one `[[version]]` entry per install or
//! upgrade, oldest first:
//!
//! ```toml
//! [[version]]
//! product = "ojs2"
//! major = 2
//! minor = 3
//! revision = 6
//! build = 0
//! installed = "2011-06-01"
//! current = true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    #[serde(default)]
    pub product: String,
    pub major: u32,
    pub minor: u32,
    #[serde(default)]
    pub revision: u32,
    #[serde(default)]
    pub build: u32,
    /// Install or upgrade date, as written in the history file.
    #[serde(default)]
    pub installed: Option<String>,
    #[serde(default)]
    pub current: bool,
}

impl VersionRecord {
    /// `major.minor.revision.build`.
    pub fn version_string(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.major, self.minor, self.revision, self.build
        )
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.product.is_empty() {
            write!(f, "{} ", self.product)?;
        }
        write!(f, "{}", self.version_string())?;
        if let Some(date) = &self.installed {
            write!(f, " (installed {date})")?;
        }
        Ok(())
    }
}

pub trait VersionRegistry {
    /// Every recorded version, oldest first.
    fn version_history(&self) -> Result<Vec<VersionRecord>, AdminError>;

    /// The version flagged `current`, or the newest entry if none is flagged.
    fn current_version(&self) -> Result<Option<VersionRecord>, AdminError> {
        let history = self.version_history()?;
        let current = history
            .iter()
            .rfind(|v| v.current)
            .or_else(|| history.last())
            .cloned();
        Ok(current)
    }
}

/// A fixed history, e.g. when no history file is configured.
impl VersionRegistry for Vec<VersionRecord> {
    fn version_history(&self) -> Result<Vec<VersionRecord>, AdminError> {
        Ok(self.clone())
    }
}

/// Reads history from a TOML file on every call. A missing file is an empty
/// history.
#[derive(Debug, Clone)]
pub struct VersionHistoryFile {
    path: PathBuf,
}

#[derive(Deserialize)]
struct HistoryDocument {
    #[serde(default, rename = "version")]
    versions: Vec<VersionRecord>,
}

impl VersionHistoryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionRegistry for VersionHistoryFile {
    fn version_history(&self) -> Result<Vec<VersionRecord>, AdminError> {
        let failed = |reason: String| AdminError::VersionHistory {
            path: self.path.clone(),
            reason,
        };

        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(failed(e.to_string())),
        };

        let doc: HistoryDocument = toml::from_str(&content).map_err(|e| failed(e.to_string()))?;
        Ok(doc.versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HISTORY: &str = r#"
[[version]]
product = "ojs2"
major = 2
minor = 3
revision = 5
installed = "2010-11-02"

[[version]]
product = "ojs2"
major = 2
minor = 3
revision = 6
installed = "2011-06-01"
current = true
"#;

    fn record(minor: u32, current: bool) -> VersionRecord {
        VersionRecord {
            product: "ojs2".into(),
            major: 2,
            minor,
            revision: 0,
            build: 0,
            installed: None,
            current,
        }
    }

    #[test]
    fn reads_history_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versions.toml");
        fs::write(&path, HISTORY).unwrap();

        let registry = VersionHistoryFile::new(&path);
        let history = registry.version_history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].version_string(), "2.3.5.0");

        let current = registry.current_version().unwrap().unwrap();
        assert_eq!(current.revision, 6);
        assert!(current.current);
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let registry = VersionHistoryFile::new(dir.path().join("absent.toml"));
        assert!(registry.version_history().unwrap().is_empty());
        assert_eq!(registry.current_version().unwrap(), None);
    }

    #[test]
    fn malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("versions.toml");
        fs::write(&path, "[[version]]\nmajor = \"two\"\n").unwrap();

        let err = VersionHistoryFile::new(&path).version_history().unwrap_err();
        assert!(matches!(err, AdminError::VersionHistory { .. }));
    }

    #[test]
    fn current_falls_back_to_newest() {
        let history = vec![record(1, false), record(2, false)];
        assert_eq!(history.current_version().unwrap().unwrap().minor, 2);
    }

    #[test]
    fn current_prefers_flagged_entry() {
        let history = vec![record(1, true), record(2, false)];
        assert_eq!(history.current_version().unwrap().unwrap().minor, 1);
    }

    #[test]
    fn display_includes_product_and_date() {
        let mut v = record(3, true);
        v.installed = Some("2011-06-01".into());
        assert_eq!(v.to_string(), "ojs2 2.3.0.0 (installed 2011-06-01)");
    }
}

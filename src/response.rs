//! What an admin action hands back to the presentation layer.
//!
//! Views carry data; rendering them is the caller's job. `Display` gives a
//! plain-text rendering for terminals and logs.

use std::fmt;

use crate::document::ConfigDocument;
use crate::service::{SaveOutcome, SaveState};
use crate::versions::VersionRecord;

/// Where maintenance actions send the user afterwards.
pub const ADMIN_INDEX: &str = "admin";

/// Data for the system information page.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemInfo {
    pub current_version: Option<VersionRecord>,
    pub version_history: Vec<VersionRecord>,
    /// Labelled server details, in display order.
    pub server: Vec<(String, String)>,
    pub config: ConfigDocument,
}

#[derive(Debug)]
pub enum AdminResponse {
    SystemInfo(SystemInfo),
    /// The current configuration, for an edit form.
    ConfigEditor { document: ConfigDocument },
    ConfigSaved(SaveOutcome),
    /// A maintenance action finished; go back to `target`.
    Redirect { target: &'static str, notice: String },
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.current_version {
            Some(v) => writeln!(f, "Current version: {v}")?,
            None => writeln!(f, "Current version: unknown")?,
        }

        if !self.version_history.is_empty() {
            writeln!(f)?;
            writeln!(f, "Version history:")?;
            for v in &self.version_history {
                writeln!(f, "  {v}")?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Server information:")?;
        let width = self.server.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (label, value) in &self.server {
            writeln!(f, "  {label:<width$}  {value}")?;
        }

        writeln!(f)?;
        writeln!(f, "Configuration:")?;
        write!(f, "{}", self.config)
    }
}

impl fmt::Display for AdminResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminResponse::SystemInfo(info) => write!(f, "{info}"),
            AdminResponse::ConfigEditor { document } => write!(f, "{document}"),
            AdminResponse::ConfigSaved(outcome) => match &outcome.state {
                SaveState::Persisted => {
                    writeln!(f, "Configuration saved to {}", outcome.path.display())
                }
                SaveState::DryRunDisplayed => write!(f, "{}", outcome.contents),
                SaveState::PersistFailed(err) => {
                    writeln!(f, "{err}")?;
                    writeln!(
                        f,
                        "Replace the contents of {} with the following:",
                        outcome.path.display()
                    )?;
                    writeln!(f)?;
                    write!(f, "{}", outcome.contents)
                }
            },
            AdminResponse::Redirect { notice, .. } => writeln!(f, "{notice}"),
        }
    }
}

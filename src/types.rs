//! Plain types shared by the builder, the handler and the CLI adapter.

use std::path::PathBuf;

use crate::document::EditRequest;

/// Where to look for the admin tool's own settings file.
///
/// Listed in **priority-ascending** order on the builder: files found in later
/// entries override earlier ones key by key.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, `~/Library/Application Support` on macOS).
    Platform,
    /// A subdirectory of the user's home directory, e.g. `Home(".adminfig")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory, e.g. `/etc/adminfig`.
    Path(PathBuf),
}

/// Whether a configuration save is written to disk or only rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// Write the new file.
    #[default]
    Commit,
    /// Render the new file text for display without writing it.
    DisplayOnly,
}

/// One administrative action, independent of any HTTP or CLI framework.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminAction {
    /// Version history, server details and the current configuration.
    SystemInfo,
    /// The current configuration, for an edit form.
    EditConfig,
    /// Apply edits to the configuration file.
    SaveConfig { edits: EditRequest, mode: SaveMode },
    /// Log every user out.
    ExpireSessions,
    /// Remove compiled templates.
    ClearTemplateCache,
    /// Flush every data cache.
    ClearDataCache,
}

impl AdminAction {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::SystemInfo => "system_info",
            AdminAction::EditConfig => "edit_system_config",
            AdminAction::SaveConfig { .. } => "save_system_config",
            AdminAction::ExpireSessions => "expire_sessions",
            AdminAction::ClearTemplateCache => "clear_template_cache",
            AdminAction::ClearDataCache => "clear_data_cache",
        }
    }
}

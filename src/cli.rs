//! Clap adapter for the admin actions.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default).
//! [`AdminArgs`] embeds into an application's `#[derive(Parser)]` struct and
//! provides `info`, `config show|save`, `expire-sessions`,
//! `clear-template-cache` and `clear-data-cache`.
//!
//! The only bridge to the core is [`AdminArgs::into_action()`]. Everything
//! after that goes through the clap-free
//! [`AdminfigBuilder::handle()`](crate::AdminfigBuilder::handle) API.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::document::EditRequest;
use crate::error::AdminError;
use crate::types::{AdminAction, SaveMode};

/// Clap-derived args for the admin subcommand group.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     admin: AdminArgs,
/// }
/// ```
#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: Option<AdminSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum AdminSubcommand {
    /// Show version history, server details and the current configuration.
    Info,
    /// Show or change the site configuration file.
    Config(ConfigArgs),
    /// Log every user out.
    ExpireSessions,
    /// Remove compiled templates.
    ClearTemplateCache,
    /// Flush the data caches.
    ClearDataCache,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the current configuration.
    Show,
    /// Apply edits and write the configuration file.
    Save {
        /// Edits as `section.key=value` or `section[key]=value`.
        assignments: Vec<String>,
        /// Read edits from a JSON file of `{"section": {"key": value}}`.
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
        /// Print the new file instead of writing it.
        #[arg(long)]
        display: bool,
    },
}

impl AdminArgs {
    /// Convert clap-parsed args into a framework-agnostic [`AdminAction`].
    ///
    /// A bare invocation maps to [`AdminAction::SystemInfo`] and a bare
    /// `config` to [`AdminAction::EditConfig`]. For `config save`, edits from
    /// `--json` apply first and command-line assignments override them.
    pub fn into_action(self) -> Result<AdminAction, AdminError> {
        let action = match self.action {
            None | Some(AdminSubcommand::Info) => AdminAction::SystemInfo,
            Some(AdminSubcommand::Config(ConfigArgs { action })) => match action {
                None | Some(ConfigSubcommand::Show) => AdminAction::EditConfig,
                Some(ConfigSubcommand::Save {
                    assignments,
                    json,
                    display,
                }) => {
                    let mut edits = match json {
                        Some(path) => read_json_edits(path)?,
                        None => EditRequest::new(),
                    };
                    edits.extend(EditRequest::from_assignments(&assignments)?);
                    let mode = if display {
                        SaveMode::DisplayOnly
                    } else {
                        SaveMode::Commit
                    };
                    AdminAction::SaveConfig { edits, mode }
                }
            },
            Some(AdminSubcommand::ExpireSessions) => AdminAction::ExpireSessions,
            Some(AdminSubcommand::ClearTemplateCache) => AdminAction::ClearTemplateCache,
            Some(AdminSubcommand::ClearDataCache) => AdminAction::ClearDataCache,
        };
        Ok(action)
    }
}

fn read_json_edits(path: PathBuf) -> Result<EditRequest, AdminError> {
    let text = std::fs::read_to_string(&path).map_err(|e| AdminError::InvalidEdit {
        input: path.display().to_string(),
        reason: e.to_string(),
    })?;
    EditRequest::from_json(&text)
}

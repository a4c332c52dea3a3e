//! Site administration: edit a TOML configuration file without losing its
//! comments, and run the maintenance chores an administrator needs.
//!
//! Adminfig sits behind the administration pages (or command line) of a web
//! application. It reads the site's configuration file, lets an administrator
//! change values, and writes the file back with every comment, blank line and
//! untouched value exactly as it was. Alongside that it expires user sessions,
//! clears the compiled template cache, flushes the data caches and reports
//! the installed version history.
//!
//! ```ignore
//! Adminfig::builder()
//!     .app_name("journal")
//!     .handle_and_print(&AdminAction::SaveConfig {
//!         edits: EditRequest::new().with("general", "installed", "on"),
//!         mode: SaveMode::Commit,
//!     })?;
//! ```
//!
//! That call finds `journal.toml` in the platform config directory, merges
//! `JOURNAL__*` environment variables over it, opens the site configuration
//! file it names, sets `installed = true` and saves the file atomically.
//!
//! # Editing the configuration file
//!
//! The site configuration is TOML where every setting lives in a section:
//!
//! ```toml
//! [general]
//! # Set to On once installation has completed
//! installed = false
//! base_url = "http://old.example.org"   # public address
//! ```
//!
//! [`parse_document`] turns it into a [`ConfigDocument`], an ordered list of
//! sections whose values are rendered as text (booleans as `On`/`Off`).
//! [`update`] applies an [`EditRequest`] to a document: only settings that
//! already exist change, anything unknown is ignored, and boolean-looking
//! input is normalized. [`serialize`] writes the result back over the
//! original text, touching only the changed values and keeping each value's
//! TOML type when the new text fits it.
//!
//! [`save_config`] runs the whole read-modify-write cycle against a
//! [`ConfigStore`]. In [`SaveMode::DisplayOnly`] the new text is produced but
//! never written. When a commit fails to write, the outcome still carries the
//! new text so it can be shown for manual installation.
//!
//! # Actions
//!
//! [`AdminHandler`] exposes one method per [`AdminAction`]:
//!
//! | Action | Effect |
//! |---|---|
//! | `SystemInfo` | version history, server details, current configuration |
//! | `EditConfig` | the current configuration, for an edit form |
//! | `SaveConfig` | apply edits, write or display the new file |
//! | `ExpireSessions` | delete every stored session |
//! | `ClearTemplateCache` | remove compiled templates |
//! | `ClearDataCache` | flush every data cache, in order |
//!
//! Every action first asks the handler's [`AdminValidator`]. A rejection is
//! [`AdminError::Unauthorized`] and nothing else runs. Maintenance actions end
//! with an [`AdminResponse::Redirect`] back to [`ADMIN_INDEX`].
//!
//! Sessions and caches sit behind the [`SessionStore`] and [`CacheFlush`]
//! traits; [`DirectoryPurge`] implements both for file-backed storage.
//! Version history comes from a [`VersionRegistry`], by default a
//! [`VersionHistoryFile`].
//!
//! # The tool's own settings
//!
//! Where those files live is described by [`AdminSettings`], resolved through
//! layers (lowest first):
//!
//! 1. Compiled defaults from `#[config(default)]`.
//! 2. Every settings file found on the search paths, merged in order.
//! 3. `PREFIX__SECTION__KEY` environment variables.
//! 4. Overrides set with [`AdminfigBuilder::set_override`].
//!
//! Strict mode (on by default) rejects unknown keys in settings files with
//! the file path and line number. [`settings_template`] renders a commented
//! settings file.
//!
//! # Clap adapter
//!
//! With the `clap` feature (on by default), `AdminArgs` flattens into an
//! application's parser and provides `info`, `config show|save`,
//! `expire-sessions`, `clear-template-cache` and `clear-data-cache`.
//! `AdminArgs::into_action` is the only bridge to the core.
//!
//! # Logging
//!
//! Adminfig emits [tracing](https://docs.rs/tracing) events. Writes and
//! maintenance results log at `info`. Failed writes and document settings
//! missing from the file log at `warn`. Edits naming unknown settings and
//! settings discovery log at `debug`. Install a subscriber to see them.

pub mod error;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod document;
mod env;
mod file;
mod format;
mod handler;
mod maintenance;
pub(crate) mod merge;
mod persist;
mod resolve;
mod response;
mod service;
mod settings;
mod store;
mod validate;
mod versions;

#[cfg(test)]
mod fixtures;

pub use builder::{Adminfig, AdminfigBuilder};
#[cfg(feature = "clap")]
pub use cli::{AdminArgs, AdminSubcommand, ConfigArgs, ConfigSubcommand};
pub use document::{ConfigDocument, EditRequest, Section, normalize, update};
pub use error::{AdminError, ReadError};
pub use format::{FormatError, parse_document, serialize};
pub use handler::AdminHandler;
pub use maintenance::{
    AdminValidator, CacheFlush, DirectoryPurge, LocalOperator, RequireToken, SessionStore,
};
pub use persist::write_atomic;
pub use response::{ADMIN_INDEX, AdminResponse, SystemInfo};
pub use service::{SaveOutcome, SaveState, apply_edits, merge_config, save_config};
pub use settings::{
    AccessSettings, AdminSettings, CacheSettings, SessionSettings, SiteSettings, VersionSettings,
    settings_template,
};
pub use store::{ConfigStore, LoadedConfig};
pub use types::{AdminAction, SaveMode, SearchPath};
pub use versions::{VersionHistoryFile, VersionRecord, VersionRegistry};

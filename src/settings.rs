//! Settings for the admin tool itself: where the site keeps its configuration
//! file, sessions, caches and version history.
//!
//! These are not the site's settings (those live in the file named by
//! `site.config_file`). They are resolved through layers, lowest first:
//! compiled defaults, settings files on the search paths, `PREFIX__*`
//! environment variables, then programmatic overrides. See
//! [`AdminfigBuilder`](crate::AdminfigBuilder).

use std::path::PathBuf;

use confique::Config;
use serde::{Deserialize, Serialize};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AdminSettings {
    /// The site configuration edited by the admin actions.
    #[config(nested)]
    pub site: SiteSettings,

    /// Stored user sessions.
    #[config(nested)]
    pub sessions: SessionSettings,

    /// Template and data caches.
    #[config(nested)]
    pub cache: CacheSettings,

    /// Installed-version history.
    #[config(nested)]
    pub versions: VersionSettings,

    /// Access control for the admin actions.
    #[config(nested)]
    pub access: AccessSettings,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SiteSettings {
    /// Path of the site's TOML configuration file.
    #[config(default = "config.toml")]
    pub config_file: PathBuf,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Directory holding one file per user session.
    #[config(default = "data/sessions")]
    pub dir: PathBuf,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Directory of compiled templates.
    #[config(default = "cache/t_compile")]
    pub template_dir: PathBuf,

    /// Data cache directories, flushed in order.
    #[config(default = ["cache/data", "cache/db"])]
    pub data_dirs: Vec<PathBuf>,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VersionSettings {
    /// TOML file of `[[version]]` records. Without it the history is empty.
    pub history_file: Option<PathBuf>,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AccessSettings {
    /// When set, callers must present this token.
    pub token: Option<String>,
}

/// Commented TOML template for a settings file.
pub fn settings_template() -> String {
    confique::toml::template::<AdminSettings>(confique::toml::FormatOptions::default())
}

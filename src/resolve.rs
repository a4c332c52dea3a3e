//! Settings resolution: merge every layer and let confique fill defaults.
//!
//! Works on pre-loaded data ([`ResolveInput`]) so the whole pipeline can be
//! tested without touching the filesystem or the real environment.

use std::path::PathBuf;

use confique::Config;
use toml::{Table, Value};

use crate::env;
use crate::error::AdminError;
use crate::merge::{deep_merge, dotted_to_table};
use crate::settings::AdminSettings;
use crate::validate;

pub struct ResolveInput {
    /// Settings files, lowest priority first.
    pub files: Vec<(PathBuf, String)>,
    /// Environment variables (`std::env::vars()` or synthetic pairs).
    pub env_vars: Vec<(String, String)>,
    /// `None` disables the environment layer.
    pub env_prefix: Option<String>,
    /// `(dotted_key, value)` overrides; highest priority.
    pub overrides: Vec<(String, Value)>,
    /// Reject unknown keys in settings files.
    pub strict: bool,
}

pub fn resolve(input: ResolveInput) -> Result<AdminSettings, AdminError> {
    let mut merged = Table::new();

    for (path, content) in &input.files {
        if input.strict {
            validate::validate_unknown_keys(content, path)?;
        }
        let table: Table = toml::from_str(content).map_err(|e| AdminError::SettingsParse {
            path: path.clone(),
            source: e,
        })?;
        merged = deep_merge(merged, table);
    }

    if let Some(prefix) = &input.env_prefix {
        merged = deep_merge(merged, env::env_to_table(prefix, input.env_vars));
    }

    if !input.overrides.is_empty() {
        merged = deep_merge(merged, dotted_to_table(&input.overrides));
    }

    let layer: <AdminSettings as Config>::Layer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| AdminError::InvalidSetting {
                key: "<merged>".into(),
                reason: e.to_string(),
            })?;

    AdminSettings::builder()
        .preloaded(layer)
        .load()
        .map_err(AdminError::from)
}

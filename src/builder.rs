use tracing::debug;

use crate::error::AdminError;
use crate::file;
use crate::handler::AdminHandler;
use crate::maintenance::{AdminValidator, LocalOperator, RequireToken};
use crate::resolve::{self, ResolveInput};
use crate::response::AdminResponse;
use crate::settings::AdminSettings;
use crate::types::{AdminAction, SearchPath};

/// Entry point for building an admin handler from layered settings.
pub struct Adminfig;

impl Adminfig {
    pub fn builder() -> AdminfigBuilder {
        AdminfigBuilder::new()
    }
}

/// Builder for loading [`AdminSettings`] and wiring an [`AdminHandler`].
///
/// Settings resolve through compiled defaults, then every settings file found
/// on the [search paths](Self::search_paths), then `PREFIX__SECTION__KEY`
/// environment variables, then [overrides](Self::set_override).
///
/// Access control defaults to the settings: when `access.token` is set the
/// caller must present it with [`presented_token`](Self::presented_token),
/// otherwise every caller is approved. [`validator`](Self::validator)
/// replaces that decision entirely.
pub struct AdminfigBuilder {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    env_prefix: Option<String>,
    env_enabled: bool,
    strict: bool,
    overrides: Vec<(String, toml::Value)>,
    presented_token: Option<String>,
    validator: Option<Box<dyn AdminValidator>>,
}

impl AdminfigBuilder {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            env_prefix: None,
            env_enabled: true,
            strict: true,
            overrides: Vec::new(),
            presented_token: None,
            validator: None,
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - `file_name` → `"{app_name}.toml"`
    /// - `search_paths` → `[SearchPath::Platform]`
    /// - `env_prefix` → `"{APP_NAME}"` (uppercased)
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the settings file name (default: `"{app_name}.toml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path without replacing the defaults.
    /// If no paths have been set yet, starts from the default `[Platform]`.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(|| vec![SearchPath::Platform])
            .push(path);
        self
    }

    /// Override the environment variable prefix (default: uppercased `app_name`).
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable environment variable loading entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Enable or disable strict mode (default: `true`).
    /// In strict mode, unknown keys in settings files produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Override one setting by dotted key, e.g. `"site.config_file"`.
    /// `None` values are ignored (useful for optional clap args).
    pub fn set_override<V: Into<toml::Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.overrides.push((key.to_string(), v.into()));
        }
        self
    }

    /// The token the caller presents, checked against `access.token`.
    pub fn presented_token(mut self, token: Option<String>) -> Self {
        self.presented_token = token;
        self
    }

    /// Use `validator` instead of the token check derived from settings.
    pub fn validator(mut self, validator: Box<dyn AdminValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    fn effective_app_name(&self) -> Result<&str, AdminError> {
        self.app_name.as_deref().ok_or(AdminError::AppNameRequired)
    }

    fn effective_file_name(&self) -> Result<String, AdminError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        let app = self.effective_app_name()?;
        Ok(format!("{app}.toml"))
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        if let Some(paths) = &self.search_paths {
            return paths.clone();
        }
        vec![SearchPath::Platform]
    }

    /// `None` when the environment layer is disabled.
    fn effective_env_prefix(&self) -> Result<Option<String>, AdminError> {
        if !self.env_enabled {
            return Ok(None);
        }
        if let Some(prefix) = &self.env_prefix {
            return Ok(Some(prefix.clone()));
        }
        let app = self.effective_app_name()?;
        Ok(Some(app.to_uppercase()))
    }

    fn build_input(&self) -> Result<ResolveInput, AdminError> {
        let app_name = self.effective_app_name()?;
        let file_name = self.effective_file_name()?;
        let search_paths = self.effective_search_paths();
        let env_prefix = self.effective_env_prefix()?;

        let files = file::load_settings_files(&search_paths, &file_name, app_name)?;
        debug!(files = files.len(), "settings files found");
        let env_vars = if env_prefix.is_some() {
            std::env::vars().collect()
        } else {
            Vec::new()
        };

        Ok(ResolveInput {
            files,
            env_vars,
            env_prefix,
            overrides: self.overrides.clone(),
            strict: self.strict,
        })
    }

    /// Resolve the admin tool's settings through all layers.
    pub fn load_settings(&self) -> Result<AdminSettings, AdminError> {
        resolve::resolve(self.build_input()?)
    }

    /// Load the settings and wire a handler over them.
    pub fn build(self) -> Result<AdminHandler, AdminError> {
        let settings = self.load_settings()?;
        let validator: Box<dyn AdminValidator> = match self.validator {
            Some(validator) => validator,
            None => match &settings.access.token {
                Some(expected) => Box::new(RequireToken::new(expected, self.presented_token)),
                None => Box::new(LocalOperator),
            },
        };
        debug!(
            config_file = %settings.site.config_file.display(),
            "admin handler ready"
        );
        Ok(AdminHandler::from_settings(&settings, validator))
    }

    /// Build a handler and run one action.
    pub fn handle(self, action: &AdminAction) -> Result<AdminResponse, AdminError> {
        self.build()?.handle(action)
    }

    /// Run one action and print the result to stdout.
    pub fn handle_and_print(self, action: &AdminAction) -> Result<(), AdminError> {
        let response = self.handle(action)?;
        print!("{response}");
        Ok(())
    }
}

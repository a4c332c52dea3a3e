//! The administrative actions.
//!
//! Every action asks the [`AdminValidator`] first; a rejection returns
//! [`AdminError::Unauthorized`] before any collaborator is touched.

use tracing::info;

use crate::document::EditRequest;
use crate::error::AdminError;
use crate::maintenance::{AdminValidator, CacheFlush, DirectoryPurge, SessionStore};
use crate::response::{ADMIN_INDEX, AdminResponse, SystemInfo};
use crate::service;
use crate::settings::AdminSettings;
use crate::store::ConfigStore;
use crate::types::{AdminAction, SaveMode};
use crate::versions::{VersionHistoryFile, VersionRegistry};

const NOT_AVAILABLE: &str = "not available";

pub struct AdminHandler {
    validator: Box<dyn AdminValidator>,
    store: ConfigStore,
    sessions: Box<dyn SessionStore>,
    template_cache: Box<dyn CacheFlush>,
    data_caches: Vec<Box<dyn CacheFlush>>,
    versions: Box<dyn VersionRegistry>,
}

impl AdminHandler {
    /// A handler with no data caches and an empty version history; add them
    /// with [`with_data_cache`](Self::with_data_cache) and
    /// [`with_versions`](Self::with_versions).
    pub fn new(
        validator: Box<dyn AdminValidator>,
        store: ConfigStore,
        sessions: Box<dyn SessionStore>,
        template_cache: Box<dyn CacheFlush>,
    ) -> Self {
        Self {
            validator,
            store,
            sessions,
            template_cache,
            data_caches: Vec::new(),
            versions: Box::new(Vec::new()),
        }
    }

    /// Wire the file-backed collaborators named in `settings`.
    pub fn from_settings(settings: &AdminSettings, validator: Box<dyn AdminValidator>) -> Self {
        let mut handler = Self::new(
            validator,
            ConfigStore::new(&settings.site.config_file),
            Box::new(DirectoryPurge::new(&settings.sessions.dir)),
            Box::new(DirectoryPurge::new(&settings.cache.template_dir)),
        );
        for dir in &settings.cache.data_dirs {
            handler = handler.with_data_cache(Box::new(DirectoryPurge::new(dir)));
        }
        if let Some(path) = &settings.versions.history_file {
            handler = handler.with_versions(Box::new(VersionHistoryFile::new(path)));
        }
        handler
    }

    /// Add a data cache; [`clear_data_cache`](Self::clear_data_cache) flushes
    /// them in the order added.
    pub fn with_data_cache(mut self, cache: Box<dyn CacheFlush>) -> Self {
        self.data_caches.push(cache);
        self
    }

    pub fn with_versions(mut self, versions: Box<dyn VersionRegistry>) -> Self {
        self.versions = versions;
        self
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn handle(&self, action: &AdminAction) -> Result<AdminResponse, AdminError> {
        tracing::debug!(action = action.name(), "handling admin action");
        match action {
            AdminAction::SystemInfo => self.system_info(),
            AdminAction::EditConfig => self.edit_system_config(),
            AdminAction::SaveConfig { edits, mode } => self.save_system_config(edits, *mode),
            AdminAction::ExpireSessions => self.expire_sessions(),
            AdminAction::ClearTemplateCache => self.clear_template_cache(),
            AdminAction::ClearDataCache => self.clear_data_cache(),
        }
    }

    pub fn system_info(&self) -> Result<AdminResponse, AdminError> {
        self.validator.validate()?;

        let config = self.store.load()?.document;
        let version_history = self.versions.version_history()?;
        let current_version = self.versions.current_version()?;

        let driver = config
            .get("database", "driver")
            .unwrap_or(NOT_AVAILABLE)
            .to_string();
        let server = vec![
            (
                "platform".to_string(),
                format!("{} ({})", std::env::consts::OS, std::env::consts::ARCH),
            ),
            (
                "admin tool".to_string(),
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            ),
            ("database driver".to_string(), driver),
        ];

        Ok(AdminResponse::SystemInfo(SystemInfo {
            current_version,
            version_history,
            server,
            config,
        }))
    }

    pub fn edit_system_config(&self) -> Result<AdminResponse, AdminError> {
        self.validator.validate()?;
        let document = self.store.load()?.document;
        Ok(AdminResponse::ConfigEditor { document })
    }

    pub fn save_system_config(
        &self,
        edits: &EditRequest,
        mode: SaveMode,
    ) -> Result<AdminResponse, AdminError> {
        self.validator.validate()?;
        let outcome = service::save_config(&self.store, edits, mode)?;
        Ok(AdminResponse::ConfigSaved(outcome))
    }

    pub fn expire_sessions(&self) -> Result<AdminResponse, AdminError> {
        self.validator.validate()?;
        let removed = self.sessions.delete_all_sessions()?;
        info!(removed, "expired all sessions");
        Ok(redirect(format!("Expired {removed} session(s)")))
    }

    pub fn clear_template_cache(&self) -> Result<AdminResponse, AdminError> {
        self.validator.validate()?;
        let removed = self.template_cache.flush()?;
        info!(removed, "cleared template cache");
        Ok(redirect(format!(
            "Cleared {removed} compiled template entr{}",
            if removed == 1 { "y" } else { "ies" }
        )))
    }

    pub fn clear_data_cache(&self) -> Result<AdminResponse, AdminError> {
        self.validator.validate()?;
        let mut removed = 0;
        for cache in &self.data_caches {
            removed += cache.flush()?;
        }
        info!(removed, caches = self.data_caches.len(), "cleared data caches");
        Ok(redirect(format!(
            "Cleared {removed} data cache entr{}",
            if removed == 1 { "y" } else { "ies" }
        )))
    }
}

fn redirect(notice: String) -> AdminResponse {
    AdminResponse::Redirect {
        target: ADMIN_INDEX,
        notice,
    }
}

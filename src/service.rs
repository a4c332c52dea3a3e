//! Saving edited configuration: load, merge, render, then display or commit.
//!
//! Each call runs the whole sequence for one request:
//!
//! ```text
//! Loaded --update--> Merged --+--> DryRunDisplayed   (display-only, no write)
//!                             +--> Persisted         (write succeeded)
//!                             +--> PersistFailed     (write failed; text kept)
//! ```
//!
//! A file that cannot be read or parsed stops the request with
//! [`AdminError::ConfigRead`] before anything is written. A failed write does
//! not: the merged document and rendered text are still returned so the
//! administrator can apply them by hand.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::document::{ConfigDocument, EditRequest, update};
use crate::error::AdminError;
use crate::format;
use crate::store::{ConfigStore, LoadedConfig};
use crate::types::SaveMode;

/// Where a save ended up.
#[derive(Debug)]
pub enum SaveState {
    /// Display-only mode; the file was not touched.
    DryRunDisplayed,
    /// The new contents were written.
    Persisted,
    /// Writing failed. The outcome still carries the computed contents.
    PersistFailed(AdminError),
}

/// Result of [`save_config`], handed to the presentation layer.
#[derive(Debug)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub document: ConfigDocument,
    pub contents: String,
    pub state: SaveState,
}

impl SaveOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self.state, SaveState::Persisted)
    }

    pub fn is_display_only(&self) -> bool {
        matches!(self.state, SaveState::DryRunDisplayed)
    }

    /// The write error, if the commit failed.
    pub fn write_error(&self) -> Option<&AdminError> {
        match &self.state {
            SaveState::PersistFailed(err) => Some(err),
            _ => None,
        }
    }
}

/// Apply `edits` to the loaded configuration and render the new file text.
/// No I/O.
pub fn merge_config(
    loaded: LoadedConfig,
    edits: &EditRequest,
) -> Result<(ConfigDocument, String), format::FormatError> {
    let ignored = edits.unknown_keys(&loaded.document);
    if !ignored.is_empty() {
        debug!(?ignored, "ignoring edits for settings the config file does not have");
    }

    let document = update(loaded.document, edits);
    let contents = format::serialize(&document, &loaded.raw)?;
    Ok((document, contents))
}

/// Load the site configuration, apply `edits`, and either display or commit
/// the result depending on `mode`.
pub fn save_config(
    store: &ConfigStore,
    edits: &EditRequest,
    mode: SaveMode,
) -> Result<SaveOutcome, AdminError> {
    let loaded = store.load()?;
    apply_edits(store, loaded, edits, mode)
}

/// The part of [`save_config`] after loading: merge, render, then display or
/// commit to `store`.
pub fn apply_edits(
    store: &ConfigStore,
    loaded: LoadedConfig,
    edits: &EditRequest,
    mode: SaveMode,
) -> Result<SaveOutcome, AdminError> {
    let (document, contents) =
        merge_config(loaded, edits).map_err(|e| store.read_error(e.into()))?;

    let state = match mode {
        SaveMode::DisplayOnly => SaveState::DryRunDisplayed,
        SaveMode::Commit => match store.persist(&contents) {
            Ok(()) => SaveState::Persisted,
            Err(err) => {
                warn!(error = %err, "could not write site configuration; returning contents for manual update");
                SaveState::PersistFailed(err)
            }
        },
    };

    Ok(SaveOutcome {
        path: store.path().to_path_buf(),
        document,
        contents,
        state,
    })
}

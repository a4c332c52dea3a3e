//! Discovery of the admin tool's settings files.
//!
//! Each [`SearchPath`] resolves to a directory, checked for `{dir}/{file_name}`.
//! Every file found is returned in search order (lowest priority first) for
//! the resolver to merge. Missing files are skipped; other I/O errors are
//! reported.

use std::path::PathBuf;

use crate::error::AdminError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a directory, or `None` if it can't be
/// determined (no home directory, no working directory).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Read every `file_name` found along `search_paths`, in order.
pub fn load_settings_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
) -> Result<Vec<(PathBuf, String)>, AdminError> {
    let mut found = Vec::new();
    for dir in search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
    {
        let path = dir.join(file_name);
        match std::fs::read_to_string(&path) {
            Ok(content) => found.push((path, content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(AdminError::SettingsIo { path, source: e }),
        }
    }
    Ok(found)
}

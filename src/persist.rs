//! Atomic replacement of the site configuration file.
//!
//! The new contents go to a temporary file in the destination directory,
//! which is flushed to disk and then renamed over the destination. Readers
//! see either the old file or the new one, never a partial write. If any step
//! fails the temporary file is dropped and removed.

use std::io::Write;
use std::path::Path;

use crate::error::AdminError;

/// Write `contents` to `path` atomically, creating parent directories as
/// needed. An existing file's permissions carry over to the replacement; a
/// new file is created `0644` subject to the umask.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), AdminError> {
    let write_error = |source: std::io::Error| AdminError::ConfigWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_error)?;

    let mut builder = tempfile::Builder::new();
    // A new file gets 0644 less the umask instead of the temp file's 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o644));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(write_error)?;
    tmp.write_all(contents.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;

    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_error)?;
    }

    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

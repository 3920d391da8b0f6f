//! Filesystem helpers shared by the guide and cache writers

use std::fs::Permissions;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::errors::{AppError, AppResult};

/// Mode for files that did not exist before, matching a plain create under
/// the usual 022 umask. Other services (Jellyfin) read the guide.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o644;

/// Replace the contents of `path` with `bytes`.
///
/// Data goes to a temporary file next to the target which is then renamed
/// over it, so a run killed mid-write leaves the previous checkpoint intact.
/// Missing parent directories are created. An existing target keeps its
/// permissions; a new one is created world-readable.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> AppResult<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| AppError::file_access(parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(parent).map_err(|e| AppError::file_access(parent, e))?;
    file.write_all(bytes)
        .map_err(|e| AppError::file_access(path, e))?;
    if let Some(permissions) = target_permissions(path) {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| AppError::file_access(path, e))?;
    }
    file.as_file()
        .sync_all()
        .map_err(|e| AppError::file_access(path, e))?;
    file.persist(path)
        .map_err(|e| AppError::file_access(path, e.error))?;
    Ok(())
}

/// Permissions the replacement file should carry
fn target_permissions(path: &Path) -> Option<Permissions> {
    match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(_) => new_file_permissions(),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(NEW_FILE_MODE))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}

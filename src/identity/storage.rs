use super::IdentityError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// File holding the guest identifier inside the data directory
pub const GUEST_ID_FILE: &str = "guest_id";

/// Platform data directory for morph (e.g. `~/.local/share/morph` on Linux)
pub fn default_data_dir() -> Result<PathBuf, IdentityError> {
    ProjectDirs::from("dev", "morph", "morph")
        .map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
        .ok_or(IdentityError::NoDataDir)
}

/// Location of the guest id file under `data_dir`
pub fn guest_id_path(data_dir: &Path) -> PathBuf {
    data_dir.join(GUEST_ID_FILE)
}

/// Create the parent directory of `path` if needed
pub fn ensure_parent_exists(path: &Path) -> Result<(), IdentityError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|source| IdentityError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

//! `std::fs` backend.

use std::path::Path;

use tracing::trace;

use crate::{FileMode, FsDir, FsPermissions, FsRead, FsWrite, UtilError};

/// Backend that talks to the host filesystem through `std::fs`.
///
/// On Unix, modes are the real `st_mode` permission bits. Elsewhere only the
/// platform read-only flag exists, so [`mode`](FsPermissions::mode) reports
/// `0o444` or `0o666` and [`set_mode`](FsPermissions::set_mode) sets the flag
/// when no write bit is requested.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFs;

impl NativeFs {
    /// Create the backend.
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
fn mode_of(metadata: &std::fs::Metadata) -> FileMode {
    use std::os::unix::fs::PermissionsExt;
    FileMode::from_mode(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn mode_of(metadata: &std::fs::Metadata) -> FileMode {
    if metadata.permissions().readonly() {
        FileMode::from_mode(0o444)
    } else {
        FileMode::from_mode(0o666)
    }
}

impl FsRead for NativeFs {
    fn read_to_string(&self, path: &Path) -> Result<String, UtilError> {
        std::fs::read_to_string(path).map_err(|e| UtilError::io("read", path, e))
    }

    fn exists(&self, path: &Path) -> Result<bool, UtilError> {
        match std::fs::symlink_metadata(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(UtilError::io("exists", path, e)),
        }
    }

    fn is_dir(&self, path: &Path) -> Result<bool, UtilError> {
        match std::fs::metadata(path) {
            Ok(m) => Ok(m.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(UtilError::io("is_dir", path, e)),
        }
    }
}

impl FsWrite for NativeFs {
    fn write(&self, path: &Path, data: &[u8]) -> Result<(), UtilError> {
        std::fs::write(path, data).map_err(|e| UtilError::io("write", path, e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), UtilError> {
        std::fs::remove_file(path).map_err(|e| UtilError::io("remove_file", path, e))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), UtilError> {
        // Blame the source only when it is the side that is unreadable.
        std::fs::metadata(from).map_err(|e| UtilError::io("copy", from, e))?;
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| UtilError::io("copy", to, e))
    }
}

impl FsDir for NativeFs {
    fn create_dir_all(&self, path: &Path) -> Result<(), UtilError> {
        std::fs::create_dir_all(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotADirectory | std::io::ErrorKind::AlreadyExists => {
                UtilError::NotADirectory {
                    path: path.to_path_buf(),
                }
            }
            _ => UtilError::io("create_dir_all", path, e),
        })
    }
}

impl FsPermissions for NativeFs {
    fn mode(&self, path: &Path) -> Result<FileMode, UtilError> {
        let metadata = std::fs::metadata(path).map_err(|e| UtilError::io("mode", path, e))?;
        Ok(mode_of(&metadata))
    }

    fn symlink_mode(&self, path: &Path) -> Result<FileMode, UtilError> {
        let metadata =
            std::fs::symlink_metadata(path).map_err(|e| UtilError::io("symlink_mode", path, e))?;
        Ok(mode_of(&metadata))
    }

    fn is_symlink(&self, path: &Path) -> Result<bool, UtilError> {
        std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .map_err(|e| UtilError::io("is_symlink", path, e))
    }

    #[cfg(unix)]
    fn set_mode(&self, path: &Path, mode: FileMode) -> Result<(), UtilError> {
        use std::os::unix::fs::PermissionsExt;
        trace!(path = %path.display(), mode = %mode, "chmod");
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode.mode()))
            .map_err(|e| UtilError::io("set_mode", path, e))
    }

    #[cfg(not(unix))]
    fn set_mode(&self, path: &Path, mode: FileMode) -> Result<(), UtilError> {
        trace!(path = %path.display(), mode = %mode, "set readonly flag");
        let mut perms = std::fs::metadata(path)
            .map_err(|e| UtilError::io("set_mode", path, e))?
            .permissions();
        perms.set_readonly(mode.is_read_only());
        std::fs::set_permissions(path, perms).map_err(|e| UtilError::io("set_mode", path, e))
    }
}

//! Write-side operations.

use std::path::Path;

use crate::UtilError;

/// File writes, removal and copying.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsWrite`.
pub trait FsWrite: Send + Sync {
    /// Write data to a file (creates if not exists, truncates if exists).
    ///
    /// Parent directories must exist.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the parent directory does not exist
    /// - [`UtilError::PermissionDenied`] if the file is read-only
    fn write(&self, path: &Path, data: &[u8]) -> Result<(), UtilError>;

    /// Remove a file or a symlink (never its target).
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if nothing exists at `path`
    fn remove_file(&self, path: &Path) -> Result<(), UtilError>;

    /// Copy file contents from `from` to `to`, overwriting `to`.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if `from` does not exist
    fn copy(&self, from: &Path, to: &Path) -> Result<(), UtilError>;
}

//! Permission bit access.

use std::path::Path;

use crate::{FileMode, UtilError};

/// Get and set permission bits.
///
/// The read-only helpers in [`ReadOnlyExt`](crate::ReadOnlyExt) are built on
/// these primitives.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Nothing here is atomic: a
/// get followed by a set can race with another writer.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsPermissions`.
pub trait FsPermissions: Send + Sync {
    /// Mode of the file `path` resolves to (follows symlinks).
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the path or the link target does not exist
    fn mode(&self, path: &Path) -> Result<FileMode, UtilError>;

    /// Mode of the entry at `path` itself (does not follow symlinks).
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the path does not exist
    fn symlink_mode(&self, path: &Path) -> Result<FileMode, UtilError>;

    /// Returns `true` if the entry at `path` is itself a symbolic link.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the path does not exist
    fn is_symlink(&self, path: &Path) -> Result<bool, UtilError>;

    /// Replace the permission bits of `path`.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the path does not exist
    /// - [`UtilError::PermissionDenied`] if the caller may not change the mode
    fn set_mode(&self, path: &Path, mode: FileMode) -> Result<(), UtilError>;
}

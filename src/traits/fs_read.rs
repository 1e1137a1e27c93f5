//! Read-side queries.

use std::path::Path;

use crate::UtilError;

/// Read operations needed by the pipeline helpers.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Methods use `&self` to allow
/// concurrent access.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsRead`.
pub trait FsRead: Send + Sync {
    /// Read a whole file as UTF-8.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the path does not exist
    /// - [`UtilError::Io`] if the file is not valid UTF-8 or cannot be read
    fn read_to_string(&self, path: &Path) -> Result<String, UtilError>;

    /// Check whether an entry exists at `path`.
    ///
    /// A dangling symlink counts as existing: the link itself is checked,
    /// not its target.
    fn exists(&self, path: &Path) -> Result<bool, UtilError>;

    /// Check whether `path` resolves to a directory (follows symlinks).
    ///
    /// Returns `Ok(false)` for missing paths.
    fn is_dir(&self, path: &Path) -> Result<bool, UtilError>;
}

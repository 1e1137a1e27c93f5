//! Directory operations.

use std::path::Path;

use crate::UtilError;

/// Directory creation.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
pub trait FsDir: Send + Sync {
    /// Create a directory and all missing parents.
    ///
    /// Succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotADirectory`] if a path component is a file
    fn create_dir_all(&self, path: &Path) -> Result<(), UtilError>;
}

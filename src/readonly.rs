//! # Read-only marking
//!
//! Finalized derivative files are marked read-only so later pipeline steps
//! cannot edit them by accident. Before rewriting such a file the pipeline
//! makes it writable again, but only for the classes that can already read
//! it: a file hidden from "other" stays hidden from "other".
//!
//! | Call | Effect |
//! |------|--------|
//! | `set_read_only(p, true)` | clear every write bit |
//! | `set_read_only(p, false)` | add write for each class that has read |
//! | `is_read_only(p)` | no write bit set on the link target |

use std::path::Path;

use tracing::debug;

use crate::{FileMode, FsPermissions, NativeFs, UtilError};

/// Read-only toggling for any backend with [`FsPermissions`].
///
/// # Example
///
/// ```rust
/// use niconv_utils::{FsPermissions, ReadOnlyExt, UtilError};
/// use std::path::Path;
///
/// fn rewrite<B: FsPermissions>(fs: &B, path: &Path) -> Result<(), UtilError> {
///     fs.set_read_only(path, false)?;
///     // ... write the file ...
///     fs.set_read_only(path, true)?;
///     Ok(())
/// }
/// ```
pub trait ReadOnlyExt: FsPermissions {
    /// Make `path` read-only, or writable where it is readable.
    ///
    /// A regular file is judged by its own mode. For a symlink the new mode
    /// is computed from the target, since that is what `set_mode` changes.
    /// Execute and special bits are preserved. Returns the mode that was
    /// applied.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the path (or a link's target) does not exist
    /// - [`UtilError::PermissionDenied`] if the mode cannot be changed
    /// - [`UtilError::InvariantViolation`] (debug builds) if the mode read back
    ///   after the change does not have the requested shape
    fn set_read_only(&self, path: &Path, read_only: bool) -> Result<FileMode, UtilError> {
        let current = if self.is_symlink(path)? {
            self.mode(path)?
        } else {
            self.symlink_mode(path)?
        };
        let target = if read_only {
            current.read_only()
        } else {
            current.writable_where_readable()
        };

        debug!(
            path = %path.display(),
            from = %current,
            to = %target,
            read_only,
            "updating permissions"
        );
        self.set_mode(path, target)?;

        if cfg!(debug_assertions) {
            let observed = self.mode(path)?;
            if read_only && !observed.is_read_only() {
                return Err(UtilError::InvariantViolation {
                    check: "read-only clears write",
                    details: format!("asked for {target:o}, found {observed:o}"),
                });
            }
            let missing = observed.readable_without_write();
            if !read_only && !missing.is_empty() {
                return Err(UtilError::InvariantViolation {
                    check: "write follows read",
                    details: format!("{missing:?} readable but not writable in {observed:o}"),
                });
            }
        }

        Ok(target)
    }

    /// Returns `true` if nobody may write the file `path` resolves to.
    ///
    /// Symlinks are dereferenced; a dangling link is an error.
    fn is_read_only(&self, path: &Path) -> Result<bool, UtilError> {
        Ok(self.mode(path)?.is_read_only())
    }
}

impl<B: FsPermissions + ?Sized> ReadOnlyExt for B {}

/// [`ReadOnlyExt::set_read_only`] on the host filesystem.
pub fn set_read_only(path: impl AsRef<Path>, read_only: bool) -> Result<FileMode, UtilError> {
    NativeFs.set_read_only(path.as_ref(), read_only)
}

/// [`ReadOnlyExt::is_read_only`] on the host filesystem.
pub fn is_read_only(path: impl AsRef<Path>) -> Result<bool, UtilError> {
    NativeFs.is_read_only(path.as_ref())
}

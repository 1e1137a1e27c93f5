//! # Filesystem Traits
//!
//! The small filesystem surface the pipeline helpers need.
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`FsRead`] | `read_to_string`, `exists`, `is_dir` |
//! | [`FsWrite`] | `write`, `remove_file`, `copy` |
//! | [`FsDir`] | `create_dir_all` |
//! | [`FsPermissions`] | `mode`, `symlink_mode`, `is_symlink`, `set_mode` |
//!
//! [`Fs`] combines all four and has a blanket implementation, so a backend
//! implements the components and gets `Fs` for free. [`NativeFs`](crate::NativeFs)
//! is the `std::fs` backend; tests use in-memory backends.

mod fs_dir;
mod fs_permissions;
mod fs_read;
mod fs_write;

pub use fs_dir::FsDir;
pub use fs_permissions::FsPermissions;
pub use fs_read::FsRead;
pub use fs_write::FsWrite;

/// Everything the helpers in this crate need from a filesystem.
///
/// # Blanket Implementation
///
/// Automatically implemented for any type that implements all four
/// component traits.
///
/// # Example
///
/// ```rust
/// use niconv_utils::{Fs, UtilError};
/// use std::path::Path;
///
/// fn stash<B: Fs>(fs: &B, src: &Path, dir: &Path) -> Result<(), UtilError> {
///     fs.create_dir_all(dir)?;
///     fs.copy(src, &dir.join("stashed.json"))
/// }
/// ```
pub trait Fs: FsRead + FsWrite + FsDir + FsPermissions {}

impl<T: FsRead + FsWrite + FsDir + FsPermissions> Fs for T {}

//! Pool of scratch directories that are removed together.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::{TempDirConfig, UtilError};

/// Keeps track of temporary directories so they can be removed in one go.
///
/// Conversion steps unpack archives and stage DICOMs in scratch space; the
/// pool makes sure all of it disappears at the end of a run, or when the
/// pool is dropped.
///
/// ```rust
/// use niconv_utils::{TempDirs, TempDirConfig};
///
/// let mut pool = TempDirs::new(TempDirConfig::default());
/// let staging = pool.create().unwrap();
/// assert!(staging.is_dir());
/// pool.cleanup().unwrap();
/// assert!(!staging.exists());
/// ```
#[derive(Debug)]
pub struct TempDirs {
    config: TempDirConfig,
    dirs: Vec<TempDir>,
}

impl TempDirs {
    /// Create an empty pool.
    pub fn new(config: TempDirConfig) -> Self {
        Self {
            config,
            dirs: Vec::new(),
        }
    }

    /// Create a new directory and track it.
    ///
    /// The directory goes under `scratch_root` when that is an existing
    /// directory, under the system temporary directory otherwise.
    pub fn create(&mut self) -> Result<PathBuf, UtilError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(&self.config.prefix);

        let created = match self.config.scratch_root.as_deref().filter(|root| root.is_dir()) {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| UtilError::TempDir {
            details: format!("cannot create directory with prefix {:?}: {e}", self.config.prefix),
        })?;

        let path = created.path().to_path_buf();
        debug!(path = %path.display(), "created temporary directory");
        self.dirs.push(created);
        Ok(path)
    }

    /// Remove one tracked directory and stop tracking it.
    ///
    /// Returns `Ok(false)` if `path` is not tracked by this pool; untracked
    /// paths are never deleted. A tracked directory that someone already
    /// removed is simply forgotten.
    pub fn remove(&mut self, path: &Path) -> Result<bool, UtilError> {
        let Some(index) = self.dirs.iter().position(|d| d.path() == path) else {
            return Ok(false);
        };
        let dir = self.dirs.remove(index);
        debug!(path = %path.display(), "removing temporary directory");
        close(dir)?;
        Ok(true)
    }

    /// Remove every tracked directory.
    ///
    /// Keeps going after a failure; the first error is returned once all
    /// directories have been attempted. The pool is empty afterwards either
    /// way.
    pub fn cleanup(&mut self) -> Result<(), UtilError> {
        debug!(count = self.dirs.len(), "removing temporary directories");
        let mut first_error = None;
        for dir in self.dirs.drain(..) {
            debug!(path = %dir.path().display(), "removing temporary directory");
            if let Err(e) = close(dir) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Paths of the directories currently tracked, oldest first.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(TempDir::path)
    }

    /// Number of tracked directories.
    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    /// Returns `true` if nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl Default for TempDirs {
    fn default() -> Self {
        Self::new(TempDirConfig::default())
    }
}

impl Drop for TempDirs {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!(error = %e, "failed to remove temporary directories");
        }
    }
}

fn close(dir: TempDir) -> Result<(), UtilError> {
    let path = dir.path().to_path_buf();
    match dir.close() {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(UtilError::io("remove_temp_dir", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_in(root: &Path) -> TempDirs {
        TempDirs::new(TempDirConfig {
            prefix: "test-".into(),
            scratch_root: Some(root.to_path_buf()),
        })
    }

    #[test]
    fn create_uses_scratch_root_and_prefix() {
        let scratch = tempfile::tempdir().unwrap();
        let mut pool = pool_in(scratch.path());
        let dir = pool.create().unwrap();
        assert!(dir.is_dir());
        assert_eq!(dir.parent(), Some(scratch.path()));
        let name = dir.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("test-"));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn missing_scratch_root_falls_back_to_system_temp() {
        let scratch = tempfile::tempdir().unwrap();
        let missing = scratch.path().join("not-here");
        let mut pool = pool_in(&missing);
        let dir = pool.create().unwrap();
        assert!(dir.is_dir());
        assert!(!dir.starts_with(&missing));
    }

    #[test]
    fn cleanup_removes_everything() {
        let scratch = tempfile::tempdir().unwrap();
        let mut pool = pool_in(scratch.path());
        let a = pool.create().unwrap();
        let b = pool.create().unwrap();
        std::fs::write(b.join("file.dcm"), b"DICM").unwrap();
        pool.cleanup().unwrap();
        assert!(!a.exists());
        assert!(!b.exists());
        assert!(pool.is_empty());
    }

    #[test]
    fn remove_forgets_only_that_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let mut pool = pool_in(scratch.path());
        let a = pool.create().unwrap();
        let b = pool.create().unwrap();
        assert!(pool.remove(&a).unwrap());
        assert!(!a.exists());
        assert!(b.exists());
        assert_eq!(pool.paths().collect::<Vec<_>>(), vec![b.as_path()]);
    }

    #[test]
    fn remove_untracked_is_a_no_op() {
        let scratch = tempfile::tempdir().unwrap();
        let mut pool = pool_in(scratch.path());
        assert!(!pool.remove(scratch.path()).unwrap());
        assert!(scratch.path().exists());
    }

    #[test]
    fn already_removed_directory_is_forgotten() {
        let scratch = tempfile::tempdir().unwrap();
        let mut pool = pool_in(scratch.path());
        let a = pool.create().unwrap();
        std::fs::remove_dir_all(&a).unwrap();
        assert!(pool.remove(&a).unwrap());
        assert!(pool.is_empty());
    }

    #[test]
    fn drop_cleans_up() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = {
            let mut pool = pool_in(scratch.path());
            pool.create().unwrap()
        };
        assert!(!dir.exists());
    }
}

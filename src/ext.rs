//! # Extension Traits
//!
//! Pipeline helpers built on the [`Fs`] traits. Both traits have blanket
//! implementations, so any backend gets them for free.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`create_file_if_missing`](FsExt::create_file_if_missing) | Write a file only if nothing is there yet |
//! | [`safe_copy_file`](FsExt::safe_copy_file) | Copy, replacing whatever sits at the destination |
//! | [`read_json`](FsExtJson::read_json) | Read and deserialize a JSON file |
//! | [`write_json`](FsExtJson::write_json) | Write the canonical sorted, indented form |
//! | [`write_json_pretty`](FsExtJson::write_json_pretty) | Write the human-oriented form |
//! | [`treat_info_file`](FsExtJson::treat_info_file) | Slim and pretty-print a read-only info file in place |

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::json::{canonical_dumps, slim_down_info, to_pretty_string};
use crate::{Fs, NativeFs, PrettyOptions, ReadOnlyExt, UtilError};

/// Indent used by [`save_json`].
pub const DEFAULT_JSON_INDENT: usize = 4;

/// File helpers for any filesystem backend.
pub trait FsExt: Fs {
    /// Create `path` with `content` unless something already exists there.
    ///
    /// Missing parent directories are created. Returns `Ok(false)` and leaves
    /// the existing file alone if the path exists, so local edits are never
    /// overwritten.
    ///
    /// # Example
    ///
    /// ```rust
    /// use niconv_utils::{Fs, FsExt, UtilError};
    /// use std::path::Path;
    ///
    /// fn ensure_readme<B: Fs>(fs: &B, root: &Path) -> Result<bool, UtilError> {
    ///     fs.create_file_if_missing(&root.join("README"), "Converted dataset\n")
    /// }
    /// ```
    fn create_file_if_missing(&self, path: &Path, content: &str) -> Result<bool, UtilError> {
        if self.exists(path)? {
            return Ok(false);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir_all(parent)?;
        }
        self.write(path, content.as_bytes())?;
        Ok(true)
    }

    /// Copy `src` to `dest`, replacing any existing entry.
    ///
    /// If `dest` is a directory the file is copied into it under its own
    /// name. An existing destination (including a dangling symlink) is
    /// removed first, so a read-only or linked file is replaced rather than
    /// written through. Returns the final destination path.
    fn safe_copy_file(&self, src: &Path, dest: &Path) -> Result<PathBuf, UtilError> {
        let dest = if self.is_dir(dest)? {
            let name = src.file_name().ok_or_else(|| UtilError::Io {
                operation: "safe_copy_file",
                path: src.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "source path has no file name",
                ),
            })?;
            dest.join(name)
        } else {
            dest.to_path_buf()
        };

        if self.exists(&dest)? {
            debug!(path = %dest.display(), "removing existing destination");
            self.remove_file(&dest)?;
        }
        self.copy(src, &dest)?;
        Ok(dest)
    }
}

impl<B: Fs + ?Sized> FsExt for B {}

/// JSON file helpers.
pub trait FsExtJson: Fs {
    /// Read a file and deserialize it as JSON.
    ///
    /// # Errors
    ///
    /// - [`UtilError::NotFound`] if the file does not exist
    /// - [`UtilError::Deserialization`] if the content is not valid JSON for `T`
    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, UtilError> {
        let data = self.read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| UtilError::Deserialization {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Write `value` in the canonical form: sorted keys, `indent` spaces.
    ///
    /// Nothing is written if serialization fails.
    fn write_json<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
        indent: usize,
    ) -> Result<(), UtilError> {
        let text = canonical_dumps(value, indent, true)?;
        self.write(path, text.as_bytes())
    }

    /// Write `value` in the pretty form (numeric arrays on one line).
    ///
    /// Nothing is written if formatting fails.
    fn write_json_pretty<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        value: &T,
        options: &PrettyOptions,
    ) -> Result<(), UtilError> {
        let text = to_pretty_string(value, options)?;
        self.write(path, text.as_bytes())
    }

    /// Load a configuration file.
    fn read_config<T: DeserializeOwned>(&self, path: &Path) -> Result<T, UtilError> {
        self.read_json(path)
    }

    /// Store a configuration in the pretty form with default options.
    fn write_config<T: Serialize + ?Sized>(
        &self,
        path: &Path,
        config: &T,
    ) -> Result<(), UtilError> {
        self.write_json_pretty(path, config, &PrettyOptions::default())
    }

    /// Tune up a generated info file in place.
    ///
    /// Loads the file, drops bulky vendor fields (see
    /// [`slim_down_info`](crate::slim_down_info)), pretty-prints it with
    /// two-space indent and sorted keys, and rewrites it. The file is made
    /// writable for the rewrite and read-only afterwards. Formatting happens
    /// before any permission change, so a formatting error leaves the file
    /// untouched.
    fn treat_info_file(&self, path: &Path) -> Result<(), UtilError> {
        let info: Value = self.read_json(path)?;
        let slim = slim_down_info(&info);
        let text = to_pretty_string(&slim, &PrettyOptions::with_indent(2))?;

        self.set_read_only(path, false)?;
        if let Err(err) = self.write(path, text.as_bytes()) {
            if let Err(restore) = self.set_read_only(path, true) {
                warn!(
                    path = %path.display(),
                    error = %restore,
                    "could not restore read-only mode"
                );
            }
            return Err(err);
        }
        self.set_read_only(path, true)?;
        info!(path = %path.display(), bytes = text.len(), "treated info file");
        Ok(())
    }
}

impl<B: Fs + ?Sized> FsExtJson for B {}

/// Load a JSON file from the host filesystem.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, UtilError> {
    NativeFs.read_json(path.as_ref())
}

/// Save `value` to the host filesystem in the canonical form with
/// [`DEFAULT_JSON_INDENT`].
pub fn save_json<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), UtilError> {
    NativeFs.write_json(path.as_ref(), value, DEFAULT_JSON_INDENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileMode, FsDir, FsPermissions, FsRead, FsWrite};
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::RwLock;

    /// Files with modes, plus directories. Writes honour the owner write bit.
    #[derive(Default)]
    struct MockFs {
        files: RwLock<HashMap<PathBuf, (Vec<u8>, FileMode)>>,
        dirs: RwLock<HashSet<PathBuf>>,
        /// Reject every write, like a full disk.
        fail_writes: bool,
    }

    impl MockFs {
        fn with_file(path: &str, content: &str, mode: u32) -> Self {
            let fs = Self::default();
            fs.files.write().unwrap().insert(
                PathBuf::from(path),
                (content.as_bytes().to_vec(), FileMode::from_mode(mode)),
            );
            fs
        }

        fn contents(&self, path: &str) -> String {
            let files = self.files.read().unwrap();
            String::from_utf8(files[Path::new(path)].0.clone()).unwrap()
        }

        fn not_found(path: &Path) -> UtilError {
            UtilError::NotFound {
                path: path.to_path_buf(),
            }
        }
    }

    impl FsRead for MockFs {
        fn read_to_string(&self, path: &Path) -> Result<String, UtilError> {
            let files = self.files.read().unwrap();
            let (data, _) = files.get(path).ok_or_else(|| Self::not_found(path))?;
            Ok(String::from_utf8(data.clone()).unwrap())
        }

        fn exists(&self, path: &Path) -> Result<bool, UtilError> {
            Ok(self.files.read().unwrap().contains_key(path)
                || self.dirs.read().unwrap().contains(path))
        }

        fn is_dir(&self, path: &Path) -> Result<bool, UtilError> {
            Ok(self.dirs.read().unwrap().contains(path))
        }
    }

    impl FsWrite for MockFs {
        fn write(&self, path: &Path, data: &[u8]) -> Result<(), UtilError> {
            if self.fail_writes {
                return Err(UtilError::Io {
                    operation: "write",
                    path: path.to_path_buf(),
                    source: std::io::Error::other("no space left on device"),
                });
            }
            let mut files = self.files.write().unwrap();
            match files.get_mut(path) {
                Some((_, mode)) if !mode.can_write(crate::PermissionClass::Owner) => {
                    Err(UtilError::PermissionDenied {
                        path: path.to_path_buf(),
                        operation: "write",
                    })
                }
                Some(entry) => {
                    entry.0 = data.to_vec();
                    Ok(())
                }
                None => {
                    files.insert(path.to_path_buf(), (data.to_vec(), FileMode::default()));
                    Ok(())
                }
            }
        }

        fn remove_file(&self, path: &Path) -> Result<(), UtilError> {
            self.files
                .write()
                .unwrap()
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| Self::not_found(path))
        }

        fn copy(&self, from: &Path, to: &Path) -> Result<(), UtilError> {
            let data = self.read_to_string(from)?;
            self.write(to, data.as_bytes())
        }
    }

    impl FsDir for MockFs {
        fn create_dir_all(&self, path: &Path) -> Result<(), UtilError> {
            let mut dirs = self.dirs.write().unwrap();
            for ancestor in path.ancestors() {
                dirs.insert(ancestor.to_path_buf());
            }
            Ok(())
        }
    }

    impl FsPermissions for MockFs {
        fn mode(&self, path: &Path) -> Result<FileMode, UtilError> {
            self.symlink_mode(path)
        }

        fn symlink_mode(&self, path: &Path) -> Result<FileMode, UtilError> {
            let files = self.files.read().unwrap();
            files
                .get(path)
                .map(|(_, mode)| *mode)
                .ok_or_else(|| Self::not_found(path))
        }

        fn is_symlink(&self, path: &Path) -> Result<bool, UtilError> {
            self.symlink_mode(path).map(|_| false)
        }

        fn set_mode(&self, path: &Path, mode: FileMode) -> Result<(), UtilError> {
            let mut files = self.files.write().unwrap();
            let entry = files.get_mut(path).ok_or_else(|| Self::not_found(path))?;
            entry.1 = mode;
            Ok(())
        }
    }

    #[test]
    fn create_file_if_missing_creates_parents() {
        let fs = MockFs::default();
        let created = fs
            .create_file_if_missing(Path::new("/ds/code/README"), "hi")
            .unwrap();
        assert!(created);
        assert!(fs.is_dir(Path::new("/ds/code")).unwrap());
        assert_eq!(fs.contents("/ds/code/README"), "hi");
    }

    #[test]
    fn create_file_if_missing_keeps_existing() {
        let fs = MockFs::with_file("/ds/README", "edited by hand", 0o644);
        let created = fs
            .create_file_if_missing(Path::new("/ds/README"), "template")
            .unwrap();
        assert!(!created);
        assert_eq!(fs.contents("/ds/README"), "edited by hand");
    }

    #[test]
    fn safe_copy_into_directory_uses_source_name() {
        let fs = MockFs::with_file("/in/sub-01.json", "{}", 0o644);
        fs.create_dir_all(Path::new("/out")).unwrap();
        let dest = fs
            .safe_copy_file(Path::new("/in/sub-01.json"), Path::new("/out"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/out/sub-01.json"));
        assert_eq!(fs.contents("/out/sub-01.json"), "{}");
    }

    #[test]
    fn safe_copy_replaces_read_only_destination() {
        let fs = MockFs::with_file("/in/a.json", "new", 0o644);
        fs.files.write().unwrap().insert(
            PathBuf::from("/out/a.json"),
            (b"old".to_vec(), FileMode::from_mode(0o444)),
        );
        fs.safe_copy_file(Path::new("/in/a.json"), Path::new("/out/a.json"))
            .unwrap();
        assert_eq!(fs.contents("/out/a.json"), "new");
    }

    #[test]
    fn read_json_reports_bad_content() {
        let fs = MockFs::with_file("/bad.json", "{not json", 0o644);
        let err = fs.read_json::<Value>(Path::new("/bad.json")).unwrap_err();
        assert!(matches!(err, UtilError::Deserialization { .. }));
    }

    #[test]
    fn write_json_is_canonical() {
        let fs = MockFs::default();
        fs.write_json(Path::new("/a.json"), &json!({"b": [1], "a": 2}), 2)
            .unwrap();
        assert_eq!(fs.contents("/a.json"), "{\n  \"a\": 2,\n  \"b\": [\n    1\n  ]\n}");
    }

    #[test]
    fn config_round_trip() {
        let fs = MockFs::default();
        let config = PrettyOptions {
            indent: 3,
            sort_keys: false,
            verify: true,
        };
        fs.write_config(Path::new("/cfg.json"), &config).unwrap();
        let loaded: PrettyOptions = fs.read_config(Path::new("/cfg.json")).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn treat_info_file_rewrites_and_locks() {
        let fs = MockFs::with_file(
            "/info.json",
            r#"{"global": {"const": {"CsaSeries.X": 1, "EchoTime": 0.03}}, "dims": [64, 64, 32]}"#,
            0o444,
        );
        fs.treat_info_file(Path::new("/info.json")).unwrap();
        assert_eq!(
            fs.contents("/info.json"),
            "{\n  \"dims\": [64, 64, 32],\n  \"global\": {\n    \"const\": {\n      \"EchoTime\": 0.03\n    }\n  }\n}"
        );
        assert!(fs.is_read_only(Path::new("/info.json")).unwrap());
    }

    #[test]
    fn treat_info_file_failed_write_stays_locked() {
        let original = r#"{"global": {"const": {"CsaSeries.X": 1}}}"#;
        let fs = MockFs {
            fail_writes: true,
            ..MockFs::with_file("/info.json", original, 0o444)
        };
        let err = fs.treat_info_file(Path::new("/info.json")).unwrap_err();
        assert!(matches!(err, UtilError::Io { operation: "write", .. }));
        assert!(fs.is_read_only(Path::new("/info.json")).unwrap());
        assert_eq!(fs.contents("/info.json"), original);
    }

    #[test]
    fn treat_info_file_missing_is_not_found() {
        let fs = MockFs::default();
        let err = fs.treat_info_file(Path::new("/nope.json")).unwrap_err();
        assert!(matches!(err, UtilError::NotFound { .. }));
    }
}

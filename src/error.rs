//! Error types for the conversion utilities.

use std::path::PathBuf;

/// Error type shared by every operation in this crate.
///
/// Filesystem variants carry the offending path and the operation that
/// failed. Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use niconv_utils::UtilError;
/// use std::path::PathBuf;
///
/// let err = UtilError::NotFound { path: PathBuf::from("/data/sub-01.json") };
/// assert_eq!(err.to_string(), "not found: /data/sub-01.json");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    // Filesystem Errors
    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Permission denied for operation.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// Expected a directory but found something else.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
    },

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A temporary directory could not be created or removed.
    #[error("temporary directory error: {details}")]
    TempDir {
        /// What went wrong.
        details: String,
    },

    // Data Errors
    /// Value could not be represented as JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// File contents could not be parsed as JSON.
    #[error("deserialization error: {path} ({details})")]
    Deserialization {
        /// The file that failed to parse.
        path: PathBuf,
        /// Parser message.
        details: String,
    },

    /// An internal consistency check failed.
    ///
    /// Only produced by checks that run in debug builds or when explicitly
    /// requested (see [`PrettyOptions::verify`](crate::PrettyOptions::verify)).
    #[error("invariant violated ({check}): {details}")]
    InvariantViolation {
        /// Name of the check that failed.
        check: &'static str,
        /// Details about the mismatch.
        details: String,
    },
}

impl UtilError {
    /// Wrap an I/O error, keeping the path and operation as context.
    ///
    /// `NotFound` and `PermissionDenied` kinds are mapped to their dedicated
    /// variants so callers can match on them.
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => UtilError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => UtilError::PermissionDenied { path, operation },
            _ => UtilError::Io {
                operation,
                path,
                source,
            },
        }
    }

    /// Returns `true` for the filesystem family of errors.
    pub fn is_filesystem(&self) -> bool {
        matches!(
            self,
            UtilError::NotFound { .. }
                | UtilError::PermissionDenied { .. }
                | UtilError::NotADirectory { .. }
                | UtilError::Io { .. }
        )
    }
}

impl From<std::io::Error> for UtilError {
    fn from(error: std::io::Error) -> Self {
        UtilError::io("io", PathBuf::new(), error)
    }
}

impl From<serde_json::Error> for UtilError {
    fn from(error: serde_json::Error) -> Self {
        UtilError::Serialization(error.to_string())
    }
}

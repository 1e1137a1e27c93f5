//! Option structs for the formatter and the temporary-directory pool.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Options for [`pretty_print_json`](crate::pretty_print_json).
///
/// ```rust
/// use niconv_utils::PrettyOptions;
///
/// let opts = PrettyOptions { indent: 4, ..PrettyOptions::default() };
/// assert!(opts.sort_keys);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrettyOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Emit object keys in lexicographic order.
    pub sort_keys: bool,
    /// Parse the output back and compare it with the input.
    ///
    /// Defaults to on in debug builds and off in release builds.
    pub verify: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            sort_keys: true,
            verify: cfg!(debug_assertions),
        }
    }
}

impl PrettyOptions {
    /// Options with the given indent width and defaults otherwise.
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            ..Self::default()
        }
    }
}

/// Where [`TempDirs`](crate::TempDirs) creates its directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempDirConfig {
    /// Name prefix of each created directory.
    pub prefix: String,
    /// Preferred parent directory, used only when it exists.
    ///
    /// Falls back to the system temporary directory otherwise.
    pub scratch_root: Option<PathBuf>,
}

impl Default for TempDirConfig {
    fn default() -> Self {
        Self {
            prefix: "niconvDCM".to_string(),
            scratch_root: None,
        }
    }
}

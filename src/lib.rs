//! # niconv-utils
//!
//! Small utilities shared by the steps of a neuroimaging conversion
//! pipeline: read-only marking of finished files, canonical JSON output,
//! and scratch-directory bookkeeping.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use niconv_utils::{is_read_only, pretty_print_json, set_read_only, PrettyOptions};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("sub-01_T1w.json");
//!
//! let sidecar = json!({"EchoTime": 0.0029, "ImageOrientationPatientDICOM": [1, 0, 0, 0, 1, 0]});
//! let text = pretty_print_json(&sidecar, &PrettyOptions::default()).unwrap();
//! std::fs::write(&path, text).unwrap();
//!
//! set_read_only(&path, true).unwrap();
//! assert!(is_read_only(&path).unwrap());
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FileMode`] | Permission bits with per-class read/write/execute queries |
//! | [`PermissionClass`] | Owner, group, or other |
//! | [`ReadOnlyExt`] | `set_read_only` / `is_read_only` on any backend |
//! | [`PrettyOptions`] | Indent, key sorting and round-trip verification for the formatter |
//! | [`TempDirs`] | Pool of scratch directories removed together |
//! | [`UtilError`] | Error type with path and operation context |
//!
//! ---
//!
//! ## Backends
//!
//! Filesystem access goes through the traits [`FsRead`], [`FsWrite`],
//! [`FsDir`] and [`FsPermissions`] (together: [`Fs`]). [`NativeFs`]
//! implements them with `std::fs`. The free functions [`set_read_only`],
//! [`is_read_only`], [`load_json`] and [`save_json`] use [`NativeFs`].
//!
//! ---
//!
//! ## Logging
//!
//! Operations emit `tracing` events (`debug` for permission changes and
//! temporary directories, `info` when an info file is rewritten). The crate
//! never installs a subscriber.

// Private modules
mod config;
mod error;
mod ext;
mod json;
mod native;
mod readonly;
mod temp_dirs;
mod traits;
mod types;

// Public re-exports - error types
pub use error::UtilError;

// Public re-exports - core types
pub use config::{PrettyOptions, TempDirConfig};
pub use types::{ALL_CAN_READ, ALL_CAN_WRITE, FileMode, PermissionClass};

// Public re-exports - filesystem traits and backend
pub use native::NativeFs;
pub use traits::{Fs, FsDir, FsPermissions, FsRead, FsWrite};

// Public re-exports - read-only marking
pub use readonly::{ReadOnlyExt, is_read_only, set_read_only};

// Public re-exports - JSON
pub use ext::{DEFAULT_JSON_INDENT, FsExt, FsExtJson, load_json, save_json};
pub use json::{canonical_dumps, pretty_print_json, slim_down_info, to_pretty_string};

// Public re-exports - scratch space
pub use temp_dirs::TempDirs;

//! C Foreign Function Interface (FFI)
//!
//! C-compatible API over the process-wide registry. Strings are passed as
//! [`TwineHandle`] integers; functions that can fail return a
//! [`TwineErrorCode`] and write results through out-pointers.

pub mod strings;
pub mod types;
pub mod utils;
pub mod version;

// Re-export commonly used types and functions
pub use types::{TwineErrorCode, TwineHandle, TwineRegistryStats};

// String API
pub use strings::{
    twine_append, twine_cap, twine_clear, twine_concat, twine_copy, twine_delete,
    twine_delete_all, twine_find, twine_get, twine_init, twine_insert, twine_len, twine_new,
    twine_new_bytes, twine_prepend, twine_registry_stats, twine_remove, twine_set, twine_str,
    twine_substr, twine_substrn,
};

// Version API
pub use version::{
    twine_version, twine_version_major, twine_version_minor, twine_version_patch,
    twine_version_string,
};

//! # Twine - Registry-Tracked Byte Strings
//!
//! Twine provides a growable, mutable byte string that always keeps a NUL
//! terminator after its content, so it can be handed to C code as a
//! `const char*`, together with a registry that owns every string built
//! through it and can release all of them in one teardown.
//!
//! ## Features
//!
//! - **Byte strings**: insert/remove with in-place shifting, substring and
//!   copy duplication, search, configurable growth slack
//! - **Instance registry**: slot table with generation-checked handles,
//!   geometric growth and idempotent bulk teardown
//! - **Thread-safe**: one lock per registry serializes every operation
//! - **C API**: `twine_*` functions over a process-wide registry
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Registry                    │
//! │  Mutex<SlotTable>                            │
//! │  ┌──────┬──────┬──────┬──────┬─────────┐     │
//! │  │ s0 v0│  -   │ s2 v1│ s3 v0│  ...    │     │
//! │  └──────┴──────┴──────┴──────┴─────────┘     │
//! │        ▲ high watermark bounds every scan    │
//! └──────────────────────────────────────────────┘
//!        │ StringHandle (registry, slot, generation)
//!        ▼
//! ┌────────────────┐        ┌──────────────────┐
//! │   C API Layer  │        │  Rust Native API │
//! │  twine_* (u64) │        │  Registry::*     │
//! └────────────────┘        └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use twine::Registry;
//!
//! let registry = Registry::new()?;
//! let s = registry.construct(None)?;
//! registry.append(s, b"world")?;
//! registry.prepend(s, b"hello ")?;
//! assert_eq!(registry.to_vec(s)?, b"hello world");
//!
//! registry.remove(s, 0)?;
//! let sub = registry.substring(s, 1, 4)?.expect("valid range");
//! assert_eq!(registry.find(sub, b"lo")?, Some(1));
//!
//! assert_eq!(registry.teardown_all()?, 2);
//! # Ok::<(), twine::TwineError>(())
//! ```

pub mod buffers;
pub mod error;
pub mod registry;

#[cfg(feature = "c-api")]
pub mod ffi;

// Main API re-exports
pub use buffers::{ByteString, GrowthConfig, GrowthConfigBuilder};
pub use error::{Result, TwineError};
pub use registry::{
    global, teardown_global, Registry, RegistryConfig, RegistryConfigBuilder, RegistryStats,
    StringHandle,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 2;
pub const VERSION_PATCH: u32 = 0;

/// Default configuration constants
pub mod config {
    /// Slack reserved by a new string and on every regrowth
    pub const DEFAULT_BASE_RESERVE: usize = 15;

    /// Slot count of a fresh registry table
    pub const DEFAULT_INITIAL_SLOTS: usize = 15;

    /// Factor the slot table grows by when full
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    /// Value the C API returns from `twine_find` when there is no match
    pub const NOT_FOUND: i64 = -1;
}

//! Instance registry
//!
//! This module tracks every live string in a slot table so that strings can
//! be destroyed one at a time through their handles, or all at once by a
//! teardown.

pub mod config;
pub mod instance;
pub mod global;
mod guard;
pub mod handle;
pub mod stats;
mod table;

// Re-export main types
pub use instance::Registry;
pub use config::{RegistryConfig, RegistryConfigBuilder};
pub use global::{global, teardown_global};
pub use handle::StringHandle;
pub use stats::RegistryStats;

//! String buffers
//!
//! This module provides the growable, NUL-terminated byte string and the
//! policy that decides how much slack it reserves.

pub mod buffer;
pub mod config;

// Re-export main types
pub use buffer::ByteString;
pub use config::{GrowthConfig, GrowthConfigBuilder};

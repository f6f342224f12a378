//! FFI type definitions and handle types

use crate::{error::TwineError, registry::RegistryStats};

/// Opaque string handle for the C API; 0 means "no string"
pub type TwineHandle = u64;

/// Error codes for C API
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwineErrorCode {
    Success = 0,
    InvalidParameter = 1,
    OutOfMemory = 2,
    OutOfRange = 3,
    InvalidHandle = 4,
    ConcurrencyError = 5,
    UnknownError = 99,
}

impl From<TwineError> for TwineErrorCode {
    fn from(error: TwineError) -> Self {
        match error {
            TwineError::Allocation { .. } => TwineErrorCode::OutOfMemory,
            TwineError::Range { .. } => TwineErrorCode::OutOfRange,
            TwineError::InvalidHandle { .. } => TwineErrorCode::InvalidHandle,
            TwineError::InvalidParameter { .. } => TwineErrorCode::InvalidParameter,
            TwineError::Concurrency { .. } => TwineErrorCode::ConcurrencyError,
        }
    }
}

impl From<crate::error::Result<()>> for TwineErrorCode {
    fn from(result: crate::error::Result<()>) -> Self {
        match result {
            Ok(()) => TwineErrorCode::Success,
            Err(e) => e.into(),
        }
    }
}

/// Registry statistics (C-compatible)
#[repr(C)]
#[derive(Debug, Default)]
pub struct TwineRegistryStats {
    pub live: usize,
    pub peak_live: usize,
    pub slot_capacity: usize,
    pub high_watermark: usize,
    pub total_registered: u64,
    pub total_released: u64,
    pub grow_events: u64,
    pub teardowns: u64,
    pub utilization: f64,
}

impl From<&RegistryStats> for TwineRegistryStats {
    fn from(stats: &RegistryStats) -> Self {
        Self {
            live: stats.live,
            peak_live: stats.peak_live,
            slot_capacity: stats.slot_capacity,
            high_watermark: stats.high_watermark,
            total_registered: stats.total_registered,
            total_released: stats.total_released,
            grow_events: stats.grow_events,
            teardowns: stats.teardowns,
            utilization: stats.utilization(),
        }
    }
}

//! Error types and handling for Twine

/// Result type alias for Twine operations
pub type Result<T> = std::result::Result<T, TwineError>;

/// Error types for string buffers and the instance registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TwineError {
    /// Backing memory could not be obtained
    #[error("Allocation error: could not reserve {requested} bytes")]
    Allocation { requested: usize },

    /// Index outside the valid bounds of the requested operation
    #[error("Range error in {operation}: index {index} out of bounds for length {length}")]
    Range {
        operation: &'static str,
        index: usize,
        length: usize,
    },

    /// Handle was destroyed, torn down, or belongs to another registry
    #[error("Invalid handle: slot {slot}, generation {generation}")]
    InvalidHandle { slot: u32, generation: u32 },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Registry re-entered while its lock is held, or a worker thread failed
    #[error("Concurrency error: {message}")]
    Concurrency { message: String },
}

impl TwineError {
    /// Create an allocation error
    pub fn allocation(requested: usize) -> Self {
        Self::Allocation { requested }
    }

    /// Create a range error
    pub fn range(operation: &'static str, index: usize, length: usize) -> Self {
        Self::Range {
            operation,
            index,
            length,
        }
    }

    /// Create an invalid handle error
    pub fn invalid_handle(slot: u32, generation: u32) -> Self {
        Self::InvalidHandle { slot, generation }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a concurrency error
    pub fn concurrency(message: impl Into<String>) -> Self {
        Self::Concurrency {
            message: message.into(),
        }
    }

    /// Whether the caller can only propagate this error to the top level
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Allocation { .. })
    }
}

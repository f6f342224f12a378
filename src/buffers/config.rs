//! Growth configuration for string buffers

use crate::error::{Result, TwineError};

/// Controls how a [`ByteString`](super::ByteString) reserves slack and
/// what `clear` does to the bytes it drops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthConfig {
    /// Extra bytes reserved on construction and on every regrowth
    pub base_reserve: usize,
    /// Zero the whole buffer on `clear` instead of only the terminator
    pub scrub_on_clear: bool,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            base_reserve: crate::config::DEFAULT_BASE_RESERVE,
            scrub_on_clear: true,
        }
    }
}

impl GrowthConfig {
    /// Create a configuration with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base reserve
    pub fn with_base_reserve(mut self, base_reserve: usize) -> Self {
        self.base_reserve = base_reserve;
        self
    }

    /// Set the scrub-on-clear policy
    pub fn with_scrub_on_clear(mut self, scrub: bool) -> Self {
        self.scrub_on_clear = scrub;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // The reserve is also what guarantees room for the terminator
        if self.base_reserve == 0 {
            return Err(TwineError::invalid_parameter(
                "base_reserve",
                "Base reserve must be at least 1",
            ));
        }

        if self.base_reserve > isize::MAX as usize / 2 {
            return Err(TwineError::invalid_parameter(
                "base_reserve",
                "Base reserve is larger than any allocation can be",
            ));
        }

        Ok(())
    }

    /// Capacity used when constructing a string of `initial_len` bytes
    pub fn initial_capacity(&self, initial_len: usize) -> usize {
        self.base_reserve
            .max(initial_len)
            .saturating_add(self.base_reserve)
    }

    /// Capacity used when regrowing to hold `required` bytes
    pub fn grown_capacity(&self, required: usize) -> usize {
        required.saturating_add(self.base_reserve)
    }
}

/// Builder pattern for growth configuration
#[derive(Debug, Default)]
pub struct GrowthConfigBuilder {
    config: GrowthConfig,
}

impl GrowthConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set base reserve
    pub fn base_reserve(mut self, base_reserve: usize) -> Self {
        self.config.base_reserve = base_reserve;
        self
    }

    /// Enable or disable scrubbing on clear
    pub fn scrub_on_clear(mut self, enable: bool) -> Self {
        self.config.scrub_on_clear = enable;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<GrowthConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

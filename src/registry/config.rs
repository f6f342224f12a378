//! Registry configuration

use crate::{
    buffers::GrowthConfig,
    error::{Result, TwineError},
};

/// Configuration for an instance registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Slot count of a fresh table
    pub initial_slots: usize,
    /// Factor the slot count is multiplied by when the table is full
    pub growth_factor: usize,
    /// Growth policy handed to every string the registry constructs
    pub growth: GrowthConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_slots: crate::config::DEFAULT_INITIAL_SLOTS,
            growth_factor: crate::config::DEFAULT_GROWTH_FACTOR,
            growth: GrowthConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set initial slot count
    pub fn with_initial_slots(mut self, slots: usize) -> Self {
        self.initial_slots = slots;
        self
    }

    /// Set table growth factor
    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    /// Set string growth policy
    pub fn with_growth(mut self, growth: GrowthConfig) -> Self {
        self.growth = growth;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.initial_slots == 0 {
            return Err(TwineError::invalid_parameter(
                "initial_slots",
                "Initial slot count cannot be zero",
            ));
        }

        if self.initial_slots > u32::MAX as usize {
            return Err(TwineError::invalid_parameter(
                "initial_slots",
                "Initial slot count exceeds the handle slot range",
            ));
        }

        if self.growth_factor < 2 {
            return Err(TwineError::invalid_parameter(
                "growth_factor",
                "Growth factor must be at least 2",
            ));
        }

        self.growth.validate()
    }

    /// Slot count after growing a table of `current` slots
    pub fn grown_slots(&self, current: usize) -> usize {
        current
            .saturating_mul(self.growth_factor)
            .min(u32::MAX as usize)
    }
}

/// Builder pattern for registry configuration
#[derive(Debug, Default)]
pub struct RegistryConfigBuilder {
    config: RegistryConfig,
}

impl RegistryConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set initial slot count
    pub fn initial_slots(mut self, slots: usize) -> Self {
        self.config.initial_slots = slots;
        self
    }

    /// Set growth factor
    pub fn growth_factor(mut self, factor: usize) -> Self {
        self.config.growth_factor = factor;
        self
    }

    /// Set base reserve of constructed strings
    pub fn base_reserve(mut self, base_reserve: usize) -> Self {
        self.config.growth.base_reserve = base_reserve;
        self
    }

    /// Enable or disable scrubbing on clear
    pub fn scrub_on_clear(mut self, enable: bool) -> Self {
        self.config.growth.scrub_on_clear = enable;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<RegistryConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

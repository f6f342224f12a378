//! Registry statistics tracking

/// Snapshot of registry activity, taken under the registry lock
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Strings currently registered
    pub live: usize,
    /// Highest number of strings registered at the same time
    pub peak_live: usize,
    /// Current slot count of the table (0 once released)
    pub slot_capacity: usize,
    /// One past the highest slot index occupied since the table was created
    pub high_watermark: usize,
    /// Total number of registrations
    pub total_registered: u64,
    /// Total number of strings released, individually or by teardown
    pub total_released: u64,
    /// Number of times the table grew
    pub grow_events: u64,
    /// Number of teardowns that released a table
    pub teardowns: u64,
}

impl RegistryStats {
    /// Create new statistics instance
    pub fn new() -> Self {
        Default::default()
    }

    /// Fraction of slots holding a live string (0.0 to 1.0)
    pub fn utilization(&self) -> f64 {
        if self.slot_capacity == 0 {
            return 0.0;
        }
        self.live as f64 / self.slot_capacity as f64
    }

    /// Strings registered but never released
    pub fn outstanding(&self) -> u64 {
        self.total_registered.saturating_sub(self.total_released)
    }

    /// Get a summary string of the statistics
    pub fn summary(&self) -> String {
        format!(
            "RegistryStats {{ live: {}, peak: {}, slots: {}, watermark: {}, \
             registered: {}, released: {}, grows: {}, teardowns: {}, utilization: {:.2}% }}",
            self.live,
            self.peak_live,
            self.slot_capacity,
            self.high_watermark,
            self.total_registered,
            self.total_released,
            self.grow_events,
            self.teardowns,
            self.utilization() * 100.0
        )
    }

    pub(crate) fn record_registration(&mut self) {
        self.live += 1;
        self.total_registered += 1;
        if self.live > self.peak_live {
            self.peak_live = self.live;
        }
    }

    pub(crate) fn record_release(&mut self, count: usize) {
        self.live = self.live.saturating_sub(count);
        self.total_released += count as u64;
    }
}

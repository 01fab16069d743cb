use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Tunables of the collection loop. Interval and threshold are heuristics,
/// not derived values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    /// Fraction of the viewport height scrolled on each tick.
    pub scroll_factor: f64,
    /// Time between ticks.
    pub check_interval_ms: u64,
    /// How long the store may stay the same size before the run completes.
    pub stable_threshold_ms: u64,
    /// Prefix each exported reply with its timestamp.
    pub include_date: bool,
    /// Also export the short links found in reply bodies.
    pub export_short_links: bool,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            scroll_factor: 1.0,
            check_interval_ms: 100,
            stable_threshold_ms: 5_000,
            include_date: true,
            export_short_links: true,
        }
    }
}

impl ScrapeSettings {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    /// Number of consecutive stable ticks that completes a run.
    pub fn stable_ticks(&self) -> u64 {
        self.stable_threshold_ms.div_ceil(self.check_interval_ms.max(1))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.scroll_factor.is_finite() || self.scroll_factor <= 0.0 {
            return Err(SettingsError::ScrollFactor(self.scroll_factor));
        }
        if self.check_interval_ms == 0 {
            return Err(SettingsError::ZeroInterval);
        }
        Ok(())
    }
}

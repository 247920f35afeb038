use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Icon cache budget, idle throttling and lifecycle timers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Throttle", inline)]
#[serde(default)]
pub struct ThrottleOptions {
    /// Ticks a discovered icon list may be reused before rediscovery.
    #[schemars(title = "Icon Cache Frames", range(min = 0, max = 120), extend("step" = 1))]
    pub icon_cache_frames: u32,
    /// Ticks skipped outright once nothing moves.
    #[schemars(skip)]
    pub skip_frames: u32,
    /// Probe ticks run after the skip window before going idle.
    #[schemars(skip)]
    pub probe_frames: u32,
    /// Quiet time after the last interaction before settling starts.
    #[schemars(skip)]
    pub settle_delay_ms: u64,
    /// Delay of the synthetic enter event after attach.
    #[schemars(skip)]
    pub cold_start_delay_ms: u64,
    /// Period of the dock bounds watch.
    #[schemars(skip)]
    pub position_watch_ms: u64,
}

impl Default for ThrottleOptions {
    fn default() -> Self {
        Self {
            icon_cache_frames: 16,
            skip_frames: 30,
            probe_frames: 20,
            settle_delay_ms: 750,
            cold_start_delay_ms: 4000,
            position_watch_ms: 250,
        }
    }
}

impl ThrottleOptions {
    /// Settle debounce delay.
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Cold-start delay.
    #[must_use]
    pub const fn cold_start_delay(&self) -> Duration {
        Duration::from_millis(self.cold_start_delay_ms)
    }

    /// Position watch period.
    #[must_use]
    pub const fn position_watch_interval(&self) -> Duration {
        Duration::from_millis(self.position_watch_ms)
    }

    pub(super) fn sanitize(&mut self) {
        if self.position_watch_ms == 0 {
            log::warn!("option `throttle.position_watch_ms` = 0 out of range, using 1");
            self.position_watch_ms = 1;
        }
        if self.settle_delay_ms == 0 {
            log::warn!("option `throttle.settle_delay_ms` = 0 out of range, using 1");
            self.settle_delay_ms = 1;
        }
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use super::{clamp_logged, clamp_logged_u32};

/// Smoothing coefficients and the animation frame-rate tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Smoothing", inline)]
#[serde(default)]
pub struct SmoothingOptions {
    /// Frame-rate tier. Higher tiers tick less often but converge faster
    /// per tick, so wall-clock speed stays comparable.
    #[schemars(title = "Animation FPS", range(min = 0, max = 5), extend("step" = 1))]
    pub animation_fps: u32,
    /// Tick interval at tier 0, in milliseconds.
    #[schemars(skip)]
    pub base_interval_ms: u64,
    /// Interval added per tier, in milliseconds.
    #[schemars(skip)]
    pub interval_pad_ms: u64,
    /// Position smoothing weight (higher is slower).
    #[schemars(skip)]
    pub position_coef: f32,
    /// Scale smoothing weight.
    #[schemars(skip)]
    pub scale_coef: f32,
    /// Spacing smoothing weight.
    #[schemars(skip)]
    pub spread_coef: f32,
    /// Multiplier applied to every weight while no icon is magnified.
    #[schemars(skip)]
    pub leave_coef: f32,
    /// Smallest eased move, in logical pixels (times scale factor).
    #[schemars(skip)]
    pub min_move_px: f32,
    /// Smallest eased move, as a fraction of icon size.
    #[schemars(skip)]
    pub min_move_ratio: f32,
    /// Moves longer than this many icon sizes snap to target.
    #[schemars(skip)]
    pub snap_ratio: f32,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self {
            animation_fps: 0,
            base_interval_ms: 15,
            interval_pad_ms: 15,
            position_coef: 1.5,
            scale_coef: 3.0,
            spread_coef: 1.25,
            leave_coef: 2.0,
            min_move_px: 8.0,
            min_move_ratio: 0.01,
            snap_ratio: 4.0,
        }
    }
}

impl SmoothingOptions {
    /// Animation loop period for the configured tier.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let ms = self
            .base_interval_ms
            .saturating_add(u64::from(self.animation_fps).saturating_mul(self.interval_pad_ms));
        Duration::from_millis(ms.max(1))
    }

    pub(super) fn sanitize(&mut self) {
        self.animation_fps =
            clamp_logged_u32("smoothing.animation_fps", self.animation_fps, 0, 10);
        if self.base_interval_ms == 0 {
            log::warn!("option `smoothing.base_interval_ms` = 0 out of range, using 1");
            self.base_interval_ms = 1;
        }
        self.position_coef =
            clamp_logged("smoothing.position_coef", self.position_coef, 0.01, 100.0);
        self.scale_coef =
            clamp_logged("smoothing.scale_coef", self.scale_coef, 0.01, 100.0);
        self.spread_coef =
            clamp_logged("smoothing.spread_coef", self.spread_coef, 0.01, 100.0);
        self.leave_coef =
            clamp_logged("smoothing.leave_coef", self.leave_coef, 0.01, 100.0);
        self.min_move_px =
            clamp_logged("smoothing.min_move_px", self.min_move_px, 0.0, 1000.0);
        self.min_move_ratio =
            clamp_logged("smoothing.min_move_ratio", self.min_move_ratio, 0.0, 1.0);
        self.snap_ratio =
            clamp_logged("smoothing.snap_ratio", self.snap_ratio, 0.0, 1000.0);
    }
}

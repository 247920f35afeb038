use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::clamp_logged;

/// Smallest magnification: the nearest icon always grows past 1.0.
pub(crate) const MIN_MAGNIFY_FACTOR: f32 = 0.05;

/// Magnification strength and neighbor falloff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Magnification", inline)]
#[serde(default)]
pub struct MagnificationOptions {
    /// Extra scale of the nearest icon (peak scale is `1 + magnify`).
    #[schemars(title = "Magnify", range(min = 0.05, max = 3.0), extend("step" = 0.05))]
    pub magnify_factor: f32,
    /// Lift of the nearest icon away from the edge, in icon-size units.
    #[schemars(title = "Rise", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub rise_factor: f32,
    /// Extra room between icons, widening the baseline spacing.
    #[schemars(title = "Spread", range(min = 0.0, max = 4.0), extend("step" = 0.05))]
    pub spread_factor: f32,
    /// Pointer hit radius in icon-size units.
    #[schemars(title = "Hit Radius", range(min = 0.5, max = 8.0), extend("step" = 0.1))]
    pub hit_radius_multiplier: f32,
    /// Per-step decay of the scale boost while walking away from the
    /// nearest icon.
    #[schemars(skip)]
    pub scale_decay: f32,
    /// Fraction of the nearest icon's lift that its direct neighbors follow.
    #[schemars(skip)]
    pub neighbor_pull: f32,
    /// Per-step decay of the neighbor pull.
    #[schemars(skip)]
    pub pull_decay: f32,
}

impl Default for MagnificationOptions {
    fn default() -> Self {
        Self {
            magnify_factor: 0.75,
            rise_factor: 0.15,
            spread_factor: 0.5,
            hit_radius_multiplier: 2.5,
            scale_decay: 0.6,
            neighbor_pull: 0.5,
            pull_decay: 0.6,
        }
    }
}

impl MagnificationOptions {
    pub(super) fn sanitize(&mut self) {
        self.magnify_factor = clamp_logged(
            "magnification.magnify_factor",
            self.magnify_factor,
            MIN_MAGNIFY_FACTOR,
            10.0,
        );
        self.rise_factor =
            clamp_logged("magnification.rise_factor", self.rise_factor, 0.0, 4.0);
        self.spread_factor = clamp_logged(
            "magnification.spread_factor",
            self.spread_factor,
            0.0,
            16.0,
        );
        self.hit_radius_multiplier = clamp_logged(
            "magnification.hit_radius_multiplier",
            self.hit_radius_multiplier,
            0.0,
            64.0,
        );
        // Decay must stay below 1 or the falloff walk never floors
        self.scale_decay =
            clamp_logged("magnification.scale_decay", self.scale_decay, 0.0, 0.99);
        self.neighbor_pull = clamp_logged(
            "magnification.neighbor_pull",
            self.neighbor_pull,
            0.0,
            1.0,
        );
        self.pull_decay =
            clamp_logged("magnification.pull_decay", self.pull_decay, 0.0, 1.0);
    }
}

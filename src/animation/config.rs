use crate::host::DockHost;
use crate::options::{DockEdge, Options};

/// Immutable per-tick view of the dock geometry and magnification
/// parameters, resolved from [`Options`] and the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockConfiguration {
    /// Edge the dock is attached to.
    pub edge: DockEdge,
    /// Display scale, always finite and positive.
    pub scale_factor: f32,
    /// Unscaled icon size.
    pub base_icon_size: f32,
    /// Peak scale is `1 + magnify_factor`.
    pub magnify_factor: f32,
    /// Lift of the nearest icon, in icon sizes.
    pub rise_factor: f32,
    /// Extra inter-icon room.
    pub spread_factor: f32,
    /// Hit radius, in icon sizes.
    pub hit_radius: f32,
    /// Frame-rate tier.
    pub smoothing_fps_hint: u32,
    /// Scale boost decay per falloff step.
    pub scale_decay: f32,
    /// Cross-axis pull of the first neighbor.
    pub neighbor_pull: f32,
    /// Pull decay per falloff step.
    pub pull_decay: f32,
    /// Background padding, in icon sizes.
    pub background_padding: f32,
}

impl DockConfiguration {
    /// Resolve against the host. Option overrides win over host values;
    /// an unusable host scale falls back to 1.
    pub fn resolve(options: &Options, dock: &dyn DockHost) -> Self {
        let scale_factor = options.dock.scale_factor.unwrap_or_else(|| {
            let sf = dock.scale_factor();
            if sf.is_finite() && sf > 0.0 {
                sf
            } else {
                log::debug!("host scale factor {sf} unusable, using 1.0");
                1.0
            }
        });
        let m = &options.magnification;
        Self {
            edge: options.dock.edge.unwrap_or_else(|| dock.edge()),
            scale_factor,
            base_icon_size: options.dock.base_icon_size,
            magnify_factor: m.magnify_factor,
            rise_factor: m.rise_factor,
            spread_factor: m.spread_factor,
            hit_radius: m.hit_radius_multiplier,
            smoothing_fps_hint: options.smoothing.animation_fps,
            scale_decay: m.scale_decay,
            neighbor_pull: m.neighbor_pull,
            pull_decay: m.pull_decay,
            background_padding: options.dock.background_padding,
        }
    }

    /// Icon edge length on screen.
    #[must_use]
    pub fn icon_px(&self) -> f32 {
        self.base_icon_size * self.scale_factor
    }

    /// Hit radius on screen.
    #[must_use]
    pub fn hit_radius_px(&self) -> f32 {
        self.hit_radius * self.icon_px()
    }

    /// Resting slot length along the long axis.
    #[must_use]
    pub fn baseline_spacing(&self) -> f32 {
        self.base_icon_size * (1.2 + self.spread_factor / 4.0) * self.scale_factor
    }

    /// Lift of the nearest icon on screen.
    #[must_use]
    pub fn rise_px(&self) -> f32 {
        self.rise_factor * self.base_icon_size * self.scale_factor
    }

    /// Target scale of the nearest icon.
    #[must_use]
    pub fn peak_scale(&self) -> f32 {
        1.0 + self.magnify_factor
    }
}

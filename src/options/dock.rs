use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::clamp_logged;

/// Screen edge the dock is attached to.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DockEdge {
    /// Horizontal dock along the top of the monitor.
    Top,
    /// Vertical dock along the right side.
    Right,
    /// Horizontal dock along the bottom of the monitor.
    #[default]
    Bottom,
    /// Vertical dock along the left side.
    Left,
}

impl DockEdge {
    /// Whether icons are stacked along the y axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Component of `v` along the dock's long axis.
    #[must_use]
    pub const fn long_axis(self, v: Vec2) -> f32 {
        if self.is_vertical() {
            v.y
        } else {
            v.x
        }
    }

    /// Component of `v` perpendicular to the dock's long axis.
    #[must_use]
    pub const fn cross_axis(self, v: Vec2) -> f32 {
        if self.is_vertical() {
            v.x
        } else {
            v.y
        }
    }

    /// Unit mask selecting the cross-axis component.
    #[must_use]
    pub const fn cross_mask(self) -> Vec2 {
        if self.is_vertical() {
            Vec2::X
        } else {
            Vec2::Y
        }
    }

    /// `v` with its cross-axis component replaced by `cross`.
    #[must_use]
    pub const fn with_cross(self, v: Vec2, cross: f32) -> Vec2 {
        if self.is_vertical() {
            Vec2::new(cross, v.y)
        } else {
            Vec2::new(v.x, cross)
        }
    }

    /// Direction a magnified icon lifts toward, away from the edge.
    #[must_use]
    pub const fn rise_direction(self) -> Vec2 {
        match self {
            Self::Top => Vec2::new(0.0, 1.0),
            Self::Right => Vec2::new(-1.0, 0.0),
            Self::Bottom => Vec2::new(0.0, -1.0),
            Self::Left => Vec2::new(1.0, 0.0),
        }
    }

    /// Normalized scale origin: icons grow away from the edge.
    #[must_use]
    pub const fn pivot(self) -> Vec2 {
        match self {
            Self::Top => Vec2::new(0.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.5),
            Self::Bottom => Vec2::new(0.5, 1.0),
            Self::Left => Vec2::new(0.0, 0.5),
        }
    }

    /// Lowercase name, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// Dock geometry and host overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Dock", inline)]
#[serde(default)]
pub struct DockOptions {
    /// Force an edge instead of asking the host.
    #[schemars(title = "Edge")]
    pub edge: Option<DockEdge>,
    /// Force a display scale instead of asking the host.
    #[schemars(skip)]
    pub scale_factor: Option<f32>,
    /// Unscaled icon edge length in logical pixels.
    #[schemars(title = "Icon Size", range(min = 16.0, max = 128.0), extend("step" = 1.0))]
    pub base_icon_size: f32,
    /// Include the "show applications" pseudo-icon.
    #[schemars(title = "Show Apps Icon")]
    pub show_apps_icon: bool,
    /// Background padding around the icons, in icon-size units.
    #[schemars(skip)]
    pub background_padding: f32,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            edge: None,
            scale_factor: None,
            base_icon_size: 48.0,
            show_apps_icon: true,
            background_padding: 0.25,
        }
    }
}

impl DockOptions {
    pub(super) fn sanitize(&mut self) {
        if let Some(sf) = self.scale_factor {
            if !sf.is_finite() || sf <= 0.0 {
                log::warn!("option `dock.scale_factor` = {sf} invalid, deferring to host");
                self.scale_factor = None;
            }
        }
        self.base_icon_size =
            clamp_logged("dock.base_icon_size", self.base_icon_size, 1.0, 512.0);
        self.background_padding = clamp_logged(
            "dock.background_padding",
            self.background_padding,
            0.0,
            2.0,
        );
    }
}

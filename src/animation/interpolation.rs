//! Gated exponential smoothing toward layout targets.
//!
//! Each quantity moves by `next = (current * c + target) / (c + 1)`:
//! monotonic, no overshoot, and a larger `c` means slower convergence.
//! Position easing is gated by distance. Tiny moves settle directly on
//! the target instead of crawling, and moves longer than the snap
//! distance (icons added or removed) jump there in one tick.

use glam::Vec2;

use super::{DockConfiguration, IconEntry};
use crate::options::SmoothingOptions;

/// Scale difference below which an icon counts as settled.
const SCALE_EPSILON: f32 = 1e-3;
/// Spacing difference (pixels) below which an icon counts as settled.
const SPACING_EPSILON: f32 = 0.5;

/// Per-quantity smoothing weights for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Position weight.
    pub position: f32,
    /// Scale weight.
    pub scale: f32,
    /// Spacing weight.
    pub spread: f32,
}

impl Coefficients {
    /// Weights for this tick. Higher frame-rate tiers tick less often, so
    /// their weights shrink to converge in similar wall-clock time; with
    /// no icon magnified everything settles `leave_coef` times slower per
    /// tick for a softer release.
    #[must_use]
    pub fn from_options(opts: &SmoothingOptions, nearest_active: bool) -> Self {
        let mut c = Self {
            position: opts.position_coef,
            scale: opts.scale_coef,
            spread: opts.spread_coef,
        };
        if opts.animation_fps > 0 {
            let divisor = 1.0 + opts.animation_fps as f32 / 2.0;
            c.position /= divisor;
            c.scale /= divisor;
            c.spread /= divisor;
        }
        if !nearest_active {
            c.position *= opts.leave_coef;
            c.scale *= opts.leave_coef;
            c.spread *= opts.leave_coef;
        }
        c
    }
}

/// Distance bounds for position easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveGate {
    /// Moves at or below this settle directly on target.
    pub min_px: f32,
    /// Moves at or above this snap to target.
    pub snap_px: f32,
}

impl MoveGate {
    /// Gate for the current dock geometry.
    #[must_use]
    pub fn new(opts: &SmoothingOptions, config: &DockConfiguration) -> Self {
        let icon_px = config.icon_px();
        Self {
            min_px: (opts.min_move_px * config.scale_factor)
                .max(opts.min_move_ratio * icon_px),
            snap_px: opts.snap_ratio * icon_px,
        }
    }

    /// Whether a move of `distance` is eased.
    #[must_use]
    pub fn eases(&self, distance: f32) -> bool {
        distance > self.min_px && distance < self.snap_px
    }
}

/// One smoothing step over every icon.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator {
    /// Weights for this step.
    pub coefficients: Coefficients,
    /// Position gate for this step.
    pub gate: MoveGate,
}

#[inline]
fn ease(current: f32, target: f32, coef: f32) -> f32 {
    (current * coef + target) / (coef + 1.0)
}

#[inline]
fn ease_vec(current: Vec2, target: Vec2, coef: f32) -> Vec2 {
    (current * coef + target) / (coef + 1.0)
}

impl Interpolator {
    /// Interpolator from explicit weights and gate.
    #[must_use]
    pub const fn new(coefficients: Coefficients, gate: MoveGate) -> Self {
        Self { coefficients, gate }
    }

    /// Move every visible icon one step toward its targets.
    ///
    /// Returns whether any position was eased (a move above the minimum
    /// threshold that did not snap). Icons whose result is not finite are
    /// hidden for this tick and left untouched.
    pub fn step(&self, icons: &mut [IconEntry]) -> bool {
        let c = self.coefficients;
        let mut did_change = false;
        for icon in icons.iter_mut().filter(|i| i.visible) {
            let distance = icon.current_pos.distance(icon.target_pos);
            let eased = self.gate.eases(distance);
            let pos = if eased {
                ease_vec(icon.current_pos, icon.target_pos, c.position)
            } else {
                icon.target_pos
            };
            let scale = ease(icon.current_scale, icon.target_scale, c.scale);
            let spacing = ease(icon.current_spacing, icon.target_spacing, c.spread);

            if !(pos.is_finite() && scale.is_finite() && spacing.is_finite()) {
                log::debug!("{}: non-finite geometry, hiding for this tick", icon.id);
                icon.visible = false;
                continue;
            }
            icon.current_pos = pos;
            icon.current_scale = scale.max(1.0);
            icon.current_spacing = spacing;
            did_change |= eased;
        }
        did_change
    }

    /// Whether every visible icon's scale and spacing sit on target.
    #[must_use]
    pub fn is_settled(icons: &[IconEntry]) -> bool {
        icons.iter().filter(|i| i.visible).all(|i| {
            (i.current_scale - i.target_scale).abs() < SCALE_EPSILON
                && (i.current_spacing - i.target_spacing).abs() < SPACING_EPSILON
        })
    }
}

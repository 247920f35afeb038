//! Target layout with distance-based falloff.
//!
//! Every icon rests at its baseline slot: the host's long-axis position,
//! centered on the dock's cross axis, scale 1. The nearest icon grows to
//! the peak scale and lifts away from the edge. Walking outward in both
//! directions, each step multiplies the scale by `scale_decay` and lets
//! the neighbor follow a decaying share of the lift; the walk stops once
//! the scale floors at 1 or both sides run out of icons.
//!
//! Long-axis parting comes from spacing: every icon's target slot length
//! is the baseline spacing times its target scale, and the host reflows.

use glam::Vec2;

use super::{DockConfiguration, IconEntry, Nearest};
use crate::options::DockEdge;
use crate::util::geometry::Rect;

/// Label offset beyond the icon for horizontal docks, in scaled sizes.
const LABEL_OFFSET_HORIZONTAL: f32 = 0.9;
/// Label offset beside the icon for vertical docks, in scaled sizes.
const LABEL_OFFSET_VERTICAL: f32 = 1.1;

/// Resting slot of `icon` in a dock with bounds `dock_bounds`.
pub fn baseline_position(
    icon: &IconEntry,
    dock_bounds: Rect,
    config: &DockConfiguration,
) -> Vec2 {
    let edge = config.edge;
    let cross = edge.cross_axis(dock_bounds.center()) - config.icon_px() / 2.0;
    edge.with_cross(icon.bounding_box.origin, cross)
}

/// Recompute `target_pos`, `target_scale` and `target_spacing` for every
/// visible icon. Without a nearest icon everything relaxes to baseline.
pub fn compute_targets(
    icons: &mut [IconEntry],
    nearest: Option<&Nearest>,
    config: &DockConfiguration,
    dock_bounds: Rect,
) {
    let spacing = config.baseline_spacing();
    for icon in icons.iter_mut().filter(|i| i.visible) {
        icon.baseline = baseline_position(icon, dock_bounds, config);
        icon.target_pos = icon.baseline;
        icon.target_scale = 1.0;
    }

    if let Some(hit) = nearest.filter(|n| n.idx < icons.len()) {
        apply_falloff(icons, hit.idx, config);
    }

    for icon in icons.iter_mut().filter(|i| i.visible) {
        icon.target_spacing = spacing * icon.target_scale;
    }
}

fn apply_falloff(icons: &mut [IconEntry], k: usize, config: &DockConfiguration) {
    let peak = config.peak_scale();
    let lift = config.edge.rise_direction() * config.rise_px();

    let center = &mut icons[k];
    center.target_scale = peak;
    center.target_pos = center.baseline + lift;

    // Neighbors follow the lift on the cross axis only
    let lift = lift * config.edge.cross_mask();
    let mut scale = peak;
    let mut pull = config.neighbor_pull;
    for step in 1.. {
        scale = (scale * config.scale_decay).max(1.0);
        let left = k.checked_sub(step);
        let right = Some(k + step).filter(|&i| i < icons.len());
        if scale <= 1.0 || (left.is_none() && right.is_none()) {
            break;
        }
        for idx in [left, right].into_iter().flatten() {
            let icon = &mut icons[idx];
            if icon.visible {
                icon.target_scale = scale;
                icon.target_pos = icon.baseline + lift * pull;
            }
        }
        pull *= config.pull_decay;
    }
}

/// Where the label of an icon drawn at `pos` with `scale` should sit.
pub fn label_anchor(edge: DockEdge, pos: Vec2, scale: f32, icon_px: f32) -> Vec2 {
    let pivot = edge.pivot();
    let scaled = icon_px * scale;
    // Visual center after scaling around the pivot
    let center = pos + pivot * icon_px + (Vec2::splat(0.5) - pivot) * scaled;
    let offset = if edge.is_vertical() {
        LABEL_OFFSET_VERTICAL
    } else {
        LABEL_OFFSET_HORIZONTAL
    };
    center + edge.rise_direction() * (offset * scaled)
}

/// Set the nearest icon's label from its current position and clear the
/// rest.
pub fn assign_label(
    icons: &mut [IconEntry],
    nearest: Option<&Nearest>,
    config: &DockConfiguration,
) {
    for (idx, icon) in icons.iter_mut().enumerate() {
        icon.label = (nearest.is_some_and(|n| n.idx == idx) && icon.visible)
            .then(|| {
                label_anchor(
                    config.edge,
                    icon.current_pos,
                    icon.current_scale,
                    config.icon_px(),
                )
            });
    }
}

/// Dock background covering every visible icon's current slot plus
/// padding, one icon size thick on the cross axis.
pub fn background_bounds(
    icons: &[IconEntry],
    config: &DockConfiguration,
) -> Option<Rect> {
    let edge = config.edge;
    let icon_px = config.icon_px();
    let pad = config.background_padding * icon_px;

    let mut visible = icons.iter().filter(|i| i.visible);
    let first = visible.next()?;
    let (mut long_min, mut long_max) = (f32::INFINITY, f32::NEG_INFINITY);
    for icon in std::iter::once(first).chain(visible) {
        let long = edge.long_axis(icon.current_pos);
        long_min = long_min.min(long);
        long_max = long_max.max(long + icon_px);
    }
    let cross_min = edge.cross_axis(first.baseline) - pad;
    let long_min = long_min - pad;
    let long_extent = long_max + pad - long_min;
    let cross_extent = icon_px + 2.0 * pad;

    let rect = if edge.is_vertical() {
        Rect::new(cross_min, long_min, cross_extent, long_extent)
    } else {
        Rect::new(long_min, cross_min, long_extent, cross_extent)
    };
    rect.is_finite().then_some(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::proximity;
    use crate::host::sim::SimDock;
    use crate::options::Options;

    fn setup(edge: DockEdge, count: usize) -> (std::rc::Rc<SimDock>, Vec<IconEntry>, DockConfiguration) {
        let dock = SimDock::with_icons(edge, Vec2::new(0.0, 1000.0), 48.0, count);
        let config = DockConfiguration::resolve(&Options::default(), &*dock);
        let icons = dock
            .icons()
            .into_iter()
            .map(|icon| IconEntry::new(icon, config.baseline_spacing()))
            .collect();
        (dock, icons, config)
    }

    fn solve(dock: &SimDock, icons: &mut [IconEntry], config: &DockConfiguration, pointer: Vec2) -> Option<Nearest> {
        use crate::host::DockHost;
        let hit = proximity::nearest(icons, pointer, config.hit_radius_px());
        compute_targets(icons, hit.as_ref(), config, dock.bounds());
        hit
    }

    #[test]
    fn scenario_pointer_on_middle_icon() {
        let (dock, mut icons, config) = setup(DockEdge::Bottom, 5);
        let pointer = dock.icon(2).unwrap().center();
        let hit = solve(&dock, &mut icons, &config, pointer).unwrap();
        assert_eq!(hit.idx, 2);
        assert!(icons[2].target_scale > 1.0);
        assert_eq!(icons[0].target_scale, 1.0);
        assert_eq!(icons[4].target_scale, 1.0);
        // Nearest lifts up, away from a bottom edge
        assert!(icons[2].target_pos.y < icons[2].baseline.y);
        assert_eq!(icons[2].target_pos.x, icons[2].baseline.x);
    }

    #[test]
    fn falloff_is_monotonic_both_ways() {
        let (dock, mut icons, mut config) = setup(DockEdge::Bottom, 9);
        config.magnify_factor = 3.0;
        config.scale_decay = 0.8;
        let pointer = dock.icon(3).unwrap().center();
        let k = solve(&dock, &mut icons, &config, pointer).unwrap().idx;
        for i in k..icons.len() - 1 {
            assert!(icons[i].target_scale >= icons[i + 1].target_scale);
        }
        for i in (1..=k).rev() {
            assert!(icons[i].target_scale >= icons[i - 1].target_scale);
        }
        assert!(icons[k + 1].target_scale > 1.0);
    }

    #[test]
    fn neighbors_follow_part_of_the_lift() {
        let (dock, mut icons, mut config) = setup(DockEdge::Bottom, 5);
        config.magnify_factor = 2.0;
        let pointer = dock.icon(2).unwrap().center();
        solve(&dock, &mut icons, &config, pointer);
        let lift = |i: usize| icons[i].baseline.y - icons[i].target_pos.y;
        assert!(lift(2) > lift(1));
        assert!(lift(1) > 0.0);
        assert!((lift(1) - lift(3)).abs() < 1e-4);
    }

    #[test]
    fn no_nearest_relaxes_to_baseline() {
        let (dock, mut icons, config) = setup(DockEdge::Bottom, 5);
        let pointer = dock.icon(1).unwrap().center();
        solve(&dock, &mut icons, &config, pointer);
        solve(&dock, &mut icons, &config, Vec2::new(-5000.0, -5000.0));
        for icon in &icons {
            assert_eq!(icon.target_scale, 1.0);
            assert_eq!(icon.target_pos, icon.baseline);
            assert_eq!(icon.target_spacing, config.baseline_spacing());
        }
    }

    #[test]
    fn vertical_dock_lifts_on_x() {
        let (dock, mut icons, config) = setup(DockEdge::Left, 3);
        let pointer = dock.icon(1).unwrap().center();
        solve(&dock, &mut icons, &config, pointer);
        assert!(icons[1].target_pos.x > icons[1].baseline.x);
        assert_eq!(icons[1].target_pos.y, icons[1].baseline.y);
    }

    #[test]
    fn spacing_scales_with_target() {
        let (dock, mut icons, config) = setup(DockEdge::Bottom, 3);
        let pointer = dock.icon(1).unwrap().center();
        solve(&dock, &mut icons, &config, pointer);
        let expected = config.baseline_spacing() * config.peak_scale();
        assert!((icons[1].target_spacing - expected).abs() < 1e-4);
    }

    #[test]
    fn label_sits_beyond_the_icon() {
        let pos = Vec2::new(100.0, 500.0);
        let above = label_anchor(DockEdge::Bottom, pos, 1.0, 48.0);
        assert!(above.y < pos.y);
        assert!((above.x - 124.0).abs() < 1e-4);
        let beside = label_anchor(DockEdge::Left, pos, 1.0, 48.0);
        assert!(beside.x > pos.x + 48.0);
    }

    #[test]
    fn background_covers_visible_icons() {
        let (_dock, mut icons, config) = setup(DockEdge::Bottom, 4);
        icons[3].visible = false;
        let bg = background_bounds(&icons, &config).unwrap();
        assert!(bg.origin.x < icons[0].current_pos.x);
        assert!(bg.max().x > icons[2].current_pos.x + config.icon_px());
        assert!(bg.max().x < icons[3].current_pos.x + config.icon_px());
        assert!(background_bounds(&[], &config).is_none());
    }
}

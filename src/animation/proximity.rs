//! Nearest-icon search.

use glam::Vec2;

use super::IconEntry;
use crate::host::IconId;

/// Result of a nearest-icon search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Index into the searched slice.
    pub idx: usize,
    /// Identity of the nearest icon.
    pub id: IconId,
    /// Pointer distance from the icon's visual center.
    pub distance: f32,
}

/// Find the icon whose bounding-box center is closest to `pointer`.
///
/// Only a distance strictly below `hit_radius` counts; on ties the first
/// icon in slice order wins. Invisible icons are ignored. Every visible
/// icon's `distance_to_pointer` is updated as a side effect.
pub fn nearest(
    icons: &mut [IconEntry],
    pointer: Vec2,
    hit_radius: f32,
) -> Option<Nearest> {
    if !pointer.is_finite() {
        return None;
    }
    let mut best: Option<Nearest> = None;
    for (idx, icon) in icons.iter_mut().enumerate() {
        if !icon.visible {
            icon.distance_to_pointer = None;
            continue;
        }
        let distance = icon.center().distance(pointer);
        icon.distance_to_pointer = Some(distance);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(Nearest {
                idx,
                id: icon.id,
                distance,
            });
        }
    }
    best.filter(|b| b.distance < hit_radius)
}

/// Stable sort by distance of each icon's origin from the dock's anchor
/// corner, so slice order matches on-screen order tick to tick.
pub fn sort_by_anchor(icons: &mut [IconEntry], anchor: Vec2) {
    icons.sort_by(|a, b| {
        let da = a.bounding_box.origin.distance_squared(anchor);
        let db = b.bounding_box.origin.distance_squared(anchor);
        da.total_cmp(&db)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::sim::SimDock;
    use crate::options::DockEdge;
    use crate::util::geometry::Rect;

    fn entries(dock: &SimDock) -> Vec<IconEntry> {
        dock.icons()
            .into_iter()
            .map(|icon| IconEntry::new(icon, 60.0))
            .collect()
    }

    #[test]
    fn finds_icon_under_pointer() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::ZERO, 48.0, 5);
        let mut icons = entries(&dock);
        let target = dock.icon(2).unwrap().center();
        let hit = nearest(&mut icons, target, 120.0).unwrap();
        assert_eq!(hit.idx, 2);
        assert_eq!(hit.distance, 0.0);
        assert!(icons.iter().all(|e| e.distance_to_pointer.is_some()));
    }

    #[test]
    fn hit_radius_is_strict() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::ZERO, 48.0, 1);
        let mut icons = entries(&dock);
        let center = dock.icon(0).unwrap().center();
        let pointer = center + Vec2::new(0.0, 50.0);
        assert!(nearest(&mut icons, pointer, 50.0).is_none());
        assert!(nearest(&mut icons, pointer, 50.001).is_some());
    }

    #[test]
    fn far_pointer_finds_nothing() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::ZERO, 48.0, 5);
        let mut icons = entries(&dock);
        assert!(nearest(&mut icons, Vec2::new(5000.0, 5000.0), 120.0).is_none());
    }

    #[test]
    fn ties_go_to_first_icon() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::ZERO, 48.0, 2);
        dock.icon(0).unwrap().set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0));
        dock.icon(1).unwrap().set_bounds(Rect::new(20.0, 0.0, 10.0, 10.0));
        let mut icons = entries(&dock);
        let hit = nearest(&mut icons, Vec2::new(15.0, 5.0), 500.0).unwrap();
        assert_eq!(hit.idx, 0);
    }

    #[test]
    fn invisible_icons_are_skipped() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::ZERO, 48.0, 2);
        let first = dock.icon(0).unwrap();
        let pointer = first.center();
        first.set_bounds(Rect::new(f32::NAN, 0.0, 48.0, 48.0));
        let mut icons = entries(&dock);
        let hit = nearest(&mut icons, pointer, 500.0).unwrap();
        assert_eq!(hit.idx, 1);
        assert_eq!(icons[0].distance_to_pointer, None);
    }

    #[test]
    fn anchor_sort_restores_screen_order() {
        let dock = SimDock::with_icons(DockEdge::Left, Vec2::ZERO, 48.0, 4);
        let mut icons = entries(&dock);
        icons.reverse();
        sort_by_anchor(&mut icons, Vec2::ZERO);
        let ids: Vec<_> = icons.iter().map(|e| e.id).collect();
        let expected: Vec<_> = dock.icons().iter().map(|i| i.id()).collect();
        assert_eq!(ids, expected);
    }
}

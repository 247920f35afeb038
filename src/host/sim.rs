//! Headless host for tests, benchmarks and the simulation binary.
//!
//! [`SimDock`] lays its icons out evenly along the long axis, giving each
//! icon the slot length the engine last wrote back, the way a real dock
//! container reflows when the engine changes an icon's spacing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use super::{
    DockChild, DockHost, IconFrame, IconId, IconProvider, PointerDevice,
    Signal, Subscription,
};
use crate::error::DockError;
use crate::options::DockEdge;
use crate::util::geometry::Rect;

/// Slot length of an icon the engine has not written to yet, in icon
/// sizes. Matches the engine's baseline spacing at the default spread.
const DEFAULT_SLOT_RATIO: f32 = 1.325;

/// Dock thickness, in icon sizes.
const CROSS_RATIO: f32 = 1.5;

/// A simulated icon.
#[derive(Debug)]
pub struct SimIcon {
    id: IconId,
    bounds: Cell<Rect>,
    last_frame: Cell<Option<IconFrame>>,
    applied: Cell<usize>,
    destroyed: Signal,
    drag_begin: Signal,
    drag_end: Signal,
}

impl SimIcon {
    fn new(id: u64, bounds: Rect) -> Self {
        Self {
            id: IconId(id),
            bounds: Cell::new(bounds),
            last_frame: Cell::new(None),
            applied: Cell::new(0),
            destroyed: Signal::new(),
            drag_begin: Signal::new(),
            drag_end: Signal::new(),
        }
    }

    /// Identity.
    #[must_use]
    pub const fn id(&self) -> IconId {
        self.id
    }

    /// Last frame the engine wrote, if any.
    #[must_use]
    pub fn last_frame(&self) -> Option<IconFrame> {
        self.last_frame.get()
    }

    /// How many frames the engine wrote.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.applied.get()
    }

    /// Current bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Center of the current bounds.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.get().center()
    }

    /// Override the bounds, e.g. with NaN to simulate a mid-mutation read.
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    /// Fire the destroy notification.
    pub fn destroy(&self) {
        self.destroyed.emit();
    }

    /// Fire the drag-begin notification.
    pub fn begin_drag(&self) {
        self.drag_begin.emit();
    }

    /// Fire the drag-end notification.
    pub fn end_drag(&self) {
        self.drag_end.emit();
    }
}

impl IconProvider for SimIcon {
    fn identity(&self) -> IconId {
        self.id
    }

    fn bounding_box(&self) -> Rect {
        self.bounds.get()
    }

    fn image_handle(&self) -> Option<String> {
        Some(format!("sim-icon-{}", self.id.0))
    }

    fn apply(&self, frame: &IconFrame) {
        self.last_frame.set(Some(*frame));
        self.applied.set(self.applied.get() + 1);
    }

    fn on_destroy(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.destroyed.connect(callback)
    }

    fn on_drag_begin(&self, callback: Box<dyn Fn()>) -> Option<Subscription> {
        Some(self.drag_begin.connect(callback))
    }

    fn on_drag_end(&self, callback: Box<dyn Fn()>) -> Option<Subscription> {
        Some(self.drag_end.connect(callback))
    }
}

#[derive(Debug, Clone)]
enum SimChild {
    Icon(Rc<SimIcon>),
    Separator,
}

/// A simulated dock container.
#[derive(Debug)]
pub struct SimDock {
    edge: Cell<DockEdge>,
    origin: Cell<Vec2>,
    icon_size: f32,
    scale_factor: Cell<f32>,
    children: RefCell<Vec<SimChild>>,
    show_apps: RefCell<Option<Rc<SimIcon>>>,
    show_apps_fails: Cell<bool>,
    bounds: Cell<Rect>,
    destroyed: Signal,
    child_queries: Cell<usize>,
    next_id: Cell<u64>,
}

impl SimDock {
    /// Empty dock at `origin`, holding icons of `icon_size` pixels.
    #[must_use]
    pub fn new(edge: DockEdge, origin: Vec2, icon_size: f32) -> Rc<Self> {
        let dock = Rc::new(Self {
            edge: Cell::new(edge),
            origin: Cell::new(origin),
            icon_size,
            scale_factor: Cell::new(1.0),
            children: RefCell::new(Vec::new()),
            show_apps: RefCell::new(None),
            show_apps_fails: Cell::new(false),
            bounds: Cell::new(Rect::default()),
            destroyed: Signal::new(),
            child_queries: Cell::new(0),
            next_id: Cell::new(1),
        });
        dock.relayout();
        dock
    }

    /// Dock at `origin` with `count` icons.
    #[must_use]
    pub fn with_icons(
        edge: DockEdge,
        origin: Vec2,
        icon_size: f32,
        count: usize,
    ) -> Rc<Self> {
        let dock = Self::new(edge, origin, icon_size);
        for _ in 0..count {
            dock.add_icon();
        }
        dock
    }

    fn make_icon(&self) -> Rc<SimIcon> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Rc::new(SimIcon::new(id, Rect::default()))
    }

    /// Append an icon and reflow.
    pub fn add_icon(&self) -> Rc<SimIcon> {
        let icon = self.make_icon();
        self.children
            .borrow_mut()
            .push(SimChild::Icon(Rc::clone(&icon)));
        self.relayout();
        icon
    }

    /// Append a separator.
    pub fn add_separator(&self) {
        self.children.borrow_mut().push(SimChild::Separator);
    }

    /// Remove an icon, firing its destroy notification, and reflow.
    pub fn remove_icon(&self, id: IconId) {
        let removed = {
            let mut children = self.children.borrow_mut();
            let idx = children.iter().position(
                |c| matches!(c, SimChild::Icon(icon) if icon.id == id),
            );
            idx.map(|i| children.remove(i))
        };
        if let Some(SimChild::Icon(icon)) = removed {
            icon.destroy();
        }
        self.relayout();
    }

    /// Show or hide the "show applications" pseudo-icon.
    pub fn set_show_apps(&self, visible: bool) {
        let icon = visible.then(|| self.make_icon());
        *self.show_apps.borrow_mut() = icon;
        self.relayout();
    }

    /// Make the "show applications" lookup fail.
    pub fn fail_show_apps(&self, fail: bool) {
        self.show_apps_fails.set(fail);
    }

    /// Move the dock, as an auto-hide slide would.
    pub fn set_origin(&self, origin: Vec2) {
        self.origin.set(origin);
        self.relayout();
    }

    /// Change the display scale.
    pub fn set_scale_factor(&self, scale_factor: f32) {
        self.scale_factor.set(scale_factor);
    }

    /// Icons in container order (separators and show-apps excluded).
    #[must_use]
    pub fn icons(&self) -> Vec<Rc<SimIcon>> {
        self.children
            .borrow()
            .iter()
            .filter_map(|c| match c {
                SimChild::Icon(icon) => Some(Rc::clone(icon)),
                SimChild::Separator => None,
            })
            .collect()
    }

    /// The `index`-th icon.
    #[must_use]
    pub fn icon(&self, index: usize) -> Option<Rc<SimIcon>> {
        self.icons().get(index).cloned()
    }

    /// How many times the engine listed the children.
    #[must_use]
    pub fn child_queries(&self) -> usize {
        self.child_queries.get()
    }

    /// Fire the dock-destroyed notification.
    pub fn destroy(&self) {
        self.destroyed.emit();
    }

    /// Reflow icons along the long axis using the spacing the engine last
    /// wrote to each one.
    pub fn relayout(&self) {
        let edge = self.edge.get();
        let origin = self.origin.get();
        let size = self.icon_size * self.scale_factor.get();
        let cross_extent = size * CROSS_RATIO;
        let cross = edge.cross_axis(origin) + (cross_extent - size) / 2.0;

        let mut cursor = edge.long_axis(origin);
        let mut place = |icon: &SimIcon| {
            let slot = icon
                .last_frame
                .get()
                .map_or(size * DEFAULT_SLOT_RATIO, |f| f.spacing);
            let long = cursor + (slot - size) / 2.0;
            let top_left = if edge.is_vertical() {
                Vec2::new(cross, long)
            } else {
                Vec2::new(long, cross)
            };
            icon.bounds.set(Rect::from_origin_size(top_left, Vec2::splat(size)));
            cursor += slot;
        };
        for child in self.children.borrow().iter() {
            if let SimChild::Icon(icon) = child {
                place(icon);
            }
        }
        if let Some(icon) = self.show_apps.borrow().as_ref() {
            place(icon);
        }

        let long_extent = cursor - edge.long_axis(origin);
        let extent = if edge.is_vertical() {
            Vec2::new(cross_extent, long_extent)
        } else {
            Vec2::new(long_extent, cross_extent)
        };
        self.bounds.set(Rect::from_origin_size(origin, extent));
    }
}

impl DockHost for SimDock {
    fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    fn edge(&self) -> DockEdge {
        self.edge.get()
    }

    fn scale_factor(&self) -> f32 {
        self.scale_factor.get()
    }

    fn children(&self) -> Vec<DockChild> {
        self.child_queries.set(self.child_queries.get() + 1);
        self.children
            .borrow()
            .iter()
            .map(|c| match c {
                SimChild::Icon(icon) => {
                    DockChild::Icon(Rc::clone(icon) as Rc<dyn IconProvider>)
                }
                SimChild::Separator => DockChild::Separator,
            })
            .collect()
    }

    fn show_apps_icon(&self) -> Result<Option<Rc<dyn IconProvider>>, DockError> {
        if self.show_apps_fails.get() {
            return Err(DockError::Discovery(
                "show-apps button not realized".into(),
            ));
        }
        Ok(self
            .show_apps
            .borrow()
            .as_ref()
            .map(|icon| Rc::clone(icon) as Rc<dyn IconProvider>))
    }

    fn on_destroyed(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.destroyed.connect(callback)
    }
}

/// A pointer the test moves by hand.
#[derive(Debug, Default)]
pub struct SimPointer {
    position: Cell<Vec2>,
}

impl SimPointer {
    /// Pointer at `position`.
    #[must_use]
    pub fn new(position: Vec2) -> Rc<Self> {
        Rc::new(Self {
            position: Cell::new(position),
        })
    }

    /// Move the pointer.
    pub fn set(&self, position: Vec2) {
        self.position.set(position);
    }
}

impl PointerDevice for SimPointer {
    fn position(&self) -> Vec2 {
        self.position.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_are_laid_out_evenly() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::new(0.0, 900.0), 48.0, 3);
        let icons = dock.icons();
        let slot = 48.0 * DEFAULT_SLOT_RATIO;
        let gap = icons[1].bounds().origin.x - icons[0].bounds().origin.x;
        assert!((gap - slot).abs() < 1e-4);
        assert_eq!(icons[0].bounds().origin.y, icons[2].bounds().origin.y);
        assert!((dock.bounds().size.x - 3.0 * slot).abs() < 1e-3);
    }

    #[test]
    fn vertical_dock_stacks_on_y() {
        let dock = SimDock::with_icons(DockEdge::Left, Vec2::ZERO, 32.0, 2);
        let icons = dock.icons();
        assert_eq!(icons[0].bounds().origin.x, icons[1].bounds().origin.x);
        assert!(icons[1].bounds().origin.y > icons[0].bounds().origin.y);
    }

    #[test]
    fn spacing_write_back_reflows() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::ZERO, 48.0, 2);
        let first = dock.icon(0).unwrap();
        let before = dock.icon(1).unwrap().bounds().origin.x;
        first.apply(&IconFrame {
            position: first.bounds().origin,
            scale: 1.5,
            spacing: 120.0,
            pivot: DockEdge::Bottom.pivot(),
            visible: true,
            label: None,
        });
        dock.relayout();
        assert!(dock.icon(1).unwrap().bounds().origin.x > before);
    }

    #[test]
    fn children_include_separators() {
        let dock = SimDock::with_icons(DockEdge::Bottom, Vec2::ZERO, 48.0, 1);
        dock.add_separator();
        dock.add_icon();
        let children = dock.children();
        assert_eq!(children.len(), 3);
        assert!(matches!(children[1], DockChild::Separator));
        assert_eq!(dock.child_queries(), 1);
    }

    #[test]
    fn show_apps_lookup_can_fail() {
        let dock = SimDock::new(DockEdge::Bottom, Vec2::ZERO, 48.0);
        assert!(dock.show_apps_icon().unwrap().is_none());
        dock.set_show_apps(true);
        assert!(dock.show_apps_icon().unwrap().is_some());
        dock.fail_show_apps(true);
        assert!(dock.show_apps_icon().is_err());
    }
}

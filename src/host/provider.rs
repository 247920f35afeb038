use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;

use super::Subscription;
use crate::error::DockError;
use crate::options::DockEdge;
use crate::util::geometry::Rect;

/// Stable identity of a host icon, used to match icons across ticks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct IconId(pub u64);

impl std::fmt::Display for IconId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "icon#{}", self.0)
    }
}

/// Visual state written back to one icon at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconFrame {
    /// Top-left position, in the dock's coordinate space.
    pub position: Vec2,
    /// Uniform scale, always at least 1.
    pub scale: f32,
    /// Slot length reserved along the dock's long axis.
    pub spacing: f32,
    /// Normalized scale origin.
    pub pivot: Vec2,
    /// `false` when the icon's geometry was not finite this tick.
    pub visible: bool,
    /// Anchor for the icon's label; only the nearest icon has one.
    pub label: Option<Vec2>,
}

/// One icon as seen by the engine.
pub trait IconProvider {
    /// Stable identity.
    fn identity(&self) -> IconId;

    /// Current on-screen bounds.
    fn bounding_box(&self) -> Rect;

    /// Handle of the icon image, for hosts that render a copy.
    fn image_handle(&self) -> Option<String> {
        None
    }

    /// Write the tick's result to the host actor.
    fn apply(&self, frame: &IconFrame);

    /// Be told when the host removes this icon.
    fn on_destroy(&self, callback: Box<dyn Fn()>) -> Subscription;

    /// Be told when the user starts dragging this icon, if the host
    /// supports it.
    fn on_drag_begin(&self, _callback: Box<dyn Fn()>) -> Option<Subscription> {
        None
    }

    /// Counterpart of [`on_drag_begin`](Self::on_drag_begin).
    fn on_drag_end(&self, _callback: Box<dyn Fn()>) -> Option<Subscription> {
        None
    }
}

/// A child of the dock container.
#[derive(Clone)]
pub enum DockChild {
    /// An animatable icon.
    Icon(Rc<dyn IconProvider>),
    /// A separator line; never animated.
    Separator,
    /// Anything else the host keeps in the container.
    Other,
}

impl std::fmt::Debug for DockChild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Icon(icon) => {
                f.debug_tuple("Icon").field(&icon.identity()).finish()
            }
            Self::Separator => f.write_str("Separator"),
            Self::Other => f.write_str("Other"),
        }
    }
}

/// The dock container.
pub trait DockHost {
    /// Current dock bounds.
    fn bounds(&self) -> Rect;

    /// Edge the dock is attached to.
    fn edge(&self) -> DockEdge;

    /// Display scale of the dock's monitor.
    fn scale_factor(&self) -> f32;

    /// Children in container order.
    fn children(&self) -> Vec<DockChild>;

    /// The "show applications" pseudo-icon.
    ///
    /// `Ok(None)` when it is hidden or not yet sized; `Err` when the host
    /// could not look it up. The engine treats both as absent.
    fn show_apps_icon(&self) -> Result<Option<Rc<dyn IconProvider>>, DockError>;

    /// Be told when the dock itself goes away.
    fn on_destroyed(&self, callback: Box<dyn Fn()>) -> Subscription;
}

/// Source of pointer samples, in the same space as bounding boxes.
pub trait PointerDevice {
    /// Current pointer position.
    fn position(&self) -> Vec2;
}

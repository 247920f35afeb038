use std::rc::Rc;

use glam::Vec2;

use crate::host::{IconFrame, IconId, IconProvider};
use crate::util::geometry::Rect;

/// One dock icon and its animation state.
///
/// Positions are top-left corners in the dock's coordinate space. The
/// `current_*` fields are what the host last received; the `target_*`
/// fields are recomputed every tick by the layout solver.
#[derive(Clone)]
pub struct IconEntry {
    /// Stable identity, used to carry state across rediscovery.
    pub id: IconId,
    /// Host handle for reads and write-back.
    pub provider: Rc<dyn IconProvider>,
    /// Image handle read at discovery.
    pub image: Option<String>,
    /// Bounds read from the host this tick.
    pub bounding_box: Rect,
    /// Resting position when nothing is magnified.
    pub baseline: Vec2,
    /// Last position written to the host.
    pub current_pos: Vec2,
    /// Position the icon is easing toward.
    pub target_pos: Vec2,
    /// Last scale written to the host, at least 1.
    pub current_scale: f32,
    /// Scale the icon is easing toward, at least 1.
    pub target_scale: f32,
    /// Last long-axis slot length written to the host.
    pub current_spacing: f32,
    /// Slot length the icon is easing toward.
    pub target_spacing: f32,
    /// Pointer distance from the last nearest search.
    pub distance_to_pointer: Option<f32>,
    /// `false` when this tick's geometry was not finite.
    pub visible: bool,
    /// Label anchor, set on the nearest icon only.
    pub label: Option<Vec2>,
}

impl IconEntry {
    /// Fresh entry resting at the provider's current bounds.
    pub fn new(provider: Rc<dyn IconProvider>, spacing: f32) -> Self {
        let bounding_box = provider.bounding_box();
        let origin = if bounding_box.is_finite() {
            bounding_box.origin
        } else {
            Vec2::ZERO
        };
        Self {
            id: provider.identity(),
            image: provider.image_handle(),
            provider,
            bounding_box,
            baseline: origin,
            current_pos: origin,
            target_pos: origin,
            current_scale: 1.0,
            target_scale: 1.0,
            current_spacing: spacing,
            target_spacing: spacing,
            distance_to_pointer: None,
            visible: bounding_box.is_finite(),
            label: None,
        }
    }

    /// Copy animation state from the same icon's previous entry.
    pub fn carry_over(&mut self, previous: &Self) {
        self.baseline = previous.baseline;
        self.current_pos = previous.current_pos;
        self.target_pos = previous.target_pos;
        self.current_scale = previous.current_scale;
        self.target_scale = previous.target_scale;
        self.current_spacing = previous.current_spacing;
        self.target_spacing = previous.target_spacing;
    }

    /// Re-read the bounds from the host, clearing per-tick flags.
    pub fn refresh_bounds(&mut self) {
        self.bounding_box = self.provider.bounding_box();
        self.visible = self.bounding_box.is_finite();
        self.distance_to_pointer = None;
        self.label = None;
    }

    /// Visual center of the host bounds.
    pub fn center(&self) -> Vec2 {
        self.bounding_box.center()
    }

    /// Frame to write back to the host.
    pub fn frame(&self, pivot: Vec2) -> IconFrame {
        IconFrame {
            position: self.current_pos,
            scale: self.current_scale,
            spacing: self.current_spacing,
            pivot,
            visible: self.visible,
            label: self.label,
        }
    }
}

impl std::fmt::Debug for IconEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconEntry")
            .field("id", &self.id)
            .field("bounding_box", &self.bounding_box)
            .field("current_pos", &self.current_pos)
            .field("target_pos", &self.target_pos)
            .field("current_scale", &self.current_scale)
            .field("target_scale", &self.target_scale)
            .field("current_spacing", &self.current_spacing)
            .field("target_spacing", &self.target_spacing)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

//! Axis-aligned rectangles in the host's coordinate space.

use glam::Vec2;

/// Axis-aligned rectangle: top-left `origin` plus `size`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Rect {
    /// Rectangle from position and size components.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle from an origin point and a size vector.
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Visual center.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Whether every component is a finite number.
    ///
    /// Hosts may report NaN geometry while an item is being created or torn
    /// down.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Whether the rectangle has a positive area.
    #[inline]
    pub fn has_area(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    /// Whether `point` lies inside (inclusive top-left, exclusive
    /// bottom-right).
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < max.x
            && point.y < max.y
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Self) -> Self {
        let origin = self.origin.min(other.origin);
        let max = self.max().max(other.max());
        Self::from_origin_size(origin, max - origin)
    }

    /// Grow on every side by `amount`.
    pub fn inflate(&self, amount: f32) -> Self {
        Self::from_origin_size(
            self.origin - Vec2::splat(amount),
            self.size + Vec2::splat(amount * 2.0),
        )
    }

    /// `[x, y, width, height]`, the shape used in serialized reports.
    pub fn to_array(&self) -> [f32; 4] {
        [self.origin.x, self.origin.y, self.size.x, self.size.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_max() {
        let r = Rect::new(10.0, 20.0, 48.0, 32.0);
        assert_eq!(r.center(), Vec2::new(34.0, 36.0));
        assert_eq!(r.max(), Vec2::new(58.0, 52.0));
    }

    #[test]
    fn test_nan_is_not_finite() {
        let r = Rect::new(f32::NAN, 0.0, 10.0, 10.0);
        assert!(!r.is_finite());
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).is_finite());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Vec2::ZERO));
        assert!(r.contains(Vec2::new(9.9, 9.9)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_union_and_inflate() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 30.0, 15.0));
        assert_eq!(a.inflate(2.0), Rect::new(-2.0, -2.0, 14.0, 14.0));
    }
}

//! Axis-aligned rectangle geometry for bodies and word obstacles
//!
//! All rectangles live in container space: origin at the container's
//! top-left corner, y growing downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Build from edges, e.g. a DOMRect translated into container space
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Overlap test. Touching edges count as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(other.right() < self.left()
            || other.left() > self.right()
            || other.bottom() < self.top()
            || other.top() > self.bottom())
    }

    /// Bounds of this rectangle after rotating it about its center
    ///
    /// This is what a browser reports as the bounding box of a rotated element.
    pub fn rotated_bounds(&self, degrees: f32) -> Rect {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let half = self.size * 0.5;
        let extent = Vec2::new(
            half.x * cos.abs() + half.y * sin.abs(),
            half.x * sin.abs() + half.y * cos.abs(),
        );
        let center = self.center();
        Rect::from_min_size(center - extent, extent * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, -8.0, 5.0, 5.0)));
    }

    #[test]
    fn test_overlap_partial_and_contained() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 1.0, 1.0)));
        assert!(Rect::new(2.0, 2.0, 1.0, 1.0).overlaps(&a));
    }

    #[test]
    fn test_touching_edges_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(a.overlaps(&Rect::new(0.0, 10.0, 5.0, 5.0)));
    }

    #[test]
    fn test_rotated_bounds_square_45() {
        let r = Rect::new(0.0, 0.0, 80.0, 80.0);
        let b = r.rotated_bounds(45.0);
        let side = 80.0 * std::f32::consts::SQRT_2;
        assert!((b.size.x - side).abs() < 0.01);
        assert!((b.size.y - side).abs() < 0.01);
        assert!((b.center() - r.center()).length() < 0.001);
    }

    #[test]
    fn test_rotated_bounds_quarter_turn_swaps() {
        let r = Rect::new(10.0, 20.0, 100.0, 40.0);
        let b = r.rotated_bounds(90.0);
        assert!((b.size.x - 40.0).abs() < 0.01);
        assert!((b.size.y - 100.0).abs() < 0.01);

        let same = r.rotated_bounds(0.0);
        assert!((same.min - r.min).length() < 0.001);
        assert!((same.size - r.size).length() < 0.001);
    }
}

//! Screen-space rectangles and device-coordinate conversion
//!
//! Layout space has its origin in the top-left corner with y growing downward,
//! measured in points. The GPU wants normalized device coordinates:
//!
//! ```text
//!   (-1, 1) ______________ (1, 1)
//!          |              |
//!          |    (0, 0)    |
//!          |______________|
//!   (-1,-1)                (1,-1)
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (origin + size)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Negative sizes are clamped to zero.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width.max(0.0), height.max(0.0)),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let size = size.max(Vec2::ZERO);
        Self {
            origin: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn min_x(&self) -> f32 {
        self.origin.x
    }

    #[inline]
    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.x
    }

    #[inline]
    pub fn min_y(&self) -> f32 {
        self.origin.y
    }

    #[inline]
    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.min_x(), self.min_y())
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.max_x(), self.min_y())
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.min_x(), self.max_y())
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.max_x(), self.max_y())
    }

    /// Point containment, half-open: the left and top edges are inside,
    /// the right and bottom edges are not.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Overlap test, inclusive: rectangles sharing only an edge intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x() <= other.max_x()
            && other.min_x() <= self.max_x()
            && self.min_y() <= other.max_y()
            && other.min_y() <= self.max_y()
    }
}

/// Convert a layout-space point to normalized device coordinates.
///
/// `drawable_size` is the surface size in pixels and `scale` the number of
/// pixels per layout point.
pub fn normalized_point(point: Vec2, drawable_size: Vec2, scale: f32) -> Vec2 {
    let inverse = Vec2::new(scale / drawable_size.x, scale / drawable_size.y);
    Vec2::new(
        2.0 * point.x * inverse.x - 1.0,
        -2.0 * point.y * inverse.y + 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corners() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.top_left(), Vec2::new(10.0, 20.0));
        assert_eq!(rect.top_right(), Vec2::new(40.0, 20.0));
        assert_eq!(rect.bottom_left(), Vec2::new(10.0, 60.0));
        assert_eq!(rect.bottom_right(), Vec2::new(40.0, 60.0));
        assert_eq!(rect.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_negative_size_clamped() {
        let rect = Rect::new(0.0, 0.0, -5.0, 3.0);
        assert_eq!(rect.width(), 0.0);
        assert_eq!(rect.height(), 3.0);
    }

    #[test]
    fn test_from_center() {
        let rect = Rect::from_center(Vec2::new(100.0, 100.0), Vec2::new(50.0, 20.0));
        assert_eq!(rect.origin, Vec2::new(75.0, 90.0));
        assert_eq!(rect.center(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(9.9, 9.9)));
        assert!(!rect.contains(Vec2::new(10.0, 5.0)));
        assert!(!rect.contains(Vec2::new(5.0, 10.0)));
        assert!(!rect.contains(Vec2::new(-0.1, 5.0)));
    }

    #[test]
    fn test_intersects_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let apart = Rect::new(10.5, 0.0, 10.0, 10.0);
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&apart));
    }

    #[test]
    fn test_normalized_point_maps_surface_corners() {
        // 400x800 points on a 2x display
        let drawable = Vec2::new(800.0, 1600.0);
        let scale = 2.0;

        let top_left = normalized_point(Vec2::ZERO, drawable, scale);
        assert_eq!(top_left, Vec2::new(-1.0, 1.0));

        let bottom_right = normalized_point(Vec2::new(400.0, 800.0), drawable, scale);
        assert_eq!(bottom_right, Vec2::new(1.0, -1.0));

        let center = normalized_point(Vec2::new(200.0, 400.0), drawable, scale);
        assert!(center.length() < 1e-6);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..300.0, 0.0f32..300.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn intersects_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn rect_intersects_itself(a in arb_rect()) {
            prop_assert!(a.intersects(&a));
        }

        #[test]
        fn contained_point_means_overlap(a in arb_rect(), b in arb_rect()) {
            if a.contains(b.origin) {
                prop_assert!(a.intersects(&b));
            }
        }
    }
}

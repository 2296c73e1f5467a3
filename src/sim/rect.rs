//! Axis-aligned rectangle geometry for blocks and the paddle
//!
//! Screen coordinates: x grows right, y grows down. `(x, y)` is the top-left.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Panics on non-positive dimensions; such a rectangle is a programming error.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "rect dimensions must be positive, got {width}x{height}"
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Corners in classifier priority order: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left(), self.top()),
            DVec2::new(self.right(), self.top()),
            DVec2::new(self.left(), self.bottom()),
            DVec2::new(self.right(), self.bottom()),
        ]
    }

    /// Inclusive point containment (edges count as inside)
    pub fn contains_point(&self, p: DVec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(50.0, 60.0, 100.0, 30.0);
        assert_eq!(r.right(), 150.0);
        assert_eq!(r.bottom(), 90.0);
        assert_eq!(r.center(), DVec2::new(100.0, 75.0));
        assert_eq!(r.corners()[3], DVec2::new(150.0, 90.0));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(DVec2::new(10.0, 10.0)));
        assert!(!r.contains_point(DVec2::new(10.1, 5.0)));
    }

    #[test]
    #[should_panic(expected = "rect dimensions must be positive")]
    fn test_zero_width_fails_fast() {
        let _ = Rect::new(0.0, 0.0, 0.0, 10.0);
    }
}

//! Axis-aligned bounding boxes
//!
//! Screen space has y growing downward, so a rectangle's `y` is its top edge.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same rectangle shifted horizontally (world -> view with `-camera.x`)
    #[inline]
    pub fn shifted_x(&self, dx: f32) -> Rect {
        Rect {
            x: self.x + dx,
            ..*self
        }
    }

    /// Same rectangle shifted vertically
    #[inline]
    pub fn shifted_y(&self, dy: f32) -> Rect {
        Rect {
            y: self.y + dy,
            ..*self
        }
    }

    /// Strict horizontal overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.right() > other.x && self.x < other.right()
    }

    /// Strict AABB overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.bottom() > other.y && self.y < other.bottom()
    }

    /// Whether width and height are positive and finite
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(a.overlaps(&Rect::new(2.0, 2.0, 2.0, 2.0)));
        // Touching edges
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 5.0, 5.0)));
        // Disjoint
        assert!(!a.overlaps(&Rect::new(20.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_shift_and_edges() {
        let r = Rect::new(100.0, 50.0, 20.0, 30.0).shifted_x(-40.0);
        assert_eq!(r.x, 60.0);
        assert_eq!(r.right(), 80.0);
        assert_eq!(r.bottom(), 80.0);
        assert_eq!(r.shifted_y(5.0).y, 55.0);
    }

    #[test]
    fn test_well_formed() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_well_formed());
        assert!(!Rect::new(0.0, 0.0, -1.0, 1.0).is_well_formed());
        assert!(!Rect::new(0.0, 0.0, 1.0, 0.0).is_well_formed());
        assert!(!Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_well_formed());
    }
}

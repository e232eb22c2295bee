//! Axis-aligned rectangles and play-field edge classification

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in world units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_pos_size(pos: Vec2, width: f32, height: f32) -> Self {
        Self::new(pos.x, pos.y, pos.x + width, pos.y + height)
    }

    /// The play field `(0, 0) .. (width, height)`
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Edges are inside
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Overlap test; touching edges count as a hit
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }

    pub fn offset(&self, by: Vec2) -> Rect {
        Rect::new(
            self.left + by.x,
            self.top + by.y,
            self.right + by.x,
            self.bottom + by.y,
        )
    }

    /// Grow every edge outward by `amount`
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }

    /// Top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right, self.top),
            Vec2::new(self.right, self.bottom),
            Vec2::new(self.left, self.bottom),
        ]
    }
}

/// Which edge of a play field a box crosses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundsHit {
    Ok,
    Left,
    Right,
    Top,
    Bottom,
}

impl BoundsHit {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == BoundsHit::Ok
    }

    /// Left/right hits reflect horizontally
    pub fn is_horizontal(self) -> bool {
        matches!(self, BoundsHit::Left | BoundsHit::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, BoundsHit::Top | BoundsHit::Bottom)
    }
}

/// Classify `r` against `bounds`.
///
/// Edges are checked in the order left, right, top, bottom and the first
/// violation is reported.
pub fn classify(r: &Rect, bounds: &Rect) -> BoundsHit {
    if r.left < bounds.left {
        BoundsHit::Left
    } else if r.right > bounds.right {
        BoundsHit::Right
    } else if r.top < bounds.top {
        BoundsHit::Top
    } else if r.bottom > bounds.bottom {
        BoundsHit::Bottom
    } else {
        BoundsHit::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_inclusive() {
        let r = Rect::from_pos_size(Vec2::new(10.0, 10.0), 20.0, 20.0);
        assert!(r.contains_point(Vec2::new(10.0, 10.0)));
        assert!(r.contains_point(Vec2::new(30.0, 30.0)));
        assert!(!r.contains_point(Vec2::new(30.1, 20.0)));
    }

    #[test]
    fn test_intersects_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        let c = Rect::new(10.5, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_union() {
        let a = Rect::from_pos_size(Vec2::ZERO, 50.0, 50.0);
        let b = Rect::from_pos_size(Vec2::new(60.0, 0.0), 50.0, 50.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 110.0, 50.0));
    }

    #[test]
    fn test_classify_order() {
        let screen = Rect::screen(100.0, 100.0);
        assert_eq!(classify(&Rect::new(10.0, 10.0, 20.0, 20.0), &screen), BoundsHit::Ok);
        // Left and top both violated: left wins
        assert_eq!(classify(&Rect::new(-1.0, -1.0, 5.0, 5.0), &screen), BoundsHit::Left);
        // Right and bottom both violated: right wins
        assert_eq!(
            classify(&Rect::new(95.0, 95.0, 101.0, 101.0), &screen),
            BoundsHit::Right
        );
        assert_eq!(classify(&Rect::new(5.0, 95.0, 10.0, 101.0), &screen), BoundsHit::Bottom);
        assert_eq!(classify(&Rect::new(5.0, -2.0, 10.0, 1.0), &screen), BoundsHit::Top);
    }

    #[test]
    fn test_box_flush_with_edge_is_ok() {
        let screen = Rect::screen(100.0, 100.0);
        assert!(classify(&Rect::new(0.0, 0.0, 100.0, 100.0), &screen).is_ok());
    }
}

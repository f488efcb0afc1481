//! Axis-aligned rectangle geometry
//!
//! Every collision test in the simulation reduces to rectangle overlap.
//! Screen coordinates: x grows right, y grows down, (0, 0) is the top-left
//! corner of the field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle stored as top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle of the given size centered on `center`
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self {
            x: center.x - w / 2.0,
            y: center.y - h / 2.0,
            w,
            h,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Overlap test, half-open: rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True when the two rectangles do not overlap on the x axis
    #[inline]
    pub fn separated_horizontally(&self, other: &Rect) -> bool {
        self.right() <= other.left() || self.left() >= other.right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn test_contained_rect_intersects() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(outer.intersects(&inner));
    }

    #[test]
    fn test_from_center() {
        let r = Rect::from_center(Vec2::new(50.0, 20.0), 20.0, 10.0);
        assert_eq!(r.left(), 40.0);
        assert_eq!(r.right(), 60.0);
        assert_eq!(r.top(), 15.0);
        assert_eq!(r.bottom(), 25.0);
        assert_eq!(r.center(), Vec2::new(50.0, 20.0));
    }

    #[test]
    fn test_separated_horizontally() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.separated_horizontally(&Rect::new(10.0, 50.0, 5.0, 5.0)));
        assert!(!a.separated_horizontally(&Rect::new(5.0, 50.0, 5.0, 5.0)));
    }
}

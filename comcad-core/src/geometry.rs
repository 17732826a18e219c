//! Plain 2D value types shared by the canvas modules.
//!
//! The same types carry world coordinates (drawing units, Y up) and pixel
//! coordinates (viewport relative, Y down); which space a value lives in is
//! decided by the function that produced it.

use serde::{Deserialize, Serialize};

/// A point in world or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance `|dx| + |dy|`.
    pub fn manhattan_distance(&self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A displacement in world or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Build a rectangle from two arbitrary corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Build a rectangle from `(xmin, ymin, xmax, ymax)`.
    pub fn from_bounds(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self::from_corners(Point::new(xmin, ymin), Point::new(xmax, ymax))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// True when the rectangle has no area or contains NaN/infinite corners.
    pub fn is_degenerate(&self) -> bool {
        !(self.min.is_finite() && self.max.is_finite())
            || self.width() <= 0.0
            || self.height() <= 0.0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Smallest rectangle containing both `self` and `p`.
    pub fn include(&self, p: Point) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(p.x), self.min.y.min(p.y)),
            max: Point::new(self.max.x.max(p.x), self.max.y.max(p.y)),
        }
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Accumulates a bounding box over a stream of points.
#[derive(Debug, Clone, Default)]
pub struct BoundsBuilder {
    bounds: Option<Rect>,
}

impl BoundsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, p: Point) {
        if !p.is_finite() {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(rect) => rect.include(p),
            None => Rect::new(p, p),
        });
    }

    /// The accumulated bounds, or `None` if nothing was added.
    pub fn build(self) -> Option<Rect> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Point::new(37.0, 12.0);
        let b = Point::new(25.0, 0.0);
        assert_eq!(a.manhattan_distance(b), 24.0);
        assert_eq!(b.manhattan_distance(a), 24.0);
    }

    #[test]
    fn test_rect_from_corners_normalizes() {
        let rect = Rect::from_corners(Point::new(10.0, -5.0), Point::new(-2.0, 7.0));
        assert_eq!(rect.min, Point::new(-2.0, -5.0));
        assert_eq!(rect.max, Point::new(10.0, 7.0));
        assert_eq!(rect.width(), 12.0);
        assert_eq!(rect.height(), 12.0);
        assert_eq!(rect.center(), Point::new(4.0, 1.0));
    }

    #[test]
    fn test_rect_degenerate() {
        assert!(Rect::default().is_degenerate());
        assert!(Rect::from_bounds(0.0, 0.0, 10.0, 0.0).is_degenerate());
        assert!(Rect::new(Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0)).is_degenerate());
        assert!(!Rect::from_bounds(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_bounds_builder_skips_non_finite() {
        let mut builder = BoundsBuilder::new();
        builder.add(Point::new(1.0, 2.0));
        builder.add(Point::new(f64::INFINITY, 0.0));
        builder.add(Point::new(-3.0, 5.0));
        let rect = builder.build().unwrap();
        assert_eq!(rect, Rect::from_bounds(-3.0, 2.0, 1.0, 5.0));
    }

    #[test]
    fn test_bounds_builder_empty() {
        assert!(BoundsBuilder::new().build().is_none());
    }
}

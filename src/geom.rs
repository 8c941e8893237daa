//! 2D geometry primitives: points, line segments and rectangles.
//!
//! Segments and rectangles are adjusted in place; the geometry fitter moves
//! and scales the segments the turtle produced rather than rebuilding them.

use std::ops::{Add, AddAssign, Mul, MulAssign, Sub};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of `length` pointing `degrees` from the +x axis.
    pub fn from_polar(length: f64, degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self::new(length * radians.cos(), length * radians.sin())
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl MulAssign<f64> for Vec2 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
    }
}

/// A straight line drawn by the turtle.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: Vec2,
    pub to: Vec2,
    /// Stroke width. Zero-width segments take up space but are never stroked.
    pub width: f64,
    pub color: Arc<str>,
}

impl Segment {
    pub fn translate(&mut self, delta: Vec2) {
        self.from += delta;
        self.to += delta;
    }

    pub fn scale(&mut self, factor: f64) {
        self.from *= factor;
        self.to *= factor;
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0
    }
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    /// Smallest rectangle containing every point. Empty input gives a
    /// zero-sized rectangle at the origin.
    pub fn bounding<I>(points: I) -> Rect
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Rect::default();
        };

        let (min, max) = points.fold((first, first), |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });

        Rect {
            pos: min,
            size: max - min,
        }
    }

    /// Bounding box over both endpoints of every segment.
    pub fn of_segments(segments: &[Segment]) -> Rect {
        Rect::bounding(segments.iter().flat_map(|s| [s.from, s.to]))
    }

    pub fn scale(&mut self, factor: f64) {
        self.pos *= factor;
        self.size *= factor;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }
}

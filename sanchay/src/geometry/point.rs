//! Point and segment primitives.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 2D point (f64).
///
/// Plate reconstructions usually hand over longitude/latitude pairs; the
/// planar backend treats them as plain Cartesian coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero point (origin)
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared distance (faster, avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product.
    #[inline]
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(*self)
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    #[inline]
    fn mul(self, s: f64) -> Self {
        Point::new(self.x * s, self.y * s)
    }
}

/// Straight segment between two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn direction(&self) -> Point {
        self.end - self.start
    }

    /// Distance from a point to the closest point on the segment.
    pub fn distance_to_point(&self, point: Point) -> f64 {
        let dir = self.direction();
        let len_sq = dir.length_squared();

        if len_sq < f64::EPSILON {
            // Degenerate segment
            return point.distance(self.start);
        }

        let t = ((point - self.start).dot(dir) / len_sq).clamp(0.0, 1.0);
        point.distance(self.start + dir * t)
    }

    /// Check whether two segments touch or cross.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = orientation(other.start, other.end, self.start);
        let d2 = orientation(other.start, other.end, self.end);
        let d3 = orientation(self.start, self.end, other.start);
        let d4 = orientation(self.start, self.end, other.end);

        if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
            && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
        {
            return true;
        }

        // Collinear touching cases
        (d1 == 0.0 && on_segment(other, self.start))
            || (d2 == 0.0 && on_segment(other, self.end))
            || (d3 == 0.0 && on_segment(self, other.start))
            || (d4 == 0.0 && on_segment(self, other.end))
    }

    /// Shortest distance between two segments.
    pub fn distance_to_segment(&self, other: &Segment) -> f64 {
        if self.intersects(other) {
            return 0.0;
        }
        self.distance_to_point(other.start)
            .min(self.distance_to_point(other.end))
            .min(other.distance_to_point(self.start))
            .min(other.distance_to_point(self.end))
    }
}

#[inline]
fn orientation(a: Point, b: Point, p: Point) -> f64 {
    (b - a).cross(p - a)
}

#[inline]
fn on_segment(segment: &Segment, p: Point) -> bool {
    p.x >= segment.start.x.min(segment.end.x)
        && p.x <= segment.start.x.max(segment.end.x)
        && p.y >= segment.start.y.min(segment.end.y)
        && p.y <= segment.start.y.max(segment.end.y)
}

//! Reconstructed geometry types and the distance/area backend.
//!
//! The pipeline never measures geometry itself: every distance and area goes
//! through a [`GeometryOps`] implementation supplied by the feature source.
//! [`PlanarGeometry`] is the built-in Euclidean backend.

mod ops;
mod point;

pub use ops::{GeometryOps, PlanarGeometry};
pub use point::{Point, Segment};

use serde::{Deserialize, Serialize};

/// Geometry of a reconstructed feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum Geometry {
    Point(Point),
    MultiPoint(Vec<Point>),
    Polyline(Vec<Point>),
    /// Exterior ring; closing vertex is implicit.
    Polygon(Vec<Point>),
}

impl Geometry {
    /// All vertices of the geometry.
    pub fn vertices(&self) -> &[Point] {
        match self {
            Geometry::Point(p) => std::slice::from_ref(p),
            Geometry::MultiPoint(points)
            | Geometry::Polyline(points)
            | Geometry::Polygon(points) => points,
        }
    }

    /// Edges of the geometry. Points and multi-points have none.
    pub fn segments(&self) -> Vec<Segment> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
            Geometry::Polyline(points) => points
                .windows(2)
                .map(|w| Segment::new(w[0], w[1]))
                .collect(),
            Geometry::Polygon(points) => {
                if points.len() < 2 {
                    return Vec::new();
                }
                let n = points.len();
                (0..n)
                    .map(|i| Segment::new(points[i], points[(i + 1) % n]))
                    .collect()
            }
        }
    }

    #[inline]
    pub fn is_polygon(&self) -> bool {
        matches!(self, Geometry::Polygon(_))
    }

    /// Point-in-polygon test (ray casting). Always false for non-polygons.
    pub fn contains_point(&self, p: Point) -> bool {
        let Geometry::Polygon(ring) = self else {
            return false;
        };
        if ring.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Geometry {
        Geometry::Polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ])
    }

    #[test]
    fn test_polygon_segments_close_ring() {
        let segments = square().segments();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3].end, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_polyline_segments() {
        let line = Geometry::Polyline(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ]);
        assert_eq!(line.segments().len(), 2);
        assert!(Geometry::Point(Point::ZERO).segments().is_empty());
    }

    #[test]
    fn test_contains_point() {
        let poly = square();
        assert!(poly.contains_point(Point::new(2.0, 2.0)));
        assert!(!poly.contains_point(Point::new(5.0, 2.0)));
        assert!(!Geometry::Point(Point::new(2.0, 2.0)).contains_point(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_yaml_tagging() {
        let geometry = Geometry::Point(Point::new(1.0, 2.0));
        let yaml = serde_yaml::to_string(&geometry).unwrap();
        let parsed: Geometry = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, geometry);
    }
}

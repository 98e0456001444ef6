//! Geometry backend trait.

use super::Geometry;

/// Distance and area operations on reconstructed geometries.
///
/// Implement this trait to plug a different geometry library (for example a
/// spherical backend working in kilometres on the globe) into the pipeline.
///
/// # Example
///
/// ```rust,ignore
/// struct Spherical;
///
/// impl GeometryOps for Spherical {
///     fn distance(&self, a: &Geometry, b: &Geometry) -> f64 {
///         great_circle_distance_km(a, b)
///     }
///
///     fn area(&self, geometry: &Geometry) -> Option<f64> {
///         spherical_polygon_area_km2(geometry)
///     }
/// }
/// ```
pub trait GeometryOps: Send + Sync {
    /// Shortest distance between two geometries.
    ///
    /// Must be zero when the geometries touch, or when one lies inside a polygon.
    fn distance(&self, a: &Geometry, b: &Geometry) -> f64;

    /// Area of a polygon geometry, `None` for anything else.
    fn area(&self, geometry: &Geometry) -> Option<f64>;

    /// Distance between `a` and `b` if it is within `range` (inclusive).
    ///
    /// Backends with spatial acceleration can reject distant pairs early.
    fn is_close_enough(&self, a: &Geometry, b: &Geometry, range: f64) -> Option<f64> {
        let d = self.distance(a, b);
        (d <= range).then_some(d)
    }

    /// Shortest distance from `candidate` to any geometry in `seeds`.
    ///
    /// Returns `None` when `seeds` is empty.
    fn shortest_distance(
        &self,
        candidate: &Geometry,
        seeds: &mut dyn Iterator<Item = &Geometry>,
    ) -> Option<f64> {
        seeds
            .map(|seed| self.distance(candidate, seed))
            .min_by(f64::total_cmp)
    }
}

/// Euclidean geometry backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarGeometry;

impl PlanarGeometry {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryOps for PlanarGeometry {
    fn distance(&self, a: &Geometry, b: &Geometry) -> f64 {
        // Polygon interiors count as zero distance
        if a.vertices().iter().any(|&p| b.contains_point(p))
            || b.vertices().iter().any(|&p| a.contains_point(p))
        {
            return 0.0;
        }

        let segments_a = a.segments();
        let segments_b = b.segments();

        let mut best = f64::INFINITY;
        match (segments_a.is_empty(), segments_b.is_empty()) {
            (true, true) => {
                for pa in a.vertices() {
                    for pb in b.vertices() {
                        best = best.min(pa.distance(*pb));
                    }
                }
            }
            (false, true) => {
                for pb in b.vertices() {
                    for seg in &segments_a {
                        best = best.min(seg.distance_to_point(*pb));
                    }
                }
            }
            (true, false) => {
                for pa in a.vertices() {
                    for seg in &segments_b {
                        best = best.min(seg.distance_to_point(*pa));
                    }
                }
            }
            (false, false) => {
                for sa in &segments_a {
                    for sb in &segments_b {
                        best = best.min(sa.distance_to_segment(sb));
                        if best == 0.0 {
                            return 0.0;
                        }
                    }
                }
            }
        }
        best
    }

    fn area(&self, geometry: &Geometry) -> Option<f64> {
        let Geometry::Polygon(ring) = geometry else {
            return None;
        };
        if ring.len() < 3 {
            return None;
        }

        // Shoelace formula
        let n = ring.len();
        let twice_area: f64 = (0..n).map(|i| ring[i].cross(ring[(i + 1) % n])).sum();
        Some(twice_area.abs() * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, side: f64) -> Geometry {
        Geometry::Polygon(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
    }

    #[test]
    fn test_point_to_point() {
        let ops = PlanarGeometry;
        let a = Geometry::Point(Point::new(0.0, 0.0));
        let b = Geometry::Point(Point::new(0.0, 15.0));
        assert_relative_eq!(ops.distance(&a, &b), 15.0);
        assert_relative_eq!(ops.distance(&b, &a), 15.0);
    }

    #[test]
    fn test_point_inside_polygon_is_zero() {
        let ops = PlanarGeometry;
        let p = Geometry::Point(Point::new(1.0, 1.0));
        assert_eq!(ops.distance(&p, &square(0.0, 0.0, 4.0)), 0.0);
        assert_eq!(ops.distance(&square(0.0, 0.0, 4.0), &p), 0.0);
    }

    #[test]
    fn test_point_to_polyline() {
        let ops = PlanarGeometry;
        let p = Geometry::Point(Point::new(5.0, 2.0));
        let line = Geometry::Polyline(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
        assert_relative_eq!(ops.distance(&p, &line), 2.0);
    }

    #[test]
    fn test_polygon_to_polygon() {
        let ops = PlanarGeometry;
        let a = square(0.0, 0.0, 1.0);
        let b = square(3.0, 0.0, 1.0);
        assert_relative_eq!(ops.distance(&a, &b), 2.0);
        let overlapping = square(0.5, 0.5, 1.0);
        assert_eq!(ops.distance(&a, &overlapping), 0.0);
    }

    #[test]
    fn test_area() {
        let ops = PlanarGeometry;
        assert_relative_eq!(ops.area(&square(0.0, 0.0, 3.0)).unwrap(), 9.0);
        assert!(ops.area(&Geometry::Point(Point::ZERO)).is_none());
    }

    #[test]
    fn test_is_close_enough_inclusive() {
        let ops = PlanarGeometry;
        let a = Geometry::Point(Point::new(0.0, 0.0));
        let b = Geometry::Point(Point::new(20.0, 0.0));
        assert_eq!(ops.is_close_enough(&a, &b, 20.0), Some(20.0));
        assert_eq!(ops.is_close_enough(&a, &b, 19.999), None);
    }

    #[test]
    fn test_shortest_distance() {
        let ops = PlanarGeometry;
        let candidate = Geometry::Point(Point::new(0.0, 0.0));
        let seeds = [
            Geometry::Point(Point::new(0.0, 9.0)),
            Geometry::Point(Point::new(4.0, 0.0)),
        ];
        let d = ops.shortest_distance(&candidate, &mut seeds.iter());
        assert_eq!(d, Some(4.0));
        assert_eq!(ops.shortest_distance(&candidate, &mut std::iter::empty::<&Geometry>()), None);
    }
}

use model::geometry::{Geometry, GeometryKind};

use crate::sanitizer::SanitizedPath;

/// Three distinct vertices plus the repeated first one.
pub const MIN_RING_POINTS: usize = 4;

/// A trace is a closed area if it returns to its start and encloses at
/// least three distinct vertices, otherwise it is an open patrol line.
pub fn classify(path: &SanitizedPath) -> GeometryKind {
    let points = path.points();
    let closed = points.len() >= MIN_RING_POINTS && points.first() == points.last();
    if closed {
        GeometryKind::Polygon
    } else {
        GeometryKind::LineString
    }
}

/// Shapes a trace into storable geometry. No ring validity or coordinate
/// range checks are made.
pub fn shape(path: SanitizedPath) -> Geometry {
    match classify(&path) {
        GeometryKind::Polygon => Geometry::Polygon {
            ring: path.into_inner(),
        },
        GeometryKind::LineString => Geometry::LineString {
            points: path.into_inner(),
        },
    }
}

#[cfg(test)]
mod tests {
    use model::{block::BlockCategory, geometry::Coordinate};

    use super::*;
    use crate::sanitizer::sanitize;

    const A: [f64; 2] = [0.0, 0.0];
    const B: [f64; 2] = [1.0, 0.0];
    const C: [f64; 2] = [1.0, 1.0];

    fn sanitized(points: &[[f64; 2]]) -> SanitizedPath {
        let raw = points.iter().copied().map(Coordinate::from).collect::<Vec<_>>();
        sanitize(&raw)
    }

    #[test]
    fn closed_triangle_is_polygon() {
        let path = sanitized(&[A, B, C, A]);
        assert_eq!(classify(&path), GeometryKind::Polygon);
        let geometry = shape(path);
        assert_eq!(geometry.category(), BlockCategory::ClosedArea);
        assert_eq!(geometry.points().len(), 4);
    }

    #[test]
    fn three_point_loop_is_line() {
        assert_eq!(classify(&sanitized(&[A, B, A])), GeometryKind::LineString);
    }

    #[test]
    fn open_path_is_line() {
        let geometry = shape(sanitized(&[A, B, C]));
        assert_eq!(
            geometry,
            Geometry::LineString {
                points: vec![A.into(), B.into(), C.into()]
            }
        );
        assert_eq!(geometry.category(), BlockCategory::OpenPatrol);
    }

    #[test]
    fn two_points_are_line() {
        assert_eq!(classify(&sanitized(&[A, B])), GeometryKind::LineString);
    }

    #[test]
    fn long_open_path_is_line() {
        let path = sanitized(&[A, B, C, [0.0, 1.0], [0.0, 2.0]]);
        assert_eq!(classify(&path), GeometryKind::LineString);
    }

    #[test]
    fn shaping_is_deterministic() {
        let path = sanitized(&[A, B, C, [0.0, 1.0], A]);
        assert_eq!(shape(path.clone()), shape(path));
    }
}

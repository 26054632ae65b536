use itertools::Itertools;
use model::geometry::Coordinate;
use utility::let_also::LetAlso;

/// Minimum number of distinct consecutive points for a trace to count as
/// movement.
pub const MIN_MOVEMENT_POINTS: usize = 2;

/// A trace in which no two adjacent points are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedPath(Vec<Coordinate>);

impl SanitizedPath {
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the trace holds enough points to describe any movement at all.
    pub fn has_movement(&self) -> bool {
        self.len() >= MIN_MOVEMENT_POINTS
    }

    pub fn into_inner(self) -> Vec<Coordinate> {
        self.0
    }
}

/// Drops every point that equals its predecessor. The first point is always
/// kept. Comparison is exact, without any tolerance.
pub fn sanitize(raw: &[Coordinate]) -> SanitizedPath {
    raw.iter().copied().dedup().collect::<Vec<_>>().let_owned(SanitizedPath)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[[f64; 2]]) -> Vec<Coordinate> {
        points.iter().copied().map(Coordinate::from).collect()
    }

    #[test]
    fn empty_trace_stays_empty() {
        let sanitized = sanitize(&[]);
        assert!(sanitized.is_empty());
        assert!(!sanitized.has_movement());
    }

    #[test]
    fn removes_consecutive_duplicates_only() {
        let raw = path(&[[0.0, 0.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]);
        let sanitized = sanitize(&raw);
        assert_eq!(
            sanitized.points(),
            path(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]).as_slice()
        );
    }

    #[test]
    fn standing_still_is_no_movement() {
        let sanitized = sanitize(&path(&[[3.0, 4.0], [3.0, 4.0], [3.0, 4.0]]));
        assert_eq!(sanitized.len(), 1);
        assert!(!sanitized.has_movement());
    }

    #[test]
    fn near_duplicates_are_kept() {
        let raw = path(&[[1.0, 1.0], [1.0, 1.000_000_1]]);
        assert_eq!(sanitize(&raw).len(), 2);
    }

    #[test]
    fn keeps_first_point_and_never_grows() {
        let traces = vec![
            path(&[[5.0, 5.0]]),
            path(&[[5.0, 5.0], [5.0, 5.0]]),
            path(&[[1.0, 2.0], [2.0, 1.0], [2.0, 1.0], [1.0, 2.0], [1.0, 2.0]]),
            path(&[[0.0, 0.0], [0.0, 1.0], [0.0, 0.0], [0.0, 1.0]]),
        ];
        for raw in traces {
            let sanitized = sanitize(&raw);
            assert!(sanitized.len() <= raw.len());
            assert_eq!(sanitized.points().first(), raw.first());
            assert!(sanitized.points().windows(2).all(|pair| pair[0] != pair[1]));
        }
    }

    #[test]
    fn sanitizing_twice_changes_nothing() {
        let raw = path(&[[0.0, 0.0], [0.0, 0.0], [2.0, 0.0], [2.0, 0.0], [2.0, 3.0]]);
        let once = sanitize(&raw);
        let twice = sanitize(once.points());
        assert_eq!(once, twice);
    }
}

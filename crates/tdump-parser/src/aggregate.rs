//! Grouping of parsed records into per-trajectory point sequences.

use std::collections::HashMap;

use crate::error::{TdumpError, TdumpResult};
use crate::record::TrajectoryPoint;

/// Points sharing one trajectory id, in file order. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryGroup {
    id: i64,
    points: Vec<TrajectoryPoint>,
}

impl TrajectoryGroup {
    fn new(first: TrajectoryPoint) -> Self {
        Self {
            id: first.trajectory_id,
            points: vec![first],
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn points(&self) -> &[TrajectoryPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Start marker: the first point in file order.
    pub fn start(&self) -> &TrajectoryPoint {
        // groups are created with one point and only ever appended to
        &self.points[0]
    }

    /// End marker: the last point in file order.
    pub fn end(&self) -> &TrajectoryPoint {
        &self.points[self.points.len() - 1]
    }

    /// `(latitude, longitude)` pairs in polyline order.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(TrajectoryPoint::position).collect()
    }

    /// Forecast hours of the start and end points.
    pub fn forecast_span(&self) -> (i64, i64) {
        (self.start().forecast_hour, self.end().forecast_hour)
    }
}

/// Latitude/longitude extent of a set of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }
}

/// Trajectory groups in order of first appearance of each id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrajectoryGroups {
    groups: Vec<TrajectoryGroup>,
    index: HashMap<i64, usize>,
}

impl TrajectoryGroups {
    pub fn get(&self, id: i64) -> Option<&TrajectoryGroup> {
        self.index.get(&id).map(|&i| &self.groups[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectoryGroup> {
        self.groups.iter()
    }

    /// Trajectory ids in first-seen order.
    pub fn ids(&self) -> Vec<i64> {
        self.groups.iter().map(TrajectoryGroup::id).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of all group lengths.
    pub fn total_points(&self) -> usize {
        self.groups.iter().map(TrajectoryGroup::len).sum()
    }

    /// Bounding box of every point, or `None` when there are no groups.
    pub fn bounds(&self) -> Option<GeoBounds> {
        let mut points = self.groups.iter().flat_map(|g| g.points.iter());
        let first = points.next()?;
        let init = GeoBounds {
            south: first.latitude,
            west: first.longitude,
            north: first.latitude,
            east: first.longitude,
        };
        Some(points.fold(init, |b, p| GeoBounds {
            south: b.south.min(p.latitude),
            west: b.west.min(p.longitude),
            north: b.north.max(p.latitude),
            east: b.east.max(p.longitude),
        }))
    }

    fn push(&mut self, point: TrajectoryPoint) {
        match self.index.get(&point.trajectory_id) {
            Some(&i) => self.groups[i].points.push(point),
            None => {
                self.index.insert(point.trajectory_id, self.groups.len());
                self.groups.push(TrajectoryGroup::new(point));
            }
        }
    }
}

impl<'a> IntoIterator for &'a TrajectoryGroups {
    type Item = &'a TrajectoryGroup;
    type IntoIter = std::slice::Iter<'a, TrajectoryGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

impl FromIterator<TrajectoryPoint> for TrajectoryGroups {
    fn from_iter<I: IntoIterator<Item = TrajectoryPoint>>(iter: I) -> Self {
        let mut groups = TrajectoryGroups::default();
        for point in iter {
            groups.push(point);
        }
        groups
    }
}

/// Group points by trajectory id, preserving file order within each group.
pub fn group<I: IntoIterator<Item = TrajectoryPoint>>(points: I) -> TrajectoryGroups {
    points.into_iter().collect()
}

/// Like [`group`], but zero records is [`TdumpError::EmptyInput`].
pub fn group_for_render<I: IntoIterator<Item = TrajectoryPoint>>(
    points: I,
) -> TdumpResult<TrajectoryGroups> {
    let groups = group(points);
    if groups.is_empty() {
        return Err(TdumpError::EmptyInput);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TimestampComponents;

    fn point(id: i64, fh: i64, lat: f64, lon: f64) -> TrajectoryPoint {
        TrajectoryPoint {
            trajectory_id: id,
            timestamp: TimestampComponents {
                year: 24,
                month: 1,
                day: 1,
                hour: 0,
            },
            forecast_hour: fh,
            latitude: lat,
            longitude: lon,
            height: 500.0,
        }
    }

    #[test]
    fn test_group_keys_follow_first_appearance() {
        let groups = group(vec![
            point(3, 0, 1.0, 1.0),
            point(1, 0, 2.0, 2.0),
            point(3, 1, 1.1, 1.1),
            point(2, 0, 3.0, 3.0),
            point(1, 1, 2.1, 2.1),
        ]);
        assert_eq!(groups.ids(), vec![3, 1, 2]);
        assert_eq!(groups.get(3).unwrap().len(), 2);
        assert_eq!(groups.get(1).unwrap().len(), 2);
        assert_eq!(groups.get(2).unwrap().len(), 1);
        assert!(groups.get(9).is_none());
        assert_eq!(groups.total_points(), 5);
    }

    #[test]
    fn test_interleaved_ids_keep_relative_order() {
        let groups = group(vec![
            point(1, 0, 10.0, 0.0),
            point(2, 0, 20.0, 0.0),
            point(1, -1, 11.0, 0.0),
            point(2, -1, 21.0, 0.0),
            point(1, -2, 12.0, 0.0),
        ]);
        let lats: Vec<f64> = groups
            .get(1)
            .unwrap()
            .points()
            .iter()
            .map(|p| p.latitude)
            .collect();
        assert_eq!(lats, vec![10.0, 11.0, 12.0]);
        assert_eq!(groups.get(1).unwrap().forecast_span(), (0, -2));
    }

    #[test]
    fn test_single_point_start_equals_end() {
        let groups = group(vec![point(7, 0, 40.0, -75.0)]);
        let g = groups.get(7).unwrap();
        assert_eq!(g.start(), g.end());
        assert!(!g.is_empty());
    }

    #[test]
    fn test_group_for_render_rejects_empty() {
        let err = group_for_render(Vec::new()).unwrap_err();
        assert!(matches!(err, TdumpError::EmptyInput));
    }

    #[test]
    fn test_bounds() {
        let groups = group(vec![
            point(1, 0, 40.0, -75.0),
            point(1, 1, 42.0, -80.0),
            point(2, 0, 38.0, -70.0),
        ]);
        let b = groups.bounds().unwrap();
        assert_eq!(b.south, 38.0);
        assert_eq!(b.north, 42.0);
        assert_eq!(b.west, -80.0);
        assert_eq!(b.east, -70.0);
        assert_eq!(b.center(), (40.0, -75.0));

        assert!(TrajectoryGroups::default().bounds().is_none());
    }

    #[test]
    fn test_coordinates_are_lat_lon() {
        let groups = group(vec![point(1, 0, 40.0, -75.0), point(1, 1, 40.1, -75.1)]);
        assert_eq!(
            groups.get(1).unwrap().coordinates(),
            vec![(40.0, -75.0), (40.1, -75.1)]
        );
    }
}

//! Ordered waypoint storage with derived cumulative route length.

use fleetsim_core::{DistanceFn, GeoPoint};

/// Ordered sequence of waypoints plus the running distance to each one.
///
/// Paths grow strictly by appending; waypoints are never reordered or
/// removed, and the owning equipment destroys the path when it is removed.
/// The cumulative table is extended incrementally on append, keeping
/// `total_meters` constant-time.
#[derive(Clone, Debug)]
pub(crate) struct PathModel {
    waypoints: Vec<GeoPoint>,
    cumulative_meters: Vec<f64>,
}

impl PathModel {
    pub(crate) fn new() -> Self {
        Self {
            waypoints: Vec::new(),
            cumulative_meters: Vec::new(),
        }
    }

    /// Appends a waypoint, extending the cumulative table with `measure`.
    ///
    /// Coordinates are trusted as-is; out-of-range geographic values are a
    /// caller error.
    pub(crate) fn append(&mut self, point: GeoPoint, measure: DistanceFn) {
        let running = match (self.waypoints.last(), self.cumulative_meters.last()) {
            (Some(previous), Some(total)) => total + measure(*previous, point),
            _ => 0.0,
        };
        self.waypoints.push(point);
        self.cumulative_meters.push(running);
    }

    pub(crate) fn waypoint_count(&self) -> u32 {
        self.waypoints.len() as u32
    }

    /// Route length in meters; 0 until the path has two waypoints.
    pub(crate) fn total_meters(&self) -> f64 {
        self.cumulative_meters.last().copied().unwrap_or(0.0)
    }

    pub(crate) fn first_waypoint(&self) -> Option<GeoPoint> {
        self.waypoints.first().copied()
    }

    /// Waypoints in traversal order.
    pub(crate) fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    /// Running distance from the path start to each waypoint; the first
    /// entry is always 0.
    pub(crate) fn cumulative_meters(&self) -> &[f64] {
        &self.cumulative_meters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planar_thousandths(from: GeoPoint, to: GeoPoint) -> f64 {
        let lat = to.latitude() - from.latitude();
        let lon = to.longitude() - from.longitude();
        (lat * lat + lon * lon).sqrt() * 1_000.0
    }

    #[test]
    fn empty_and_single_waypoint_paths_have_zero_length() {
        let mut path = PathModel::new();
        assert_eq!(path.waypoint_count(), 0);
        assert_eq!(path.total_meters(), 0.0);

        path.append(GeoPoint::new(0.0, 0.0), planar_thousandths);
        assert_eq!(path.waypoint_count(), 1);
        assert_eq!(path.total_meters(), 0.0);
    }

    #[test]
    fn cumulative_table_tracks_each_prefix() {
        let mut path = PathModel::new();
        path.append(GeoPoint::new(0.0, 0.0), planar_thousandths);
        path.append(GeoPoint::new(0.0, 3.0), planar_thousandths);
        path.append(GeoPoint::new(4.0, 3.0), planar_thousandths);

        assert_eq!(path.cumulative_meters(), &[0.0, 3_000.0, 7_000.0]);
        assert_eq!(path.total_meters(), 7_000.0);
        assert_eq!(path.waypoint_count(), 3);
    }

    #[test]
    fn repeated_waypoints_add_no_length() {
        let mut path = PathModel::new();
        let pin = GeoPoint::new(-2.8, 104.8);
        path.append(pin, planar_thousandths);
        path.append(pin, planar_thousandths);

        assert_eq!(path.waypoint_count(), 2);
        assert_eq!(path.total_meters(), 0.0);
    }

    #[test]
    fn first_waypoint_tracks_insertion_order() {
        let mut path = PathModel::new();
        assert_eq!(path.first_waypoint(), None);

        let first = GeoPoint::new(1.0, 2.0);
        path.append(first, planar_thousandths);
        path.append(GeoPoint::new(3.0, 4.0), planar_thousandths);
        assert_eq!(path.first_waypoint(), Some(first));
        assert_eq!(path.waypoints().first(), Some(&first));
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless map surface and status presentation for Fleet Sim.
//!
//! The graphical map is an external collaborator; what sessions and tests
//! need from this workspace is a [`MapSurface`] they can script and inspect.
//! [`HeadlessSurface`] keeps live marker and polyline tables, a queue of
//! scripted clicks, and counters for every operation, which makes "removed
//! exactly once" and "no dangling artifacts" checkable facts rather than
//! hopes. The [`status`] module turns registry events into the free-text
//! status line an operator sees.

pub mod status;

use std::collections::{BTreeMap, VecDeque};

use fleetsim_core::{GeoPoint, MapSurface, MarkerHandle, PolylineHandle, RouteColor};

/// Bookkeeping map surface for headless sessions and tests.
///
/// Handles are allocated sequentially and never reused, so a stale handle
/// can never alias a live artifact.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    markers: BTreeMap<MarkerHandle, GeoPoint>,
    polylines: BTreeMap<PolylineHandle, Polyline>,
    clicks: VecDeque<GeoPoint>,
    next_marker: u64,
    next_polyline: u64,
    counters: SurfaceCounters,
}

/// One rendered polyline: its style color and the points appended so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    /// Color the route is drawn with.
    pub color: RouteColor,
    /// Appended points in order.
    pub points: Vec<GeoPoint>,
}

/// Counts of every operation the surface has performed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SurfaceCounters {
    /// Markers rendered.
    pub markers_rendered: u64,
    /// Marker position updates applied to live markers.
    pub marker_moves: u64,
    /// Markers removed while live.
    pub markers_removed: u64,
    /// Polylines rendered.
    pub polylines_rendered: u64,
    /// Points appended to live polylines.
    pub polyline_appends: u64,
    /// Polylines removed while live.
    pub polylines_removed: u64,
    /// Operations that addressed a handle that was not live.
    pub stale_operations: u64,
}

impl HeadlessSurface {
    /// Creates an empty surface with no artifacts and no queued clicks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a scripted click for the capture flow to drain.
    pub fn push_click(&mut self, point: GeoPoint) {
        self.clicks.push_back(point);
    }

    /// Number of artifacts (markers plus polylines) currently live.
    #[must_use]
    pub fn live_artifacts(&self) -> usize {
        self.markers.len() + self.polylines.len()
    }

    /// Position of a live marker.
    #[must_use]
    pub fn marker_position(&self, marker: MarkerHandle) -> Option<GeoPoint> {
        self.markers.get(&marker).copied()
    }

    /// Description of a live polyline.
    #[must_use]
    pub fn polyline(&self, polyline: PolylineHandle) -> Option<&Polyline> {
        self.polylines.get(&polyline)
    }

    /// Totals of every operation performed so far.
    #[must_use]
    pub fn counters(&self) -> SurfaceCounters {
        self.counters
    }

    /// Clicks queued but not yet drained.
    #[must_use]
    pub fn pending_clicks(&self) -> usize {
        self.clicks.len()
    }
}

impl MapSurface for HeadlessSurface {
    fn render_marker(&mut self, position: GeoPoint) -> MarkerHandle {
        self.next_marker += 1;
        let handle = MarkerHandle::new(self.next_marker);
        let _ = self.markers.insert(handle, position);
        self.counters.markers_rendered += 1;
        handle
    }

    fn update_marker_position(&mut self, marker: MarkerHandle, position: GeoPoint) {
        match self.markers.get_mut(&marker) {
            Some(live) => {
                *live = position;
                self.counters.marker_moves += 1;
            }
            None => self.counters.stale_operations += 1,
        }
    }

    fn remove_marker(&mut self, marker: MarkerHandle) {
        if self.markers.remove(&marker).is_some() {
            self.counters.markers_removed += 1;
        } else {
            self.counters.stale_operations += 1;
        }
    }

    fn render_polyline(&mut self, color: RouteColor) -> PolylineHandle {
        self.next_polyline += 1;
        let handle = PolylineHandle::new(self.next_polyline);
        let _ = self.polylines.insert(
            handle,
            Polyline {
                color,
                points: Vec::new(),
            },
        );
        self.counters.polylines_rendered += 1;
        handle
    }

    fn append_polyline_point(&mut self, polyline: PolylineHandle, position: GeoPoint) {
        match self.polylines.get_mut(&polyline) {
            Some(live) => {
                live.points.push(position);
                self.counters.polyline_appends += 1;
            }
            None => self.counters.stale_operations += 1,
        }
    }

    fn remove_polyline(&mut self, polyline: PolylineHandle) {
        if self.polylines.remove(&polyline).is_some() {
            self.counters.polylines_removed += 1;
        } else {
            self.counters.stale_operations += 1;
        }
    }

    fn take_click(&mut self) -> Option<GeoPoint> {
        self.clicks.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsim_core::{haversine_meters, ROUTE_COLORS};

    #[test]
    fn handles_are_unique_and_never_reused() {
        let mut surface = HeadlessSurface::new();
        let first = surface.render_marker(GeoPoint::new(0.0, 0.0));
        surface.remove_marker(first);
        let second = surface.render_marker(GeoPoint::new(1.0, 1.0));

        assert_ne!(first, second);
        assert_eq!(second.get(), first.get() + 1, "marker handles keep counting");
        assert_eq!(surface.marker_position(first), None);
        assert_eq!(surface.marker_position(second), Some(GeoPoint::new(1.0, 1.0)));

        let removed = surface.render_polyline(ROUTE_COLORS[0]);
        surface.remove_polyline(removed);
        let replacement = surface.render_polyline(ROUTE_COLORS[1]);
        assert_ne!(removed, replacement);
        assert_eq!(replacement.get(), removed.get() + 1, "polyline handles keep counting");
    }

    #[test]
    fn double_removal_is_counted_as_stale() {
        let mut surface = HeadlessSurface::new();
        let marker = surface.render_marker(GeoPoint::new(0.0, 0.0));
        surface.remove_marker(marker);
        surface.remove_marker(marker);

        let counters = surface.counters();
        assert_eq!(counters.markers_removed, 1);
        assert_eq!(counters.stale_operations, 1);
        assert_eq!(surface.live_artifacts(), 0);
    }

    #[test]
    fn polylines_accumulate_points_while_live() {
        let mut surface = HeadlessSurface::new();
        let route = surface.render_polyline(ROUTE_COLORS[1]);
        surface.append_polyline_point(route, GeoPoint::new(0.0, 0.0));
        surface.append_polyline_point(route, GeoPoint::new(0.0, 1.0));

        let polyline = surface.polyline(route).expect("polyline is live");
        assert_eq!(polyline.color, ROUTE_COLORS[1]);
        assert_eq!(
            polyline.points,
            vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]
        );

        surface.remove_polyline(route);
        surface.append_polyline_point(route, GeoPoint::new(0.0, 2.0));
        assert_eq!(surface.counters().stale_operations, 1);
    }

    #[test]
    fn moving_a_live_marker_updates_its_position() {
        let mut surface = HeadlessSurface::new();
        let marker = surface.render_marker(GeoPoint::new(0.0, 0.0));
        surface.update_marker_position(marker, GeoPoint::new(0.0, 0.5));

        assert_eq!(surface.marker_position(marker), Some(GeoPoint::new(0.0, 0.5)));
        assert_eq!(surface.counters().marker_moves, 1);
    }

    #[test]
    fn clicks_drain_in_arrival_order() {
        let mut surface = HeadlessSurface::new();
        surface.push_click(GeoPoint::new(0.0, 0.0));
        surface.push_click(GeoPoint::new(1.0, 1.0));
        assert_eq!(surface.pending_clicks(), 2);

        assert_eq!(surface.take_click(), Some(GeoPoint::new(0.0, 0.0)));
        assert_eq!(surface.take_click(), Some(GeoPoint::new(1.0, 1.0)));
        assert_eq!(surface.take_click(), None);
    }

    #[test]
    fn distance_defaults_to_the_haversine_metric() {
        let surface = HeadlessSurface::new();
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        assert_eq!(surface.measure_distance(a, b), haversine_meters(a, b));
    }
}

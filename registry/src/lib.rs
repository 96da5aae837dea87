#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative equipment registry for Fleet Sim.
//!
//! The [`Registry`] owns every equipment in a session: its path, its motion
//! controller, and the handles of the artifacts it has drawn on the map
//! surface. Adapters and systems never reach into that state directly; they
//! submit [`Command`] values through [`apply`], observe the [`Event`] values
//! the registry publishes, and read snapshots through [`query`]. The
//! registry is the single place where the rendering collaborator is invoked,
//! so every artifact is created and removed exactly once.

mod interpolate;
mod motion;
mod path;

use fleetsim_core::{
    haversine_meters, CaptureId, Command, DistanceFn, EquipmentId, Event, GeoPoint, MapSurface,
    MarkerHandle, PolylineHandle, RouteColor, UnknownEquipmentError, WELCOME_BANNER,
};

use crate::{motion::MotionController, path::PathModel};

/// Progress gained per motion tick by default.
pub const DEFAULT_PROGRESS_STEP: f64 = 0.001;

/// Authoritative owner of the equipment collection.
#[derive(Debug)]
pub struct Registry {
    banner: &'static str,
    equipments: Vec<Equipment>,
    next_equipment: u32,
    next_capture: u64,
    progress_step: f64,
    measure: DistanceFn,
}

/// One equipment record: identity, route, motion state, and the rendered
/// artifacts the registry is responsible for removing again.
#[derive(Debug)]
struct Equipment {
    id: EquipmentId,
    color: RouteColor,
    path: PathModel,
    motion: MotionController,
    marker: Option<MarkerHandle>,
    polyline: PolylineHandle,
    waypoint_markers: Vec<MarkerHandle>,
    pending_capture: Option<CaptureId>,
    last_position: Option<GeoPoint>,
}

impl Registry {
    /// Creates an empty registry with the default tick step and the
    /// haversine distance function.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            equipments: Vec::new(),
            next_equipment: 1,
            next_capture: 1,
            progress_step: DEFAULT_PROGRESS_STEP,
            measure: haversine_meters,
        }
    }

    /// Overrides the progress gained per motion tick.
    ///
    /// Intended for construction time, before any motion starts.
    #[must_use]
    pub fn with_progress_step(mut self, step: f64) -> Self {
        self.progress_step = step;
        self
    }

    /// Substitutes the collaborator's distance function for the default
    /// haversine metric.
    ///
    /// Intended for construction time, before any waypoint is appended;
    /// cumulative route lengths are measured with the function that was
    /// active at append time.
    #[must_use]
    pub fn with_distance_fn(mut self, measure: DistanceFn) -> Self {
        self.measure = measure;
        self
    }

    fn equipment_mut(&mut self, id: EquipmentId) -> Option<&mut Equipment> {
        self.equipments
            .iter_mut()
            .find(|equipment| equipment.id == id)
    }

    fn equipment_index(&self, id: EquipmentId) -> Option<usize> {
        self.equipments
            .iter()
            .position(|equipment| equipment.id == id)
    }

    fn add_equipment<S>(&mut self, surface: &mut S, out_events: &mut Vec<Event>)
    where
        S: MapSurface,
    {
        let id = EquipmentId::new(self.next_equipment);
        self.next_equipment += 1;

        let color = RouteColor::for_equipment(id);
        let polyline = surface.render_polyline(color);
        self.equipments.push(Equipment {
            id,
            color,
            path: PathModel::new(),
            motion: MotionController::new(),
            marker: None,
            polyline,
            waypoint_markers: Vec::new(),
            pending_capture: None,
            last_position: None,
        });
        out_events.push(Event::EquipmentAdded {
            equipment: id,
            color,
        });
    }

    fn append_waypoint<S>(
        &mut self,
        surface: &mut S,
        id: EquipmentId,
        point: GeoPoint,
        out_events: &mut Vec<Event>,
    ) where
        S: MapSurface,
    {
        let measure = self.measure;
        let Some(equipment) = self.equipment_mut(id) else {
            out_events.push(missing(id));
            return;
        };

        equipment.path.append(point, measure);
        let pin = surface.render_marker(point);
        equipment.waypoint_markers.push(pin);
        surface.append_polyline_point(equipment.polyline, point);

        out_events.push(Event::WaypointAppended {
            equipment: id,
            point,
            waypoint_count: equipment.path.waypoint_count(),
            path_meters: equipment.path.total_meters(),
        });
    }

    fn request_waypoint(&mut self, id: EquipmentId, out_events: &mut Vec<Event>) {
        let Some(index) = self.equipment_index(id) else {
            out_events.push(missing(id));
            return;
        };
        if self.equipments[index].pending_capture.is_some() {
            // One ticket per equipment; the original registration stays.
            return;
        }

        let capture = CaptureId::new(self.next_capture);
        self.next_capture += 1;
        self.equipments[index].pending_capture = Some(capture);
        out_events.push(Event::CaptureArmed {
            capture,
            equipment: id,
        });
    }

    fn complete_capture<S>(
        &mut self,
        surface: &mut S,
        capture: CaptureId,
        point: GeoPoint,
        out_events: &mut Vec<Event>,
    ) where
        S: MapSurface,
    {
        let ticket_holder = self
            .equipments
            .iter()
            .find(|equipment| equipment.pending_capture == Some(capture))
            .map(|equipment| equipment.id);
        let Some(id) = ticket_holder else {
            // The ticket was cancelled with its equipment; a late
            // resolution must not append anywhere else.
            return;
        };

        if let Some(equipment) = self.equipment_mut(id) {
            equipment.pending_capture = None;
        }
        self.append_waypoint(surface, id, point, out_events);
    }

    fn start_motion<S>(&mut self, surface: &mut S, id: EquipmentId, out_events: &mut Vec<Event>)
    where
        S: MapSurface,
    {
        let Some(equipment) = self.equipment_mut(id) else {
            out_events.push(missing(id));
            return;
        };

        match equipment.motion.start(equipment.path.waypoint_count()) {
            Err(error) => out_events.push(Event::MotionRejected {
                equipment: id,
                error,
            }),
            Ok(false) => {}
            Ok(true) => {
                if equipment.marker.is_none() {
                    if let Some(first) = equipment.path.first_waypoint() {
                        equipment.marker = Some(surface.render_marker(first));
                        equipment.last_position = Some(first);
                    }
                }
                out_events.push(Event::MotionStarted {
                    equipment: id,
                    progress: equipment.motion.progress(),
                });
            }
        }
    }

    fn stop_motion(&mut self, id: EquipmentId, out_events: &mut Vec<Event>) {
        let Some(equipment) = self.equipment_mut(id) else {
            out_events.push(missing(id));
            return;
        };
        if equipment.motion.stop() {
            out_events.push(Event::MotionStopped {
                equipment: id,
                progress: equipment.motion.progress(),
            });
        }
    }

    fn advance_motion<S>(&mut self, surface: &mut S, id: EquipmentId, out_events: &mut Vec<Event>)
    where
        S: MapSurface,
    {
        let step = self.progress_step;
        let Some(equipment) = self.equipment_mut(id) else {
            // Stale tick for removed equipment; the scheduler drops it.
            return;
        };
        let Some(progress) = equipment.motion.advance(step) else {
            // Stale tick observing a state that left Moving; not an error.
            return;
        };

        match interpolate::position_at(&equipment.path, progress) {
            Ok(position) => {
                if let Some(marker) = equipment.marker {
                    surface.update_marker_position(marker, position);
                }
                equipment.last_position = Some(position);
                out_events.push(Event::EquipmentMoved {
                    equipment: id,
                    position,
                    progress,
                });
            }
            Err(error) => {
                // Paths never shrink, so this cannot happen through the
                // public surface. Halt this equipment and say so; the rest
                // of the fleet keeps moving.
                equipment.motion.halt();
                out_events.push(Event::MotionFaulted {
                    equipment: id,
                    error,
                });
            }
        }
    }

    fn remove_equipment<S>(&mut self, surface: &mut S, id: EquipmentId, out_events: &mut Vec<Event>)
    where
        S: MapSurface,
    {
        let Some(index) = self.equipment_index(id) else {
            out_events.push(missing(id));
            return;
        };
        let equipment = self.equipments.remove(index);
        release_artifacts(equipment, surface, out_events);
        out_events.push(Event::EquipmentRemoved { equipment: id });
    }

    fn stop_all(&mut self, out_events: &mut Vec<Event>) {
        let mut stopped = 0;
        for equipment in &mut self.equipments {
            if equipment.motion.stop() {
                out_events.push(Event::MotionStopped {
                    equipment: equipment.id,
                    progress: equipment.motion.progress(),
                });
                stopped += 1;
            }
        }
        out_events.push(Event::AllStopped { stopped });
    }

    fn reset_all<S>(&mut self, surface: &mut S, out_events: &mut Vec<Event>)
    where
        S: MapSurface,
    {
        let removed = self.equipments.len() as u32;
        for equipment in self.equipments.drain(..) {
            let id = equipment.id;
            release_artifacts(equipment, surface, out_events);
            out_events.push(Event::EquipmentRemoved { equipment: id });
        }
        out_events.push(Event::FleetCleared { removed });
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a command to the registry, emitting events describing every
/// mutation and calling the map surface for artifacts that appear, move, or
/// disappear.
pub fn apply<S>(
    registry: &mut Registry,
    surface: &mut S,
    command: Command,
    out_events: &mut Vec<Event>,
) where
    S: MapSurface,
{
    match command {
        Command::AddEquipment => registry.add_equipment(surface, out_events),
        Command::AppendWaypoint { equipment, point } => {
            registry.append_waypoint(surface, equipment, point, out_events);
        }
        Command::RequestWaypoint { equipment } => {
            registry.request_waypoint(equipment, out_events);
        }
        Command::CompleteCapture { capture, point } => {
            registry.complete_capture(surface, capture, point, out_events);
        }
        Command::StartMotion { equipment } => {
            registry.start_motion(surface, equipment, out_events);
        }
        Command::StopMotion { equipment } => registry.stop_motion(equipment, out_events),
        Command::AdvanceMotion { equipment } => {
            registry.advance_motion(surface, equipment, out_events);
        }
        Command::RemoveEquipment { equipment } => {
            registry.remove_equipment(surface, equipment, out_events);
        }
        Command::StopAll => registry.stop_all(out_events),
        Command::ResetAll => registry.reset_all(surface, out_events),
    }
}

/// Releases every artifact one equipment has drawn. Consumes the record, so
/// a handle can never be released twice.
fn release_artifacts<S>(equipment: Equipment, surface: &mut S, out_events: &mut Vec<Event>)
where
    S: MapSurface,
{
    if let Some(capture) = equipment.pending_capture {
        out_events.push(Event::CaptureCancelled {
            capture,
            equipment: equipment.id,
        });
    }
    if let Some(marker) = equipment.marker {
        surface.remove_marker(marker);
    }
    for pin in equipment.waypoint_markers {
        surface.remove_marker(pin);
    }
    surface.remove_polyline(equipment.polyline);
}

fn missing(equipment: EquipmentId) -> Event {
    Event::EquipmentMissing {
        error: UnknownEquipmentError { equipment },
    }
}

/// Read-only access to registry state.
pub mod query {
    use fleetsim_core::{
        CaptureId, EquipmentId, GeoPoint, MotionState, Progress, RouteColor,
        UnknownEquipmentError,
    };

    use crate::{Equipment, Registry};

    /// Point-in-time description of one equipment.
    #[derive(Clone, Debug, PartialEq)]
    pub struct EquipmentSnapshot {
        /// Identifier of the equipment.
        pub id: EquipmentId,
        /// Palette color styling its route polyline.
        pub color: RouteColor,
        /// Current motion state.
        pub state: MotionState,
        /// Fraction of the route traversed.
        pub progress: Progress,
        /// Number of waypoints in the route.
        pub waypoint_count: u32,
        /// Total route length in meters.
        pub path_meters: f64,
        /// Last rendered position, if the equipment has ever been placed.
        pub position: Option<GeoPoint>,
        /// Capture ticket waiting for a map click, if one is armed.
        pub pending_capture: Option<CaptureId>,
    }

    /// Ordered snapshots of every equipment in the registry.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct FleetView {
        snapshots: Vec<EquipmentSnapshot>,
    }

    impl FleetView {
        /// Snapshots sorted by equipment id.
        #[must_use]
        pub fn snapshots(&self) -> &[EquipmentSnapshot] {
            &self.snapshots
        }

        /// Consumes the view, yielding the sorted snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EquipmentSnapshot> {
            self.snapshots
        }

        /// Number of equipment captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Whether the registry held no equipment at capture time.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }
    }

    /// Aggregate statistics across the whole fleet.
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct FleetTotals {
        /// Number of equipment in the registry.
        pub equipment_count: u32,
        /// Waypoints across every route.
        pub waypoint_count: u32,
        /// Combined route length in meters.
        pub route_meters: f64,
    }

    /// Captures a sorted snapshot of every equipment.
    #[must_use]
    pub fn fleet_view(registry: &Registry) -> FleetView {
        let mut snapshots: Vec<EquipmentSnapshot> =
            registry.equipments.iter().map(snapshot_of).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        FleetView { snapshots }
    }

    /// Looks up one equipment by id.
    pub fn find(
        registry: &Registry,
        equipment: EquipmentId,
    ) -> Result<EquipmentSnapshot, UnknownEquipmentError> {
        registry
            .equipments
            .iter()
            .find(|candidate| candidate.id == equipment)
            .map(snapshot_of)
            .ok_or(UnknownEquipmentError { equipment })
    }

    /// Sums the per-equipment statistics the UI displays.
    #[must_use]
    pub fn fleet_totals(registry: &Registry) -> FleetTotals {
        let mut totals = FleetTotals::default();
        for equipment in &registry.equipments {
            totals.equipment_count += 1;
            totals.waypoint_count += equipment.path.waypoint_count();
            totals.route_meters += equipment.path.total_meters();
        }
        totals
    }

    /// Retrieves the banner adapters may display on startup.
    #[must_use]
    pub fn welcome_banner(registry: &Registry) -> &'static str {
        registry.banner
    }

    /// Progress gained by one motion tick.
    #[must_use]
    pub fn progress_step(registry: &Registry) -> f64 {
        registry.progress_step
    }

    fn snapshot_of(equipment: &Equipment) -> EquipmentSnapshot {
        EquipmentSnapshot {
            id: equipment.id,
            color: equipment.color,
            state: equipment.motion.state(),
            progress: equipment.motion.progress(),
            waypoint_count: equipment.path.waypoint_count(),
            path_meters: equipment.path.total_meters(),
            position: equipment.last_position,
            pending_capture: equipment.pending_capture,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsim_core::{InsufficientWaypointsError, MotionState, Progress};

    struct NullSurface {
        next_handle: u64,
    }

    impl NullSurface {
        fn new() -> Self {
            Self { next_handle: 1 }
        }

        fn next(&mut self) -> u64 {
            let handle = self.next_handle;
            self.next_handle += 1;
            handle
        }
    }

    impl MapSurface for NullSurface {
        fn render_marker(&mut self, _position: GeoPoint) -> MarkerHandle {
            MarkerHandle::new(self.next())
        }

        fn update_marker_position(&mut self, _marker: MarkerHandle, _position: GeoPoint) {}

        fn remove_marker(&mut self, _marker: MarkerHandle) {}

        fn render_polyline(&mut self, _color: RouteColor) -> PolylineHandle {
            PolylineHandle::new(self.next())
        }

        fn append_polyline_point(&mut self, _polyline: PolylineHandle, _position: GeoPoint) {}

        fn remove_polyline(&mut self, _polyline: PolylineHandle) {}

        fn take_click(&mut self) -> Option<GeoPoint> {
            None
        }
    }

    fn planar_thousandths(from: GeoPoint, to: GeoPoint) -> f64 {
        let lat = to.latitude() - from.latitude();
        let lon = to.longitude() - from.longitude();
        (lat * lat + lon * lon).sqrt() * 1_000.0
    }

    fn added_id(events: &[Event]) -> EquipmentId {
        events
            .iter()
            .find_map(|event| match event {
                Event::EquipmentAdded { equipment, .. } => Some(*equipment),
                _ => None,
            })
            .expect("an equipment should have been added")
    }

    fn add_equipment(registry: &mut Registry, surface: &mut NullSurface) -> EquipmentId {
        let mut events = Vec::new();
        apply(registry, surface, Command::AddEquipment, &mut events);
        added_id(&events)
    }

    #[test]
    fn identifiers_are_sequential_and_never_reused() {
        let mut registry = Registry::new();
        let mut surface = NullSurface::new();

        let first = add_equipment(&mut registry, &mut surface);
        let second = add_equipment(&mut registry, &mut surface);
        let third = add_equipment(&mut registry, &mut surface);
        assert_eq!(
            (first.get(), second.get(), third.get()),
            (1, 2, 3),
            "identifiers count up from 1"
        );

        let mut events = Vec::new();
        apply(
            &mut registry,
            &mut surface,
            Command::RemoveEquipment { equipment: second },
            &mut events,
        );

        let fourth = add_equipment(&mut registry, &mut surface);
        assert_eq!(fourth.get(), 4, "removed identifiers stay retired");

        let ids: Vec<u32> = query::fleet_view(&registry)
            .snapshots()
            .iter()
            .map(|snapshot| snapshot.id.get())
            .collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn welcome_banner_is_exposed_to_adapters() {
        let registry = Registry::new();
        assert_eq!(
            query::welcome_banner(&registry),
            fleetsim_core::WELCOME_BANNER
        );
    }

    #[test]
    fn progress_step_reflects_the_builder() {
        assert_eq!(query::progress_step(&Registry::new()), DEFAULT_PROGRESS_STEP);

        let tuned = Registry::new().with_progress_step(0.25);
        assert_eq!(query::progress_step(&tuned), 0.25);
    }

    #[test]
    fn appended_waypoints_report_count_and_length() {
        let mut registry = Registry::new().with_distance_fn(planar_thousandths);
        let mut surface = NullSurface::new();
        let id = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        apply(
            &mut registry,
            &mut surface,
            Command::AppendWaypoint {
                equipment: id,
                point: GeoPoint::new(0.0, 0.0),
            },
            &mut events,
        );
        apply(
            &mut registry,
            &mut surface,
            Command::AppendWaypoint {
                equipment: id,
                point: GeoPoint::new(0.0, 2.0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::WaypointAppended {
                    equipment: id,
                    point: GeoPoint::new(0.0, 0.0),
                    waypoint_count: 1,
                    path_meters: 0.0,
                },
                Event::WaypointAppended {
                    equipment: id,
                    point: GeoPoint::new(0.0, 2.0),
                    waypoint_count: 2,
                    path_meters: 2_000.0,
                },
            ]
        );

        let snapshot = query::find(&registry, id).expect("equipment exists");
        assert_eq!(snapshot.waypoint_count, 2);
        assert_eq!(snapshot.path_meters, 2_000.0);
    }

    #[test]
    fn start_with_one_waypoint_is_rejected_and_stays_idle() {
        let mut registry = Registry::new();
        let mut surface = NullSurface::new();
        let id = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        apply(
            &mut registry,
            &mut surface,
            Command::AppendWaypoint {
                equipment: id,
                point: GeoPoint::new(0.0, 0.0),
            },
            &mut events,
        );

        events.clear();
        apply(
            &mut registry,
            &mut surface,
            Command::StartMotion { equipment: id },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::MotionRejected {
                equipment: id,
                error: InsufficientWaypointsError { found: 1 },
            }]
        );

        let snapshot = query::find(&registry, id).expect("equipment exists");
        assert_eq!(snapshot.state, MotionState::Idle);
        assert_eq!(snapshot.progress, Progress::ZERO);
        assert_eq!(snapshot.position, None, "no marker appears on a rejected start");
    }

    #[test]
    fn arming_twice_keeps_the_original_ticket() {
        let mut registry = Registry::new();
        let mut surface = NullSurface::new();
        let id = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        apply(
            &mut registry,
            &mut surface,
            Command::RequestWaypoint { equipment: id },
            &mut events,
        );
        let ticket = match events.as_slice() {
            [Event::CaptureArmed { capture, equipment }] if *equipment == id => *capture,
            other => panic!("expected a single CaptureArmed event, got {other:?}"),
        };
        assert_eq!(ticket.get(), 1, "tickets are numbered from 1");

        events.clear();
        apply(
            &mut registry,
            &mut surface,
            Command::RequestWaypoint { equipment: id },
            &mut events,
        );
        assert!(events.is_empty(), "re-arming is silent");

        let snapshot = query::find(&registry, id).expect("equipment exists");
        assert_eq!(snapshot.pending_capture, Some(ticket));
    }

    #[test]
    fn capture_resolution_appends_to_the_requesting_equipment() {
        let mut registry = Registry::new().with_distance_fn(planar_thousandths);
        let mut surface = NullSurface::new();
        let id = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        apply(
            &mut registry,
            &mut surface,
            Command::RequestWaypoint { equipment: id },
            &mut events,
        );
        let ticket = match events.as_slice() {
            [Event::CaptureArmed { capture, .. }] => *capture,
            other => panic!("expected CaptureArmed, got {other:?}"),
        };

        events.clear();
        let point = GeoPoint::new(-2.8, 104.8);
        apply(
            &mut registry,
            &mut surface,
            Command::CompleteCapture {
                capture: ticket,
                point,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::WaypointAppended {
                equipment: id,
                point,
                waypoint_count: 1,
                path_meters: 0.0,
            }]
        );

        let snapshot = query::find(&registry, id).expect("equipment exists");
        assert_eq!(snapshot.pending_capture, None, "tickets resolve exactly once");
    }

    #[test]
    fn late_capture_resolution_is_ignored() {
        let mut registry = Registry::new();
        let mut surface = NullSurface::new();
        let id = add_equipment(&mut registry, &mut surface);
        let bystander = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        apply(
            &mut registry,
            &mut surface,
            Command::RequestWaypoint { equipment: id },
            &mut events,
        );
        let ticket = match events.as_slice() {
            [Event::CaptureArmed { capture, .. }] => *capture,
            other => panic!("expected CaptureArmed, got {other:?}"),
        };

        events.clear();
        apply(
            &mut registry,
            &mut surface,
            Command::RemoveEquipment { equipment: id },
            &mut events,
        );
        assert_eq!(
            events,
            vec![
                Event::CaptureCancelled {
                    capture: ticket,
                    equipment: id,
                },
                Event::EquipmentRemoved { equipment: id },
            ]
        );

        events.clear();
        apply(
            &mut registry,
            &mut surface,
            Command::CompleteCapture {
                capture: ticket,
                point: GeoPoint::new(1.0, 1.0),
            },
            &mut events,
        );
        assert!(events.is_empty(), "cancelled tickets resolve nowhere");

        let snapshot = query::find(&registry, bystander).expect("equipment exists");
        assert_eq!(
            snapshot.waypoint_count, 0,
            "late clicks must not leak into other equipment"
        );
    }

    #[test]
    fn unknown_identifiers_surface_missing_events() {
        let mut registry = Registry::new();
        let mut surface = NullSurface::new();
        let ghost = EquipmentId::new(99);

        let commands = vec![
            Command::AppendWaypoint {
                equipment: ghost,
                point: GeoPoint::new(0.0, 0.0),
            },
            Command::RequestWaypoint { equipment: ghost },
            Command::StartMotion { equipment: ghost },
            Command::StopMotion { equipment: ghost },
            Command::RemoveEquipment { equipment: ghost },
        ];
        for command in commands {
            let mut events = Vec::new();
            apply(&mut registry, &mut surface, command, &mut events);
            assert_eq!(
                events,
                vec![Event::EquipmentMissing {
                    error: UnknownEquipmentError { equipment: ghost },
                }]
            );
        }
    }

    #[test]
    fn stale_ticks_are_silent() {
        let mut registry = Registry::new();
        let mut surface = NullSurface::new();
        let id = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        apply(
            &mut registry,
            &mut surface,
            Command::AdvanceMotion { equipment: id },
            &mut events,
        );
        apply(
            &mut registry,
            &mut surface,
            Command::AdvanceMotion {
                equipment: EquipmentId::new(99),
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn stop_all_only_touches_moving_equipment() {
        let mut registry = Registry::new().with_progress_step(0.25);
        let mut surface = NullSurface::new();

        let _idle = add_equipment(&mut registry, &mut surface);
        let moving = add_equipment(&mut registry, &mut surface);
        let stopped = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        for id in [moving, stopped] {
            for lon in [0.0, 1.0] {
                apply(
                    &mut registry,
                    &mut surface,
                    Command::AppendWaypoint {
                        equipment: id,
                        point: GeoPoint::new(0.0, lon),
                    },
                    &mut events,
                );
            }
            apply(
                &mut registry,
                &mut surface,
                Command::StartMotion { equipment: id },
                &mut events,
            );
        }
        apply(
            &mut registry,
            &mut surface,
            Command::StopMotion { equipment: stopped },
            &mut events,
        );

        events.clear();
        apply(&mut registry, &mut surface, Command::StopAll, &mut events);
        assert_eq!(
            events,
            vec![
                Event::MotionStopped {
                    equipment: moving,
                    progress: Progress::ZERO,
                },
                Event::AllStopped { stopped: 1 },
            ]
        );

        let view = query::fleet_view(&registry);
        let states: Vec<MotionState> = view
            .snapshots()
            .iter()
            .map(|snapshot| snapshot.state)
            .collect();
        assert_eq!(
            states,
            vec![MotionState::Idle, MotionState::Stopped, MotionState::Stopped]
        );
    }

    #[test]
    fn totals_aggregate_across_the_whole_fleet() {
        let mut registry = Registry::new().with_distance_fn(planar_thousandths);
        let mut surface = NullSurface::new();

        let first = add_equipment(&mut registry, &mut surface);
        let second = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        for (id, lons) in [(first, [0.0, 1.0]), (second, [0.0, 3.0])] {
            for lon in lons {
                apply(
                    &mut registry,
                    &mut surface,
                    Command::AppendWaypoint {
                        equipment: id,
                        point: GeoPoint::new(0.0, lon),
                    },
                    &mut events,
                );
            }
        }

        let totals = query::fleet_totals(&registry);
        assert_eq!(totals.equipment_count, 2);
        assert_eq!(totals.waypoint_count, 4);
        assert_eq!(totals.route_meters, 4_000.0);
    }

    #[test]
    fn reset_all_clears_the_collection() {
        let mut registry = Registry::new();
        let mut surface = NullSurface::new();
        let first = add_equipment(&mut registry, &mut surface);
        let second = add_equipment(&mut registry, &mut surface);

        let mut events = Vec::new();
        apply(&mut registry, &mut surface, Command::ResetAll, &mut events);
        assert_eq!(
            events,
            vec![
                Event::EquipmentRemoved { equipment: first },
                Event::EquipmentRemoved { equipment: second },
                Event::FleetCleared { removed: 2 },
            ]
        );
        assert!(query::fleet_view(&registry).is_empty());

        let next = add_equipment(&mut registry, &mut surface);
        assert_eq!(next.get(), 3, "reset does not recycle identifiers");
    }
}

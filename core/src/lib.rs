#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared contracts for the Fleet Sim workspace.
//!
//! The crate defines the vocabulary every other crate speaks: identifier
//! newtypes, geographic coordinates and distance math, the normalized
//! progress fraction, the [`Command`] and [`Event`] message surface, the
//! error taxonomy, and the [`MapSurface`] collaborator trait through which
//! markers and route polylines are drawn and user clicks are captured.
//! Nothing in here owns equipment state; the registry crate does.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Welcome to Fleet Sim.";

/// Smallest number of waypoints a path needs before motion can start.
pub const MIN_ANIMATABLE_WAYPOINTS: u32 = 2;

/// Identifier assigned to every equipment that joins the registry.
///
/// Identifiers are allocated sequentially starting at 1 and are never reused
/// within a session, including after the owning equipment is removed.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EquipmentId(u32);

impl EquipmentId {
    /// Creates an identifier from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single-use ticket pairing one armed click capture with the equipment
/// that requested it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CaptureId(u64);

impl CaptureId {
    /// Creates a ticket from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value backing the ticket.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Geographic coordinate in decimal degrees.
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180]; values
/// outside those ranges are a caller error and are not validated here.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct GeoPoint {
    lat: f64,
    lon: f64,
}

impl GeoPoint {
    /// Creates a coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.lon
    }

    /// Linearly interpolates between `self` and `toward`.
    ///
    /// `fraction` 0 yields `self`, 1 yields `toward`. Interpolation is
    /// performed independently on latitude and longitude, which is accurate
    /// at the segment lengths route paths are built from.
    #[must_use]
    pub fn lerp(self, toward: GeoPoint, fraction: f64) -> GeoPoint {
        GeoPoint::new(
            self.lat + (toward.lat - self.lat) * fraction,
            self.lon + (toward.lon - self.lon) * fraction,
        )
    }
}

/// Mean Earth radius in meters (IUGG), the radius used by the default
/// geodesic distance function.
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Measures the great-circle distance between two coordinates in meters
/// using the haversine formula.
#[must_use]
pub fn haversine_meters(from: GeoPoint, to: GeoPoint) -> f64 {
    let from_lat = from.latitude().to_radians();
    let to_lat = to.latitude().to_radians();
    let delta_lat = (to.latitude() - from.latitude()).to_radians();
    let delta_lon = (to.longitude() - from.longitude()).to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + from_lat.cos() * to_lat.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push the sum past 1 for near-antipodal pairs, and asin
    // returns NaN outside [-1, 1].
    let central_angle = 2.0 * half_chord.min(1.0).sqrt().asin();

    EARTH_RADIUS_METERS * central_angle
}

/// Distance function supplied by the rendering collaborator.
///
/// Defaults to [`haversine_meters`]; a collaborator working in a projected
/// planar space can substitute its own metric.
pub type DistanceFn = fn(GeoPoint, GeoPoint) -> f64;

/// Normalized fraction of total path length traversed, in [0, 1].
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, PartialOrd, Serialize)]
pub struct Progress(f64);

impl Progress {
    /// Progress at the start of a path.
    pub const ZERO: Progress = Progress(0.0);

    /// Creates a progress value, clamping the input into [0, 1].
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the raw fraction.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// Advances progress by `step`, wrapping to 0 once the sum exceeds 1.
    ///
    /// Progress may rest at exactly 1 for a single tick (the path end); the
    /// following advance wraps it, so playback loops instead of halting.
    #[must_use]
    pub fn advanced_by(self, step: f64) -> Self {
        let next = self.0 + step;
        if next > 1.0 {
            Self(0.0)
        } else {
            Self(next)
        }
    }
}

/// Lifecycle state of one equipment's motion playback.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum MotionState {
    /// Never started, or reset.
    Idle,
    /// Actively advancing progress each frame.
    Moving,
    /// Paused with progress and marker position retained.
    Stopped,
}

/// RGB color styling one equipment's route polyline.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RouteColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RouteColor {
    /// Creates a color from its RGB channels.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Picks the palette color for an equipment, cycling by identifier.
    #[must_use]
    pub fn for_equipment(equipment: EquipmentId) -> Self {
        let index = equipment.get().saturating_sub(1) as usize % ROUTE_COLORS.len();
        ROUTE_COLORS[index]
    }
}

/// Fixed palette cycled across equipment routes.
pub const ROUTE_COLORS: [RouteColor; 5] = [
    RouteColor::new(231, 76, 60),
    RouteColor::new(52, 152, 219),
    RouteColor::new(46, 204, 113),
    RouteColor::new(243, 156, 18),
    RouteColor::new(155, 89, 182),
];

/// Handle naming one rendered marker on the map surface.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value backing the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Handle naming one rendered route polyline on the map surface.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PolylineHandle(u64);

impl PolylineHandle {
    /// Creates a handle from a raw value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value backing the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Rendering and capture collaborator shared by all equipment.
///
/// The registry calls it to draw and erase artifacts; the capture system
/// drains clicks from it. Every artifact is addressed by the handle the
/// surface returned when the artifact was rendered, and whoever rendered an
/// artifact is responsible for removing that exact artifact.
pub trait MapSurface {
    /// Renders a marker at `position` and returns its handle.
    fn render_marker(&mut self, position: GeoPoint) -> MarkerHandle;

    /// Moves a rendered marker to `position`.
    fn update_marker_position(&mut self, marker: MarkerHandle, position: GeoPoint);

    /// Removes a rendered marker.
    fn remove_marker(&mut self, marker: MarkerHandle);

    /// Renders an empty route polyline styled with `color` and returns its
    /// handle.
    fn render_polyline(&mut self, color: RouteColor) -> PolylineHandle;

    /// Appends `position` to a rendered polyline.
    fn append_polyline_point(&mut self, polyline: PolylineHandle, position: GeoPoint);

    /// Removes a rendered polyline.
    fn remove_polyline(&mut self, polyline: PolylineHandle);

    /// Yields the next user-selected coordinate, if one is available.
    fn take_click(&mut self) -> Option<GeoPoint>;

    /// Measures the geodesic distance between two coordinates in meters.
    fn measure_distance(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        haversine_meters(from, to)
    }
}

/// Instructions adapters and systems submit to the registry.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Command {
    /// Creates a new equipment with an empty path and an idle controller.
    AddEquipment,
    /// Appends a waypoint directly to an equipment's path.
    AppendWaypoint {
        /// Equipment whose path grows.
        equipment: EquipmentId,
        /// Coordinate appended to the path.
        point: GeoPoint,
    },
    /// Arms a one-shot capture: the next map click becomes a waypoint for
    /// the requesting equipment.
    RequestWaypoint {
        /// Equipment the captured coordinate will belong to.
        equipment: EquipmentId,
    },
    /// Resolves an armed capture ticket with the captured coordinate.
    CompleteCapture {
        /// Ticket being resolved.
        capture: CaptureId,
        /// Coordinate the user selected.
        point: GeoPoint,
    },
    /// Starts or resumes motion playback for one equipment.
    StartMotion {
        /// Equipment to set in motion.
        equipment: EquipmentId,
    },
    /// Pauses motion playback for one equipment.
    StopMotion {
        /// Equipment to pause.
        equipment: EquipmentId,
    },
    /// Executes one scheduled motion tick for one equipment.
    AdvanceMotion {
        /// Equipment whose progress advances.
        equipment: EquipmentId,
    },
    /// Removes one equipment together with its rendered artifacts.
    RemoveEquipment {
        /// Equipment to remove.
        equipment: EquipmentId,
    },
    /// Pauses every equipment that is currently moving.
    StopAll,
    /// Removes every equipment and clears the registry.
    ResetAll,
}

/// Facts the registry publishes after applying commands.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Event {
    /// A new equipment joined the registry.
    EquipmentAdded {
        /// Identifier assigned to the equipment.
        equipment: EquipmentId,
        /// Palette color styling its route.
        color: RouteColor,
    },
    /// A waypoint was appended to an equipment's path.
    WaypointAppended {
        /// Equipment whose path grew.
        equipment: EquipmentId,
        /// Coordinate that was appended.
        point: GeoPoint,
        /// Waypoint count after the append.
        waypoint_count: u32,
        /// Total route length in meters after the append.
        path_meters: f64,
    },
    /// A capture ticket was armed for an equipment.
    CaptureArmed {
        /// Ticket that will resolve with the next click.
        capture: CaptureId,
        /// Equipment the ticket belongs to.
        equipment: EquipmentId,
    },
    /// A pending capture ticket was cancelled before it resolved.
    CaptureCancelled {
        /// Ticket that was cancelled.
        capture: CaptureId,
        /// Equipment the ticket belonged to.
        equipment: EquipmentId,
    },
    /// Motion playback began or resumed.
    MotionStarted {
        /// Equipment that started moving.
        equipment: EquipmentId,
        /// Progress the playback resumes from.
        progress: Progress,
    },
    /// A start request was refused.
    MotionRejected {
        /// Equipment whose start was refused.
        equipment: EquipmentId,
        /// Why the start was refused.
        error: InsufficientWaypointsError,
    },
    /// Motion playback paused.
    MotionStopped {
        /// Equipment that stopped.
        equipment: EquipmentId,
        /// Progress retained while paused.
        progress: Progress,
    },
    /// A motion tick moved an equipment to a new position.
    EquipmentMoved {
        /// Equipment that moved.
        equipment: EquipmentId,
        /// Interpolated position after the tick.
        position: GeoPoint,
        /// Progress after the tick.
        progress: Progress,
    },
    /// A motion tick violated the path invariant and the equipment halted.
    MotionFaulted {
        /// Equipment that halted.
        equipment: EquipmentId,
        /// Invariant violation the interpolator reported.
        error: InvalidPathError,
    },
    /// An equipment left the registry.
    EquipmentRemoved {
        /// Equipment that was removed.
        equipment: EquipmentId,
    },
    /// A command referenced an equipment id the registry does not know.
    EquipmentMissing {
        /// The failed lookup.
        error: UnknownEquipmentError,
    },
    /// Every moving equipment was paused.
    AllStopped {
        /// How many equipment transitioned to stopped.
        stopped: u32,
    },
    /// The registry was cleared.
    FleetCleared {
        /// How many equipment were removed.
        removed: u32,
    },
}

/// Error raised when motion is requested for a path that is too short.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, Hash, PartialEq, Serialize)]
#[error(
    "equipment needs at least {} waypoints to start moving (found {found})",
    MIN_ANIMATABLE_WAYPOINTS
)]
pub struct InsufficientWaypointsError {
    /// Waypoints the path held when the start was requested.
    pub found: u32,
}

/// Error raised when interpolation is attempted on a non-animatable path.
///
/// Reaching this after a successful start is an invariant violation: starts
/// validate waypoint count and paths never shrink.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, Hash, PartialEq, Serialize)]
#[error("a path with {found} waypoint(s) cannot be interpolated")]
pub struct InvalidPathError {
    /// Waypoints the path held when interpolation was attempted.
    pub found: u32,
}

/// Error raised when a command references an unknown equipment id.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Error, Hash, PartialEq, Serialize)]
#[error("equipment {equipment} does not exist")]
pub struct UnknownEquipmentError {
    /// Identifier that failed to resolve.
    pub equipment: EquipmentId,
}

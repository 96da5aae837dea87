//! Operator-facing status lines derived from registry events.
//!
//! The status line is free text under a single writer, so wording can change
//! without breaking callers. Motion telemetry stays silent; a line per tick
//! would make the status unreadable.

use fleetsim_core::{Event, MIN_ANIMATABLE_WAYPOINTS};

/// Formats the status line a registry event should show the operator.
///
/// Returns `None` for events that are pure telemetry.
#[must_use]
pub fn describe(event: &Event) -> Option<String> {
    match event {
        Event::EquipmentAdded { equipment, .. } => Some(format!("Equipment {equipment} added.")),
        Event::WaypointAppended {
            equipment,
            waypoint_count,
            path_meters,
            ..
        } => Some(format!(
            "Equipment {equipment} route: {waypoint_count} waypoint(s), {path_meters:.0} m."
        )),
        Event::CaptureArmed { equipment, .. } => Some(format!(
            "Click the map to place a waypoint for equipment {equipment}."
        )),
        Event::CaptureCancelled { equipment, .. } => Some(format!(
            "Waypoint capture for equipment {equipment} cancelled."
        )),
        Event::MotionStarted { equipment, .. } => {
            Some(format!("Equipment {equipment} is moving."))
        }
        Event::MotionRejected { equipment, error } => Some(format!(
            "Equipment {equipment} needs at least {MIN_ANIMATABLE_WAYPOINTS} waypoints to move \
             (found {}).",
            error.found
        )),
        Event::MotionStopped { equipment, .. } => Some(format!("Equipment {equipment} stopped.")),
        Event::EquipmentMoved { .. } => None,
        Event::MotionFaulted { equipment, error } => {
            Some(format!("Equipment {equipment} halted: {error}."))
        }
        Event::EquipmentRemoved { equipment } => Some(format!("Equipment {equipment} removed.")),
        Event::EquipmentMissing { error } => {
            Some(format!("Equipment {} does not exist.", error.equipment))
        }
        Event::AllStopped { stopped } => {
            Some(format!("All equipment stopped ({stopped} were moving)."))
        }
        Event::FleetCleared { removed } => {
            Some(format!("Fleet reset; removed {removed} equipment."))
        }
    }
}

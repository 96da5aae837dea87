//! Per-equipment motion state machine.

use fleetsim_core::{
    InsufficientWaypointsError, MotionState, Progress, MIN_ANIMATABLE_WAYPOINTS,
};

/// Play/pause state machine for one equipment.
///
/// The controller owns exactly the state flag and the progress fraction of
/// the equipment it belongs to; path storage and rendered artifacts stay
/// with the registry. A fresh controller is `Idle` at progress 0.
#[derive(Clone, Debug)]
pub(crate) struct MotionController {
    state: MotionState,
    progress: Progress,
}

impl MotionController {
    pub(crate) fn new() -> Self {
        Self {
            state: MotionState::Idle,
            progress: Progress::ZERO,
        }
    }

    pub(crate) fn state(&self) -> MotionState {
        self.state
    }

    pub(crate) fn progress(&self) -> Progress {
        self.progress
    }

    /// Starts or resumes playback from the retained progress.
    ///
    /// Fails without any state change when the path is too short. Starting
    /// while already `Moving` is a no-op; the `Ok` payload reports whether a
    /// transition actually happened.
    pub(crate) fn start(
        &mut self,
        waypoint_count: u32,
    ) -> Result<bool, InsufficientWaypointsError> {
        if waypoint_count < MIN_ANIMATABLE_WAYPOINTS {
            return Err(InsufficientWaypointsError {
                found: waypoint_count,
            });
        }
        if self.state == MotionState::Moving {
            return Ok(false);
        }
        self.state = MotionState::Moving;
        Ok(true)
    }

    /// Pauses playback, retaining progress. No-op unless `Moving`.
    pub(crate) fn stop(&mut self) -> bool {
        if self.state != MotionState::Moving {
            return false;
        }
        self.state = MotionState::Stopped;
        true
    }

    /// Advances progress by `step` while `Moving`, wrapping past 1 to 0.
    ///
    /// Returns `None` when the controller is not moving: that is a stale
    /// tick observing a state that left `Moving` after the tick was
    /// scheduled, and the caller must not reschedule it.
    pub(crate) fn advance(&mut self, step: f64) -> Option<Progress> {
        if self.state != MotionState::Moving {
            return None;
        }
        self.progress = self.progress.advanced_by(step);
        Some(self.progress)
    }

    /// Halts playback after a motion fault, retaining progress.
    pub(crate) fn halt(&mut self) {
        self.state = MotionState::Stopped;
    }
}

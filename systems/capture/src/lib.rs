#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Click capture system that routes map clicks to armed waypoint tickets.
//!
//! Arming happens at the registry, which hands out one ticket per equipment.
//! This system holds the armed tickets and, when the surface reports a click,
//! resolves every ticket that was armed in an earlier frame with that
//! coordinate. A ticket armed in the same frame as a click waits for the
//! next one; the operator clicks in response to the prompt, not before it.
//! Cancelled tickets leave the set immediately, so a click can never append
//! a waypoint for equipment that no longer wants one.

use fleetsim_core::{CaptureId, Command, Event, GeoPoint};

/// Pure system that resolves armed capture tickets against surface clicks.
#[derive(Debug, Default)]
pub struct Capture {
    armed: Vec<CaptureId>,
}

impl Capture {
    /// Creates a capture router with no armed tickets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves clicks against armed tickets, then integrates this frame's
    /// arm and cancel events.
    ///
    /// Each click resolves every armed ticket exactly once, in arming order.
    /// Resolutions are emitted as commands into `out` and take effect when
    /// the caller applies them next frame.
    pub fn handle(&mut self, events: &[Event], clicks: &[GeoPoint], out: &mut Vec<Command>) {
        for click in clicks {
            for capture in self.armed.drain(..) {
                out.push(Command::CompleteCapture {
                    capture,
                    point: *click,
                });
            }
        }

        for event in events {
            match event {
                Event::CaptureArmed { capture, .. } => self.armed.push(*capture),
                Event::CaptureCancelled { capture, .. } => {
                    self.armed.retain(|armed| armed != capture);
                }
                _ => {}
            }
        }
    }

    /// Number of tickets waiting for a click.
    #[must_use]
    pub fn armed(&self) -> usize {
        self.armed.len()
    }
}

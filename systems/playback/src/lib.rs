#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cooperative playback scheduler that turns motion events into tick commands.
//!
//! Every moving equipment owns a recurring task: when the registry reports a
//! start or a completed tick, the scheduler queues one `AdvanceMotion` for
//! that equipment in the next frame. Cancellation is cooperative and lives at
//! the registry, which silently drops ticks for equipment that is no longer
//! moving; a dropped tick produces no movement event, so its chain ends here
//! without any bookkeeping. One slow or stopped equipment therefore never
//! stalls the others.

use std::collections::{BTreeSet, VecDeque};

use fleetsim_core::{Command, EquipmentId, Event};

/// Pure system that reacts to registry events and queues per-frame ticks.
#[derive(Debug, Default)]
pub struct Playback {
    pending: VecDeque<EquipmentId>,
    scheduled: BTreeSet<EquipmentId>,
}

impl Playback {
    /// Creates a scheduler with no queued ticks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes registry events and queues follow-up ticks.
    ///
    /// At most one tick is queued per equipment per frame, however many
    /// motion events the frame produced for it.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            let equipment = match event {
                Event::MotionStarted { equipment, .. } => *equipment,
                Event::EquipmentMoved { equipment, .. } => *equipment,
                _ => continue,
            };
            self.schedule(equipment);
        }
    }

    /// Drains queued ticks into `out` in scheduling order.
    pub fn begin_frame(&mut self, out: &mut Vec<Command>) {
        while let Some(equipment) = self.pending.pop_front() {
            let _ = self.scheduled.remove(&equipment);
            out.push(Command::AdvanceMotion { equipment });
        }
    }

    /// Number of ticks queued for the next frame.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.pending.len()
    }

    fn schedule(&mut self, equipment: EquipmentId) {
        if self.scheduled.insert(equipment) {
            self.pending.push_back(equipment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetsim_core::{GeoPoint, Progress};

    fn moved(id: u32) -> Event {
        Event::EquipmentMoved {
            equipment: EquipmentId::new(id),
            position: GeoPoint::new(0.0, 0.0),
            progress: Progress::new(0.5),
        }
    }

    fn started(id: u32) -> Event {
        Event::MotionStarted {
            equipment: EquipmentId::new(id),
            progress: Progress::ZERO,
        }
    }

    #[test]
    fn motion_events_queue_one_tick_per_equipment() {
        let mut playback = Playback::new();
        playback.handle(&[started(1), moved(1), started(1)]);

        let mut out = Vec::new();
        playback.begin_frame(&mut out);
        assert_eq!(
            out,
            vec![Command::AdvanceMotion {
                equipment: EquipmentId::new(1)
            }]
        );
    }

    #[test]
    fn ticks_drain_in_scheduling_order() {
        let mut playback = Playback::new();
        playback.handle(&[started(2), started(1)]);

        let mut out = Vec::new();
        playback.begin_frame(&mut out);
        assert_eq!(
            out,
            vec![
                Command::AdvanceMotion {
                    equipment: EquipmentId::new(2)
                },
                Command::AdvanceMotion {
                    equipment: EquipmentId::new(1)
                },
            ]
        );
    }

    #[test]
    fn non_motion_events_queue_nothing() {
        let mut playback = Playback::new();
        playback.handle(&[
            Event::EquipmentAdded {
                equipment: EquipmentId::new(1),
                color: fleetsim_core::ROUTE_COLORS[0],
            },
            Event::MotionStopped {
                equipment: EquipmentId::new(1),
                progress: Progress::new(0.5),
            },
            Event::AllStopped { stopped: 1 },
        ]);

        assert_eq!(playback.queued(), 0);
    }

    #[test]
    fn drained_ticks_can_be_rescheduled() {
        let mut playback = Playback::new();
        playback.handle(&[started(3)]);

        let mut out = Vec::new();
        playback.begin_frame(&mut out);
        assert_eq!(playback.queued(), 0);

        playback.handle(&[moved(3)]);
        assert_eq!(playback.queued(), 1);
    }
}

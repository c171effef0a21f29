//! Per-tick motion and task retirement.
//!
//! # State machine
//!
//! ```text
//! Idle ──(route gains waypoints)──► ToPickup(t)
//! ToPickup(t) ──(reach t.start)──► Carrying(t)
//! Carrying(t) ──(reach t.destination)──► pop t, rebuild ──► ToPickup(next) | Idle
//! ```
//!
//! An agent moves at most one waypoint per tick.  It snaps onto the target
//! when closer than `epsilon` or when the step would overshoot.

use fa_core::TaskId;

use crate::{Agent, Task};

/// What one call to [`Agent::advance`] did.
#[derive(Clone, Debug, PartialEq)]
pub enum MotionEvent {
    /// Nothing to do.
    Idle,
    /// Moved toward the current waypoint without reaching it.
    Moved,
    /// Reached the pickup point of the given task.
    PickedUp(TaskId),
    /// Reached the drop-off point; the task has left the queue.
    Delivered(Task),
}

impl Agent {
    /// Advance along the route by at most `step` distance units.
    ///
    /// On delivery the head task is popped and the route rebuilt according
    /// to the agent's [`RebuildPolicy`](crate::RebuildPolicy).
    pub fn advance(&mut self, step: f64, epsilon: f64) -> MotionEvent {
        let Some(&target) = self.route.get(self.target_index) else {
            return MotionEvent::Idle;
        };

        let (next, reached) = self.position.step_toward(target, step, epsilon);
        self.distance_travelled += self.position.dist(next);
        self.position = next;

        if !reached {
            return MotionEvent::Moved;
        }
        self.target_index += 1;

        if self.target_index % 2 == 1 {
            let picked = self.queue.get(self.target_index / 2).map(Task::id);
            return picked.map_or(MotionEvent::Moved, MotionEvent::PickedUp);
        }

        // Even index: the head task's destination was just reached.
        if self.queue.is_empty() {
            return MotionEvent::Moved;
        }
        let done = self.queue.remove(0);
        self.rebuild();
        MotionEvent::Delivered(done)
    }
}

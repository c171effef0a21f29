//! Route planner: cost of a task sequence, full reordering search, and the
//! order-preserving build.

use fa_core::Point;
use tracing::warn;

use crate::{Agent, Permutations, Task};

/// Longest run of reorderable tasks [`Agent::plan_route`] searches
/// exhaustively (8! = 40 320 orders).  Longer queues keep their order.
pub const EXHAUSTIVE_REORDER_LIMIT: usize = 8;

/// Cost of visiting `tasks` in order, starting at `origin`.
///
/// ```text
/// Σ dist(prev, t.start) + dist(t.start, t.destination)
/// ```
/// where `prev` starts at `origin` and becomes each task's destination.
pub fn sequence_cost<'a, I>(origin: Point, tasks: I) -> f64
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut cost = 0.0;
    let mut pos = origin;
    for task in tasks {
        cost += pos.dist(task.start()) + task.length();
        pos = task.destination();
    }
    cost
}

impl Agent {
    /// Reorder the queue to the cheapest visiting order and rebuild the route.
    ///
    /// Every ordering of the reorderable part of the queue is scored with
    /// [`sequence_cost`]; a carried head task stays first.  Ties go to the
    /// ordering that is lexicographically smallest by task id.
    ///
    /// Cost is factorial in the queue length.  Above
    /// [`EXHAUSTIVE_REORDER_LIMIT`] reorderable tasks the current order is
    /// kept instead.
    pub fn plan_route(&mut self) {
        let carrying = self.is_working();
        let locked = self.locked_prefix();
        let free = self.queue.len() - locked;

        if free > EXHAUSTIVE_REORDER_LIMIT {
            warn!(
                agent = %self.id,
                tasks = free,
                limit = EXHAUSTIVE_REORDER_LIMIT,
                "queue too long for exhaustive reordering; keeping current order"
            );
            self.reset_route(carrying);
            return;
        }

        // Canonical enumeration order makes the first minimum the
        // lexicographically smallest by id.
        self.queue[locked..].sort_by_key(Task::id);

        let (head, rest) = self.queue.split_at(locked);
        let mut best_order: Vec<usize> = (0..rest.len()).collect();
        let mut best_cost = f64::INFINITY;

        for order in Permutations::new(rest.len()) {
            let cost = sequence_cost(
                self.position,
                head.iter().chain(order.iter().map(|&i| &rest[i])),
            );
            if cost < best_cost {
                best_cost = cost;
                best_order = order;
            }
        }

        let reordered: Vec<Task> = best_order.iter().map(|&i| rest[i].clone()).collect();
        self.queue.truncate(locked);
        self.queue.extend(reordered);
        self.reset_route(carrying);
    }

    /// Rebuild the route in the queue's existing order.  No search.
    pub fn build_route_from_current_tasks(&mut self) {
        let carrying = self.is_working();
        self.reset_route(carrying);
    }
}

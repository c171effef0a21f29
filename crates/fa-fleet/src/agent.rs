//! The `Agent` entity: position, committed queue, and the derived route.

use fa_core::{AgentId, Point, TaskId};

use crate::route::sequence_cost;
use crate::Task;

// ── RebuildPolicy ─────────────────────────────────────────────────────────────

/// How an agent's route is rebuilt after its queue changes.
///
/// This is the agent's `allow_reordering` flag made explicit.  Auctions
/// switch an agent to `PreserveOrder` so their evaluated insertion positions
/// are never undone by a later permutation search.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RebuildPolicy {
    /// Full permutation search ([`Agent::plan_route`]).
    #[default]
    Reorder,
    /// Keep queue order ([`Agent::build_route_from_current_tasks`]).
    PreserveOrder,
}

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Where an agent is in its task cycle, derived from the waypoint index.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// No waypoint left to visit.
    Idle,
    /// Heading for the pickup point of the given task.
    ToPickup(TaskId),
    /// Picked up the given task, heading for its drop-off point.
    Carrying(TaskId),
}

// ── Agent ─────────────────────────────────────────────────────────────────────

/// A mobile unit executing an ordered queue of tasks.
///
/// # Invariants
///
/// - `route` is the interleaving `[q.start, q.destination, …]` of `queue`.
/// - `route_cost` is [`sequence_cost`] of `queue` from `position`, refreshed
///   every time `queue` changes.
/// - `target_index` indexes the next waypoint of `route`; an odd index means
///   the head task has been picked up.
///
/// `Agent` is `Clone` so allocation strategies can score candidates on
/// independent copies.  Nothing in a copy aliases the original.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub(crate) id:                 AgentId,
    pub(crate) position:           Point,
    pub(crate) queue:              Vec<Task>,
    pub(crate) route:              Vec<Point>,
    pub(crate) route_cost:         f64,
    pub(crate) target_index:       usize,
    pub(crate) policy:             RebuildPolicy,
    pub(crate) distance_travelled: f64,
}

impl Agent {
    /// An idle agent at `position` that reorders its queue on every rebuild.
    pub fn new(id: AgentId, position: Point) -> Self {
        Self {
            id,
            position,
            queue:              Vec::new(),
            route:              Vec::new(),
            route_cost:         0.0,
            target_index:       0,
            policy:             RebuildPolicy::Reorder,
            distance_travelled: 0.0,
        }
    }

    /// Builder-style override of the rebuild policy.
    pub fn with_policy(mut self, policy: RebuildPolicy) -> Self {
        self.policy = policy;
        self
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Committed tasks in execution order.
    #[inline]
    pub fn queue(&self) -> &[Task] {
        &self.queue
    }

    /// Waypoints derived from the queue.
    #[inline]
    pub fn route(&self) -> &[Point] {
        &self.route
    }

    /// Cost of the route as of the last queue change.
    #[inline]
    pub fn route_cost(&self) -> f64 {
        self.route_cost
    }

    /// Index of the next waypoint in [`route`](Self::route).
    #[inline]
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    #[inline]
    pub fn policy(&self) -> RebuildPolicy {
        self.policy
    }

    #[inline]
    pub fn allows_reordering(&self) -> bool {
        self.policy == RebuildPolicy::Reorder
    }

    /// Total distance moved since creation.
    #[inline]
    pub fn distance_travelled(&self) -> f64 {
        self.distance_travelled
    }

    /// The explicit task-cycle state (see [`Phase`]).
    pub fn phase(&self) -> Phase {
        if self.target_index >= self.route.len() {
            return Phase::Idle;
        }
        match self.queue.get(self.target_index / 2) {
            None => Phase::Idle,
            Some(task) if self.target_index % 2 == 1 => Phase::Carrying(task.id()),
            Some(task) => Phase::ToPickup(task.id()),
        }
    }

    /// `true` between a task's pickup and its drop-off.
    #[inline]
    pub fn is_working(&self) -> bool {
        self.target_index < self.route.len() && self.target_index % 2 == 1
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of leading queue entries that must keep their place.
    ///
    /// The head task is locked while it is being carried: nothing may be
    /// inserted ahead of it and no search may move it.
    #[inline]
    pub fn locked_prefix(&self) -> usize {
        usize::from(self.is_working() && !self.queue.is_empty())
    }

    /// Where a task appended to the queue would start from: the last queued
    /// destination, or the current position for an empty queue.
    pub fn fifo_tail(&self) -> Point {
        self.queue
            .last()
            .map(Task::destination)
            .unwrap_or(self.position)
    }

    /// Cost of the current queue from the current position, computed from
    /// scratch rather than read from the cached `route_cost`.
    pub fn queue_cost(&self) -> f64 {
        sequence_cost(self.position, &self.queue)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Refresh the cached route cost from the current position.
    pub fn recompute_cost(&mut self) {
        self.route_cost = self.queue_cost();
    }

    /// Commit `task` to the tail of the queue, extending the route by its two
    /// waypoints.  Never reorders anything already committed.
    pub fn append_task(&mut self, task: Task) {
        self.route.push(task.start());
        self.route.push(task.destination());
        self.queue.push(task);
        self.recompute_cost();
    }

    /// Commit `task` at queue position `index` and rebuild in queue order.
    ///
    /// The agent is switched to [`RebuildPolicy::PreserveOrder`].  `index` is
    /// clamped to `locked_prefix()..=queue.len()`; the position actually used
    /// is returned.
    pub fn insert_task(&mut self, index: usize, task: Task) -> usize {
        let index = index.clamp(self.locked_prefix(), self.queue.len());
        self.queue.insert(index, task);
        self.policy = RebuildPolicy::PreserveOrder;
        self.build_route_from_current_tasks();
        index
    }

    /// Rebuild the route according to the agent's [`RebuildPolicy`].
    ///
    /// This is the only place the policy is consulted.
    pub fn rebuild(&mut self) {
        match self.policy {
            RebuildPolicy::Reorder       => self.plan_route(),
            RebuildPolicy::PreserveOrder => self.build_route_from_current_tasks(),
        }
    }

    /// Install `queue`'s waypoints as the route, keeping a carried head's
    /// progress.  `carrying` must be sampled before the queue changed.
    pub(crate) fn reset_route(&mut self, carrying: bool) {
        self.route.clear();
        for task in &self.queue {
            self.route.push(task.start());
            self.route.push(task.destination());
        }
        self.target_index = if carrying && !self.queue.is_empty() { 1 } else { 0 };
        self.recompute_cost();
    }
}

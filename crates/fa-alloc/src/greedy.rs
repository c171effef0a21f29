//! Greedy batch-optimal assignment.
//!
//! Every ordering of the batch is played out against a snapshot of the
//! fleet.  Within one ordering each task goes to the agent whose queue would
//! be cheapest after appending it.  The ordering whose worst agent ends up
//! cheapest wins and is replayed on the real agents.
//!
//! Complexity is `O(batch! × batch × agents)`, so batches above
//! [`MAX_GREEDY_BATCH`] are only played in input order.

use fa_core::{Point, MAX_GREEDY_BATCH};
use fa_fleet::{Agent, Permutations, Task};
use tracing::{debug, info, warn};

use crate::{AllocationOutcome, Commitment};

/// What the greedy search needs to know about an agent: where an appended
/// task would start from and what the queue costs so far.
#[derive(Copy, Clone, Debug)]
struct Trial {
    tail: Point,
    cost: f64,
}

impl Trial {
    fn of(agent: &Agent) -> Self {
        Self { tail: agent.fifo_tail(), cost: agent.queue_cost() }
    }

    /// Total queue cost after appending `task`.
    fn cost_with(&self, task: &Task) -> f64 {
        self.cost + self.tail.dist(task.start()) + task.length()
    }

    fn append(&mut self, task: &Task) {
        self.cost = self.cost_with(task);
        self.tail = task.destination();
    }
}

/// Slot of the trial with the cheapest append.  Lowest slot wins ties.
fn cheapest(trials: &[Trial], task: &Task) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (slot, trial) in trials.iter().enumerate() {
        let cost = trial.cost_with(task);
        if best.is_none_or(|(_, b)| cost < b) {
            best = Some((slot, cost));
        }
    }
    best
}

/// Play `order` out on fresh trials and return the bottleneck cost.
fn play(base: &[Trial], tasks: &[Task], order: &[usize]) -> f64 {
    let mut trials = base.to_vec();
    for &i in order {
        if let Some((slot, _)) = cheapest(&trials, &tasks[i]) {
            trials[slot].append(&tasks[i]);
        }
    }
    trials.iter().map(|t| t.cost).fold(f64::NEG_INFINITY, f64::max)
}

/// Result of the ordering search.
#[derive(Clone, Debug, PartialEq)]
pub struct GreedySearch {
    /// Winning ordering, as indices into the batch.
    pub order:      Vec<usize>,
    /// The winning ordering's bottleneck cost.
    pub bottleneck: f64,
    /// Bottleneck cost of every ordering tried, in enumeration order.
    pub tried:      Vec<f64>,
}

/// Find the batch ordering with the smallest bottleneck.
///
/// Orderings are enumerated lexicographically and the first minimum wins.
/// Returns `None` for an empty fleet or an empty batch.
pub fn search(agents: &[Agent], tasks: &[Task]) -> Option<GreedySearch> {
    if agents.is_empty() || tasks.is_empty() {
        return None;
    }
    let base: Vec<Trial> = agents.iter().map(Trial::of).collect();
    let n = tasks.len();

    let orders: Box<dyn Iterator<Item = Vec<usize>>> = if n <= MAX_GREEDY_BATCH {
        Box::new(Permutations::new(n))
    } else {
        warn!(
            tasks = n,
            limit = MAX_GREEDY_BATCH,
            "batch too large for the ordering search; using input order only"
        );
        Box::new(std::iter::once((0..n).collect()))
    };

    let mut best: Option<(Vec<usize>, f64)> = None;
    let mut tried = Vec::new();
    for order in orders {
        let bottleneck = play(&base, tasks, &order);
        tried.push(bottleneck);
        if best.as_ref().is_none_or(|(_, b)| bottleneck < *b) {
            best = Some((order, bottleneck));
        }
    }

    best.map(|(order, bottleneck)| GreedySearch { order, bottleneck, tried })
}

/// Run the search and commit the winning ordering to `agents`.
///
/// Each task is appended to the tail of its agent's queue; nothing already
/// committed moves and the route planner is not invoked.
pub fn assign(agents: &mut [Agent], tasks: &[Task]) -> AllocationOutcome {
    let Some(found) = search(agents, tasks) else {
        return AllocationOutcome::nothing(tasks);
    };

    let mut trials: Vec<Trial> = agents.iter().map(Trial::of).collect();
    let mut outcome = AllocationOutcome { bottleneck: Some(found.bottleneck), ..Default::default() };

    for &i in &found.order {
        let task = &tasks[i];
        let Some((slot, cost)) = cheapest(&trials, task) else {
            outcome.unassigned.push(task.clone());
            continue;
        };
        trials[slot].append(task);

        let agent = &mut agents[slot];
        let index = agent.queue().len();
        agent.append_task(task.clone());
        debug!(task = %task.id(), agent = %agent.id(), index, cost, "greedy commitment");
        outcome.commitments.push(Commitment { task: task.id(), agent: agent.id(), index, cost });
    }

    info!(
        tasks = tasks.len(),
        orderings = found.tried.len(),
        bottleneck = found.bottleneck,
        "greedy batch allocated"
    );
    outcome
}

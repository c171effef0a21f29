//! Auction-based allocation: parallel (PSI), sequential (SSI), and
//! regret-ordered sequential.
//!
//! All three collect [`InsertionBid`]s from every agent and award a task to
//! its lowest bidder, inserting it at the evaluated position.  They differ
//! only in which agent states the bids are computed against and in what
//! order tasks are awarded:
//!
//! | Policy     | Bids computed against            | Award order          |
//! |------------|----------------------------------|----------------------|
//! | parallel   | the fleet before any award       | input order          |
//! | sequential | the fleet after previous awards  | input order          |
//! | regret     | the fleet after previous awards  | descending regret    |
//!
//! Parallel bids are never refreshed inside a batch, so one agent may win
//! several tasks on bids that assumed it took only one.

use fa_fleet::{Agent, InsertionBid, InsertionEvaluator, Task};
use tracing::{debug, info};

use crate::{AllocationOutcome, Commitment};

/// Lowest bid for `task` across the fleet, with the bidder's slot.
/// The lowest slot wins ties.
fn lowest_bid(
    agents: &[Agent],
    task: &Task,
    evaluator: &InsertionEvaluator,
) -> Option<(usize, InsertionBid)> {
    let mut best: Option<(usize, InsertionBid)> = None;
    for (slot, agent) in agents.iter().enumerate() {
        let bid = evaluator.evaluate(agent, task);
        if best.is_none_or(|(_, b)| bid.marginal_cost < b.marginal_cost) {
            best = Some((slot, bid));
        }
    }
    best
}

fn award(agents: &mut [Agent], slot: usize, task: &Task, bid: InsertionBid) -> Commitment {
    let agent = &mut agents[slot];
    let index = agent.insert_task(bid.index, task.clone());
    debug!(
        task = %task.id(),
        agent = %agent.id(),
        index,
        bid = bid.marginal_cost,
        "auction award"
    );
    Commitment { task: task.id(), agent: agent.id(), index, cost: bid.marginal_cost }
}

/// Parallel single-item auction.
///
/// Every task's winner is decided from one snapshot of the fleet before any
/// task is inserted.  Awards are then applied in input order; an insertion
/// index made stale by an earlier award to the same agent is clamped.
pub fn parallel(
    agents: &mut [Agent],
    tasks: &[Task],
    evaluator: &InsertionEvaluator,
) -> AllocationOutcome {
    if agents.is_empty() {
        return AllocationOutcome::nothing(tasks);
    }
    let winners: Vec<Option<(usize, InsertionBid)>> = tasks
        .iter()
        .map(|task| lowest_bid(agents, task, evaluator))
        .collect();

    let mut outcome = AllocationOutcome::default();
    for (task, winner) in tasks.iter().zip(winners) {
        match winner {
            Some((slot, bid)) => outcome.commitments.push(award(agents, slot, task, bid)),
            None => outcome.unassigned.push(task.clone()),
        }
    }
    info!(tasks = tasks.len(), "parallel auction allocated");
    outcome
}

/// Award tasks one at a time in the given order, re-bidding against the
/// current fleet each time.
fn sequential_in_order<'a>(
    agents: &mut [Agent],
    tasks: impl IntoIterator<Item = &'a Task>,
    evaluator: &InsertionEvaluator,
) -> AllocationOutcome {
    let mut outcome = AllocationOutcome::default();
    for task in tasks {
        match lowest_bid(agents, task, evaluator) {
            Some((slot, bid)) => outcome.commitments.push(award(agents, slot, task, bid)),
            None => outcome.unassigned.push(task.clone()),
        }
    }
    outcome
}

/// Sequential single-item auction in input order.
pub fn sequential(
    agents: &mut [Agent],
    tasks: &[Task],
    evaluator: &InsertionEvaluator,
) -> AllocationOutcome {
    let outcome = sequential_in_order(agents, tasks, evaluator);
    info!(tasks = tasks.len(), "sequential auction allocated");
    outcome
}

/// A batch task's regret against the unmodified fleet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaskRegret {
    /// Index into the batch.
    pub index:  usize,
    /// Second-lowest bid minus lowest bid.  Infinite with fewer than two
    /// agents.
    pub regret: f64,
}

/// Regret of every task, sorted by descending regret.
///
/// The sort is stable: tasks with equal regret keep their input order.
pub fn regret_order(
    agents: &[Agent],
    tasks: &[Task],
    evaluator: &InsertionEvaluator,
) -> Vec<TaskRegret> {
    let mut regrets: Vec<TaskRegret> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let mut first = f64::INFINITY;
            let mut second = f64::INFINITY;
            for agent in agents {
                let cost = evaluator.evaluate(agent, task).marginal_cost;
                if cost < first {
                    second = first;
                    first = cost;
                } else if cost < second {
                    second = cost;
                }
            }
            let regret = if agents.len() < 2 { f64::INFINITY } else { second - first };
            TaskRegret { index, regret }
        })
        .collect();

    regrets.sort_by(|a, b| b.regret.total_cmp(&a.regret));
    regrets
}

/// Sequential auction with tasks ordered by descending regret.
pub fn regret(
    agents: &mut [Agent],
    tasks: &[Task],
    evaluator: &InsertionEvaluator,
) -> AllocationOutcome {
    let order = regret_order(agents, tasks, evaluator);
    let outcome = sequential_in_order(agents, order.iter().map(|r| &tasks[r.index]), evaluator);
    info!(tasks = tasks.len(), "regret auction allocated");
    outcome
}

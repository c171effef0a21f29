//! Insertion evaluator: the marginal cost of slotting one task into one
//! agent's queue without disturbing the existing order.
//!
//! This is the bid every auction strategy collects.  It is a pure query:
//! candidate queues are scored as iterator chains over the agent's queue and
//! the agent itself is only borrowed immutably.

use fa_core::AgentId;

use crate::route::sequence_cost;
use crate::{Agent, Task};

/// One agent's offer for one task.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InsertionBid {
    pub agent: AgentId,
    /// Cost increase of the best insertion (plus any load penalty).
    pub marginal_cost: f64,
    /// Queue position the task would be inserted at.
    pub index: usize,
}

/// Computes [`InsertionBid`]s with an optional load penalty.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct InsertionEvaluator {
    /// Added to every bid once per task already in the agent's queue.
    pub penalty_per_task: f64,
}

impl InsertionEvaluator {
    /// `None` disables the penalty.
    pub fn new(penalty_per_task: Option<f64>) -> Self {
        Self { penalty_per_task: penalty_per_task.unwrap_or(0.0) }
    }

    /// Best insertion of `task` into `agent`'s queue.
    ///
    /// Every position from the end of the locked prefix up to and including
    /// `queue.len()` is tried; the first minimum wins.  The baseline is the
    /// agent's queue cost recomputed from its current position.
    pub fn evaluate(&self, agent: &Agent, task: &Task) -> InsertionBid {
        let queue = agent.queue();
        let origin = agent.position();

        if queue.is_empty() {
            return InsertionBid {
                agent:         agent.id(),
                marginal_cost: origin.dist(task.start()) + task.length(),
                index:         0,
            };
        }

        let current = agent.queue_cost();
        let mut best_cost = f64::INFINITY;
        let mut best_index = agent.locked_prefix();

        for index in agent.locked_prefix()..=queue.len() {
            let (before, after) = queue.split_at(index);
            let cost = sequence_cost(
                origin,
                before.iter().chain(std::iter::once(task)).chain(after),
            );
            if cost < best_cost {
                best_cost = cost;
                best_index = index;
            }
        }

        InsertionBid {
            agent:         agent.id(),
            marginal_cost: best_cost - current + queue.len() as f64 * self.penalty_per_task,
            index:         best_index,
        }
    }
}

/// [`InsertionEvaluator::evaluate`] without a load penalty.
pub fn evaluate_insertion(agent: &Agent, task: &Task) -> InsertionBid {
    InsertionEvaluator::default().evaluate(agent, task)
}

//! What an allocation committed.

use fa_core::{AgentId, TaskId};
use fa_fleet::Task;

/// One task committed to one agent.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Commitment {
    pub task:  TaskId,
    pub agent: AgentId,
    /// Queue position the task landed at.
    pub index: usize,
    /// The cost the decision was based on: the winning bid for auctions,
    /// the append cost for greedy and external allocation.
    pub cost:  f64,
}

/// Result of one [`Allocator::assign`](crate::Allocator::assign) call.
///
/// `commitments` is in award order.  Tasks that were not committed are handed
/// back in `unassigned` so the caller can retry them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationOutcome {
    pub commitments: Vec<Commitment>,
    pub unassigned:  Vec<Task>,
    /// Greedy only: the winning ordering's worst per-agent route cost.
    pub bottleneck:  Option<f64>,
}

impl AllocationOutcome {
    /// Nothing committed; every task handed back.
    pub fn nothing(tasks: &[Task]) -> Self {
        Self { unassigned: tasks.to_vec(), ..Self::default() }
    }

    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    pub fn committed_count(&self) -> usize {
        self.commitments.len()
    }

    /// The agent `task` was committed to, if any.
    pub fn agent_for(&self, task: TaskId) -> Option<AgentId> {
        self.commitments.iter().find(|c| c.task == task).map(|c| c.agent)
    }
}

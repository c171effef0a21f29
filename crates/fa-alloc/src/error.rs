use std::time::Duration;

use fa_core::{AgentId, TaskId};
use thiserror::Error;

use crate::AllocationOutcome;

/// Why an external solve produced no usable mapping.
///
/// Any of these means nothing from the batch was committed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    #[error("solver failed: {0}")]
    Failed(String),

    #[error("malformed solver response: {0}")]
    Malformed(String),

    #[error("solver returned no response")]
    MissingResponse,

    #[error("solver gave no answer within {limit:?} (waited {elapsed:?})")]
    Timeout {
        elapsed: Duration,
        limit:   Duration,
    },

    /// A previous solve timed out and its worker has not returned yet.
    #[error("solver is still busy with a timed-out request")]
    Busy,
}

pub type SolverResult<T> = Result<T, SolverError>;

/// One mapping entry that could not be applied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedEntry {
    #[error("{task} is not part of the batch (mapped to {agent})")]
    UnknownTask { task: TaskId, agent: AgentId },

    #[error("{task} mapped to unknown {agent}")]
    UnknownAgent { task: TaskId, agent: AgentId },

    #[error("{task} is missing from the solver mapping")]
    Unmapped { task: TaskId },
}

impl UnresolvedEntry {
    pub fn task(&self) -> TaskId {
        match *self {
            UnresolvedEntry::UnknownTask { task, .. }
            | UnresolvedEntry::UnknownAgent { task, .. }
            | UnresolvedEntry::Unmapped { task } => task,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocError {
    #[error("external allocation failed: {0}")]
    Solver(#[from] SolverError),

    /// Valid entries were committed (see `outcome`); the rest are listed.
    #[error("{} solver mapping entries could not be resolved", .unresolved.len())]
    PartialAllocation {
        outcome:    AllocationOutcome,
        unresolved: Vec<UnresolvedEntry>,
    },

    /// An allocation call returned without committing any of its batch.
    #[error("allocation committed none of {pending} pending tasks")]
    NoProgress { pending: usize },
}

pub type AllocResult<T> = Result<T, AllocError>;

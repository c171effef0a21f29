//! The allocation interface: one closed set of policies behind
//! [`Allocator::assign`].

use std::time::Duration;

use fa_core::{EngineConfig, StrategyKind};
use fa_fleet::{Agent, InsertionEvaluator, Task};

use crate::{auction, greedy, AllocResult, AllocationOutcome, ExternalStrategy, LocalSearchSolver};

/// Allocation policy, chosen at configuration time.
#[derive(Debug)]
pub enum Strategy {
    /// Batch-optimal greedy search with FIFO appends.
    Greedy,
    /// Parallel single-item auction (bids from one snapshot).
    Parallel,
    /// Sequential single-item auction in input order.
    Sequential,
    /// Sequential auction in descending-regret order.
    Regret,
    /// Hand the batch to an external solver.
    External(ExternalStrategy),
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Greedy      => StrategyKind::Greedy,
            Strategy::Parallel    => StrategyKind::Parallel,
            Strategy::Sequential  => StrategyKind::Sequential,
            Strategy::Regret      => StrategyKind::Regret,
            Strategy::External(_) => StrategyKind::External,
        }
    }
}

/// Commits task batches into a fleet with one [`Strategy`].
#[derive(Debug)]
pub struct Allocator {
    strategy:  Strategy,
    evaluator: InsertionEvaluator,
}

impl Allocator {
    pub fn new(strategy: Strategy, evaluator: InsertionEvaluator) -> Self {
        Self { strategy, evaluator }
    }

    /// Strategy and insertion penalty from `config`.
    ///
    /// `StrategyKind::External` gets the in-process [`LocalSearchSolver`];
    /// use [`new`](Self::new) to plug in a real external adapter.
    pub fn from_config(config: &EngineConfig) -> Self {
        let strategy = match config.strategy {
            StrategyKind::Greedy     => Strategy::Greedy,
            StrategyKind::Parallel   => Strategy::Parallel,
            StrategyKind::Sequential => Strategy::Sequential,
            StrategyKind::Regret     => Strategy::Regret,
            StrategyKind::External   => {
                let timeout = Duration::try_from_secs_f64(config.solver_timeout_secs)
                    .unwrap_or(Duration::MAX);
                Strategy::External(ExternalStrategy::new(LocalSearchSolver::default(), timeout))
            }
        };
        Self::new(strategy, InsertionEvaluator::new(config.insertion_penalty))
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn evaluator(&self) -> &InsertionEvaluator {
        &self.evaluator
    }

    /// Commit `tasks` into `agents`.
    ///
    /// An empty fleet or batch is a no-op.  Only the external strategy can
    /// fail.
    pub fn assign(&mut self, agents: &mut [Agent], tasks: &[Task]) -> AllocResult<AllocationOutcome> {
        if agents.is_empty() || tasks.is_empty() {
            return Ok(AllocationOutcome::nothing(tasks));
        }
        let eval = &self.evaluator;
        Ok(match &mut self.strategy {
            Strategy::Greedy       => greedy::assign(agents, tasks),
            Strategy::Parallel     => auction::parallel(agents, tasks, eval),
            Strategy::Sequential   => auction::sequential(agents, tasks, eval),
            Strategy::Regret       => auction::regret(agents, tasks, eval),
            Strategy::External(ex) => ex.assign(agents, tasks)?,
        })
    }
}

//! Boundary to an external (DCOP) solver.
//!
//! The core exports a [`DcopProblem`], hands it to an [`ExternalSolver`], and
//! validates the returned `task -> agent` mapping before committing any of
//! it.  The solve runs on a worker thread and the caller waits at most the
//! configured timeout for it; a failed or late solve commits nothing.
//! Entries that name a task outside the batch or an agent outside the fleet,
//! and batch tasks the mapping leaves out, are reported one by one through
//! [`AllocError::PartialAllocation`]; the valid entries are still committed.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use fa_core::{AgentId, TaskId};
use fa_fleet::{Agent, Task};
use tracing::{debug, info, warn};

use crate::{
    AllocError, AllocResult, AllocationOutcome, Commitment, DcopProblem, SolverError,
    SolverResult, UnresolvedEntry,
};

/// An exported problem, as handed to the solver.
#[derive(Clone, Debug)]
pub struct ProblemHandle {
    pub problem: DcopProblem,
}

/// A solver living outside the core, typically another process.
///
/// Both calls are synchronous and run on a worker thread owned by
/// [`ExternalStrategy`].  Implementations that talk to a process are
/// responsible for turning exit codes and unparsable output into
/// [`SolverError`]s.
pub trait ExternalSolver: Send {
    /// Short name for logs.
    fn name(&self) -> &str {
        "external"
    }

    /// Build the declarative problem for `tasks` against `agents`.
    ///
    /// Default: the in-memory [`DcopProblem`].  Adapters that write the
    /// problem somewhere override this and call [`DcopProblem::build`]
    /// themselves.
    fn export_problem(&mut self, agents: &[Agent], tasks: &[Task]) -> SolverResult<ProblemHandle> {
        Ok(ProblemHandle { problem: DcopProblem::build(agents, tasks) })
    }

    /// Solve, or fetch the solution for, the exported problem.
    fn import_solution(&mut self, handle: &ProblemHandle) -> SolverResult<BTreeMap<TaskId, AgentId>>;
}

type Mapping = BTreeMap<TaskId, AgentId>;

/// What the worker thread sends back: the solver itself plus its answer.
type SolveReply = (Box<dyn ExternalSolver>, SolverResult<Mapping>);

/// The `External` allocation strategy: a solver plus its time limit.
///
/// While a timed-out solve is still running, the solver stays on its worker
/// thread and further calls fail with [`SolverError::Busy`].  The first call
/// after the worker finishes takes the solver back and drops the stale
/// answer.
pub struct ExternalStrategy {
    name:      String,
    solver:    Option<Box<dyn ExternalSolver>>,
    in_flight: Option<Receiver<SolveReply>>,
    timeout:   Duration,
}

impl std::fmt::Debug for ExternalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalStrategy")
            .field("solver", &self.name)
            .field("busy", &self.in_flight.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ExternalStrategy {
    pub fn new(solver: impl ExternalSolver + 'static, timeout: Duration) -> Self {
        Self {
            name: solver.name().to_owned(),
            solver: Some(Box::new(solver)),
            in_flight: None,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Export, solve, validate, commit.
    ///
    /// Valid entries are appended to their agent's queue in batch order.
    /// Batch tasks the mapping does not mention come back in
    /// `outcome.unassigned` and as [`UnresolvedEntry::Unmapped`].
    pub fn assign(&mut self, agents: &mut [Agent], tasks: &[Task]) -> AllocResult<AllocationOutcome> {
        if agents.is_empty() || tasks.is_empty() {
            return Ok(AllocationOutcome::nothing(tasks));
        }

        let started = Instant::now();
        let mapping = self.solve(agents, tasks)?;
        let elapsed = started.elapsed();

        // Validate the whole mapping before touching any agent.
        let mut unresolved = Vec::new();
        let mut slots: BTreeMap<TaskId, usize> = BTreeMap::new();
        for (&task, &agent) in &mapping {
            if !tasks.iter().any(|t| t.id() == task) {
                unresolved.push(UnresolvedEntry::UnknownTask { task, agent });
                continue;
            }
            match agents.iter().position(|a| a.id() == agent) {
                Some(slot) => {
                    slots.insert(task, slot);
                }
                None => unresolved.push(UnresolvedEntry::UnknownAgent { task, agent }),
            }
        }

        let mut outcome = AllocationOutcome::default();
        for task in tasks {
            let Some(&slot) = slots.get(&task.id()) else {
                if !mapping.contains_key(&task.id()) {
                    unresolved.push(UnresolvedEntry::Unmapped { task: task.id() });
                }
                outcome.unassigned.push(task.clone());
                continue;
            };
            let agent = &mut agents[slot];
            let cost = agent.fifo_tail().dist(task.start()) + task.length();
            let index = agent.queue().len();
            agent.append_task(task.clone());
            debug!(task = %task.id(), agent = %agent.id(), index, cost, "external commitment");
            outcome.commitments.push(Commitment { task: task.id(), agent: agent.id(), index, cost });
        }

        info!(
            solver = %self.name,
            tasks = tasks.len(),
            committed = outcome.commitments.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "external allocation applied"
        );

        if unresolved.is_empty() {
            Ok(outcome)
        } else {
            for entry in &unresolved {
                warn!(%entry, "unresolvable solver mapping entry");
            }
            Err(AllocError::PartialAllocation { outcome, unresolved })
        }
    }

    /// Run export and import on a worker thread, waiting at most `timeout`.
    fn solve(&mut self, agents: &[Agent], tasks: &[Task]) -> SolverResult<Mapping> {
        let mut solver = self.reclaim()?;
        let (agents, tasks) = (agents.to_vec(), tasks.to_vec());
        let (tx, rx) = mpsc::channel::<SolveReply>();

        let started = Instant::now();
        thread::Builder::new()
            .name(format!("solver-{}", self.name))
            .spawn(move || {
                let result = solver
                    .export_problem(&agents, &tasks)
                    .and_then(|handle| solver.import_solution(&handle));
                // The receiver is gone only if the strategy was dropped.
                let _ = tx.send((solver, result));
            })
            .map_err(|e| SolverError::Failed(format!("cannot start solver thread: {e}")))?;

        match rx.recv_timeout(self.timeout) {
            Ok((solver, result)) => {
                self.solver = Some(solver);
                result
            }
            Err(RecvTimeoutError::Timeout) => {
                let elapsed = started.elapsed();
                warn!(solver = %self.name, ?elapsed, limit = ?self.timeout, "solver timed out");
                self.in_flight = Some(rx);
                Err(SolverError::Timeout { elapsed, limit: self.timeout })
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolverError::Failed("solver thread panicked".into())),
        }
    }

    /// Take the solver for a new solve, collecting it from a finished
    /// timed-out worker first if needed.
    fn reclaim(&mut self) -> SolverResult<Box<dyn ExternalSolver>> {
        if let Some(rx) = self.in_flight.take() {
            match rx.try_recv() {
                Ok((solver, _late)) => {
                    debug!(solver = %self.name, "late solution discarded");
                    self.solver = Some(solver);
                }
                Err(TryRecvError::Empty) => {
                    self.in_flight = Some(rx);
                    return Err(SolverError::Busy);
                }
                Err(TryRecvError::Disconnected) => {
                    return Err(SolverError::Failed("solver thread panicked".into()));
                }
            }
        }
        self.solver
            .take()
            .ok_or_else(|| SolverError::Failed(format!("solver `{}` is no longer available", self.name)))
    }
}

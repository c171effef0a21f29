//! The `Sim` struct and its tick loop.

use fa_alloc::{AllocError, AllocationOutcome, Allocator};
use fa_core::{EngineConfig, SimClock, Tick};
use fa_fleet::{Agent, MotionEvent, Task};
use tracing::{debug, info, warn};

use crate::{RunStats, SimError, SimObserver, SimResult, TaskBatch, TaskSource};

/// The main simulation runner.
///
/// `Sim<S>` holds the fleet, the task source, and the allocator, and drives
/// the three-phase tick loop:
///
/// 1. **Request**: on allocation ticks, pull a batch from the source into the
///    pending list (until the source is exhausted).
/// 2. **Allocate**: hand every pending task to the allocator.  Whatever it
///    does not commit stays pending for the next tick.
/// 3. **Move**: advance each agent one step and retire delivered tasks.
///
/// The run ends when the source is exhausted, nothing is pending, and every
/// queue is empty, or at `config.max_ticks`.  A fleet of zero agents can
/// never serve pending tasks, so for it the run ends at exhaustion.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: TaskSource> {
    pub config: EngineConfig,

    /// Tracks the current tick and maps it to simulated seconds.
    pub clock: SimClock,

    /// The fleet, indexed by `AgentId`.
    pub agents: Vec<Agent>,

    pub source: S,

    pub allocator: Allocator,

    /// Received but not yet committed tasks, oldest first.
    pub pending: Vec<Task>,

    pub(crate) exhausted:            bool,
    pub(crate) consecutive_failures: u32,
    pub(crate) stats:                RunStats,
}

impl<S: TaskSource> Sim<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the terminal condition or `config.max_ticks`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunStats> {
        loop {
            let now = self.clock.current_tick;
            if self.is_finished() || self.config.max_ticks.is_some_and(|max| now.0 >= max) {
                break;
            }
            self.step(now, observer)?;
        }

        let stats = self.stats();
        info!(
            ticks = stats.ticks,
            simulated_secs = stats.simulated_secs,
            completed = stats.tasks_completed,
            distance = stats.total_distance(),
            "run finished"
        );
        observer.on_sim_end(self.clock.current_tick, &stats);
        Ok(stats)
    }

    /// Run exactly `n` ticks from the current position (ignores the terminal
    /// condition and `max_ticks`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            self.step(now, observer)?;
        }
        Ok(())
    }

    /// Source exhausted, nothing pending, every queue empty.
    pub fn is_finished(&self) -> bool {
        self.exhausted
            && (self.agents.is_empty()
                || (self.pending.is_empty() && self.agents.iter().all(Agent::is_idle)))
    }

    pub fn is_source_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Counters so far, with distances read from the agents.
    pub fn stats(&self) -> RunStats {
        let mut stats = self.stats.clone();
        stats.ticks = self.clock.current_tick.0;
        stats.simulated_secs = self.clock.elapsed_secs();
        stats.agent_distance = self.agents.iter().map(Agent::distance_travelled).collect();
        stats
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(now);
        self.process_tick(now, observer)?;
        let busy = self.agents.iter().filter(|a| !a.is_idle()).count();
        observer.on_tick_end(now, busy);
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        // ── Phase 1: request a batch ──────────────────────────────────────
        if !self.exhausted && now.is_every(self.config.allocation_interval_ticks) {
            self.request_batch(now, observer);
        }

        // ── Phase 2: allocate everything pending ──────────────────────────
        if !self.pending.is_empty() && !self.agents.is_empty() {
            self.allocate(now, observer)?;
        }

        // ── Phase 3: motion and retirement ────────────────────────────────
        let step = self.config.step_distance();
        let epsilon = self.config.arrival_epsilon;
        for agent in &mut self.agents {
            if let MotionEvent::Delivered(task) = agent.advance(step, epsilon) {
                debug!(%now, agent = %agent.id(), task = %task.id(), "task delivered");
                self.stats.tasks_completed += 1;
                observer.on_task_completed(now, agent.id(), &task);
            }
        }
        Ok(())
    }

    fn request_batch<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        match self.source.request_batch(self.config.batch_size) {
            TaskBatch::Ready(tasks) => {
                if !tasks.is_empty() {
                    debug!(%now, tasks = tasks.len(), "batch received");
                    self.stats.tasks_received += tasks.len();
                    observer.on_batch_received(now, &tasks);
                    self.pending.extend(tasks);
                }
                if self.source.is_exhausted() {
                    self.mark_exhausted(now, observer);
                }
            }
            TaskBatch::Exhausted => self.mark_exhausted(now, observer),
        }
    }

    fn mark_exhausted<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        self.exhausted = true;
        info!(%now, received = self.stats.tasks_received, "task source exhausted");
        observer.on_source_exhausted(now);
    }

    fn allocate<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<()> {
        let batch = std::mem::take(&mut self.pending);

        let err = match self.allocator.assign(&mut self.agents, &batch) {
            Ok(outcome) if !outcome.commitments.is_empty() => {
                self.consecutive_failures = 0;
                observer.on_allocation(now, &outcome);
                self.record(now, outcome);
                return Ok(());
            }
            Ok(outcome) => {
                warn!(%now, tasks = batch.len(), "allocation committed nothing; batch stays pending");
                observer.on_allocation(now, &outcome);
                self.record(now, outcome);
                AllocError::NoProgress { pending: self.pending.len() }
            }
            Err(err) => {
                self.stats.failed_allocations += 1;
                observer.on_allocation_failed(now, &err);
                let progressed = match &err {
                    AllocError::PartialAllocation { outcome, unresolved } => {
                        for entry in unresolved {
                            debug!(%now, task = %entry.task(), %entry, "unresolved task");
                        }
                        warn!(
                            %now,
                            committed = outcome.commitments.len(),
                            unresolved = unresolved.len(),
                            "partial allocation; unresolved tasks stay pending"
                        );
                        self.record(now, outcome.clone());
                        !outcome.commitments.is_empty()
                    }
                    other => {
                        warn!(%now, tasks = batch.len(), error = %other, "allocation failed; batch stays pending");
                        self.pending = batch;
                        false
                    }
                };
                if progressed {
                    self.consecutive_failures = 0;
                    return Ok(());
                }
                err
            }
        };

        self.consecutive_failures += 1;
        if self.consecutive_failures > self.config.max_allocation_retries {
            return Err(SimError::AllocationGaveUp { attempts: self.consecutive_failures, last: err });
        }
        Ok(())
    }

    fn record(&mut self, now: Tick, outcome: AllocationOutcome) {
        let committed = outcome.commitments.len();
        if committed > 0 {
            self.stats.batches_allocated += 1;
            self.stats.tasks_committed += committed;
            info!(
                %now,
                strategy = self.allocator.kind().as_str(),
                committed,
                pending = outcome.unassigned.len(),
                "batch allocated"
            );
        }
        self.pending = outcome.unassigned;
    }
}

//! Simulation observer trait for progress reporting and data collection.

use fa_alloc::{AllocError, AllocationOutcome};
use fa_core::{AgentId, Tick};
use fa_fleet::Task;

use crate::RunStats;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: delivery counter
///
/// ```rust,ignore
/// struct Deliveries(usize);
///
/// impl SimObserver for Deliveries {
///     fn on_task_completed(&mut self, _tick: Tick, _agent: AgentId, _task: &Task) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `busy` is the number of agents with a
    /// non-empty queue after motion.
    fn on_tick_end(&mut self, _tick: Tick, _busy: usize) {}

    /// A batch arrived from the task source.
    fn on_batch_received(&mut self, _tick: Tick, _tasks: &[Task]) {}

    /// An allocation call returned successfully.
    fn on_allocation(&mut self, _tick: Tick, _outcome: &AllocationOutcome) {}

    /// An allocation call failed, fully or partially.
    fn on_allocation_failed(&mut self, _tick: Tick, _error: &AllocError) {}

    /// `agent` delivered `task`.
    fn on_task_completed(&mut self, _tick: Tick, _agent: AgentId, _task: &Task) {}

    /// The task source reported exhaustion.  Called once.
    fn on_source_exhausted(&mut self, _tick: Tick) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick, _stats: &RunStats) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

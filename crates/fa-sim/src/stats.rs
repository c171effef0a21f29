//! Run summary.

/// Counters collected by [`Sim::run`](crate::Sim::run).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStats {
    /// Ticks processed.
    pub ticks:              u64,
    /// `ticks × tick_duration_secs`; the makespan when the run ended on its
    /// own.
    pub simulated_secs:     f64,
    pub tasks_received:     usize,
    pub tasks_committed:    usize,
    pub tasks_completed:    usize,
    /// Allocation calls that committed at least one task.
    pub batches_allocated:  usize,
    /// Allocation calls that returned an error, partial ones included.
    pub failed_allocations: usize,
    /// Distance travelled per agent, indexed by agent slot.
    pub agent_distance:     Vec<f64>,
}

impl RunStats {
    pub fn total_distance(&self) -> f64 {
        self.agent_distance.iter().sum()
    }

    /// Largest single-agent distance.  Zero for an empty fleet.
    pub fn max_agent_distance(&self) -> f64 {
        self.agent_distance.iter().copied().fold(0.0, f64::max)
    }
}

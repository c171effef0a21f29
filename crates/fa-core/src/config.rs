//! Engine configuration.
//!
//! `EngineConfig` gathers every tunable of a run into one value handed to the
//! simulation at construction.  Applications typically fill it from their own
//! config file and call [`EngineConfig::validate`] before building.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult, SimClock};

/// Largest batch the greedy batch-optimal search accepts (8! = 40 320 orders).
pub const MAX_GREEDY_BATCH: usize = 8;

// ── StrategyKind ──────────────────────────────────────────────────────────────

/// Which allocation policy commits new tasks to agents.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StrategyKind {
    /// Batch-optimal greedy search over all batch orderings (bottleneck objective).
    #[default]
    Greedy,
    /// Parallel single-item auction: all bids from one snapshot.
    Parallel,
    /// Sequential single-item auction in input order.
    Sequential,
    /// Sequential auction ordered by descending regret.
    Regret,
    /// Delegate to an external constraint-optimisation solver.
    External,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::Greedy,
        StrategyKind::Parallel,
        StrategyKind::Sequential,
        StrategyKind::Regret,
        StrategyKind::External,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::Greedy     => "greedy",
            StrategyKind::Parallel   => "psi",
            StrategyKind::Sequential => "ssi",
            StrategyKind::Regret     => "regret",
            StrategyKind::External   => "dcop",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "greedy"                  => Ok(StrategyKind::Greedy),
            "psi" | "parallel"        => Ok(StrategyKind::Parallel),
            "ssi" | "sequential"      => Ok(StrategyKind::Sequential),
            "regret"                  => Ok(StrategyKind::Regret),
            "dcop" | "external"       => Ok(StrategyKind::External),
            other => Err(CoreError::Config(format!("unknown strategy `{other}`"))),
        }
    }
}

// ── EngineConfig ──────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Width of the area tasks and agents live in.
    pub width: f64,

    /// Height of the area tasks and agents live in.
    pub height: f64,

    /// Number of agents in the fleet.
    pub agent_count: usize,

    /// Agent speed in distance units per simulated second.
    pub agent_speed: f64,

    /// Simulated seconds per tick (the motion `dt`).
    pub tick_duration_secs: f64,

    /// Request a new batch every N ticks.  The first request is at tick 0.
    pub allocation_interval_ticks: u64,

    /// Number of tasks requested per batch.
    pub batch_size: usize,

    /// Allocation policy.
    pub strategy: StrategyKind,

    /// Extra bid per task already queued, added by the insertion evaluator.
    /// `None` disables the penalty.
    pub insertion_penalty: Option<f64>,

    /// An agent closer than this to its target waypoint snaps onto it.
    pub arrival_epsilon: f64,

    /// Hard stop.  `None` runs until every task is delivered and the task
    /// source is exhausted.
    pub max_ticks: Option<u64>,

    /// Master RNG seed.  The same seed always produces identical task streams.
    pub seed: u64,

    /// Upper bound on one external solve, in seconds.
    pub solver_timeout_secs: f64,

    /// Consecutive external-solver failures tolerated before the run aborts.
    pub max_allocation_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width:                     800.0,
            height:                    600.0,
            agent_count:               3,
            agent_speed:               100.0,
            tick_duration_secs:        1.0 / 60.0,
            allocation_interval_ticks: 600, // 10 s at 60 ticks per second
            batch_size:                5,
            strategy:                  StrategyKind::Greedy,
            insertion_penalty:         None,
            arrival_epsilon:           1.0,
            max_ticks:                 None,
            seed:                      42,
            solver_timeout_secs:       2.0,
            max_allocation_retries:    3,
        }
    }
}

impl EngineConfig {
    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }

    /// Distance an agent covers in one tick.
    #[inline]
    pub fn step_distance(&self) -> f64 {
        self.agent_speed * self.tick_duration_secs
    }

    /// Check every field for values the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        fn positive(name: &str, v: f64) -> CoreResult<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(CoreError::Config(format!("{name} must be positive, got {v}")))
            }
        }

        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("agent_speed", self.agent_speed)?;
        positive("tick_duration_secs", self.tick_duration_secs)?;
        positive("solver_timeout_secs", self.solver_timeout_secs)?;

        if !(self.arrival_epsilon.is_finite() && self.arrival_epsilon >= 0.0) {
            return Err(CoreError::Config(format!(
                "arrival_epsilon must be non-negative, got {}",
                self.arrival_epsilon
            )));
        }
        if self.allocation_interval_ticks == 0 {
            return Err(CoreError::Config("allocation_interval_ticks must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(CoreError::Config("batch_size must be at least 1".into()));
        }
        if let Some(p) = self.insertion_penalty {
            if !(p.is_finite() && p >= 0.0) {
                return Err(CoreError::Config(format!(
                    "insertion_penalty must be non-negative, got {p}"
                )));
            }
        }
        if self.strategy == StrategyKind::Greedy && self.batch_size > MAX_GREEDY_BATCH {
            return Err(CoreError::Config(format!(
                "greedy search enumerates every batch ordering; batch_size {} exceeds {}",
                self.batch_size, MAX_GREEDY_BATCH
            )));
        }
        Ok(())
    }
}

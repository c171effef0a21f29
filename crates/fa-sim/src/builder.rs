//! Fluent builder for constructing a [`Sim`].

use fa_alloc::Allocator;
use fa_core::{AgentId, EngineConfig, Point};
use fa_fleet::{Agent, FleetBuilder};

use crate::{RunStats, Sim, SimError, SimResult, TaskSource};

/// Fluent builder for [`Sim<S>`].
///
/// # Required inputs
///
/// - [`EngineConfig`]: fleet size, speeds, intervals, strategy, …
/// - `S: TaskSource`: where tasks come from
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                          |
/// |--------------------------|--------------------------------------------------|
/// | `.initial_positions(v)`  | [`FleetBuilder::centered`] over the config area  |
/// | `.agents(v)`             | built from the positions above                   |
/// | `.allocator(a)`          | [`Allocator::from_config`]                       |
///
/// # Example
///
/// ```rust,ignore
/// let source = RandomTaskSource::from_config(&config).with_limit(20);
/// let mut sim = SimBuilder::new(config, source)
///     .initial_positions(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)])
///     .build()?;
/// let stats = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<S: TaskSource> {
    config:    EngineConfig,
    source:    S,
    agents:    Option<Vec<Agent>>,
    positions: Option<Vec<Point>>,
    allocator: Option<Allocator>,
}

impl<S: TaskSource> SimBuilder<S> {
    pub fn new(config: EngineConfig, source: S) -> Self {
        Self {
            config,
            source,
            agents:    None,
            positions: None,
            allocator: None,
        }
    }

    /// Supply the starting position of each agent (must be length
    /// `agent_count`).
    pub fn initial_positions(mut self, positions: Vec<Point>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Supply ready-made agents (must be length `agent_count`, with ids
    /// `AgentId(0)..`).  Useful for starting from committed queues.
    pub fn agents(mut self, agents: Vec<Agent>) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Override the allocator chosen from `config.strategy`, e.g. to plug in
    /// an out-of-process solver.
    pub fn allocator(mut self, allocator: Allocator) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<S>> {
        self.config.validate()?;
        let agent_count = self.config.agent_count;

        let agents = match (self.agents, self.positions) {
            (Some(_), Some(_)) => {
                return Err(SimError::Config(
                    "explicit agents and initial positions are mutually exclusive".into(),
                ));
            }
            (Some(agents), None) => {
                if agents.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      agents.len(),
                        what:     "agents",
                    });
                }
                if let Some((i, a)) = agents
                    .iter()
                    .enumerate()
                    .find(|(i, a)| a.id() != AgentId(*i as u32))
                {
                    return Err(SimError::Config(format!(
                        "agent at slot {i} has id {}, expected AgentId({i})",
                        a.id()
                    )));
                }
                agents
            }
            (None, Some(positions)) => {
                if positions.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      positions.len(),
                        what:     "initial positions",
                    });
                }
                positions
                    .into_iter()
                    .fold(FleetBuilder::new(), FleetBuilder::agent_at)
                    .build()
            }
            (None, None) => FleetBuilder::from_config(&self.config).build(),
        };

        let allocator = self
            .allocator
            .unwrap_or_else(|| Allocator::from_config(&self.config));

        Ok(Sim {
            clock:    self.config.make_clock(),
            stats:    RunStats { agent_distance: vec![0.0; agents.len()], ..RunStats::default() },
            config:   self.config,
            agents,
            source:   self.source,
            allocator,
            pending:  Vec::new(),
            exhausted: false,
            consecutive_failures: 0,
        })
    }
}

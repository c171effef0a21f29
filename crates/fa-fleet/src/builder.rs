//! Fluent builder for an initial fleet.
//!
//! # Usage
//!
//! ```rust
//! use fa_core::Point;
//! use fa_fleet::FleetBuilder;
//!
//! let agents = FleetBuilder::new()
//!     .agent_at(Point::new(0.0, 0.0))
//!     .agent_at(Point::new(10.0, 10.0))
//!     .build();
//!
//! assert_eq!(agents.len(), 2);
//! assert!(agents.iter().all(|a| a.is_idle()));
//! ```

use fa_core::{AgentId, EngineConfig, Point};

use crate::{Agent, RebuildPolicy};

/// Fluent builder for `Vec<Agent>`.
///
/// Agents receive dense ids `AgentId(0)..AgentId(n)` in insertion order, so
/// an agent's id is also its index in the returned vector.
#[derive(Clone, Debug, Default)]
pub struct FleetBuilder {
    positions: Vec<Point>,
    policy:    RebuildPolicy,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one agent at `position`.
    pub fn agent_at(mut self, position: Point) -> Self {
        self.positions.push(position);
        self
    }

    /// Add `count` agents clustered around the centre of a
    /// `width × height` area, each offset by one unit from the previous.
    pub fn centered(mut self, count: usize, width: f64, height: f64) -> Self {
        let (cx, cy) = (width / 2.0, height / 2.0);
        self.positions
            .extend((0..count).map(|i| Point::new(cx + i as f64, cy + i as f64)));
        self
    }

    /// Initial rebuild policy for every agent.
    pub fn with_policy(mut self, policy: RebuildPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `config.agent_count` agents laid out by [`centered`](Self::centered).
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new().centered(config.agent_count, config.width, config.height)
    }

    pub fn build(self) -> Vec<Agent> {
        let policy = self.policy;
        self.positions
            .into_iter()
            .enumerate()
            .map(|(i, pos)| Agent::new(AgentId(i as u32), pos).with_policy(policy))
            .collect()
    }
}

//! `fa-sim`: tick loop orchestrator for the fleet_alloc workspace.
//!
//! # Tick loop
//!
//! ```text
//! until (source exhausted ∧ nothing pending ∧ every queue empty) or max_ticks:
//!   ① Request   every allocation_interval_ticks (first at tick 0), pull up
//!                to batch_size tasks from the TaskSource into `pending`.
//!   ② Allocate  Allocator::assign(agents, pending); whatever is not
//!                committed (unassigned, failed solve, unresolvable mapping
//!                entry) stays pending for the next tick.
//!   ③ Move      Agent::advance by speed × dt; deliveries retire the head
//!                task and rebuild the route.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fa_core::EngineConfig;
//! use fa_sim::{NoopObserver, RandomTaskSource, SimBuilder};
//!
//! let config = EngineConfig::default();
//! let source = RandomTaskSource::from_config(&config).with_limit(25);
//! let mut sim = SimBuilder::new(config, source).build()?;
//! let stats = sim.run(&mut NoopObserver)?;
//! println!("done after {:.1} s", stats.simulated_secs);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod source;
pub mod stats;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use source::{RandomTaskSource, ScriptedTaskSource, TaskBatch, TaskSource};
pub use stats::RunStats;

//! `fa-alloc`: allocation strategies that commit a batch of new tasks into
//! agents' queues.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`strategy`]   | `Strategy` (closed set of policies), `Allocator`               |
//! | [`greedy`]     | batch-optimal greedy search over every batch ordering          |
//! | [`auction`]    | parallel, sequential, and regret-ordered sequential auctions   |
//! | [`external`]   | `ExternalSolver` boundary, `ExternalStrategy`, `ProblemHandle`  |
//! | [`dcop`]       | `DcopProblem` (declarative export), `LocalSearchSolver`        |
//! | [`outcome`]    | `AllocationOutcome`, `Commitment`                              |
//! | [`error`]      | `AllocError`, `SolverError`, `UnresolvedEntry`                 |
//!
//! # Design notes
//!
//! Every strategy has the same shape:
//!
//! 1. **Score** candidates against value snapshots of the fleet.  Scoring
//!    only ever reads `&[Agent]`; trial state is plain `Copy` data or an
//!    iterator chain, so one candidate can never leak into another's
//!    baseline.
//! 2. **Commit** the chosen assignments through the agent's own mutation
//!    methods (`append_task` for greedy and external, `insert_task` for the
//!    auctions).
//!
//! Greedy never reorders committed tasks and never calls the route planner.
//! The auctions switch every winning agent to
//! [`RebuildPolicy::PreserveOrder`](fa_fleet::RebuildPolicy) so their
//! evaluated insertion positions survive later rebuilds.

pub mod auction;
pub mod dcop;
pub mod error;
pub mod external;
pub mod greedy;
pub mod outcome;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use auction::{regret_order, TaskRegret};
pub use dcop::{DcopProblem, LocalSearchSolver, PairLink};
pub use error::{AllocError, AllocResult, SolverError, SolverResult, UnresolvedEntry};
pub use external::{ExternalSolver, ExternalStrategy, ProblemHandle};
pub use greedy::GreedySearch;
pub use outcome::{AllocationOutcome, Commitment};
pub use strategy::{Allocator, Strategy};

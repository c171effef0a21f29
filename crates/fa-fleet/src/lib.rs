//! `fa-fleet`: the fleet model: tasks, agents, and everything that computes
//! or follows an agent's route.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`task`]        | `Task`, an immutable pickup/drop-off request                  |
//! | [`agent`]       | `Agent`, `Phase`, `RebuildPolicy`                              |
//! | [`route`]       | `sequence_cost`, `plan_route`, `build_route_from_current_tasks`|
//! | [`insertion`]   | `InsertionEvaluator`, `InsertionBid`, `evaluate_insertion`     |
//! | [`perm`]        | `Permutations` over indices in lexicographic order             |
//! | [`motion`]      | `Agent::advance`, `MotionEvent`                                |
//! | [`builder`]     | `FleetBuilder`                                                 |
//!
//! # Route model
//!
//! An agent's route is always the interleaving
//! `[q0.start, q0.destination, q1.start, q1.destination, …]` of its queue.
//! The cost of a queue is measured from the agent's *current* position:
//!
//! ```text
//! cost = Σ dist(prev, t.start) + dist(t.start, t.destination)
//!        prev = position, then the previous task's destination
//! ```
//!
//! Every computation here is pure over `&Agent` except the explicitly
//! mutating commit methods (`append_task`, `insert_task`, `plan_route`,
//! `build_route_from_current_tasks`, `advance`).

pub mod agent;
pub mod builder;
pub mod insertion;
pub mod motion;
pub mod perm;
pub mod route;
pub mod task;


pub use agent::{Agent, Phase, RebuildPolicy};
pub use builder::FleetBuilder;
pub use insertion::{evaluate_insertion, InsertionBid, InsertionEvaluator};
pub use motion::MotionEvent;
pub use perm::Permutations;
pub use route::{sequence_cost, EXHAUSTIVE_REORDER_LIMIT};
pub use task::Task;

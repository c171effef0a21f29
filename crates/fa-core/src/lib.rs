//! `fa-core`: foundational types for the `fleet_alloc` workspace.
//!
//! This crate is a dependency of every other `fa-*` crate.  It has no `fa-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `TaskId`                                   |
//! | [`geo`]         | `Point`, Euclidean distance, straight-line stepping   |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`config`]      | `EngineConfig`, `StrategyKind`                        |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                      |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EngineConfig, StrategyKind, MAX_GREEDY_BATCH};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{AgentId, TaskId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};

//! `rg-core` — foundational types for the `rumor_grid` simulation workspace.
//!
//! This crate is a dependency of every other `rg-*` crate and has no `rg-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`ids`]    | `PersonId`, `NodeId`, `EdgeId`, `BusId`, `AgentId`, `RumorId` |
//! | [`geo`]    | `Point`, planar distance                                      |
//! | [`time`]   | `Tick`, `SimClock`                                            |
//! | [`rng`]    | `AgentRng` (per-vehicle), `SimRng` (global / per-instance)    |
//! | [`config`] | `SimConfig` and its parameter groups, TOML loading            |
//! | [`error`]  | `RgError`, `RgResult`                                         |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ContagionParams, PowerParams, RumorParams, SimConfig};
pub use error::{RgError, RgResult};
pub use geo::Point;
pub use ids::{AgentId, BusId, EdgeId, NodeId, PersonId, RumorId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick};

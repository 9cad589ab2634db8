//! `rg-power` — which traffic-control buses have power.
//!
//! The power network is a small distribution grid: a grid bus and a local
//! substation (the two sources, joined by a transformer) feeding one load
//! bus per traffic-control junction.  Buses fail and recover at random; a
//! bus is powered iff a chain of up buses joins it to a source.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`topology`] | `PowerTopology`, `Bus`, `BusKind`, `Branch` — CSR + R-tree        |
//! | [`builder`]  | `PowerTopologyBuilder`, derivation from a `RoadNetwork`           |
//! | [`reach`]    | `DownSet`, `powered_nodes`, `islanded_nodes`                      |
//! | [`failure`]  | `FailureEngine`, partition/recovery outcomes, per-tick step       |
//! | [`flow`]     | `PowerFlowSolver` trait, `ConnectivitySolver`                     |
//! | [`error`]    | `PowerError`, `PowerResult<T>`, `FlowError`                       |

pub mod builder;
pub mod error;
pub mod failure;
pub mod flow;
pub mod reach;
pub mod topology;


pub use builder::{PowerTopologyBuilder, FEEDER_LENGTH_KM, GRID_BUS, SUBSTATION_BUS};
pub use error::{FlowError, PowerError, PowerResult};
pub use failure::{FailureEngine, FailureStepReport, PartitionOutcome, RecoveryOutcome};
pub use flow::{ConnectivitySolver, PowerFlowSolver};
pub use reach::{islanded_nodes, powered_nodes, DownSet};
pub use topology::{Branch, BranchKind, Bus, BusKind, PowerTopology};

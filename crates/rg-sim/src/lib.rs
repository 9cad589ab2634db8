//! `rg-sim` — tick loop orchestrator for rumor_grid.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Traffic    — advance the traffic service; register departed vehicles
//!                  (order of appearance modulo population size).
//!   ② Rumors     — every rumor.interval_ticks, with rumor.probability,
//!                  classify one feed text and maybe spawn an instance.
//!   ③ Contagion  — every contagion.step_interval_ticks, advance all live
//!                  instances (parallel with the `parallel` feature).
//!   ④ Reroute    — look-ahead-one avoidance for every active vehicle.
//!   ⑤ Crossings  — accumulate per-edge vehicle counts.
//!   ⑥ Power      — failure → partition → recovery, then reachability and
//!                  the optional power-flow solve.
//! ```
//!
//! Contagion updates are visible to the reroute phase of the same tick, and
//! the down-set is final before reachability is queried.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Advances contagion instances on Rayon's thread pool.   |
//! | `fx-hash`  | FxHash for the vehicle-name → agent index.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rg_core::SimConfig;
//! use rg_graph::{DijkstraRouter, PopulationGraph};
//! use rg_sim::{NoopObserver, PromptPool, SimBuilder};
//!
//! let population = PopulationGraph::complete(500)?;
//! let mut sim = SimBuilder::new(config, network, population, traffic, DijkstraRouter)
//!     .classifier(Box::new(classifier))
//!     .feed(Box::new(PromptPool::new(prompts)))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod report;
pub mod sim;
pub mod traffic;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::{BusState, PowerSnapshot, RunSummary, StreetCrossing, TickReport};
pub use sim::Sim;
pub use traffic::{PromptPool, RumorFeed, ServiceError, TrafficService};

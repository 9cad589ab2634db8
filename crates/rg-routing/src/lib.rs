//! `rg-routing` — vehicle route state and hazard-avoiding reroutes.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`state`]  | `VehicleAgent` — assignment, route, position, private RNG     |
//! | [`store`]  | `VehicleStore` — `Vec<VehicleAgent>` indexed by `AgentId`     |
//! | [`engine`] | `Rerouter<R>`, `RerouteOutcome`, `safe_destinations`          |
//! | [`error`]  | `RoutingError`, `RoutingResult<T>`                            |
//!
//! # Reroute model (look-ahead one)
//!
//! Once per tick per vehicle:
//!
//! 1. the vehicle's dangerous set is the union of the related edges of every
//!    rumor its population node currently believes;
//! 2. if the edge after the current one is not in that set, nothing happens;
//! 3. otherwise one shortest-path tree is grown from the current edge, every
//!    edge whose tree path is clean and longer than one edge becomes a
//!    candidate, and the vehicle's RNG picks one;
//! 4. with no candidate the vehicle keeps its route and the outcome says so.

pub mod engine;
pub mod error;
pub mod state;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::{safe_destinations, RerouteOutcome, Rerouter};
pub use error::{RoutingError, RoutingResult};
pub use state::VehicleAgent;
pub use store::VehicleStore;

//! `rg-graph` — the graph store shared by every engine.
//!
//! Both graphs are immutable for the duration of a run.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                    |
//! |----------------|-------------------------------------------------------------|
//! | [`population`] | `PopulationGraph` — complete or explicit undirected graph   |
//! | [`network`]    | `RoadNetwork` (CSR + street index), `RoadNetworkBuilder`    |
//! | [`router`]     | `Router` trait, `Route`, `PathTree`, `DijkstraRouter`       |
//! | [`loader`]     | `TopologyRecord`, `NodeRecord`, CSV loading                 |
//! | [`error`]      | `GraphError`, `GraphResult<T>`                              |

pub mod error;
pub mod loader;
pub mod network;
pub mod population;
pub mod router;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use loader::{load_network_csv, load_network_readers, NodeRecord, TopologyRecord};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use population::PopulationGraph;
pub use router::{DijkstraRouter, PathTree, Route, Router};

//! Power-flow collaborator seam.
//!
//! Reachability only needs connectivity; voltages are an optional export.
//! An AC solver lives outside this crate and plugs in through
//! [`PowerFlowSolver`].

use crate::{powered_nodes, DownSet, FlowError, PowerTopology};

/// Solves the network state for one tick.
pub trait PowerFlowSolver {
    /// Per-bus voltage magnitude in per-unit, indexed by `BusId`.
    ///
    /// `loads_mw` is the current load of every bus (zero while down).
    fn solve(&self, topology: &PowerTopology, down: &DownSet, loads_mw: &[f64]) -> Result<Vec<f64>, FlowError>;
}

/// Lossless stand-in: 1.0 p.u. at every powered bus, 0.0 elsewhere.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConnectivitySolver;

impl PowerFlowSolver for ConnectivitySolver {
    fn solve(&self, topology: &PowerTopology, down: &DownSet, _loads_mw: &[f64]) -> Result<Vec<f64>, FlowError> {
        let powered = powered_nodes(topology, down);
        Ok(topology
            .bus_ids()
            .map(|b| if powered.contains(&b) { 1.0 } else { 0.0 })
            .collect())
    }
}

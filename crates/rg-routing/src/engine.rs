//! Look-ahead-one hazard rerouting.

use std::fmt;

use rg_contagion::ContagionInstance;
use rg_core::EdgeId;
use rg_graph::{GraphError, PathTree, RoadNetwork, Route, Router};
use rg_hazard::{dangerous_for, DangerSet};
use tracing::debug;

use crate::{RoutingError, RoutingResult, VehicleAgent};

// ── RerouteOutcome ────────────────────────────────────────────────────────────

/// What [`Rerouter::reroute_if_needed`] did for one vehicle.
///
/// Only `Rerouted` changes the vehicle's route.
#[derive(Debug, Clone, PartialEq)]
pub enum RerouteOutcome {
    /// The vehicle has no population assignment; nothing was checked.
    Unassigned,
    /// The vehicle believes no live rumor.
    NoDanger,
    /// The next edge is safe, or the vehicle is on its last edge.
    NextEdgeClear,
    /// The next edge is dangerous and no clean destination exists; the
    /// vehicle keeps its route.
    NoSafePath { next: EdgeId },
    /// The vehicle now follows `route` from its current edge.
    Rerouted { route: Route, candidates: usize },
}

impl RerouteOutcome {
    pub fn is_rerouted(&self) -> bool {
        matches!(self, RerouteOutcome::Rerouted { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RerouteOutcome::Unassigned        => "unassigned",
            RerouteOutcome::NoDanger          => "no_danger",
            RerouteOutcome::NextEdgeClear     => "next_edge_clear",
            RerouteOutcome::NoSafePath { .. } => "no_safe_path",
            RerouteOutcome::Rerouted { .. }   => "rerouted",
        }
    }
}

impl fmt::Display for RerouteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Rerouter ──────────────────────────────────────────────────────────────────

/// Steers vehicles away from the edges of rumors they believe.
///
/// # Type parameter
///
/// `R` is the shortest-path service, e.g. [`rg_graph::DijkstraRouter`] or a
/// traffic simulator's own router.
pub struct Rerouter<R: Router> {
    pub router: R,
}

impl<R: Router> Rerouter<R> {
    pub fn new(router: R) -> Self {
        Self { router }
    }

    /// Reroute `vehicle` if the edge it enters next is dangerous for it.
    ///
    /// Danger is derived from `instances` for the vehicle's population node.
    pub fn reroute_if_needed(
        &self,
        vehicle:   &mut VehicleAgent,
        instances: &[ContagionInstance],
        network:   &RoadNetwork,
    ) -> RoutingResult<RerouteOutcome> {
        let dangerous = dangerous_for(vehicle.person, instances);
        self.reroute_around(vehicle, &dangerous, network)
    }

    /// Like [`reroute_if_needed`](Self::reroute_if_needed) with the
    /// dangerous set already computed.
    ///
    /// Avoidance looks exactly one edge ahead: danger further down the route
    /// is ignored until the vehicle is about to enter it.  When the next edge
    /// is dangerous, every edge whose shortest path from the current edge is
    /// longer than one edge and free of dangerous edges is a candidate
    /// destination; one is drawn with the vehicle's RNG.
    ///
    /// # Errors
    ///
    /// Only contract violations: a vehicle with no current edge (an empty
    /// route or an index past its end), or a current edge unknown to the
    /// router.
    pub fn reroute_around(
        &self,
        vehicle:   &mut VehicleAgent,
        dangerous: &DangerSet,
        network:   &RoadNetwork,
    ) -> RoutingResult<RerouteOutcome> {
        if dangerous.is_empty() {
            return Ok(RerouteOutcome::NoDanger);
        }
        let Some(current) = vehicle.current_edge() else {
            return Err(RoutingError::IndexOutOfRoute {
                agent: vehicle.agent,
                index: vehicle.index,
                len:   vehicle.route.len(),
            });
        };
        let Some(next) = vehicle.next_edge().filter(|e| dangerous.contains(e)) else {
            return Ok(RerouteOutcome::NextEdgeClear);
        };

        let tree = self.router.tree(network, current)?;
        let candidates = safe_destinations(&tree, dangerous);
        let Some(&dest) = vehicle.rng.choose(&candidates) else {
            debug!(vehicle = %vehicle.name, current = %current, next = %next, "no safe path; keeping route");
            return Ok(RerouteOutcome::NoSafePath { next });
        };
        let route = tree
            .route_to(dest)
            .ok_or(GraphError::NoRoute { from: current, to: dest })?;

        debug!(
            vehicle    = %vehicle.name,
            avoided    = %next,
            dest       = %dest,
            edges      = route.len(),
            candidates = candidates.len(),
            "vehicle rerouted"
        );
        vehicle.sync(route.edges.clone(), 0);
        Ok(RerouteOutcome::Rerouted { route, candidates: candidates.len() })
    }
}

// ── Candidate search ──────────────────────────────────────────────────────────

/// Edges whose tree path from the root has at least two edges and touches
/// no dangerous edge, the root included.  Ascending `EdgeId` order.
pub fn safe_destinations(tree: &PathTree, dangerous: &DangerSet) -> Vec<EdgeId> {
    let n = tree.prev.len();
    let mut clean: Vec<Option<bool>> = vec![None; n];
    if let Some(slot) = clean.get_mut(tree.root.index()) {
        *slot = Some(!dangerous.contains(&tree.root));
    }

    let mut chain = Vec::new();
    let mut out = Vec::new();
    for i in 0..n {
        let edge = EdgeId(i as u32);
        if edge == tree.root || !tree.reaches(edge) {
            continue;
        }
        // Walk up to the nearest edge whose verdict is known, then fill the
        // chain back down.
        chain.clear();
        let mut cur = edge;
        let mut ok = loop {
            match clean[cur.index()] {
                Some(v) => break v,
                None => {
                    chain.push(cur);
                    cur = tree.prev[cur.index()];
                }
            }
        };
        for &e in chain.iter().rev() {
            ok = ok && !dangerous.contains(&e);
            clean[e.index()] = Some(ok);
        }
        if ok {
            out.push(edge);
        }
    }
    out
}

//! Routing trait and default Dijkstra implementation.
//!
//! Routes are **edge-to-edge**: a vehicle always sits on an edge, so a route
//! starts with the edge the vehicle is on and ends with the destination edge.
//! A route from an edge to itself is that single edge.
//!
//! # Pluggability
//!
//! The reroute engine calls routing through the [`Router`] trait so that a
//! traffic simulator's own shortest-path service can stand in for the
//! default [`DijkstraRouter`].
//!
//! # Cost units
//!
//! Costs are free-flow travel time in **milliseconds** (u32).  The cost of a
//! route excludes the first edge, which the vehicle is already on.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rg_core::EdgeId;

use crate::network::RoadNetwork;
use crate::GraphError;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered list of `EdgeId`s and the total
/// travel time after the first edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Edges to traverse in order, starting with the origin edge.
    pub edges: Vec<EdgeId>,
    /// Cumulative free-flow travel time in seconds.
    pub total_travel_secs: f32,
}

impl Route {
    /// Number of edges, origin included.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, edge: EdgeId) -> bool {
        self.edges.contains(&edge)
    }
}

// ── PathTree ──────────────────────────────────────────────────────────────────

/// One-to-all shortest-path tree rooted at an edge.
///
/// Produced by [`Router::tree`]; lets a caller inspect the shortest path to
/// every edge of the network after a single search.
#[derive(Debug, Clone)]
pub struct PathTree {
    pub root: EdgeId,
    /// `prev[e]` = predecessor of `e` on its shortest path; `INVALID` for the
    /// root and for unreached edges.
    pub prev: Vec<EdgeId>,
    /// `cost_ms[e]` = path cost, `u32::MAX` if unreached.
    pub cost_ms: Vec<u32>,
}

impl PathTree {
    pub fn reaches(&self, edge: EdgeId) -> bool {
        self.cost_ms.get(edge.index()).is_some_and(|&c| c != u32::MAX)
    }

    /// Shortest path from the root to `edge`, or `None` if unreachable.
    pub fn route_to(&self, edge: EdgeId) -> Option<Route> {
        if !self.reaches(edge) {
            return None;
        }
        let mut edges = vec![edge];
        let mut cur = edge;
        while cur != self.root {
            cur = self.prev[cur.index()];
            edges.push(cur);
        }
        edges.reverse();
        Some(Route {
            edges,
            total_travel_secs: self.cost_ms[edge.index()] as f32 / 1000.0,
        })
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable edge-to-edge routing engine.
///
/// Implementations must be `Send + Sync` so one router can serve every
/// vehicle agent.
pub trait Router: Send + Sync {
    /// Shortest route from `from` to `to`, both endpoints included.
    fn route(&self, network: &RoadNetwork, from: EdgeId, to: EdgeId) -> Result<Route, GraphError>;

    /// Shortest-path tree from `from` to every reachable edge.
    fn tree(&self, network: &RoadNetwork, from: EdgeId) -> Result<PathTree, GraphError>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the edge-adjacency of the CSR graph,
/// using `edge_travel_ms` as cost.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, network: &RoadNetwork, from: EdgeId, to: EdgeId) -> Result<Route, GraphError> {
        if !network.contains_edge(to) {
            return Err(GraphError::EdgeNotFound(to));
        }
        let tree = dijkstra(network, from, Some(to))?;
        tree.route_to(to).ok_or(GraphError::NoRoute { from, to })
    }

    fn tree(&self, network: &RoadNetwork, from: EdgeId) -> Result<PathTree, GraphError> {
        dijkstra(network, from, None)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(network: &RoadNetwork, from: EdgeId, target: Option<EdgeId>) -> Result<PathTree, GraphError> {
    if !network.contains_edge(from) {
        return Err(GraphError::EdgeNotFound(from));
    }

    let n = network.edge_count();
    let mut cost_ms = vec![u32::MAX; n];
    let mut prev    = vec![EdgeId::INVALID; n];
    cost_ms[from.index()] = 0;

    // Min-heap: (cost, edge). Secondary key EdgeId ensures deterministic
    // tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, EdgeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, edge))) = heap.pop() {
        if Some(edge) == target {
            break;
        }
        // Skip stale heap entries.
        if cost > cost_ms[edge.index()] {
            continue;
        }
        for next in network.successors(edge) {
            let new_cost = cost.saturating_add(network.edge_travel_ms[next.index()]);
            if new_cost < cost_ms[next.index()] {
                cost_ms[next.index()] = new_cost;
                prev[next.index()] = edge;
                heap.push(Reverse((new_cost, next)));
            }
        }
    }

    Ok(PathTree { root: from, prev, cost_ms })
}

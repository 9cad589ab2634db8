//! Unit tests for rg-routing.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use rg_contagion::ContagionInstance;
    use rg_core::{AgentId, ContagionParams, EdgeId, PersonId, RumorId, SimRng, Tick};
    use rg_graph::{PopulationGraph, RoadNetwork, RoadNetworkBuilder};
    use rg_hazard::Assignment;

    use crate::VehicleAgent;

    /// One-way fork:
    ///
    /// ```text
    ///   N0 ─E1─▶ N1 ─E2─▶ N2 ─E3─▶ N3
    ///             │
    ///             └─E4─▶ N4
    /// ```
    pub fn fork_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let n0 = b.add_node("N0", None);
        let n1 = b.add_node("N1", None);
        let n2 = b.add_node("N2", None);
        let n3 = b.add_node("N3", None);
        let n4 = b.add_node("N4", None);
        b.add_directed_edge("E1", Some("First"), n0, n1, 100.0, 10_000);
        b.add_directed_edge("E2", Some("Second"), n1, n2, 100.0, 10_000);
        b.add_directed_edge("E3", Some("Third"), n2, n3, 100.0, 10_000);
        b.add_directed_edge("E4", Some("Fourth"), n1, n4, 100.0, 10_000);
        b.build().unwrap()
    }

    /// Two-way grid, every road on its own street:
    ///
    /// ```text
    ///   J0 ── J1 ── J2
    ///   │      │     │
    ///   J3 ── J4 ── J5
    /// ```
    pub fn grid_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let j: Vec<_> = (0..6).map(|i| b.add_node(&format!("J{i}"), None)).collect();
        let roads = [("a", 0, 1), ("b", 1, 2), ("c", 3, 4), ("d", 4, 5), ("e", 0, 3), ("f", 1, 4), ("g", 2, 5)];
        for (name, x, y) in roads {
            b.add_road(name, Some(name), j[x], j[y], 100.0, 10_000);
        }
        b.build().unwrap()
    }

    pub fn edge(net: &RoadNetwork, name: &str) -> EdgeId {
        net.edge_by_name(name).unwrap_or_else(|| panic!("no edge {name}"))
    }

    pub fn vehicle(person: u32, seed: u64) -> VehicleAgent {
        VehicleAgent::new("veh0", Assignment { agent: AgentId(0), person: PersonId(person) }, seed)
    }

    /// A rumor over a population of two believed by person 0 only.
    pub fn rumor(edges: &[EdgeId]) -> ContagionInstance {
        let params = ContagionParams { infection_probability: 0.0, ..ContagionParams::default() };
        ContagionInstance::new(
            RumorId(0),
            "r",
            Arc::new(PopulationGraph::complete(2).unwrap()),
            PersonId(0),
            edges.iter().copied(),
            &params,
            Tick::ZERO,
            SimRng::new(0),
        )
        .unwrap()
    }
}

// ── VehicleAgent / VehicleStore ───────────────────────────────────────────────

#[cfg(test)]
mod vehicle_state {
    use rg_core::{AgentId, EdgeId, PersonId};
    use rg_hazard::Assignment;

    use super::helpers::*;
    use crate::{RoutingError, VehicleAgent, VehicleStore};

    #[test]
    fn current_and_next_edges() {
        let mut v = vehicle(0, 1);
        assert_eq!(v.current_edge(), None);
        v.sync(vec![EdgeId(3), EdgeId(5), EdgeId(8)], 1);
        assert_eq!(v.current_edge(), Some(EdgeId(5)));
        assert_eq!(v.next_edge(), Some(EdgeId(8)));
        assert_eq!(v.remaining(), &[EdgeId(5), EdgeId(8)]);
        v.sync(vec![EdgeId(3), EdgeId(5), EdgeId(8)], 2);
        assert_eq!(v.next_edge(), None);
    }

    #[test]
    fn store_requires_contiguous_ids() {
        let mut store = VehicleStore::new();
        store.insert(vehicle(0, 1)).unwrap();
        let late = VehicleAgent::new("veh2", Assignment { agent: AgentId(2), person: PersonId(0) }, 1);
        assert!(matches!(store.insert(late), Err(RoutingError::OutOfOrder { len: 1, .. })));
        assert_eq!(store.len(), 1);
        assert!(store.get(AgentId(0)).is_ok());
        assert!(matches!(store.get(AgentId(1)), Err(RoutingError::UnknownAgent(AgentId(1)))));
    }
}

// ── Rerouting ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reroute {
    use std::collections::BTreeSet;

    use rg_graph::DijkstraRouter;

    use super::helpers::*;
    use crate::{RerouteOutcome, Rerouter, RoutingError};

    #[test]
    fn dangerous_next_edge_takes_the_only_safe_branch() {
        let net = fork_network();
        let (e1, e2, e3, e4) = (edge(&net, "E1"), edge(&net, "E2"), edge(&net, "E3"), edge(&net, "E4"));
        let instances = [rumor(&[e2])];
        let mut v = vehicle(0, 9);
        v.sync(vec![e1, e2, e3], 0);

        let out = Rerouter::new(DijkstraRouter).reroute_if_needed(&mut v, &instances, &net).unwrap();
        let RerouteOutcome::Rerouted { route, candidates } = out else {
            panic!("expected a reroute, got {out:?}");
        };
        assert_eq!(candidates, 1);
        assert_eq!(route.edges, vec![e1, e4]);
        assert_eq!(v.route, vec![e1, e4]);
        assert_eq!(v.index, 0);
    }

    #[test]
    fn unaware_vehicle_keeps_route() {
        let net = fork_network();
        let (e1, e2, e3) = (edge(&net, "E1"), edge(&net, "E2"), edge(&net, "E3"));
        let instances = [rumor(&[e2])];
        let mut v = vehicle(1, 9);
        v.sync(vec![e1, e2, e3], 0);
        let out = Rerouter::new(DijkstraRouter).reroute_if_needed(&mut v, &instances, &net).unwrap();
        assert_eq!(out, RerouteOutcome::NoDanger);
        assert_eq!(v.route, vec![e1, e2, e3]);
    }

    #[test]
    fn danger_beyond_next_edge_is_ignored() {
        let net = fork_network();
        let (e1, e2, e3) = (edge(&net, "E1"), edge(&net, "E2"), edge(&net, "E3"));
        let mut v = vehicle(0, 9);
        v.sync(vec![e1, e2, e3], 0);
        let out = Rerouter::new(DijkstraRouter).reroute_around(&mut v, &BTreeSet::from([e3]), &net).unwrap();
        assert_eq!(out, RerouteOutcome::NextEdgeClear);
        assert_eq!(v.route, vec![e1, e2, e3]);
    }

    #[test]
    fn last_edge_needs_no_check() {
        let net = fork_network();
        let (e1, e2) = (edge(&net, "E1"), edge(&net, "E2"));
        let mut v = vehicle(0, 9);
        v.sync(vec![e1, e2], 1);
        let out = Rerouter::new(DijkstraRouter).reroute_around(&mut v, &BTreeSet::from([e1]), &net).unwrap();
        assert_eq!(out, RerouteOutcome::NextEdgeClear);
    }

    #[test]
    fn no_safe_path_keeps_route() {
        let net = fork_network();
        let (e1, e2, e3, e4) = (edge(&net, "E1"), edge(&net, "E2"), edge(&net, "E3"), edge(&net, "E4"));
        let mut v = vehicle(0, 9);
        v.sync(vec![e1, e2, e3], 0);
        let out = Rerouter::new(DijkstraRouter).reroute_around(&mut v, &BTreeSet::from([e2, e4]), &net).unwrap();
        assert_eq!(out, RerouteOutcome::NoSafePath { next: e2 });
        assert_eq!(v.route, vec![e1, e2, e3]);
    }

    #[test]
    fn dangerous_current_edge_leaves_no_clean_path() {
        let net = fork_network();
        let (e1, e2, e3) = (edge(&net, "E1"), edge(&net, "E2"), edge(&net, "E3"));
        let mut v = vehicle(0, 9);
        v.sync(vec![e1, e2, e3], 0);
        let out = Rerouter::new(DijkstraRouter).reroute_around(&mut v, &BTreeSet::from([e1, e2]), &net).unwrap();
        assert!(matches!(out, RerouteOutcome::NoSafePath { .. }));
    }

    #[test]
    fn index_past_route_end_is_an_error() {
        let net = fork_network();
        let e1 = edge(&net, "E1");
        let mut v = vehicle(0, 9);
        v.sync(vec![e1], 4);
        let err = Rerouter::new(DijkstraRouter).reroute_around(&mut v, &BTreeSet::from([e1]), &net).unwrap_err();
        assert!(matches!(err, RoutingError::IndexOutOfRoute { index: 4, len: 1, .. }));
    }

    #[test]
    fn empty_route_is_an_error() {
        let net = fork_network();
        let e1 = edge(&net, "E1");
        let mut v = vehicle(0, 9);
        v.sync(Vec::new(), 0);
        let err = Rerouter::new(DijkstraRouter).reroute_around(&mut v, &BTreeSet::from([e1]), &net).unwrap_err();
        assert!(matches!(err, RoutingError::IndexOutOfRoute { index: 0, len: 0, .. }));
    }

    #[test]
    fn selected_route_never_touches_danger() {
        let net = grid_network();
        let (a, b, f) = (edge(&net, "a"), edge(&net, "b"), edge(&net, "f"));
        let dangerous = BTreeSet::from([b, f, edge(&net, "-c")]);
        let router = Rerouter::new(DijkstraRouter);
        let mut rerouted = 0;
        for seed in 0..64 {
            let mut v = vehicle(0, seed);
            v.sync(vec![a, b], 0);
            if let RerouteOutcome::Rerouted { route, .. } = router.reroute_around(&mut v, &dangerous, &net).unwrap() {
                rerouted += 1;
                assert!(route.len() > 1);
                assert_eq!(route.edges[0], a);
                assert!(route.edges.iter().all(|e| !dangerous.contains(e)), "seed {seed}: {:?}", route.edges);
            }
        }
        assert_eq!(rerouted, 64);
    }
}

// ── Candidate search ──────────────────────────────────────────────────────────

#[cfg(test)]
mod candidates {
    use std::collections::BTreeSet;

    use rg_graph::{DijkstraRouter, Router};

    use super::helpers::*;
    use crate::safe_destinations;

    #[test]
    fn root_alone_is_never_a_candidate() {
        let net = fork_network();
        let e3 = edge(&net, "E3");
        let tree = DijkstraRouter.tree(&net, e3).unwrap();
        assert!(safe_destinations(&tree, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn dirty_prefix_taints_descendants() {
        let net = fork_network();
        let (e1, e2, e3, e4) = (edge(&net, "E1"), edge(&net, "E2"), edge(&net, "E3"), edge(&net, "E4"));
        let tree = DijkstraRouter.tree(&net, e1).unwrap();
        let all = safe_destinations(&tree, &BTreeSet::new());
        assert_eq!(all.len(), 3);
        assert!(all.contains(&e3));
        assert_eq!(safe_destinations(&tree, &BTreeSet::from([e2])), vec![e4]);
    }
}

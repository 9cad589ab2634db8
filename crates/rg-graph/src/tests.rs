//! Unit tests for rg-graph.
//!
//! All tests use hand-crafted networks so they run without any export file.

#[cfg(test)]
pub(crate) mod helpers {
    use rg_core::{EdgeId, Point};

    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Small grid of junctions:
    ///
    /// ```text
    ///   J0 ── J1 ── J2
    ///   │            │
    ///   J3 ───────── J4
    /// ```
    ///
    /// All roads two-way.  Travel times make J0→J1→J2→J4 (30 s) faster than
    /// J0→J3→J4 (60 s).
    pub fn grid_network() -> RoadNetwork {
        let mut b = RoadNetworkBuilder::new();
        let j0 = b.add_node("J0", Some(Point::new(0.0, 0.0)));
        let j1 = b.add_node("J1", Some(Point::new(100.0, 0.0)));
        let j2 = b.add_node("J2", Some(Point::new(200.0, 0.0)));
        let j3 = b.add_node("J3", Some(Point::new(0.0, -100.0)));
        let j4 = b.add_node("J4", Some(Point::new(200.0, -100.0)));

        b.add_road("A", Some("North Road"), j0, j1, 100.0, 10_000);
        b.add_road("B", Some("North Road"), j1, j2, 100.0, 10_000);
        b.add_road("C", Some("East Lane"), j2, j4, 100.0, 10_000);
        b.add_road("D", Some("West Lane"), j0, j3, 500.0, 50_000);
        b.add_road("F", None, j3, j4, 100.0, 10_000);
        b.build().unwrap()
    }

    pub fn edge(net: &RoadNetwork, name: &str) -> EdgeId {
        net.edge_by_name(name).unwrap_or_else(|| panic!("no edge {name}"))
    }
}

// ── Population graph ──────────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use rg_core::PersonId;

    use crate::{GraphError, PopulationGraph};

    #[test]
    fn empty_population_rejected() {
        assert!(matches!(PopulationGraph::complete(0), Err(GraphError::EmptyPopulation)));
    }

    #[test]
    fn complete_graph_neighbours() {
        let g = PopulationGraph::complete(4).unwrap();
        assert!(g.is_complete());
        let n: Vec<_> = g.neighbours(PersonId(1)).collect();
        assert_eq!(n, vec![PersonId(0), PersonId(2), PersonId(3)]);
        assert_eq!(g.degree(PersonId(1)), 3);
        assert!(g.contains(PersonId(3)));
        assert!(!g.contains(PersonId(4)));
    }

    #[test]
    fn complete_graph_infected_count_excludes_self() {
        let g = PopulationGraph::complete(5).unwrap();
        let infected = |p: PersonId| p.0 < 2;
        assert_eq!(g.infected_neighbours(PersonId(0), 2, infected), 1);
        assert_eq!(g.infected_neighbours(PersonId(4), 2, infected), 2);
    }

    #[test]
    fn explicit_graph_is_symmetric_and_deduplicated() {
        let g = PopulationGraph::from_edges(
            3,
            &[(PersonId(0), PersonId(1)), (PersonId(1), PersonId(0)), (PersonId(2), PersonId(2))],
        )
        .unwrap();
        assert_eq!(g.neighbours(PersonId(0)).collect::<Vec<_>>(), vec![PersonId(1)]);
        assert_eq!(g.neighbours(PersonId(1)).collect::<Vec<_>>(), vec![PersonId(0)]);
        assert_eq!(g.degree(PersonId(2)), 0);
        assert_eq!(g.infected_neighbours(PersonId(2), 2, |p| p.0 < 2), 0);
    }

    #[test]
    fn explicit_graph_rejects_out_of_range() {
        let err = PopulationGraph::from_edges(2, &[(PersonId(0), PersonId(5))]).unwrap_err();
        assert!(matches!(err, GraphError::PersonOutOfRange(PersonId(5), 2)));
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rg_core::Point;

    use super::helpers::{edge, grid_network};
    use crate::{GraphError, RoadNetworkBuilder};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build().unwrap();
        assert_eq!(net.node_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn nodes_are_interned() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node("J", None);
        let a2 = b.add_node("J", Some(Point::new(1.0, 2.0)));
        assert_eq!(a, a2);
        assert_eq!(b.node_count(), 1);
        assert_eq!(b.node_pos(a), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn roads_get_mirrored_edges() {
        let net = grid_network();
        assert_eq!(net.edge_count(), 10);
        let a = edge(&net, "A");
        let back = edge(&net, "-A");
        assert_eq!(net.edge_from[a.index()], net.edge_to[back.index()]);
        assert_eq!(net.edge_to[a.index()], net.edge_from[back.index()]);
    }

    #[test]
    fn csr_edges_sorted_by_source() {
        let net = grid_network();
        for node in 0..net.node_count() as u32 {
            for e in net.out_edges(rg_core::NodeId(node)) {
                assert_eq!(net.edge_from[e.index()].0, node);
            }
        }
    }

    #[test]
    fn street_index_groups_both_directions() {
        let net = grid_network();
        let north = net.street_edges("North Road");
        assert_eq!(north.len(), 4);
        assert!(north.contains(&edge(&net, "-B")));
        assert_eq!(net.street_of(edge(&net, "F")), None);
        assert!(net.street_edges("Nowhere").is_empty());
        let names: Vec<_> = net.street_names().collect();
        assert_eq!(names, ["East Lane", "North Road", "West Lane"]);
    }

    #[test]
    fn duplicate_edge_names_rejected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node("J0", None);
        let c = b.add_node("J1", None);
        b.add_directed_edge("E", None, a, c, 1.0, 1);
        b.add_directed_edge("E", None, c, a, 1.0, 1);
        assert!(matches!(b.build(), Err(GraphError::DuplicateEdge(name)) if name == "E"));
    }

    #[test]
    fn successors_follow_junctions() {
        let net = grid_network();
        let succ: Vec<_> = net.successors(edge(&net, "A")).collect();
        // A ends at J1, whose outgoing edges are -A and B.
        assert_eq!(succ.len(), 2);
        assert!(succ.contains(&edge(&net, "B")));
        assert!(succ.contains(&edge(&net, "-A")));
    }
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use rg_core::EdgeId;

    use super::helpers::{edge, grid_network};
    use crate::{DijkstraRouter, GraphError, RoadNetwork, Router};

    #[test]
    fn route_includes_both_endpoints() {
        let net = grid_network();
        let r = DijkstraRouter.route(&net, edge(&net, "A"), edge(&net, "C")).unwrap();
        assert_eq!(r.edges, vec![edge(&net, "A"), edge(&net, "B"), edge(&net, "C")]);
        assert!((r.total_travel_secs - 20.0).abs() < 1e-3);
    }

    #[test]
    fn route_to_self_is_single_edge() {
        let net = grid_network();
        let a = edge(&net, "A");
        let r = DijkstraRouter.route(&net, a, a).unwrap();
        assert_eq!(r.edges, vec![a]);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn shortest_path_prefers_fast_roads() {
        let net = grid_network();
        // From -B (J2→J1) to -D (J3→J0).  Via the slow west road the
        // detour costs 110 s; looping round by J2 and J4 costs 80 s.
        let r = DijkstraRouter.route(&net, edge(&net, "-B"), edge(&net, "-D")).unwrap();
        let names: Vec<_> = r.edges.iter().map(|e| net.edge_name[e.index()].as_str()).collect();
        assert_eq!(names, ["-B", "B", "C", "-F", "-D"]);
        assert!((r.total_travel_secs - 80.0).abs() < 1e-3);
    }

    #[test]
    fn tree_matches_point_queries() {
        let net = grid_network();
        let from = edge(&net, "A");
        let tree = DijkstraRouter.tree(&net, from).unwrap();
        for to in net.edges() {
            let direct = DijkstraRouter.route(&net, from, to).unwrap();
            let via_tree = tree.route_to(to).unwrap();
            assert_eq!(direct.total_travel_secs, via_tree.total_travel_secs);
            assert_eq!(via_tree.edges.first(), Some(&from));
            assert_eq!(via_tree.edges.last(), Some(&to));
        }
    }

    #[test]
    fn one_way_dead_end_has_no_route() {
        let mut b = crate::RoadNetworkBuilder::new();
        let a = b.add_node("J0", None);
        let c = b.add_node("J1", None);
        b.add_directed_edge("X", None, a, c, 10.0, 1_000);
        b.add_directed_edge("Y", None, a, c, 10.0, 1_000);
        let net = b.build().unwrap();
        let (x, y) = (edge(&net, "X"), edge(&net, "Y"));
        assert!(matches!(
            DijkstraRouter.route(&net, x, y),
            Err(GraphError::NoRoute { .. })
        ));
        assert!(!DijkstraRouter.tree(&net, x).unwrap().reaches(y));
    }

    #[test]
    fn unknown_edge_is_error() {
        let net = RoadNetwork::empty();
        assert!(matches!(
            DijkstraRouter.tree(&net, EdgeId(0)),
            Err(GraphError::EdgeNotFound(EdgeId(0)))
        ));
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::load_network_readers;

    const EDGES: &str = "\
edge_id,street,from,to,length_m,speed_mps
E1,Holden Boulevard,J1,J2,120.0,12.0
-E1,Holden Boulevard,J2,J1,,
E2,,J2,J3,,
";

    const NODES: &str = "\
node_id,x,y,control
J1,0.0,0.0,true
J2,300.0,400.0,false
J3,300.0,500.0,true
";

    #[test]
    fn loads_edges_and_streets() {
        let net = load_network_readers(Cursor::new(EDGES), Some(Cursor::new(NODES))).unwrap();
        assert_eq!(net.node_count(), 3);
        assert_eq!(net.edge_count(), 3);
        assert_eq!(net.street_edges("Holden Boulevard").len(), 2);
        let e2 = net.edge_by_name("E2").unwrap();
        assert_eq!(net.street_of(e2), None);
    }

    #[test]
    fn missing_length_falls_back_to_node_distance() {
        let net = load_network_readers(Cursor::new(EDGES), Some(Cursor::new(NODES))).unwrap();
        let e1 = net.edge_by_name("E1").unwrap();
        let back = net.edge_by_name("-E1").unwrap();
        assert_eq!(net.edge_length_m[e1.index()], 120.0);
        assert_eq!(net.edge_travel_ms[e1.index()], 10_000);
        assert!((net.edge_length_m[back.index()] - 500.0).abs() < 1e-3);
    }

    #[test]
    fn control_nodes_flagged() {
        let net = load_network_readers(Cursor::new(EDGES), Some(Cursor::new(NODES))).unwrap();
        let names: Vec<_> = net.control_nodes().map(|n| net.node_name[n.index()].as_str()).collect();
        assert_eq!(names, ["J1", "J3"]);
    }

    #[test]
    fn nodes_file_is_optional() {
        let net = load_network_readers(Cursor::new(EDGES), None::<Cursor<&str>>).unwrap();
        let e2 = net.edge_by_name("E2").unwrap();
        assert_eq!(net.edge_length_m[e2.index()], crate::loader::DEFAULT_LENGTH_M);
        assert!(net.node_pos.iter().all(Option::is_none));
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let bad = "edge_id,street,from,to,length_m,speed_mps\nE1,S,J1,J2,abc,\n";
        let result = load_network_readers(Cursor::new(bad), None::<Cursor<&str>>);
        assert!(matches!(result, Err(crate::GraphError::Parse(_))));
    }
}

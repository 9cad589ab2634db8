//! Topology loading.
//!
//! The road network reaches the core as a stream of
//! `(edge_id, street, from, to)` tuples, optionally with a length and speed,
//! plus an optional node table with coordinates and traffic-control flags.
//! How those tuples are extracted from a simulator's network export is the
//! loader's business; [`RoadNetwork::from_records`] only consumes them.
//!
//! # CSV format
//!
//! Edges (required):
//!
//! ```csv
//! edge_id,street,from,to,length_m,speed_mps
//! E1,Holden Boulevard,J1,J2,120.0,13.9
//! -E1,Holden Boulevard,J2,J1,,
//! E2,,J2,J3,,
//! ```
//!
//! Nodes (optional):
//!
//! ```csv
//! node_id,x,y,control
//! J1,0.0,0.0,true
//! J2,120.0,0.0,false
//! ```
//!
//! Missing lengths fall back to the straight-line distance between known
//! node positions, then to [`DEFAULT_LENGTH_M`]; missing speeds fall back to
//! [`DEFAULT_SPEED_MPS`].

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rg_core::Point;

use crate::{GraphError, RoadNetwork, RoadNetworkBuilder};

/// Used when neither a length nor both endpoint positions are known.
pub const DEFAULT_LENGTH_M: f32 = 100.0;

/// Urban free-flow speed (50 km/h).
pub const DEFAULT_SPEED_MPS: f32 = 13.89;

// ── Records ───────────────────────────────────────────────────────────────────

/// One directed topology edge as delivered by the topology provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopologyRecord {
    pub edge_id:   String,
    #[serde(default)]
    pub street:    Option<String>,
    pub from:      String,
    pub to:        String,
    #[serde(default)]
    pub length_m:  Option<f32>,
    #[serde(default)]
    pub speed_mps: Option<f32>,
}

/// One junction with its position and traffic-control flag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub node_id: String,
    pub x:       f64,
    pub y:       f64,
    #[serde(default)]
    pub control: bool,
}

// ── Construction from records ─────────────────────────────────────────────────

impl RoadNetwork {
    /// Build a network from provider tuples.
    ///
    /// Nodes are registered first so that edge lengths can fall back to
    /// node distances.
    pub fn from_records(edges: &[TopologyRecord], nodes: &[NodeRecord]) -> Result<RoadNetwork, GraphError> {
        let mut b = RoadNetworkBuilder::new();
        for n in nodes {
            let id = b.add_node(&n.node_id, Some(Point::new(n.x, n.y)));
            b.set_control(id, n.control);
        }
        for e in edges {
            let from = b.add_node(&e.from, None);
            let to   = b.add_node(&e.to, None);
            let length_m = match (e.length_m, b.node_pos(from), b.node_pos(to)) {
                (Some(len), _, _) => len,
                (None, Some(p), Some(q)) => p.distance_m(q) as f32,
                _ => DEFAULT_LENGTH_M,
            };
            let speed = e.speed_mps.filter(|s| *s > 0.0).unwrap_or(DEFAULT_SPEED_MPS);
            let travel_ms = (length_m / speed * 1000.0).round() as u32;
            b.add_directed_edge(&e.edge_id, e.street.as_deref(), from, to, length_m, travel_ms);
        }
        b.build()
    }
}

// ── CSV entry points ──────────────────────────────────────────────────────────

/// Load a network from an edge CSV and an optional node CSV.
pub fn load_network_csv(edges: &Path, nodes: Option<&Path>) -> Result<RoadNetwork, GraphError> {
    let edge_file = std::fs::File::open(edges)?;
    let node_file = nodes.map(std::fs::File::open).transpose()?;
    load_network_readers(edge_file, node_file)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
pub fn load_network_readers<E: Read, N: Read>(edges: E, nodes: Option<N>) -> Result<RoadNetwork, GraphError> {
    let edge_rows: Vec<TopologyRecord> = read_rows(edges)?;
    let node_rows: Vec<NodeRecord> = match nodes {
        Some(r) => read_rows(r)?,
        None => Vec::new(),
    };
    RoadNetwork::from_records(&edge_rows, &node_rows)
}

fn read_rows<T, R>(reader: R) -> Result<Vec<T>, GraphError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    csv::Reader::from_reader(reader)
        .deserialize::<T>()
        .map(|row| row.map_err(|e| GraphError::Parse(e.to_string())))
        .collect()
}

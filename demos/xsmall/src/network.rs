//! Synthetic downtown grid loosely modelled on Mobile, Alabama.
//!
//! ```text
//!          Royal     Water     Conception
//!   Gov't  J0 ─────── J1 ─────── J2
//!          │          │          │
//!   Dauph  J3 ─────── J4 ─────── J5
//!          │          │          │
//!   St Fr  J6 ─────── J7 ─────── J8
//! ```
//!
//! Blocks are 200 m; every road is two-way.  The five junctions where at
//! least three roads meet carry traffic signals.

use rg_core::{NodeId, Point};
use rg_graph::{GraphResult, RoadNetwork, RoadNetworkBuilder};

const BLOCK_M:   f64 = 200.0;
const SPEED_MPS: f64 = 11.0; // ~25 mph
const ROWS:      [&str; 3] = ["Government St", "Dauphin St", "St Francis St"];
const COLUMNS:   [&str; 3] = ["Royal St", "Water St", "Conception St"];

pub fn build_network() -> GraphResult<RoadNetwork> {
    let mut b = RoadNetworkBuilder::new();
    let mut nodes: Vec<NodeId> = Vec::with_capacity(9);
    for row in 0..3 {
        for col in 0..3 {
            let pos = Point::new(col as f64 * BLOCK_M, -(row as f64) * BLOCK_M);
            nodes.push(b.add_node(&format!("J{}", row * 3 + col), Some(pos)));
        }
    }

    let travel_ms = (BLOCK_M / SPEED_MPS * 1000.0) as u32;
    for row in 0..3 {
        for col in 0..2 {
            let (a, z) = (nodes[row * 3 + col], nodes[row * 3 + col + 1]);
            b.add_road(&format!("r{row}c{col}"), Some(ROWS[row]), a, z, BLOCK_M as f32, travel_ms);
        }
    }
    for col in 0..3 {
        for row in 0..2 {
            let (a, z) = (nodes[row * 3 + col], nodes[(row + 1) * 3 + col]);
            b.add_road(&format!("c{col}r{row}"), Some(COLUMNS[col]), a, z, BLOCK_M as f32, travel_ms);
        }
    }

    for i in [1, 3, 4, 5, 7] {
        b.set_control(nodes[i], true);
    }

    b.build()
}

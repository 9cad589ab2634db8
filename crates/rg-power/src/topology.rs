//! `PowerTopology` — the immutable bus/branch graph of the power network.
//!
//! # Storage layout
//!
//! Buses and branches live in flat `Vec`s indexed by `BusId` and branch
//! position.  Adjacency is stored in CSR form over **undirected** branches:
//! each line or transformer appears in the neighbour lists of both of its
//! buses.
//!
//! ```text
//! adj_start[b] .. adj_start[b+1]   →   slice of adj_bus
//! ```
//!
//! Load buses with a known position are also held in an R-tree (via `rstar`)
//! so feeders can be attached to the buses nearest the substation.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rg_core::{BusId, NodeId, Point};

// ── Bus / Branch ──────────────────────────────────────────────────────────────

/// Role of a bus.  `Grid` and `Substation` are the sources.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BusKind {
    /// Transmission grid bus hosting the slack generator.
    Grid,
    /// Local substation fed from the grid through a transformer.
    Substation,
    /// Consumer bus, one per traffic-control junction.
    Load,
}

impl BusKind {
    #[inline]
    pub fn is_source(self) -> bool {
        !matches!(self, BusKind::Load)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BusKind::Grid       => "grid",
            BusKind::Substation => "substation",
            BusKind::Load       => "load",
        }
    }
}

impl fmt::Display for BusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bus {
    pub name:    String,
    pub kind:    BusKind,
    pub pos:     Option<Point>,
    /// Load restored by `set_up`, in MW.
    pub load_mw: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BranchKind {
    Line,
    Transformer,
}

/// An undirected line or transformer between two buses.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch {
    pub name:      String,
    pub kind:      BranchKind,
    pub a:         BusId,
    pub b:         BusId,
    pub length_km: f64,
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct LoadEntry {
    pub(crate) point: [f64; 2],
    pub(crate) id:    BusId,
}

impl RTreeObject for LoadEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for LoadEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── PowerTopology ─────────────────────────────────────────────────────────────

/// Fixed set of buses and branches with exactly one grid bus and one
/// substation bus.  Construct with [`PowerTopologyBuilder`](crate::PowerTopologyBuilder).
pub struct PowerTopology {
    pub(crate) buses:      Vec<Bus>,
    pub(crate) branches:   Vec<Branch>,
    pub(crate) adj_start:  Vec<u32>,
    pub(crate) adj_bus:    Vec<BusId>,
    pub(crate) grid:       BusId,
    pub(crate) substation: BusId,
    pub(crate) name_index: HashMap<String, BusId>,
    /// Road junction → load bus, for topologies built from a road network.
    pub(crate) node_bus:   BTreeMap<NodeId, BusId>,
    pub(crate) load_idx:   RTree<LoadEntry>,
}

impl PowerTopology {
    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    #[inline]
    pub fn contains(&self, bus: BusId) -> bool {
        bus.index() < self.buses.len()
    }

    pub fn bus(&self, bus: BusId) -> Option<&Bus> {
        self.buses.get(bus.index())
    }

    pub fn bus_ids(&self) -> impl Iterator<Item = BusId> + '_ {
        (0..self.buses.len() as u32).map(BusId)
    }

    pub fn buses(&self) -> impl Iterator<Item = (BusId, &Bus)> + '_ {
        self.buses.iter().enumerate().map(|(i, b)| (BusId(i as u32), b))
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn bus_by_name(&self, name: &str) -> Option<BusId> {
        self.name_index.get(name).copied()
    }

    pub fn name_of(&self, bus: BusId) -> &str {
        self.buses.get(bus.index()).map_or("", |b| b.name.as_str())
    }

    /// The grid and substation buses.
    #[inline]
    pub fn sources(&self) -> [BusId; 2] {
        [self.grid, self.substation]
    }

    pub fn grid(&self) -> BusId {
        self.grid
    }

    pub fn substation(&self) -> BusId {
        self.substation
    }

    #[inline]
    pub fn is_source(&self, bus: BusId) -> bool {
        bus == self.grid || bus == self.substation
    }

    /// Buses joined to `bus` by a line or transformer.  Parallel branches
    /// yield the neighbour more than once.
    #[inline]
    pub fn neighbours(&self, bus: BusId) -> &[BusId] {
        let i = bus.index();
        if i + 1 >= self.adj_start.len() {
            return &[];
        }
        let start = self.adj_start[i] as usize;
        let end   = self.adj_start[i + 1] as usize;
        &self.adj_bus[start..end]
    }

    /// Every non-source bus in `BusId` order.
    pub fn load_buses(&self) -> impl Iterator<Item = BusId> + '_ {
        self.bus_ids().filter(|&b| !self.is_source(b))
    }

    /// Load bus serving road junction `node`, if any.
    pub fn bus_for_node(&self, node: NodeId) -> Option<BusId> {
        self.node_bus.get(&node).copied()
    }

    /// Up to `k` positioned load buses nearest to `pos`, closest first.
    pub fn nearest_load_buses(&self, pos: Point, k: usize) -> Vec<BusId> {
        self.load_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

//! `PowerTopologyBuilder` — manual construction and derivation from a road
//! network.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rstar::RTree;
use tracing::debug;

use rg_core::{BusId, NodeId, Point, PowerParams};
use rg_graph::RoadNetwork;

use crate::topology::LoadEntry;
use crate::{Branch, BranchKind, Bus, BusKind, PowerError, PowerResult, PowerTopology};

/// Name of the grid bus created by [`PowerTopologyBuilder::from_road_network`].
pub const GRID_BUS: &str = "MainPowerGrid";
/// Name of the substation bus created by [`PowerTopologyBuilder::from_road_network`].
pub const SUBSTATION_BUS: &str = "LocalSubstation";
/// Nominal length of a substation feeder line.
pub const FEEDER_LENGTH_KM: f64 = 0.1;

/// Construct a [`PowerTopology`] incrementally, then call [`build`](Self::build).
#[derive(Default)]
pub struct PowerTopologyBuilder {
    buses:      Vec<Bus>,
    branches:   Vec<Branch>,
    name_index: HashMap<String, BusId>,
    grid:       Option<BusId>,
    substation: Option<BusId>,
    node_bus:   BTreeMap<NodeId, BusId>,
}

impl PowerTopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bus.  At most one `Grid` and one `Substation` bus may be added.
    pub fn add_bus(&mut self, name: &str, kind: BusKind, pos: Option<Point>, load_mw: f64) -> PowerResult<BusId> {
        if self.name_index.contains_key(name) {
            return Err(PowerError::DuplicateBus(name.to_owned()));
        }
        let slot = match kind {
            BusKind::Grid       => Some(&mut self.grid),
            BusKind::Substation => Some(&mut self.substation),
            BusKind::Load       => None,
        };
        let id = BusId(self.buses.len() as u32);
        if let Some(slot) = slot {
            if slot.is_some() {
                return Err(PowerError::DuplicateSource(kind));
            }
            *slot = Some(id);
        }
        self.name_index.insert(name.to_owned(), id);
        self.buses.push(Bus { name: name.to_owned(), kind, pos, load_mw });
        Ok(id)
    }

    pub fn add_grid(&mut self, name: &str, pos: Option<Point>) -> PowerResult<BusId> {
        self.add_bus(name, BusKind::Grid, pos, 0.0)
    }

    pub fn add_substation(&mut self, name: &str, pos: Option<Point>) -> PowerResult<BusId> {
        self.add_bus(name, BusKind::Substation, pos, 0.0)
    }

    pub fn add_load(&mut self, name: &str, pos: Option<Point>, load_mw: f64) -> PowerResult<BusId> {
        self.add_bus(name, BusKind::Load, pos, load_mw)
    }

    pub fn add_line(&mut self, name: &str, a: BusId, b: BusId, length_km: f64) -> PowerResult<()> {
        self.add_branch(name, BranchKind::Line, a, b, length_km)
    }

    pub fn add_transformer(&mut self, name: &str, a: BusId, b: BusId) -> PowerResult<()> {
        self.add_branch(name, BranchKind::Transformer, a, b, 0.0)
    }

    /// Record that `bus` serves road junction `node`.
    pub fn map_node(&mut self, node: NodeId, bus: BusId) {
        self.node_bus.insert(node, bus);
    }

    pub fn bus_count(&self) -> usize { self.buses.len() }
    pub fn branch_count(&self) -> usize { self.branches.len() }

    fn add_branch(&mut self, name: &str, kind: BranchKind, a: BusId, b: BusId, length_km: f64) -> PowerResult<()> {
        for bus in [a, b] {
            if bus.index() >= self.buses.len() {
                return Err(PowerError::UnknownBus(bus));
            }
        }
        if a == b {
            return Err(PowerError::SelfLoop(name.to_owned()));
        }
        self.branches.push(Branch { name: name.to_owned(), kind, a, b, length_km });
        Ok(())
    }

    /// Consume the builder and produce a [`PowerTopology`].
    ///
    /// # Errors
    ///
    /// [`PowerError::MissingSource`] unless both a grid and a substation bus
    /// were added.
    pub fn build(self) -> PowerResult<PowerTopology> {
        let grid       = self.grid.ok_or(PowerError::MissingSource(BusKind::Grid))?;
        let substation = self.substation.ok_or(PowerError::MissingSource(BusKind::Substation))?;

        // CSR over both directions of every branch.
        let n = self.buses.len();
        let mut adj_start = vec![0u32; n + 1];
        for br in &self.branches {
            adj_start[br.a.index() + 1] += 1;
            adj_start[br.b.index() + 1] += 1;
        }
        for i in 1..=n {
            adj_start[i] += adj_start[i - 1];
        }
        let mut fill = adj_start.clone();
        let mut adj_bus = vec![BusId::INVALID; adj_start[n] as usize];
        for br in &self.branches {
            for (from, to) in [(br.a, br.b), (br.b, br.a)] {
                let slot = &mut fill[from.index()];
                adj_bus[*slot as usize] = to;
                *slot += 1;
            }
        }

        let entries: Vec<LoadEntry> = self
            .buses
            .iter()
            .enumerate()
            .filter(|(_, b)| b.kind == BusKind::Load)
            .filter_map(|(i, b)| b.pos.map(|p| LoadEntry { point: [p.x, p.y], id: BusId(i as u32) }))
            .collect();

        Ok(PowerTopology {
            buses:      self.buses,
            branches:   self.branches,
            adj_start,
            adj_bus,
            grid,
            substation,
            name_index: self.name_index,
            node_bus:   self.node_bus,
            load_idx:   RTree::bulk_load(entries),
        })
    }

    // ── Derivation from a road network ────────────────────────────────────

    /// Derive the distribution network serving a road network's
    /// traffic-control junctions:
    ///
    /// - a grid bus ([`GRID_BUS`]) joined to a substation bus
    ///   ([`SUBSTATION_BUS`]) by a transformer;
    /// - one load bus per control junction, named after it, drawing
    ///   `params.load_mw`;
    /// - `params.feeders` feeder lines from the substation to the load buses
    ///   nearest to it;
    /// - one distribution line per pair of control junctions joined by a
    ///   road, whichever direction the road runs.
    ///
    /// The substation sits at `substation_pos`, or at the centroid of the
    /// positioned control junctions when `None`.
    pub fn from_road_network(
        network:        &RoadNetwork,
        params:         &PowerParams,
        substation_pos: Option<Point>,
    ) -> PowerResult<PowerTopology> {
        let controls: Vec<NodeId> = network.control_nodes().collect();
        let positions: Vec<Point> = controls.iter().filter_map(|n| network.node_pos[n.index()]).collect();
        let sub_pos = substation_pos.or_else(|| Point::centroid(&positions));

        let mut b = Self::new();
        let grid = b.add_grid(GRID_BUS, None)?;
        let sub  = b.add_substation(SUBSTATION_BUS, sub_pos)?;
        b.add_transformer("GridTransformer", grid, sub)?;

        let mut loads = Vec::with_capacity(controls.len());
        for &node in &controls {
            let bus = b.add_load(&network.node_name[node.index()], network.node_pos[node.index()], params.load_mw)?;
            b.map_node(node, bus);
            loads.push(bus);
        }

        for bus in b.feeder_targets(&loads, sub_pos, params.feeders) {
            let name = format!("Feeder_{}", b.buses[bus.index()].name);
            b.add_line(&name, sub, bus, FEEDER_LENGTH_KM)?;
        }

        let mut joined: BTreeSet<(BusId, BusId)> = BTreeSet::new();
        for edge in network.edges() {
            let (from, to) = (network.edge_from[edge.index()], network.edge_to[edge.index()]);
            let (Some(&a), Some(&z)) = (b.node_bus.get(&from), b.node_bus.get(&to)) else {
                continue;
            };
            if a == z || !joined.insert((a.min(z), a.max(z))) {
                continue;
            }
            let length_km = match (network.node_pos[from.index()], network.node_pos[to.index()]) {
                (Some(p), Some(q)) => p.distance_m(q) / 1000.0,
                _ => network.edge_length_m[edge.index()] as f64 / 1000.0,
            };
            let name = format!("{}-{}", b.buses[a.index()].name, b.buses[z.index()].name);
            b.add_line(&name, a, z, length_km)?;
        }

        debug!(
            loads    = loads.len(),
            branches = b.branches.len(),
            "power topology derived from road network"
        );
        b.build()
    }

    /// The `k` load buses a substation at `pos` feeds directly: nearest
    /// positioned buses first, then unpositioned ones in id order.
    fn feeder_targets(&self, loads: &[BusId], pos: Option<Point>, k: usize) -> Vec<BusId> {
        let mut out: Vec<BusId> = Vec::with_capacity(k.min(loads.len()));
        if let Some(p) = pos {
            let entries: Vec<LoadEntry> = loads
                .iter()
                .filter_map(|&id| self.buses[id.index()].pos.map(|q| LoadEntry { point: [q.x, q.y], id }))
                .collect();
            let tree = RTree::bulk_load(entries);
            out.extend(tree.nearest_neighbor_iter(&[p.x, p.y]).take(k).map(|e| e.id));
        }
        for &id in loads {
            if out.len() >= k {
                break;
            }
            if !out.contains(&id) {
                out.push(id);
            }
        }
        out
    }
}

//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`, so the
//! `EdgeId`s handed out by a built network are *not* the insertion order.
//! Resolve external ids with [`RoadNetwork::edge_by_name`].
//!
//! # Streets
//!
//! Every edge may carry a street name.  Several edges share one street,
//! typically a road's two directions (`"E1"` and its mirror `"-E1"`) plus
//! consecutive segments.  [`RoadNetwork::street_edges`] returns them all.

use std::collections::{BTreeMap, HashMap};

use rg_core::{EdgeId, NodeId, Point};

use crate::{GraphError, GraphResult};

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus external-id and street indexes.
///
/// Do not construct directly; use [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// External junction id of each node.
    pub node_name: Vec<String>,

    /// Optional projected position of each node.
    pub node_pos: Vec<Option<Point>>,

    /// `true` for junctions carrying a traffic-control device (and therefore
    /// a load bus in the power topology).
    pub node_control: Vec<bool>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from: Vec<NodeId>,
    pub edge_to: Vec<NodeId>,

    /// External edge id of each edge.
    pub edge_name: Vec<String>,

    /// Street each edge belongs to, if named.
    pub edge_street: Vec<Option<String>>,

    /// Length of each edge in metres.
    pub edge_length_m: Vec<f32>,

    /// Free-flow travel time in milliseconds.  Used as Dijkstra edge cost.
    pub edge_travel_ms: Vec<u32>,

    // ── Lookup indexes ────────────────────────────────────────────────────
    edge_index:   HashMap<String, EdgeId>,
    node_index:   HashMap<String, NodeId>,
    street_index: BTreeMap<String, Vec<EdgeId>>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Any routing request against an empty network fails with
    /// [`GraphError::EdgeNotFound`].
    pub fn empty() -> Self {
        Self {
            node_name:      Vec::new(),
            node_pos:       Vec::new(),
            node_control:   Vec::new(),
            node_out_start: vec![0],
            edge_from:      Vec::new(),
            edge_to:        Vec::new(),
            edge_name:      Vec::new(),
            edge_street:    Vec::new(),
            edge_length_m:  Vec::new(),
            edge_travel_ms: Vec::new(),
            edge_index:     HashMap::new(),
            node_index:     HashMap::new(),
            street_index:   BTreeMap::new(),
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_name.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_to.is_empty()
    }

    #[inline]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        edge.index() < self.edge_count()
    }

    /// All edge ids in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count() as u32).map(EdgeId)
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Edges a vehicle can continue onto after finishing `edge`.
    #[inline]
    pub fn successors(&self, edge: EdgeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.out_edges(self.edge_to[edge.index()])
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn edge_by_name(&self, name: &str) -> Option<EdgeId> {
        self.edge_index.get(name).copied()
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_index.get(name).copied()
    }

    pub fn street_of(&self, edge: EdgeId) -> Option<&str> {
        self.edge_street.get(edge.index())?.as_deref()
    }

    /// All edges of `street`, both directions, in ascending id order.
    /// Empty if the street is unknown.
    pub fn street_edges(&self, street: &str) -> &[EdgeId] {
        self.street_index.get(street).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Street names in sorted order; the candidate label set for classifiers.
    pub fn street_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.street_index.keys().map(String::as_str)
    }

    /// Junctions flagged as traffic-control nodes, in id order.
    pub fn control_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_control
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| NodeId(i as u32))
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes are interned by external id: referring to the same name twice
/// yields the same `NodeId`.
///
/// # Example
///
/// ```
/// use rg_core::Point;
/// use rg_graph::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node("J1", Some(Point::new(0.0, 0.0)));
/// let c = b.add_node("J2", Some(Point::new(120.0, 0.0)));
/// b.add_road("E1", Some("Main Street"), a, c, 120.0, 9_000);
/// let net = b.build().unwrap();
/// assert_eq!(net.edge_count(), 2);
/// assert_eq!(net.street_edges("Main Street").len(), 2);
/// ```
pub struct RoadNetworkBuilder {
    nodes:      Vec<RawNode>,
    node_index: HashMap<String, NodeId>,
    raw_edges:  Vec<RawEdge>,
}

struct RawNode {
    name:    String,
    pos:     Option<Point>,
    control: bool,
}

struct RawEdge {
    name:      String,
    street:    Option<String>,
    from:      NodeId,
    to:        NodeId,
    length_m:  f32,
    travel_ms: u32,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), node_index: HashMap::new(), raw_edges: Vec::new() }
    }

    /// Intern a junction by external id and return its `NodeId`.
    ///
    /// A later call with `Some(pos)` fills in a position that was unknown.
    pub fn add_node(&mut self, name: &str, pos: Option<Point>) -> NodeId {
        if let Some(&id) = self.node_index.get(name) {
            if pos.is_some() {
                self.nodes[id.index()].pos = pos;
            }
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(RawNode { name: name.to_owned(), pos, control: false });
        self.node_index.insert(name.to_owned(), id);
        id
    }

    /// Flag a junction as a traffic-control node.
    pub fn set_control(&mut self, node: NodeId, control: bool) {
        self.nodes[node.index()].control = control;
    }

    /// Position of a node added earlier, if known.
    pub fn node_pos(&self, id: NodeId) -> Option<Point> {
        self.nodes[id.index()].pos
    }

    /// Add a **directed** edge.
    pub fn add_directed_edge(
        &mut self,
        name:      &str,
        street:    Option<&str>,
        from:      NodeId,
        to:        NodeId,
        length_m:  f32,
        travel_ms: u32,
    ) {
        self.raw_edges.push(RawEdge {
            name: name.to_owned(),
            street: street.filter(|s| !s.is_empty()).map(str::to_owned),
            from,
            to,
            length_m,
            travel_ms,
        });
    }

    /// Convenience: add `name` from `a` to `b` and its mirror `-name` from
    /// `b` to `a`, both on the same street.
    pub fn add_road(
        &mut self,
        name:      &str,
        street:    Option<&str>,
        a:         NodeId,
        b:         NodeId,
        length_m:  f32,
        travel_ms: u32,
    ) {
        self.add_directed_edge(name, street, a, b, length_m, travel_ms);
        self.add_directed_edge(&format!("-{name}"), street, b, a, length_m, travel_ms);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// # Errors
    ///
    /// [`GraphError::DuplicateEdge`] if two edges share an external id.
    pub fn build(self) -> GraphResult<RoadNetwork> {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort keeps insertion order among a node's outgoing edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let mut edge_index = HashMap::with_capacity(edge_count);
        let mut street_index: BTreeMap<String, Vec<EdgeId>> = BTreeMap::new();
        for (i, e) in raw.iter().enumerate() {
            let id = EdgeId(i as u32);
            if edge_index.insert(e.name.clone(), id).is_some() {
                return Err(GraphError::DuplicateEdge(e.name.clone()));
            }
            if let Some(street) = &e.street {
                street_index.entry(street.clone()).or_default().push(id);
            }
        }

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let mut node_name    = Vec::with_capacity(node_count);
        let mut node_pos     = Vec::with_capacity(node_count);
        let mut node_control = Vec::with_capacity(node_count);
        for n in self.nodes {
            node_name.push(n.name);
            node_pos.push(n.pos);
            node_control.push(n.control);
        }

        Ok(RoadNetwork {
            node_name,
            node_pos,
            node_control,
            node_out_start,
            edge_from:      raw.iter().map(|e| e.from).collect(),
            edge_to:        raw.iter().map(|e| e.to).collect(),
            edge_length_m:  raw.iter().map(|e| e.length_m).collect(),
            edge_travel_ms: raw.iter().map(|e| e.travel_ms).collect(),
            edge_street:    raw.iter().map(|e| e.street.clone()).collect(),
            edge_name:      raw.into_iter().map(|e| e.name).collect(),
            edge_index,
            node_index:     self.node_index,
            street_index,
        })
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

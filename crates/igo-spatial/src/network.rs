//! Street graph representation and builder.
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
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`, `edge_class`,
//! `edge_max_speed_kmh`) are sorted by source node and indexed by `EdgeId`.
//! Iteration over a node's outgoing edges is therefore a contiguous memory
//! scan.
//!
//! Topology and static attributes never change after [`SpatialGraphBuilder::build`].
//! Congestion-derived weights live in a separate generation object owned by
//! `igo-traffic`, so one `SpatialGraph` can be shared by every generation.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lon, lat)` to the nearest `NodeId`.  Used
//! to snap highway polyline vertices and query endpoints to graph nodes.

use igo_core::{EdgeId, GeoPoint, NodeId};

use crate::class::RoadClass;
use crate::nearest::{NearestNodeIndex, RTreeIndex};

// ── SpatialGraph ──────────────────────────────────────────────────────────────

/// Directed street graph in CSR format plus a spatial index for node snapping.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`SpatialGraphBuilder`].
pub struct SpatialGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Stable external identifier of each node (OSM id or provider key).
    pub node_key: Vec<i64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Needed to walk `prev_edge` back to the
    /// source during path reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.  Static shortest-path cost.
    pub edge_length_m: Vec<f64>,

    /// Resolved road class of each edge.
    pub edge_class: Vec<RoadClass>,

    /// Max speed in km/h: explicit from the source, else from the class table.
    pub edge_max_speed_kmh: Vec<f64>,

    // ── Spatial index ─────────────────────────────────────────────────────
    index: RTreeIndex,
}

/// Read-only view of one edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeView {
    pub id:            EdgeId,
    pub from:          NodeId,
    pub to:            NodeId,
    pub length_m:      f64,
    pub class:         RoadClass,
    pub max_speed_kmh: f64,
}

impl EdgeView {
    /// Free-flow travel time: `length_m / max_speed_kmh`.
    #[inline]
    pub fn base_time(&self) -> f64 {
        self.length_m / self.max_speed_kmh
    }
}

impl SpatialGraph {
    /// Construct an empty graph with no nodes or edges.
    ///
    /// Every snapping or routing request against it fails.
    pub fn empty() -> Self {
        SpatialGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Read-only views ───────────────────────────────────────────────────

    /// All nodes in `NodeId` order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, GeoPoint)> + '_ {
        self.node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| (NodeId::from_index(i), pos))
    }

    /// All edges in `EdgeId` order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView> + '_ {
        (0..self.edge_count()).map(|i| self.edge(EdgeId::from_index(i)))
    }

    /// View of a single edge.
    ///
    /// # Panics
    /// Panics if `edge` is out of range.
    #[inline]
    pub fn edge(&self, edge: EdgeId) -> EdgeView {
        let i = edge.index();
        EdgeView {
            id:            edge,
            from:          self.edge_from[i],
            to:            self.edge_to[i],
            length_m:      self.edge_length_m[i],
            class:         self.edge_class[i],
            max_speed_kmh: self.edge_max_speed_kmh[i],
        }
    }

    /// Free-flow travel time of `edge`: `length_m / max_speed_kmh`.
    #[inline]
    pub fn base_time(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()] / self.edge_max_speed_kmh[edge.index()]
    }

    #[inline]
    pub fn node_pos(&self, node: NodeId) -> GeoPoint {
        self.node_pos[node.index()]
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range: no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(EdgeId::from_index)
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// First edge `from → to`, if any.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The R-tree index built over all nodes.
    pub fn index(&self) -> &RTreeIndex {
        &self.index
    }

    /// Return the `NodeId` of the nearest node to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.index.nearest(pos)
    }
}

impl NearestNodeIndex for SpatialGraph {
    fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        self.snap_to_node(pos)
    }
}

impl std::fmt::Debug for SpatialGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SpatialGraph with {} nodes, {} edges", self.node_count(), self.edge_count())
    }
}

// ── SpatialGraphBuilder ───────────────────────────────────────────────────────

/// Static attributes of an edge as supplied by a graph provider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    pub length_m:      f64,
    pub class:         RoadClass,
    /// Explicit max speed.  `None` (or a non-positive value) falls back to
    /// [`RoadClass::default_speed_kmh`].
    pub max_speed_kmh: Option<f64>,
}

impl EdgeAttrs {
    pub fn new(length_m: f64, class: RoadClass) -> Self {
        Self { length_m, class, max_speed_kmh: None }
    }

    pub fn with_max_speed(mut self, kmh: f64) -> Self {
        self.max_speed_kmh = Some(kmh);
        self
    }

    /// The speed the graph will store for this edge.
    pub fn resolved_speed_kmh(&self) -> f64 {
        match self.max_speed_kmh {
            Some(v) if v.is_finite() && v > 0.0 => v,
            _ => self.class.default_speed_kmh(),
        }
    }
}

/// Construct a [`SpatialGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by source node (stable, so parallel edges keep insertion
/// order), constructs the CSR arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use igo_core::GeoPoint;
/// use igo_spatial::{EdgeAttrs, RoadClass, SpatialGraphBuilder};
///
/// let mut b = SpatialGraphBuilder::new();
/// let a = b.add_node(1, GeoPoint::new(2.17, 41.38));
/// let c = b.add_node(2, GeoPoint::new(2.18, 41.39));
/// b.add_road(a, c, EdgeAttrs::new(1_200.0, RoadClass::Primary));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct SpatialGraphBuilder {
    nodes:     Vec<GeoPoint>,
    keys:      Vec<i64>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
}

impl SpatialGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), keys: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            keys:      Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, key: i64, pos: GeoPoint) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(pos);
        self.keys.push(key);
        id
    }

    /// Add a **directed** edge from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) {
        debug_assert!(attrs.length_m >= 0.0, "edge length must be non-negative");
        self.raw_edges.push(RawEdge { from, to, attrs });
    }

    /// Convenience: add edges in **both directions** for a two-way street.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        self.add_directed_edge(a, b, attrs);
        self.add_directed_edge(b, a, attrs);
    }

    /// Look up the position of a node added earlier (used by loaders to
    /// compute edge lengths between adjacent way nodes).
    pub fn node_pos(&self, id: NodeId) -> GeoPoint {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`SpatialGraph`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> SpatialGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:          Vec<NodeId>    = raw.iter().map(|e| e.from).collect();
        let edge_to:            Vec<NodeId>    = raw.iter().map(|e| e.to).collect();
        let edge_length_m:      Vec<f64>       = raw.iter().map(|e| e.attrs.length_m).collect();
        let edge_class:         Vec<RoadClass> = raw.iter().map(|e| e.attrs.class).collect();
        let edge_max_speed_kmh: Vec<f64>       = raw.iter().map(|e| e.attrs.resolved_speed_kmh()).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let index = RTreeIndex::new(&self.nodes);

        SpatialGraph {
            node_pos: self.nodes,
            node_key: self.keys,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_class,
            edge_max_speed_kmh,
            index,
        }
    }
}

impl Default for SpatialGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

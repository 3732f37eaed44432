//! Nearest-node lookup.
//!
//! Distances are squared Euclidean in raw `(lon, lat)` degree space; no
//! geodesic correction.  Among equidistant nodes the one with the lowest
//! `NodeId` (the first in enumeration order) wins.  Every implementation
//! must keep that tie-break so callers can swap indexes freely.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use igo_core::{GeoPoint, NodeId};

/// Finds the graph node closest to an arbitrary coordinate.
pub trait NearestNodeIndex: Send + Sync {
    /// Nearest node to `pos`, or `None` if the index holds no nodes.
    fn nearest(&self, pos: GeoPoint) -> Option<NodeId>;
}

// ── LinearScanIndex ───────────────────────────────────────────────────────────

/// O(n) reference scan.  Kept for testing and tiny graphs.
pub struct LinearScanIndex {
    positions: Vec<GeoPoint>,
}

impl LinearScanIndex {
    pub fn new(positions: &[GeoPoint]) -> Self {
        Self { positions: positions.to_vec() }
    }
}

impl NearestNodeIndex for LinearScanIndex {
    fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (i, p) in self.positions.iter().enumerate() {
            let d = p.planar_distance_2(pos);
            // Strict `<` keeps the first-encountered node on ties.
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((NodeId::from_index(i), d));
            }
        }
        best.map(|(id, _)| id)
    }
}

// ── RTreeIndex ────────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a `[lon, lat]` point with its `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lon/lat space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.point[0] - point[0];
        let dlat = self.point[1] - point[1];
        dlon * dlon + dlat * dlat
    }
}

/// R-tree backed index, O(log n) per query.
#[derive(Clone, Debug)]
pub struct RTreeIndex {
    tree: RTree<NodeEntry>,
}

impl RTreeIndex {
    /// Bulk-load an index over `positions`; `positions[i]` is `NodeId(i)`.
    pub fn new(positions: &[GeoPoint]) -> Self {
        let entries: Vec<NodeEntry> = positions
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: pos.to_array(), id: NodeId::from_index(i) })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.tree
            .nearest_neighbor_iter(&pos.to_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

impl NearestNodeIndex for RTreeIndex {
    fn nearest(&self, pos: GeoPoint) -> Option<NodeId> {
        let mut iter = self.tree.nearest_neighbor_iter_with_distance_2(&pos.to_array());
        let (first, best_d) = iter.next()?;
        // The tree yields equidistant entries in arbitrary order; scan the
        // whole tie and keep the lowest id.
        let mut best = first.id;
        for (entry, d) in iter {
            if d > best_d {
                break;
            }
            best = best.min(entry.id);
        }
        Some(best)
    }
}

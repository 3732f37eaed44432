//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait and supply the edge cost as a
//! closure, so the same search serves the static length metric (highway
//! mapping) and the congestion-adjusted travel time (route queries).
//!
//! # Costs
//!
//! Costs are `f64` and must be non-negative.  `f64::INFINITY` is a valid
//! cost meaning "never take this edge": an infinite tentative distance
//! never improves on an unreached node, so such edges are never relaxed.
//! NaN or negative costs are treated the same way.
//!
//! # Tie-breaking
//!
//! The heap is ordered by `(cost, NodeId)` and a node's predecessor only
//! changes on a *strict* improvement, so the first path to reach the
//! minimal cost is kept.  Among several equal-cost paths the one returned
//! is deterministic but not canonical.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use igo_core::{EdgeId, NodeId};

use crate::network::SpatialGraph;
use crate::{SpatialError, SpatialResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// Nodes visited in order, source and destination included.
    pub nodes: Vec<NodeId>,
    /// Edges traversed in order; always `nodes.len() - 1` long.
    pub edges: Vec<EdgeId>,
    /// Sum of the edge costs along the path.
    pub total_cost: f64,
}

impl Path {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// Implementations must be `Send + Sync` so one router can serve concurrent
/// queries from many threads.
pub trait Router: Send + Sync {
    /// Compute the cheapest path from `from` to `to` under `cost`.
    ///
    /// `from == to` yields the single-node path `[from]` with cost 0.
    fn route<C>(&self, network: &SpatialGraph, from: NodeId, to: NodeId, cost: C) -> SpatialResult<Path>
    where
        C: Fn(EdgeId) -> f64;
}

/// Static cost: edge length in metres.
pub fn by_length(network: &SpatialGraph) -> impl Fn(EdgeId) -> f64 + '_ {
    move |e| network.edge_length_m[e.index()]
}

/// Free-flow cost: `length / max_speed` with no congestion applied.
pub fn by_base_time(network: &SpatialGraph) -> impl Fn(EdgeId) -> f64 + '_ {
    move |e| network.base_time(e)
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR street graph.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route<C>(&self, network: &SpatialGraph, from: NodeId, to: NodeId, cost: C) -> SpatialResult<Path>
    where
        C: Fn(EdgeId) -> f64,
    {
        dijkstra(network, from, to, cost)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap key with a total order over `f64`.
#[derive(Copy, Clone, Debug)]
struct Cost(f64);

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra<C>(network: &SpatialGraph, from: NodeId, to: NodeId, cost: C) -> SpatialResult<Path>
where
    C: Fn(EdgeId) -> f64,
{
    let n = network.node_count();
    if n == 0 {
        return Err(SpatialError::EmptyGraph);
    }
    if from.index() >= n {
        return Err(SpatialError::NodeNotFound(from));
    }
    if to.index() >= n {
        return Err(SpatialError::NodeNotFound(to));
    }
    if from == to {
        return Ok(Path { nodes: vec![from], edges: vec![], total_cost: 0.0 });
    }

    // dist[v] = best known cost to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(d), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(network, &prev_edge, from, to, d));
        }

        // Skip stale heap entries.
        if d > dist[node.index()] {
            continue;
        }

        for edge in network.out_edges(node) {
            let w = cost(edge);
            if w.is_nan() || w < 0.0 {
                continue;
            }
            let neighbor = network.edge_to[edge.index()];
            let new_cost = d + w;

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(SpatialError::NoPath { from, to })
}

fn reconstruct(
    network:   &SpatialGraph,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    total:     f64,
) -> Path {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::INVALID, "settled node without predecessor");
        edges.push(e);
        cur = network.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

    Path { nodes, edges, total_cost: total }
}

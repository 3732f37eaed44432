//! A weighted graph generation: static graph + congestion-derived costs.
//!
//! The topology is shared (`Arc<SpatialGraph>`); only the per-edge
//! congestion level and adjusted time belong to a generation.  A generation
//! is mutated only while [`crate::rebuild`] constructs it and is read-only
//! once published.

use std::sync::Arc;

use igo_core::EdgeId;
use igo_spatial::SpatialGraph;

use crate::congestion::{CongestionLevel, CongestionSnapshot};

#[derive(Clone, Debug)]
pub struct Generation {
    id:            u64,
    graph:         Arc<SpatialGraph>,
    snapshot:      Option<CongestionSnapshot>,
    congestion:    Vec<CongestionLevel>,
    base_time:     Vec<f64>,
    adjusted_time: Vec<f64>,
}

impl Generation {
    /// Generation 0: every edge at level 0 and no snapshot applied.
    pub fn initial(graph: Arc<SpatialGraph>) -> Self {
        let mut generation = Self::reset(graph, 0, None);
        generation.apply_multipliers();
        generation
    }

    /// A fresh generation with all levels reset to 0 and `base_time`
    /// recomputed.  Adjusted times are filled by [`Self::apply_multipliers`].
    pub(crate) fn reset(graph: Arc<SpatialGraph>, id: u64, snapshot: Option<CongestionSnapshot>) -> Self {
        let edges = graph.edge_count();
        let base_time: Vec<f64> = (0..edges).map(|e| graph.base_time(EdgeId::from_index(e))).collect();
        Self {
            id,
            graph,
            snapshot,
            congestion: vec![CongestionLevel::NO_DATA; edges],
            adjusted_time: vec![0.0; edges],
            base_time,
        }
    }

    /// Set the level of one edge.  `edge` must belong to this graph.
    pub(crate) fn set_edge_congestion(&mut self, edge: EdgeId, level: CongestionLevel) {
        debug_assert!(edge.index() < self.congestion.len(), "{edge} not in graph");
        self.congestion[edge.index()] = level;
    }

    pub(crate) fn apply_multipliers(&mut self) {
        for ((adjusted, &base), level) in self.adjusted_time.iter_mut().zip(&self.base_time).zip(&self.congestion) {
            // A blocked zero-length edge would otherwise give 0 × ∞ = NaN.
            *adjusted = if level.is_blocked() { f64::INFINITY } else { base * level.multiplier() };
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn graph(&self) -> &Arc<SpatialGraph> {
        &self.graph
    }

    /// The snapshot this generation was built from; `None` for generation 0.
    pub fn snapshot(&self) -> Option<&CongestionSnapshot> {
        self.snapshot.as_ref()
    }

    #[inline]
    pub fn level(&self, edge: EdgeId) -> CongestionLevel {
        self.congestion[edge.index()]
    }

    #[inline]
    pub fn base_time(&self, edge: EdgeId) -> f64 {
        self.base_time[edge.index()]
    }

    #[inline]
    pub fn adjusted_time(&self, edge: EdgeId) -> f64 {
        self.adjusted_time[edge.index()]
    }

    /// Route cost closure over adjusted times.
    pub fn cost(&self) -> impl Fn(EdgeId) -> f64 + '_ {
        move |e| self.adjusted_time[e.index()]
    }

    /// Number of edges at each level, indexed by level.
    pub fn level_histogram(&self) -> [usize; 7] {
        let mut counts = [0; 7];
        for level in &self.congestion {
            counts[level.value() as usize] += 1;
        }
        counts
    }
}

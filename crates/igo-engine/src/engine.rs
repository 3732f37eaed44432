//! The route engine: a published generation, a serialized rebuild, and
//! read-only route queries.
//!
//! # Concurrency
//!
//! ```text
//! readers ──current()──▶ Arc<Generation> (cloned under a short read lock)
//!                              │ route() runs on the clone, lock released
//! refresh() ──rebuild_lock──▶ rebuild into a fresh Generation
//!                              └─ write lock held only for the pointer swap
//! ```
//!
//! Queries never observe a partially rebuilt generation.  At most one
//! rebuild runs at a time: [`RouteEngine::refresh`] waits for an in-flight
//! rebuild and then re-checks whether the snapshot is still stale, so two
//! requests carrying the same snapshot rebuild once.
//! [`RouteEngine::try_refresh`] returns [`RebuildOutcome::InProgress`]
//! instead of waiting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};

use log::info;

use igo_core::{EdgeId, GeoPoint, NodeId};
use igo_spatial::{DijkstraRouter, NearestNodeIndex, Router, SpatialError, SpatialGraph};
use igo_traffic::{
    level_changed, rebuild, CancelToken, CongestionLevel, CongestionSnapshot, Generation, HighwayTable,
    RebuildObserver, TrafficError,
};

use crate::{EngineError, EngineResult};

/// A route through one generation.
#[derive(Clone, Debug, PartialEq)]
pub struct RoutePlan {
    /// Generation the route was computed on.
    pub generation:  u64,
    pub nodes:       Vec<NodeId>,
    pub edges:       Vec<EdgeId>,
    /// Position of each node in `nodes`.
    pub coordinates: Vec<GeoPoint>,
    /// Congestion level of each edge in `edges`.
    pub levels:      Vec<CongestionLevel>,
    /// Sum of adjusted times along the route.
    pub total_time:  f64,
}

/// Result of a refresh request.
#[derive(Debug)]
pub enum RebuildOutcome {
    /// A new generation was published.
    Rebuilt { generation: u64, rejected: Vec<TrafficError> },
    /// The snapshot equals the one already published.
    Unchanged,
    /// Another rebuild holds the lock (only from [`RouteEngine::try_refresh`]).
    InProgress,
}

pub struct RouteEngine {
    graph:        Arc<SpatialGraph>,
    index:        Arc<dyn NearestNodeIndex>,
    highways:     Arc<HighwayTable>,
    current:      RwLock<Arc<Generation>>,
    rebuild_lock: Mutex<()>,
    next_id:      AtomicU64,
}

impl RouteEngine {
    pub(crate) fn from_parts(
        graph:    Arc<SpatialGraph>,
        index:    Arc<dyn NearestNodeIndex>,
        highways: HighwayTable,
    ) -> Self {
        let initial = Generation::initial(Arc::clone(&graph));
        Self {
            graph,
            index,
            highways: Arc::new(highways),
            current: RwLock::new(Arc::new(initial)),
            rebuild_lock: Mutex::new(()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn graph(&self) -> &Arc<SpatialGraph> {
        &self.graph
    }

    pub fn highways(&self) -> &HighwayTable {
        &self.highways
    }

    /// The currently published generation.
    pub fn current(&self) -> Arc<Generation> {
        // Writers only ever swap the Arc, so a poisoned lock still holds a
        // complete generation.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Nearest graph node to `pos`.
    pub fn snap(&self, pos: GeoPoint) -> EngineResult<NodeId> {
        self.index.nearest(pos).ok_or(EngineError::NoPathFound)
    }

    /// Fastest route on the current generation.
    pub fn route(&self, origin: GeoPoint, destination: GeoPoint) -> EngineResult<RoutePlan> {
        self.route_in(&self.current(), origin, destination)
    }

    /// Fastest route on a specific generation.
    ///
    /// Snapping both ends to the same node yields a single-node plan.
    pub fn route_in(&self, generation: &Generation, origin: GeoPoint, destination: GeoPoint) -> EngineResult<RoutePlan> {
        let from = self.snap(origin)?;
        let to = self.snap(destination)?;

        let path = DijkstraRouter
            .route(&self.graph, from, to, generation.cost())
            .map_err(|e| match e {
                SpatialError::NoPath { .. } | SpatialError::EmptyGraph => EngineError::NoPathFound,
                e => EngineError::Spatial(e),
            })?;

        Ok(RoutePlan {
            generation:  generation.id(),
            coordinates: path.nodes.iter().map(|&n| self.graph.node_pos(n)).collect(),
            levels:      path.edges.iter().map(|&e| generation.level(e)).collect(),
            total_time:  path.total_cost,
            nodes:       path.nodes,
            edges:       path.edges,
        })
    }

    /// Rebuild from `snapshot` unless it is already published.
    ///
    /// Waits for any in-flight rebuild first.  A cancelled rebuild returns
    /// [`EngineError::Cancelled`] and leaves the current generation in place.
    pub fn refresh<O: RebuildObserver + ?Sized>(
        &self,
        snapshot: &CongestionSnapshot,
        observer: &mut O,
        cancel:   &CancelToken,
    ) -> EngineResult<RebuildOutcome> {
        let _guard = self.rebuild_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.rebuild_locked(snapshot, observer, cancel)
    }

    /// Like [`refresh`](Self::refresh) but returns
    /// [`RebuildOutcome::InProgress`] instead of waiting.
    pub fn try_refresh<O: RebuildObserver + ?Sized>(
        &self,
        snapshot: &CongestionSnapshot,
        observer: &mut O,
        cancel:   &CancelToken,
    ) -> EngineResult<RebuildOutcome> {
        let _guard = match self.rebuild_lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
            Err(TryLockError::WouldBlock) => return Ok(RebuildOutcome::InProgress),
        };
        self.rebuild_locked(snapshot, observer, cancel)
    }

    fn rebuild_locked<O: RebuildObserver + ?Sized>(
        &self,
        snapshot: &CongestionSnapshot,
        observer: &mut O,
        cancel:   &CancelToken,
    ) -> EngineResult<RebuildOutcome> {
        if !level_changed(self.current().snapshot(), snapshot) {
            return Ok(RebuildOutcome::Unchanged);
        }

        // Advanced only on success.
        let id = self.next_id.load(Ordering::Relaxed);
        let report = rebuild(&self.graph, &self.highways, snapshot, id, observer, cancel)?;
        self.next_id.store(id + 1, Ordering::Relaxed);

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(report.generation);
        info!(
            "published generation {id} ({} readings, {} rejected)",
            snapshot.len(),
            report.rejected.len()
        );
        Ok(RebuildOutcome::Rebuilt { generation: id, rejected: report.rejected })
    }
}

impl std::fmt::Debug for RouteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEngine")
            .field("graph", &self.graph)
            .field("highways", &self.highways.len())
            .field("generation", &self.current().id())
            .finish()
    }
}

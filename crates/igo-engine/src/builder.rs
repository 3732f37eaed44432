//! Fluent builder for constructing a [`RouteEngine`].

use std::sync::Arc;

use igo_spatial::{NearestNodeIndex, SpatialGraph};
use igo_traffic::HighwayTable;

use crate::{EngineError, EngineResult, RouteEngine};

/// Fluent builder for [`RouteEngine`].
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                                  |
/// |------------------|------------------------------------------|
/// | `.index(i)`      | The graph's own R-tree                   |
/// | `.highways(t)`   | Empty table (congestion touches nothing) |
///
/// # Example
///
/// ```rust,ignore
/// let graph = Arc::new(GraphStore::new(&cfg.graph_cache_dir).load(&cfg.place, &provider)?);
/// let mapped = build_highways(&graph, graph.as_ref(), &raw_highways);
/// let engine = EngineBuilder::new(graph)
///     .highways(mapped.table)
///     .build()?;
/// let plan = engine.route(origin, destination)?;
/// ```
pub struct EngineBuilder {
    graph:    Arc<SpatialGraph>,
    index:    Option<Arc<dyn NearestNodeIndex>>,
    highways: Option<HighwayTable>,
}

impl EngineBuilder {
    pub fn new(graph: impl Into<Arc<SpatialGraph>>) -> Self {
        Self { graph: graph.into(), index: None, highways: None }
    }

    /// Snap with `index` instead of the graph's R-tree.  It must index the
    /// same node positions.
    pub fn index(mut self, index: Arc<dyn NearestNodeIndex>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn highways(mut self, highways: HighwayTable) -> Self {
        self.highways = Some(highways);
        self
    }

    /// Validate inputs and build the engine with generation 0 published.
    pub fn build(self) -> EngineResult<RouteEngine> {
        let highways = self.highways.unwrap_or_default();

        let edge_count = self.graph.edge_count();
        if let Some(h) = highways.iter().find(|h| h.edges.iter().any(|e| e.index() >= edge_count)) {
            return Err(EngineError::Config(format!(
                "{} references an edge outside the graph ({edge_count} edges)",
                h.id
            )));
        }

        let index = match self.index {
            Some(index) => index,
            None => Arc::clone(&self.graph) as Arc<dyn NearestNodeIndex>,
        };

        Ok(RouteEngine::from_parts(self.graph, index, highways))
    }
}

//! Spatial-subsystem error type.

use thiserror::Error;

use igo_core::NodeId;

/// Errors produced by `igo-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("{0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("graph source unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("invalid graph snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;

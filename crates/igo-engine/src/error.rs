//! Engine-level error type.

use thiserror::Error;

use igo_spatial::SpatialError;
use igo_traffic::TrafficError;

/// Errors produced by `igo-engine`.
///
/// `NoPathFound` is an expected, user-facing outcome, not an internal fault.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no path found")]
    NoPathFound,

    #[error("could not resolve location {0:?}")]
    LocationNotFound(String),

    #[error("current position is unknown")]
    PositionUnknown,

    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("engine configuration error: {0}")]
    Config(String),

    #[error("rebuild cancelled")]
    Cancelled,

    #[error("traffic error: {0}")]
    Traffic(TrafficError),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

impl From<TrafficError> for EngineError {
    fn from(e: TrafficError) -> Self {
        match e {
            TrafficError::Cancelled => EngineError::Cancelled,
            e => EngineError::Traffic(e),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

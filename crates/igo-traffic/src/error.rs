//! Traffic-subsystem error type.

use thiserror::Error;

use igo_core::HighwayId;
use igo_spatial::SpatialError;

/// Errors produced by `igo-traffic`.
///
/// `MalformedRecord` and `InvalidCongestionLevel` are per-record failures:
/// they are collected into a report and never abort the surrounding batch.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("{highway}: congestion level {level} outside 0..=6")]
    InvalidCongestionLevel { highway: HighwayId, level: i32 },

    #[error("rebuild cancelled")]
    Cancelled,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spatial error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type TrafficResult<T> = Result<T, TrafficError>;

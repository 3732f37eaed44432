//! Base error type.
//!
//! Sub-crates define their own error enums (`SpatialError`, `TrafficError`,
//! `EngineError`); this one only covers configuration checks.

use thiserror::Error;

/// The top-level error type for `igo-core`.
#[derive(Debug, Error)]
pub enum IgoError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `igo-core`.
pub type IgoResult<T> = Result<T, IgoError>;

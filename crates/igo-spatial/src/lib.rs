//! `igo-spatial`: street graph, nearest-node indexing, routing, and graph
//! persistence.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`network`]  | `SpatialGraph` (CSR + R-tree), `SpatialGraphBuilder`        |
//! | [`class`]    | `RoadClass`, class → speed table, multi-value precedence    |
//! | [`nearest`]  | `NearestNodeIndex` trait, `LinearScanIndex`, `RTreeIndex`   |
//! | [`router`]   | `Router` trait, `Path`, `DijkstraRouter`                    |
//! | [`provider`] | `GraphProvider` trait, `CsvGraphProvider`                   |
//! | [`store`]    | `GraphStore`: persisted snapshots keyed by place name      |
//! | [`osm`]      | `PbfGraphProvider` (feature = `"osm"` only)                 |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag  | Effect                                                          |
//! |-------|-----------------------------------------------------------------|
//! | `osm` | Enables OSM PBF loading via the `osmpbf` crate.                |

pub mod class;
pub mod error;
pub mod nearest;
pub mod network;
pub mod provider;
pub mod router;
pub mod store;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use class::RoadClass;
pub use error::{SpatialError, SpatialResult};
pub use nearest::{LinearScanIndex, NearestNodeIndex, RTreeIndex};
pub use network::{EdgeAttrs, EdgeView, SpatialGraph, SpatialGraphBuilder};
pub use provider::{CsvGraphProvider, GraphProvider};
pub use router::{DijkstraRouter, Path, Router};
pub use store::GraphStore;

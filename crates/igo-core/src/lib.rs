//! `igo-core`: foundational types for the `igo` traffic-aware router.
//!
//! This crate is a dependency of every other `igo-*` crate.  It intentionally
//! has no `igo-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`ids`]       | `NodeId`, `EdgeId`, `HighwayId`                         |
//! | [`geo`]       | `GeoPoint`, planar and haversine distances              |
//! | [`config`]    | `IgoConfig`                                             |
//! | [`error`]     | `IgoError`, `IgoResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::IgoConfig;
pub use error::{IgoError, IgoResult};
pub use geo::GeoPoint;
pub use ids::{EdgeId, HighwayId, NodeId};

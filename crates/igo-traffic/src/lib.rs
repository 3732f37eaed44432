//! `igo-traffic`: highway mapping and the congestion cost model.
//!
//! # Data flow
//!
//! ```text
//! highway feed ──parse_highway_feed──▶ RawHighway* ──build_highways──▶ HighwayTable
//!                                                                        │ (once per graph)
//! congestion feed ──parse_congestion_feed──▶ CongestionSnapshot          ▼
//!                                                 └──────────────▶ rebuild ──▶ Generation
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`feed`]       | Highway and congestion feed readers                       |
//! | [`highway`]    | `Highway`, `HighwayTable` (id-keyed, empty placeholder)   |
//! | [`mapper`]     | `build_highways`, coordinate parsing                      |
//! | [`congestion`] | `CongestionLevel`, `MULTIPLIERS`, snapshots, `level_changed` |
//! | [`generation`] | `Generation`: per-edge levels and adjusted times         |
//! | [`rebuild`]    | `rebuild`: snapshot → new generation                     |
//! | [`observer`]   | `RebuildObserver`, `NoopObserver`, `LogObserver`          |
//! | [`cancel`]     | `CancelToken`                                             |
//! | [`error`]      | `TrafficError`, `TrafficResult<T>`                        |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Maps highways on Rayon's thread pool (default on).     |

pub mod cancel;
pub mod congestion;
pub mod error;
pub mod feed;
pub mod generation;
pub mod highway;
pub mod mapper;
pub mod observer;
pub mod rebuild;


pub use cancel::CancelToken;
pub use congestion::{level_changed, CongestionLevel, CongestionReading, CongestionSnapshot, MULTIPLIERS};
pub use error::{TrafficError, TrafficResult};
pub use feed::{parse_congestion_feed, parse_highway_feed, Parsed, RawHighway};
pub use generation::Generation;
pub use highway::{Highway, HighwayTable};
pub use mapper::{build_highways, MappingReport};
pub use observer::{LogObserver, NoopObserver, RebuildObserver};
pub use rebuild::{rebuild, RebuildReport};

//! `igo-engine`: route queries over congestion-weighted generations.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`engine`]        | `RouteEngine`, `RoutePlan`, `RebuildOutcome`              |
//! | [`builder`]       | `EngineBuilder`                                           |
//! | [`collaborators`] | `Geocoder`, `FeedSource`, `FileFeed`, `Location`          |
//! | [`map`]           | `MapRequest`, colour bands, `MapRenderer`                 |
//! | [`service`]       | `IgoService`: update-before-query front end              |
//! | [`error`]         | `EngineError`, `EngineResult<T>`                          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use igo_engine::{EngineBuilder, FileFeed, IgoService};
//! use igo_traffic::LogObserver;
//!
//! let engine = EngineBuilder::new(graph).highways(table).build()?;
//! let service = IgoService::new(engine, geocoder, FileFeed::new(&cfg.congestion_feed), &cfg);
//! let directions = service.go(Some(here), "Sagrada Familia", &mut LogObserver)?;
//! renderer.render(&directions.map)?;
//! ```

pub mod builder;
pub mod collaborators;
pub mod engine;
pub mod error;
pub mod map;
pub mod service;


pub use builder::EngineBuilder;
pub use collaborators::{FeedSource, FileFeed, Geocoder, Location, NoGeocoder};
pub use engine::{RebuildOutcome, RouteEngine, RoutePlan};
pub use error::{EngineError, EngineResult};
pub use map::{MapLine, MapRenderer, MapRequest, Marker};
pub use service::{Directions, IgoService};

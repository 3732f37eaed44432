//! Query-serving layer: the operations a chat front end exposes.
//!
//! | Operation              | Behaviour                                                  |
//! |------------------------|------------------------------------------------------------|
//! | `update_congestion`    | Fetch the congestion feed; rebuild only if it changed      |
//! | `go`                   | Update, resolve destination, route, return a path map      |
//! | `where_map`            | Marker at the user's position                              |
//! | `congestions`          | Update, return the congestion overview map                 |
//!
//! The user's position is owned by the caller (one per chat) and passed in.

use log::{info, warn};

use igo_core::{GeoPoint, IgoConfig};
use igo_traffic::{parse_congestion_feed, CancelToken, RebuildObserver};

use crate::collaborators::{FeedSource, Geocoder, Location};
use crate::map::{congestion_map, path_map, position_map, MapRequest};
use crate::{EngineError, EngineResult, RebuildOutcome, RouteEngine, RoutePlan};

/// A route plus its rendered-to-be map.
#[derive(Clone, Debug)]
pub struct Directions {
    pub plan: RoutePlan,
    pub map:  MapRequest,
}

pub struct IgoService<G: Geocoder, F: FeedSource> {
    engine:          RouteEngine,
    geocoder:        G,
    congestion_feed: F,
    map_size:        u32,
    geocode_suffix:  String,
}

impl<G: Geocoder, F: FeedSource> IgoService<G, F> {
    pub fn new(engine: RouteEngine, geocoder: G, congestion_feed: F, config: &IgoConfig) -> Self {
        Self {
            engine,
            geocoder,
            congestion_feed,
            map_size: config.map_size,
            geocode_suffix: config.geocode_suffix.clone(),
        }
    }

    pub fn engine(&self) -> &RouteEngine {
        &self.engine
    }

    pub fn congestion_feed(&self) -> &F {
        &self.congestion_feed
    }

    /// Turn user text into a coordinate (`"lat lon"` or a geocoded place).
    pub fn resolve(&self, text: &str) -> EngineResult<GeoPoint> {
        Location::parse(text).resolve(&self.geocoder, &self.geocode_suffix)
    }

    /// Fetch the congestion feed and refresh the engine if it changed.
    pub fn update_congestion<O: RebuildObserver + ?Sized>(&self, observer: &mut O) -> EngineResult<RebuildOutcome> {
        let parsed = parse_congestion_feed(self.congestion_feed.open()?)?;
        if !parsed.rejected.is_empty() {
            warn!("congestion feed: {} rows skipped", parsed.rejected.len());
        }
        let outcome = self.engine.refresh(&parsed.value, observer, &CancelToken::new())?;
        if let RebuildOutcome::Rebuilt { generation, .. } = &outcome {
            info!("congestion updated, generation {generation}");
        }
        Ok(outcome)
    }

    /// Route from `origin` to the place described by `destination`.
    ///
    /// Congestion is refreshed first.  If the feed cannot be fetched the
    /// route is computed on the generation already published.
    pub fn go<O: RebuildObserver + ?Sized>(
        &self,
        origin:      Option<GeoPoint>,
        destination: &str,
        observer:    &mut O,
    ) -> EngineResult<Directions> {
        if destination.trim().is_empty() {
            return Err(EngineError::LocationNotFound(String::new()));
        }
        match self.update_congestion(observer) {
            Ok(_) => {}
            Err(EngineError::ResourceUnavailable(e)) => warn!("routing on stale congestion: {e}"),
            Err(e) => return Err(e),
        }

        let origin = origin.ok_or(EngineError::PositionUnknown)?;
        let destination = self.resolve(destination)?;
        let plan = self.engine.route(origin, destination)?;
        let map = path_map(&plan, self.map_size);
        Ok(Directions { plan, map })
    }

    /// A map with a marker at `position`.
    pub fn where_map(&self, position: Option<GeoPoint>) -> EngineResult<MapRequest> {
        position
            .map(|p| position_map(p, self.map_size))
            .ok_or(EngineError::PositionUnknown)
    }

    /// Refresh congestion, then draw every reported highway.
    pub fn congestions<O: RebuildObserver + ?Sized>(&self, observer: &mut O) -> EngineResult<MapRequest> {
        self.update_congestion(observer)?;
        let current = self.engine.current();
        Ok(match current.snapshot() {
            Some(snapshot) => congestion_map(self.engine.highways(), snapshot, self.map_size),
            None => MapRequest::new(self.map_size),
        })
    }
}

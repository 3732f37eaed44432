//! Top-level service configuration.

use std::path::PathBuf;

use crate::{IgoError, IgoResult};

/// Configuration for one city deployment.
///
/// Typically loaded from a JSON file by the application crate and passed
/// to the service builder.  [`IgoConfig::default`] targets Barcelona.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IgoConfig {
    /// Place name of the city.  Also the key of the persisted graph snapshot.
    pub place: String,

    /// Directory holding persisted graph snapshots.
    pub graph_cache_dir: PathBuf,

    /// Input handed to the graph provider on a cache miss (a directory for
    /// the CSV provider, a `.osm.pbf` file for the OSM provider).
    pub graph_source: PathBuf,

    /// Location of the highway feed (`id,description,coordinates`).
    pub highways_feed: PathBuf,

    /// Location of the congestion feed (`id#timestamp#current#predicted`).
    pub congestion_feed: PathBuf,

    /// Width and height in pixels of rendered maps.
    pub map_size: u32,

    /// Appended to free-text places before geocoding (e.g. `", Barcelona"`).
    pub geocode_suffix: String,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for IgoConfig {
    fn default() -> Self {
        Self {
            place:           "Barcelona, Catalonia".to_owned(),
            graph_cache_dir: PathBuf::from("."),
            graph_source:    PathBuf::from("barcelona"),
            highways_feed:   PathBuf::from("transit_relacio_trams.csv"),
            congestion_feed: PathBuf::from("trams_congestions.csv"),
            map_size:        800,
            geocode_suffix:  ", Barcelona".to_owned(),
            num_threads:     None,
        }
    }
}

impl IgoConfig {
    /// Reject configurations that cannot possibly serve a query.
    pub fn validate(&self) -> IgoResult<()> {
        if self.place.trim().is_empty() {
            return Err(IgoError::Config("place must not be empty".into()));
        }
        if self.map_size == 0 {
            return Err(IgoError::Config("map_size must be positive".into()));
        }
        if self.num_threads == Some(0) {
            return Err(IgoError::Config("num_threads must be positive when set".into()));
        }
        Ok(())
    }
}

//! Narrow interfaces to the outside world: feeds, geocoding, user-entered
//! locations.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use igo_core::GeoPoint;

use crate::{EngineError, EngineResult};

/// Resolves free text to a coordinate.
pub trait Geocoder: Send + Sync {
    /// `None` when the text cannot be resolved.
    fn geocode(&self, query: &str) -> Option<GeoPoint>;
}

/// A geocoder that never resolves anything.
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    fn geocode(&self, _query: &str) -> Option<GeoPoint> {
        None
    }
}

/// Where a delimited feed is read from.
pub trait FeedSource: Send + Sync {
    /// Open a fresh reader over the current feed contents.
    ///
    /// # Errors
    ///
    /// [`EngineError::ResourceUnavailable`] if the feed cannot be reached.
    fn open(&self) -> EngineResult<Box<dyn Read + Send>>;
}

/// A feed stored in a local file, re-read on every [`FeedSource::open`].
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedSource for FileFeed {
    fn open(&self) -> EngineResult<Box<dyn Read + Send>> {
        let file = File::open(&self.path)
            .map_err(|e| EngineError::ResourceUnavailable(format!("{}: {e}", self.path.display())))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// A user-entered location.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    Coordinates(GeoPoint),
    Place(String),
}

impl Location {
    /// Text starting with two numbers, `"<lat> <lon> …"`, is read as
    /// coordinates and any further words are ignored.  Anything else is a
    /// place name.
    ///
    /// ```
    /// use igo_engine::Location;
    /// use igo_core::GeoPoint;
    ///
    /// assert_eq!(Location::parse("41.38 2.17"), Location::Coordinates(GeoPoint::new(2.17, 41.38)));
    /// assert_eq!(Location::parse("Sagrada Familia"), Location::Place("Sagrada Familia".into()));
    /// ```
    pub fn parse(text: &str) -> Location {
        let text = text.trim();
        let mut parts = text.split_whitespace();
        if let (Some(lat), Some(lon)) = (parts.next(), parts.next()) {
            if let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) {
                let pos = GeoPoint::from_lat_lon(lat, lon);
                if pos.is_finite() {
                    return Location::Coordinates(pos);
                }
            }
        }
        Location::Place(text.to_owned())
    }

    /// Resolve to coordinates, geocoding place names with `suffix` appended.
    pub fn resolve<G: Geocoder + ?Sized>(&self, geocoder: &G, suffix: &str) -> EngineResult<GeoPoint> {
        match self {
            Location::Coordinates(pos) => Ok(*pos),
            Location::Place(name) => geocoder
                .geocode(&format!("{name}{suffix}"))
                .ok_or_else(|| EngineError::LocationNotFound(name.clone())),
        }
    }
}

//! Map requests handed to an external renderer.
//!
//! The engine never draws anything; it describes markers and polylines in
//! `(lon, lat)` space and lets a [`MapRenderer`] turn them into an image.

use serde::Serialize;

use igo_core::GeoPoint;
use igo_traffic::{CongestionLevel, CongestionSnapshot, HighwayTable};

use crate::{EngineResult, RoutePlan};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Gray,
    Green,
    PaleGreen,
    Yellow,
    Orange,
    Red,
    Black,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Blue      => "blue",
            Color::Gray      => "gray",
            Color::Green     => "green",
            Color::PaleGreen => "palegreen",
            Color::Yellow    => "yellow",
            Color::Orange    => "orange",
            Color::Red       => "red",
            Color::Black     => "black",
        }
    }
}

/// Path edge colour by congestion level: 0–2 cool, then warning bands.
pub const PATH_COLORS: [Color; 7] = [
    Color::Blue, Color::Blue, Color::Blue, Color::Yellow, Color::Orange, Color::Red, Color::Black,
];

/// Highway colour by congestion level on the congestion overview.
pub const CONGESTION_COLORS: [Color; 7] = [
    Color::Gray, Color::Green, Color::PaleGreen, Color::Yellow, Color::Orange, Color::Red, Color::Black,
];

pub const PATH_WIDTH: u32 = 5;
pub const CONGESTION_WIDTH: u32 = 2;
pub const MARKER_SIZE: u32 = 15;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub position: GeoPoint,
    pub color:    Color,
    pub size:     u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapLine {
    pub points: Vec<GeoPoint>,
    pub color:  Color,
    pub width:  u32,
}

/// A square map of `size × size` pixels.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapRequest {
    pub size:    u32,
    pub markers: Vec<Marker>,
    pub lines:   Vec<MapLine>,
}

impl MapRequest {
    pub fn new(size: u32) -> Self {
        Self { size, markers: Vec::new(), lines: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.lines.is_empty()
    }
}

/// Draws a [`MapRequest`] somewhere (file, chat upload, …).
pub trait MapRenderer {
    fn render(&mut self, request: &MapRequest) -> EngineResult<()>;
}

/// A single blue circle at `position`.
pub fn position_map(position: GeoPoint, size: u32) -> MapRequest {
    let mut map = MapRequest::new(size);
    map.markers.push(Marker { position, color: Color::Blue, size: MARKER_SIZE });
    map
}

/// One line per route edge, coloured by the edge's congestion level.
pub fn path_map(plan: &RoutePlan, size: u32) -> MapRequest {
    let mut map = MapRequest::new(size);
    map.lines = plan
        .coordinates
        .windows(2)
        .zip(&plan.levels)
        .map(|(pair, level)| MapLine {
            points: pair.to_vec(),
            color:  PATH_COLORS[level.value() as usize],
            width:  PATH_WIDTH,
        })
        .collect();
    map
}

/// Every reported highway's polyline, coloured by its current level.
///
/// Readings with an out-of-range level are left out.
pub fn congestion_map(highways: &HighwayTable, snapshot: &CongestionSnapshot, size: u32) -> MapRequest {
    let mut map = MapRequest::new(size);
    for reading in snapshot.readings() {
        let Ok(level) = CongestionLevel::try_from(reading.current) else {
            continue;
        };
        let color = CONGESTION_COLORS[level.value() as usize];
        for pair in highways.get(reading.highway).coordinates.windows(2) {
            map.lines.push(MapLine { points: pair.to_vec(), color, width: CONGESTION_WIDTH });
        }
    }
    map
}

//! OSM PBF graph provider: enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use igo_spatial::{GraphStore, osm::PbfGraphProvider};
//!
//! let provider = PbfGraphProvider::new("barcelona.osm.pbf");
//! let graph = GraphStore::new("cache").load("Barcelona, Catalonia", &provider)?;
//! ```
//!
//! # What is loaded
//!
//! Only drivable `highway=*` ways are included (see [`RoadClass::is_drivable`]).
//! All other features (footways, buildings, POIs, relations) are ignored.
//! One-way roads add a single directed edge; two-way roads add both
//! directions; `oneway=-1` adds only the reverse direction.  Edge length is
//! the haversine distance between consecutive way nodes.
//!
//! # Memory note
//!
//! The loader buffers all OSM nodes in a `HashMap<i64, GeoPoint>` for the
//! first pass (ways reference node IDs by OSM integer ID).  The map is freed
//! before the R-tree is built.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use log::info;
use osmpbf::{Element, ElementReader};

use igo_core::{GeoPoint, NodeId};

use crate::class::{parse_max_speed, RoadClass};
use crate::network::{EdgeAttrs, SpatialGraph, SpatialGraphBuilder};
use crate::provider::GraphProvider;
use crate::{SpatialError, SpatialResult};

/// Reads one `.osm.pbf` extract.  The place name only keys the cache.
pub struct PbfGraphProvider {
    path: PathBuf,
}

impl PbfGraphProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphProvider for PbfGraphProvider {
    fn fetch(&self, place: &str) -> SpatialResult<SpatialGraph> {
        if !self.path.exists() {
            return Err(SpatialError::ResourceUnavailable(format!(
                "no OSM extract for {place:?} at {}",
                self.path.display()
            )));
        }
        load_from_pbf(&self.path)
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

fn load_from_pbf(path: &std::path::Path) -> SpatialResult<SpatialGraph> {
    // ── Phase 1: collect all OSM nodes + road ways in one sequential pass ──
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: HashMap<i64, GeoPoint> = HashMap::new();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lon(), n.lat()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lon(), n.lat()));
            }
            Element::Way(w) => {
                // Collect tags eagerly so &str lifetimes don't escape the closure.
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

                if let Some(highway) = tag("highway").filter(|h| RoadClass::is_drivable(h)) {
                    road_ways.push(OsmWay {
                        refs:      w.refs().collect(),
                        class:     RoadClass::resolve(highway.split([';', '|'])),
                        max_speed: tag("maxspeed").and_then(parse_max_speed),
                        direction: direction(highway, tag("oneway")),
                    });
                }
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    // ── Phase 2: identify road-referenced node IDs ────────────────────────
    let road_node_ids: HashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    // ── Phase 3: build network ────────────────────────────────────────────
    let mut builder = SpatialGraphBuilder::with_capacity(
        road_node_ids.len(),
        road_node_ids.len() * 2,
    );

    // Sorted so NodeIds are reproducible across loads of the same file.
    let mut sorted_ids: Vec<i64> = road_node_ids.into_iter().collect();
    sorted_ids.sort_unstable();

    let mut osm_to_igo: HashMap<i64, NodeId> = HashMap::with_capacity(sorted_ids.len());
    for osm_id in sorted_ids {
        if let Some(&pos) = all_nodes.get(&osm_id) {
            osm_to_igo.insert(osm_id, builder.add_node(osm_id, pos));
        }
    }

    drop(all_nodes);

    for way in &road_ways {
        for window in way.refs.windows(2) {
            let (Some(&a), Some(&b)) = (osm_to_igo.get(&window[0]), osm_to_igo.get(&window[1])) else {
                continue;
            };
            let len_m = builder.node_pos(a).distance_m(builder.node_pos(b));
            let mut attrs = EdgeAttrs::new(len_m, way.class);
            attrs.max_speed_kmh = way.max_speed;

            match way.direction {
                Direction::Forward  => builder.add_directed_edge(a, b, attrs),
                Direction::Backward => builder.add_directed_edge(b, a, attrs),
                Direction::Both     => builder.add_road(a, b, attrs),
            }
        }
    }

    let graph = builder.build();
    info!("OSM graph from {}: {graph:?}", path.display());
    Ok(graph)
}

// ── Internal types ────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
    Both,
}

struct OsmWay {
    refs:      Vec<i64>,
    class:     RoadClass,
    max_speed: Option<f64>,
    direction: Direction,
}

/// Motorways and motorway links are implicitly one-way in OSM convention.
fn direction(highway: &str, oneway: Option<&str>) -> Direction {
    match oneway {
        Some("yes" | "1" | "true") => Direction::Forward,
        Some("-1" | "reverse") => Direction::Backward,
        Some("no" | "false" | "0") => Direction::Both,
        _ if matches!(highway, "motorway" | "motorway_link") => Direction::Forward,
        _ => Direction::Both,
    }
}

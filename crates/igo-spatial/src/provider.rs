//! Graph providers: where a fresh [`SpatialGraph`] comes from on a cache miss.
//!
//! # CSV format
//!
//! [`CsvGraphProvider`] reads two files from `<dir>/<place key>/`
//! (or `<dir>/` directly when that sub-directory does not exist):
//!
//! ```csv
//! # nodes.csv
//! id,lon,lat
//! 21638822,2.1734,41.3851
//!
//! # edges.csv
//! from,to,length_m,highway,maxspeed
//! 21638822,21638830,84.2,residential|tertiary,
//! 21638830,21638822,84.2,primary,50;30
//! ```
//!
//! `highway` may list several classes separated by `|`; they are collapsed
//! with [`RoadClass::resolve`].  An empty `maxspeed` falls back to the class
//! table.  Rows that do not parse, edges referencing unknown node ids, and
//! edges with a negative or non-finite length are skipped with a warning.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

use igo_core::{GeoPoint, NodeId};

use crate::class::{parse_max_speed, RoadClass};
use crate::network::{EdgeAttrs, SpatialGraph, SpatialGraphBuilder};
use crate::store::place_key;
use crate::{SpatialError, SpatialResult};

/// Supplies the initial street graph for a place.
pub trait GraphProvider {
    /// Build the graph for `place`.
    ///
    /// # Errors
    ///
    /// [`SpatialError::ResourceUnavailable`] when the source cannot be reached
    /// at all; parse errors when it is unreadable.
    fn fetch(&self, place: &str) -> SpatialResult<SpatialGraph>;
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lon: f64,
    lat: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     i64,
    to:       i64,
    length_m: f64,
    highway:  String,
    #[serde(default)]
    maxspeed: Option<String>,
}

// ── CsvGraphProvider ──────────────────────────────────────────────────────────

/// Loads `nodes.csv` + `edges.csv` from a directory.
pub struct CsvGraphProvider {
    dir: PathBuf,
}

impl CsvGraphProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn place_dir(&self, place: &str) -> PathBuf {
        let nested = self.dir.join(place_key(place));
        if nested.is_dir() { nested } else { self.dir.clone() }
    }

    /// Build a graph from any pair of CSV sources.
    ///
    /// Useful for testing (pass `std::io::Cursor`s) or network streams.
    pub fn read<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<SpatialGraph> {
        let mut builder = SpatialGraphBuilder::new();
        let mut by_key: HashMap<i64, NodeId> = HashMap::new();

        let mut skipped = 0usize;
        for record in csv::Reader::from_reader(nodes).deserialize() {
            let Some(node) = row::<NodeRecord>(record, "nodes.csv")? else {
                skipped += 1;
                continue;
            };
            let pos = GeoPoint::new(node.lon, node.lat);
            if !pos.is_finite() {
                warn!("skipping node {} with non-finite position", node.id);
                skipped += 1;
                continue;
            }
            if by_key.contains_key(&node.id) {
                warn!("duplicate node id {}; keeping the first", node.id);
                skipped += 1;
                continue;
            }
            by_key.insert(node.id, builder.add_node(node.id, pos));
        }

        for record in csv::Reader::from_reader(edges).deserialize() {
            let Some(edge) = row::<EdgeRecord>(record, "edges.csv")? else {
                skipped += 1;
                continue;
            };
            let (Some(&from), Some(&to)) = (by_key.get(&edge.from), by_key.get(&edge.to)) else {
                warn!("edge {} -> {} references an unknown node", edge.from, edge.to);
                skipped += 1;
                continue;
            };
            if !edge.length_m.is_finite() || edge.length_m < 0.0 {
                warn!("edge {} -> {} has invalid length {}", edge.from, edge.to, edge.length_m);
                skipped += 1;
                continue;
            }
            let class = RoadClass::resolve(edge.highway.split('|'));
            let attrs = EdgeAttrs {
                length_m:      edge.length_m,
                class,
                max_speed_kmh: edge.maxspeed.as_deref().and_then(parse_max_speed),
            };
            builder.add_directed_edge(from, to, attrs);
        }

        let graph = builder.build();
        info!("CSV graph: {} nodes, {} edges ({} skipped)", graph.node_count(), graph.edge_count(), skipped);
        Ok(graph)
    }
}

/// A parsed row, `None` for a row that does not parse.  I/O errors are fatal.
fn row<T>(record: Result<T, csv::Error>, file: &str) -> SpatialResult<Option<T>> {
    match record {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_io_error() => Err(e.into()),
        Err(e) => {
            warn!("{file}: skipping unreadable row: {e}");
            Ok(None)
        }
    }
}

fn open(path: &Path) -> SpatialResult<File> {
    File::open(path)
        .map_err(|e| SpatialError::ResourceUnavailable(format!("{}: {e}", path.display())))
}

impl GraphProvider for CsvGraphProvider {
    fn fetch(&self, place: &str) -> SpatialResult<SpatialGraph> {
        let dir = self.place_dir(place);
        let nodes = open(&dir.join("nodes.csv"))?;
        let edges = open(&dir.join("edges.csv"))?;
        Self::read(nodes, edges)
    }
}

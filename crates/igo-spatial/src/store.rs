//! Persisted graph snapshots keyed by place name.
//!
//! [`GraphStore::load`] returns the graph stored for a place if the snapshot
//! exists and is valid; otherwise it asks a [`GraphProvider`] for a fresh
//! graph and persists it.  A snapshot that fails to parse or validate is
//! treated as a miss, never as a fatal error.
//!
//! Snapshots are versioned JSON (`<place key>.graph.json`).  Only the static
//! graph is stored; highway mappings and congestion weights are recomputed
//! per process.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use igo_core::{GeoPoint, NodeId};

use crate::class::RoadClass;
use crate::network::{EdgeAttrs, SpatialGraph, SpatialGraphBuilder};
use crate::provider::GraphProvider;
use crate::{SpatialError, SpatialResult};

/// Bump when the snapshot layout changes; older files are refetched.
pub const SNAPSHOT_VERSION: u32 = 1;

/// File-name-safe key for a place: lowercase alphanumerics, `_` elsewhere.
///
/// `"Barcelona, Catalonia"` → `"barcelona__catalonia"`.
pub fn place_key(place: &str) -> String {
    place
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

// ── Snapshot layout ───────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct SnapshotNode {
    key: i64,
    lon: f64,
    lat: f64,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEdge {
    from:          u32,
    to:            u32,
    length_m:      f64,
    class:         RoadClass,
    max_speed_kmh: f64,
}

#[derive(Serialize, Deserialize)]
struct GraphSnapshot {
    version: u32,
    place:   String,
    nodes:   Vec<SnapshotNode>,
    edges:   Vec<SnapshotEdge>,
}

impl GraphSnapshot {
    fn capture(place: &str, graph: &SpatialGraph) -> Self {
        let nodes = graph
            .nodes()
            .map(|(id, pos)| SnapshotNode { key: graph.node_key[id.index()], lon: pos.lon, lat: pos.lat })
            .collect();
        let edges = graph
            .edges()
            .map(|e| SnapshotEdge {
                from:          e.from.0,
                to:            e.to.0,
                length_m:      e.length_m,
                class:         e.class,
                max_speed_kmh: e.max_speed_kmh,
            })
            .collect();
        Self { version: SNAPSHOT_VERSION, place: place.to_owned(), nodes, edges }
    }

    fn restore(self, place: &str) -> SpatialResult<SpatialGraph> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SpatialError::InvalidSnapshot(format!(
                "version {} (expected {SNAPSHOT_VERSION})",
                self.version
            )));
        }
        if self.place != place {
            return Err(SpatialError::InvalidSnapshot(format!(
                "snapshot is for {:?}, not {place:?}",
                self.place
            )));
        }

        let node_count = self.nodes.len();
        let mut builder = SpatialGraphBuilder::with_capacity(node_count, self.edges.len());
        for n in self.nodes {
            builder.add_node(n.key, GeoPoint::new(n.lon, n.lat));
        }
        for e in self.edges {
            if e.from as usize >= node_count || e.to as usize >= node_count {
                return Err(SpatialError::InvalidSnapshot(format!(
                    "edge {} -> {} out of range ({node_count} nodes)",
                    e.from, e.to
                )));
            }
            let valid = e.length_m.is_finite() && e.length_m >= 0.0
                && e.max_speed_kmh.is_finite() && e.max_speed_kmh > 0.0;
            if !valid {
                return Err(SpatialError::InvalidSnapshot(format!(
                    "edge {} -> {} has invalid attributes",
                    e.from, e.to
                )));
            }
            let attrs = EdgeAttrs::new(e.length_m, e.class).with_max_speed(e.max_speed_kmh);
            builder.add_directed_edge(NodeId(e.from), NodeId(e.to), attrs);
        }
        Ok(builder.build())
    }
}

// ── GraphStore ────────────────────────────────────────────────────────────────

/// Directory of persisted graph snapshots.
pub struct GraphStore {
    dir: PathBuf,
}

impl GraphStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the snapshot file for `place`.
    pub fn snapshot_path(&self, place: &str) -> PathBuf {
        self.dir.join(format!("{}.graph.json", place_key(place)))
    }

    /// Return the persisted graph for `place`, or fetch and persist one.
    ///
    /// # Errors
    ///
    /// Only provider failures are returned.  Unreadable snapshots fall back
    /// to the provider; a failed write is logged and the fresh graph is
    /// still returned.
    pub fn load<P: GraphProvider + ?Sized>(&self, place: &str, provider: &P) -> SpatialResult<SpatialGraph> {
        let path = self.snapshot_path(place);
        if path.exists() {
            match read_snapshot(&path, place) {
                Ok(graph) => {
                    info!("loaded graph for {place:?} from {} ({graph:?})", path.display());
                    return Ok(graph);
                }
                Err(e) => warn!("ignoring snapshot {}: {e}", path.display()),
            }
        }

        info!("fetching graph for {place:?} from provider");
        let graph = provider.fetch(place)?;
        if let Err(e) = self.persist(place, &graph) {
            warn!("could not persist graph snapshot {}: {e}", path.display());
        }
        Ok(graph)
    }

    /// Write `graph` as the snapshot for `place`, replacing any previous one.
    pub fn persist(&self, place: &str, graph: &SpatialGraph) -> SpatialResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.snapshot_path(place);
        // Write-then-rename: a crash never leaves a truncated snapshot.
        let tmp = path.with_extension("json.tmp");
        {
            let mut out = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(&mut out, &GraphSnapshot::capture(place, graph))?;
            out.flush()?;
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn read_snapshot(path: &Path, place: &str) -> SpatialResult<SpatialGraph> {
    let file = File::open(path)?;
    let snapshot: GraphSnapshot = serde_json::from_reader(BufReader::new(file))?;
    snapshot.restore(place)
}

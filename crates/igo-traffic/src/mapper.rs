//! Highway mapping: feed polylines → ordered graph edge sequences.
//!
//! For each raw highway:
//!
//! 1. parse the flat `lon,lat,…` list into points (odd count ⇒ malformed);
//! 2. snap each point to its nearest node;
//! 3. route between consecutive snapped nodes by static edge length,
//!    skipping any segment with no path;
//! 4. concatenate the segment edges in order, duplicates included.
//!
//! Records are independent and only read the static graph, so with the
//! `parallel` feature they are mapped on Rayon's pool.  The resulting
//! table and rejection list are in feed order either way.

use log::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use igo_core::{EdgeId, GeoPoint, HighwayId};
use igo_spatial::router::by_length;
use igo_spatial::{DijkstraRouter, NearestNodeIndex, Router, SpatialError, SpatialGraph};

use crate::feed::RawHighway;
use crate::highway::{Highway, HighwayTable};
use crate::TrafficError;

/// Outcome of [`build_highways`].
#[derive(Debug, Default)]
pub struct MappingReport {
    pub table:                HighwayTable,
    /// Records that could not be parsed.
    pub rejected:             Vec<TrafficError>,
    /// Segments skipped because their endpoints are not connected.
    pub unreachable_segments: usize,
}

/// Parse a flat `lon,lat,lon,lat,…` string into points.
///
/// An empty string is a polyline with no points.
pub fn parse_coordinates(raw: &str) -> Result<Vec<GeoPoint>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let values = raw
        .split(',')
        .map(|v| {
            let v = v.trim();
            match v.parse::<f64>() {
                Ok(x) if x.is_finite() => Ok(x),
                _ => Err(format!("bad coordinate {v:?}")),
            }
        })
        .collect::<Result<Vec<f64>, String>>()?;

    if values.len() % 2 != 0 {
        return Err(format!("odd number of coordinate values ({})", values.len()));
    }
    Ok(values.chunks_exact(2).map(|c| GeoPoint::new(c[0], c[1])).collect())
}

/// Map every raw highway onto `graph`.
///
/// `index` snaps polyline points; pass the graph itself to use its R-tree.
pub fn build_highways(
    graph:   &SpatialGraph,
    index:   &dyn NearestNodeIndex,
    records: &[RawHighway],
) -> MappingReport {
    #[cfg(feature = "parallel")]
    let mapped: Vec<_> = records.par_iter().map(|r| map_one(graph, index, r)).collect();
    #[cfg(not(feature = "parallel"))]
    let mapped: Vec<_> = records.iter().map(|r| map_one(graph, index, r)).collect();

    let mut report = MappingReport::default();
    for result in mapped {
        match result {
            Ok((highway, skipped)) => {
                report.unreachable_segments += skipped;
                report.table.insert(highway);
            }
            Err(e) => {
                warn!("{e}");
                report.rejected.push(e);
            }
        }
    }

    info!(
        "mapped {} highways ({} edge refs, {} rejected, {} unreachable segments)",
        report.table.len(),
        report.table.edge_refs(),
        report.rejected.len(),
        report.unreachable_segments,
    );
    report
}

fn map_one(
    graph:  &SpatialGraph,
    index:  &dyn NearestNodeIndex,
    record: &RawHighway,
) -> Result<(Highway, usize), TrafficError> {
    let malformed = |reason: String| TrafficError::MalformedRecord { line: record.line, reason };

    let id = record
        .id
        .trim()
        .parse::<u32>()
        .map(HighwayId)
        .map_err(|e| malformed(format!("bad highway id {:?}: {e}", record.id)))?;
    let coordinates = parse_coordinates(&record.coordinates).map_err(malformed)?;

    let snapped: Vec<_> = coordinates.iter().filter_map(|&p| index.nearest(p)).collect();

    let mut edges: Vec<EdgeId> = Vec::new();
    let mut skipped = 0;
    for pair in snapped.windows(2) {
        match DijkstraRouter.route(graph, pair[0], pair[1], by_length(graph)) {
            Ok(path) => edges.extend(path.edges),
            Err(SpatialError::NoPath { from, to }) => {
                debug!("{id}: no path {from} -> {to}, segment skipped");
                skipped += 1;
            }
            Err(e) => {
                debug!("{id}: segment skipped: {e}");
                skipped += 1;
            }
        }
    }

    let highway = Highway {
        id,
        description: record.description.clone(),
        coordinates,
        edges,
    };
    Ok((highway, skipped))
}

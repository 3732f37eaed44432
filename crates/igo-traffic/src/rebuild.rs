//! The congestion rebuild: snapshot + highway table → new [`Generation`].
//!
//! ```text
//! ① Reset    : every edge to level 0; base_time = length / max_speed.
//! ② Apply    : for each reading in order: validate levels, then set
//!               every edge of highways[reading.highway] to `current`.
//!               Later readings override earlier ones on shared edges.
//! ③ Multiply : adjusted_time = base_time × MULTIPLIERS[level].
//! ```
//!
//! The rebuild always writes into a fresh generation; the caller decides
//! when to publish it.  A cancelled rebuild is discarded whole.

use std::sync::Arc;

use log::{debug, warn};

use igo_spatial::SpatialGraph;

use crate::cancel::CancelToken;
use crate::congestion::{CongestionLevel, CongestionSnapshot, MULTIPLIERS};
use crate::generation::Generation;
use crate::highway::HighwayTable;
use crate::observer::RebuildObserver;
use crate::{TrafficError, TrafficResult};

/// A built generation plus the readings that were rejected.
#[derive(Debug)]
pub struct RebuildReport {
    pub generation: Generation,
    pub rejected:   Vec<TrafficError>,
}

/// Build generation `id` from `snapshot`.
///
/// # Errors
///
/// Only [`TrafficError::Cancelled`].  Invalid readings are reported in
/// [`RebuildReport::rejected`] and skipped.
pub fn rebuild<O: RebuildObserver + ?Sized>(
    graph:    &Arc<SpatialGraph>,
    highways: &HighwayTable,
    snapshot: &CongestionSnapshot,
    id:       u64,
    observer: &mut O,
    cancel:   &CancelToken,
) -> TrafficResult<RebuildReport> {
    let mut generation = Generation::reset(Arc::clone(graph), id, Some(snapshot.clone()));
    let mut rejected = Vec::new();

    let total = snapshot.len();
    let buckets = MULTIPLIERS.len();
    let mut bucket = 0;

    for (i, reading) in snapshot.readings().iter().enumerate() {
        if cancel.is_cancelled() {
            debug!("rebuild of generation {id} cancelled after {i} readings");
            return Err(TrafficError::Cancelled);
        }

        let next = i * buckets / total;
        if next != bucket {
            bucket = next;
            observer.on_progress((bucket * 100 / buckets) as u8);
        }

        let level = match validate(reading.current, reading.predicted) {
            Ok(level) => level,
            Err(bad) => {
                let e = TrafficError::InvalidCongestionLevel { highway: reading.highway, level: bad };
                warn!("rejecting reading: {e}");
                rejected.push(e);
                continue;
            }
        };

        let highway = highways.get(reading.highway);
        if highway.is_placeholder() {
            debug!("no mapped highway for {}", reading.highway);
        }
        for &edge in &highway.edges {
            generation.set_edge_congestion(edge, level);
        }
    }

    generation.apply_multipliers();
    observer.on_progress(100);
    observer.on_complete(id);
    Ok(RebuildReport { generation, rejected })
}

/// Both levels must be in range; the current one is applied.
fn validate(current: i32, predicted: i32) -> Result<CongestionLevel, i32> {
    CongestionLevel::try_from(predicted)?;
    CongestionLevel::try_from(current)
}

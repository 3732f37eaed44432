//! Highway and congestion feed readers.
//!
//! # Highway feed
//!
//! Comma-delimited, `"`-quoted, with a header row that is skipped.  Fields
//! are matched by position:
//!
//! ```csv
//! Tram,Descripcio,Coordenades
//! 1,"Diagonal (Ronda de Dalt a Doctor Marañón)","2.11203535639414,41.3841912394771,2.1015028628725,41.3859062964446"
//! ```
//!
//! The coordinate string is only parsed later, by the mapper.
//!
//! # Congestion feed
//!
//! `#`-delimited, no header:
//!
//! ```text
//! 1#20211021152000#2#3
//! ```
//!
//! `highway # timestamp # current # predicted`.  The timestamp is ignored.
//!
//! Unparseable rows are collected in [`Parsed::rejected`] and the rest of
//! the feed is still returned; only I/O failures abort the read.

use std::io::Read;

use log::warn;
use serde::de::IgnoredAny;
use serde::Deserialize;

use igo_core::HighwayId;

use crate::congestion::{CongestionReading, CongestionSnapshot};
use crate::{TrafficError, TrafficResult};

/// Feed contents plus the rows that had to be skipped.
#[derive(Debug)]
pub struct Parsed<T> {
    pub value:    T,
    pub rejected: Vec<TrafficError>,
}

/// An unmapped highway row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawHighway {
    /// 1-based line in the feed, for error reports.
    pub line:        u64,
    pub id:          String,
    pub description: String,
    /// Flat `lon,lat,lon,lat,…` list.
    pub coordinates: String,
}

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct HighwayRecord {
    id:          String,
    description: String,
    coordinates: String,
}

#[derive(Deserialize)]
struct CongestionRecord {
    highway:    u32,
    _timestamp: IgnoredAny,
    current:    i32,
    predicted:  i32,
}

// ── Readers ───────────────────────────────────────────────────────────────────

/// Read the highway feed.
pub fn parse_highway_feed<R: Read>(reader: R) -> TrafficResult<Parsed<Vec<RawHighway>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .quote(b'"')
        .flexible(true)
        .from_reader(reader);

    let mut value = Vec::new();
    let mut rejected = Vec::new();
    for result in csv_reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rejected.push(reject(e)?);
                continue;
            }
        };
        let line = line_of(record.position());
        if record.len() != 3 {
            rejected.push(malformed(line, format!("expected 3 fields, found {}", record.len())));
            continue;
        }
        match record.deserialize::<HighwayRecord>(None) {
            Ok(row) => value.push(RawHighway {
                line,
                id:          row.id,
                description: row.description,
                coordinates: row.coordinates,
            }),
            Err(e) => rejected.push(malformed(line, e.to_string())),
        }
    }
    Ok(Parsed { value, rejected })
}

/// Read the congestion feed into an ordered snapshot.
pub fn parse_congestion_feed<R: Read>(reader: R) -> TrafficResult<Parsed<CongestionSnapshot>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'#')
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut readings = Vec::new();
    let mut rejected = Vec::new();
    for result in csv_reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rejected.push(reject(e)?);
                continue;
            }
        };
        let line = line_of(record.position());
        if record.len() != 4 {
            rejected.push(malformed(line, format!("expected 4 fields, found {}", record.len())));
            continue;
        }
        match record.deserialize::<CongestionRecord>(None) {
            Ok(row) => readings.push(CongestionReading::new(HighwayId(row.highway), row.current, row.predicted)),
            Err(e) => rejected.push(malformed(line, e.to_string())),
        }
    }
    Ok(Parsed { value: CongestionSnapshot::new(readings), rejected })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn line_of(position: Option<&csv::Position>) -> u64 {
    position.map_or(0, |p| p.line())
}

fn malformed(line: u64, reason: String) -> TrafficError {
    warn!("skipping feed line {line}: {reason}");
    TrafficError::MalformedRecord { line, reason }
}

/// Per-row CSV errors become rejections; I/O errors are fatal.
fn reject(e: csv::Error) -> TrafficResult<TrafficError> {
    if e.is_io_error() {
        return Err(e.into());
    }
    let line = line_of(e.position());
    Ok(malformed(line, e.to_string()))
}

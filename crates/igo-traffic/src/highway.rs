//! Highways and the id-keyed highway table.
//!
//! A *highway* is a named street record from the external feed, not a graph
//! edge.  Mapping assigns each highway the ordered list of edges its
//! polyline traverses.  Feed ids may have gaps; looking up a missing id
//! yields [`Highway::EMPTY`] rather than an error, so a congestion reading
//! for an unknown highway simply touches no edges.

use std::collections::BTreeMap;

use log::warn;

use igo_core::{EdgeId, GeoPoint, HighwayId};

/// One mapped highway.
#[derive(Clone, Debug, PartialEq)]
pub struct Highway {
    pub id:          HighwayId,
    pub description: String,
    /// Polyline from the feed, `(lon, lat)` in feed order.
    pub coordinates: Vec<GeoPoint>,
    /// Graph edges traversed, in order.  Duplicates are kept.
    pub edges:       Vec<EdgeId>,
}

impl Highway {
    /// Placeholder returned for ids absent from the table.
    pub const EMPTY: Highway = Highway {
        id:          HighwayId::INVALID,
        description: String::new(),
        coordinates: Vec::new(),
        edges:       Vec::new(),
    };

    pub fn is_placeholder(&self) -> bool {
        self.id == HighwayId::INVALID
    }
}

static EMPTY_HIGHWAY: Highway = Highway::EMPTY;

/// Highway id → [`Highway`], with absence represented by [`Highway::EMPTY`].
#[derive(Clone, Debug, Default)]
pub struct HighwayTable {
    by_id: BTreeMap<HighwayId, Highway>,
}

impl HighwayTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The highway with `id`, or the empty placeholder.
    pub fn get(&self, id: HighwayId) -> &Highway {
        self.by_id.get(&id).unwrap_or(&EMPTY_HIGHWAY)
    }

    pub fn contains(&self, id: HighwayId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Insert `highway`, replacing any earlier one with the same id.
    pub fn insert(&mut self, highway: Highway) {
        let id = highway.id;
        if self.by_id.insert(id, highway).is_some() {
            warn!("duplicate {id} in feed; keeping the later record");
        }
    }

    /// Highways in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Highway> + '_ {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Largest id present, if any.
    pub fn max_id(&self) -> Option<HighwayId> {
        self.by_id.keys().next_back().copied()
    }

    /// Total number of edge references across all highways.
    pub fn edge_refs(&self) -> usize {
        self.by_id.values().map(|h| h.edges.len()).sum()
    }
}

impl FromIterator<Highway> for HighwayTable {
    fn from_iter<I: IntoIterator<Item = Highway>>(iter: I) -> Self {
        let mut table = HighwayTable::new();
        for h in iter {
            table.insert(h);
        }
        table
    }
}

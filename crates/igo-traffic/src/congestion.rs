//! Congestion levels, readings, and the level → travel-time multiplier table.

use std::fmt;

use igo_core::HighwayId;

/// Travel-time multiplier indexed by congestion level.
///
/// Level 0 means "no data" and is penalised slightly above free flow
/// (level 1).  Level 6 means "blocked": an infinite cost the router never
/// relaxes.
pub const MULTIPLIERS: [f64; 7] = [1.1, 1.0, 1.2, 1.5, 2.0, 4.0, f64::INFINITY];

/// A validated congestion level in `0..=6`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CongestionLevel(u8);

impl CongestionLevel {
    pub const NO_DATA: CongestionLevel = CongestionLevel(0);
    pub const BLOCKED: CongestionLevel = CongestionLevel(6);

    /// Every valid level, ascending.
    pub fn all() -> impl Iterator<Item = CongestionLevel> {
        (0..MULTIPLIERS.len() as u8).map(CongestionLevel)
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn multiplier(self) -> f64 {
        MULTIPLIERS[self.0 as usize]
    }

    pub fn is_blocked(self) -> bool {
        self == Self::BLOCKED
    }
}

impl TryFrom<i32> for CongestionLevel {
    type Error = i32;

    fn try_from(level: i32) -> Result<Self, i32> {
        match u8::try_from(level) {
            Ok(v) if (v as usize) < MULTIPLIERS.len() => Ok(CongestionLevel(v)),
            _ => Err(level),
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One row of the congestion feed.
///
/// Levels are kept raw; they are validated when the reading is applied so
/// an out-of-range row can be rejected on its own.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CongestionReading {
    pub highway:   HighwayId,
    pub current:   i32,
    pub predicted: i32,
}

impl CongestionReading {
    pub fn new(highway: HighwayId, current: i32, predicted: i32) -> Self {
        Self { highway, current, predicted }
    }
}

/// An ordered congestion snapshot.  Two snapshots are equal only if they
/// hold the same readings in the same order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CongestionSnapshot {
    readings: Vec<CongestionReading>,
}

impl CongestionSnapshot {
    pub fn new(readings: Vec<CongestionReading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[CongestionReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl FromIterator<CongestionReading> for CongestionSnapshot {
    fn from_iter<I: IntoIterator<Item = CongestionReading>>(iter: I) -> Self {
        Self { readings: iter.into_iter().collect() }
    }
}

/// `true` if `current` differs from `previous` and a rebuild is needed.
///
/// No previous snapshot always counts as a change.
pub fn level_changed(previous: Option<&CongestionSnapshot>, current: &CongestionSnapshot) -> bool {
    previous != Some(current)
}

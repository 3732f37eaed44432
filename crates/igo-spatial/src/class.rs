//! Road classification and the class → speed table.
//!
//! Street data often carries a *list* of classes for one edge (a simplified
//! edge that merged several ways).  [`RoadClass::resolve`] collapses such a
//! list with a fixed precedence:
//!
//! ```text
//! residential, tertiary  >  primary, secondary, primary_link  >  living_street  >  unclassified
//! ```
//!
//! The first group containing any listed class wins; inside a group the
//! listed order decides.

use serde::{Deserialize, Serialize};

/// Speed (km/h) assumed for any class missing from the table.
pub const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Classification of a street segment, derived from the `highway` tag.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Motorway,
    MotorwayLink,
    Trunk,
    TrunkLink,
    Primary,
    PrimaryLink,
    Secondary,
    SecondaryLink,
    Tertiary,
    TertiaryLink,
    Residential,
    LivingStreet,
    Unclassified,
    Road,
    /// Anything else (service roads, unknown tags).
    #[default]
    Other,
}

const PRECEDENCE: [&[RoadClass]; 4] = [
    &[RoadClass::Residential, RoadClass::Tertiary],
    &[RoadClass::Primary, RoadClass::Secondary, RoadClass::PrimaryLink],
    &[RoadClass::LivingStreet],
    &[RoadClass::Unclassified],
];

impl RoadClass {
    /// Parse a single `highway` tag value.  Unknown values map to `Other`.
    pub fn parse(tag: &str) -> RoadClass {
        match tag.trim() {
            "motorway"       => RoadClass::Motorway,
            "motorway_link"  => RoadClass::MotorwayLink,
            "trunk"          => RoadClass::Trunk,
            "trunk_link"     => RoadClass::TrunkLink,
            "primary"        => RoadClass::Primary,
            "primary_link"   => RoadClass::PrimaryLink,
            "secondary"      => RoadClass::Secondary,
            "secondary_link" => RoadClass::SecondaryLink,
            "tertiary"       => RoadClass::Tertiary,
            "tertiary_link"  => RoadClass::TertiaryLink,
            "residential"    => RoadClass::Residential,
            "living_street"  => RoadClass::LivingStreet,
            "unclassified"   => RoadClass::Unclassified,
            "road"           => RoadClass::Road,
            _                => RoadClass::Other,
        }
    }

    /// Collapse a possibly multi-valued classification to one class.
    ///
    /// An empty list is `Other`; a single value is taken as-is; otherwise
    /// the precedence table decides, falling back to the first listed class.
    pub fn resolve<'a, I>(tags: I) -> RoadClass
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: Vec<RoadClass> = tags.into_iter().map(RoadClass::parse).collect();
        match classes.as_slice() {
            [] => RoadClass::Other,
            [only] => *only,
            _ => PRECEDENCE
                .iter()
                .flat_map(|group| group.iter())
                .find(|c| classes.contains(c))
                .copied()
                .unwrap_or(classes[0]),
        }
    }

    /// Speed assumed when the source gives no explicit max speed.
    pub fn default_speed_kmh(self) -> f64 {
        match self {
            RoadClass::TrunkLink => 60.0,
            RoadClass::Primary | RoadClass::Secondary | RoadClass::PrimaryLink => 50.0,
            RoadClass::Residential | RoadClass::Tertiary => 30.0,
            RoadClass::LivingStreet => 20.0,
            RoadClass::Unclassified => 10.0,
            _ => DEFAULT_SPEED_KMH,
        }
    }

    /// `true` if the tag, or any value of a multi-valued tag (`;` or `|`
    /// separated), is a class kept in a drive network.
    pub fn is_drivable(tag: &str) -> bool {
        tag.split([';', '|']).any(|value| RoadClass::parse(value) != RoadClass::Other)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Motorway      => "motorway",
            RoadClass::MotorwayLink  => "motorway_link",
            RoadClass::Trunk         => "trunk",
            RoadClass::TrunkLink     => "trunk_link",
            RoadClass::Primary       => "primary",
            RoadClass::PrimaryLink   => "primary_link",
            RoadClass::Secondary     => "secondary",
            RoadClass::SecondaryLink => "secondary_link",
            RoadClass::Tertiary      => "tertiary",
            RoadClass::TertiaryLink  => "tertiary_link",
            RoadClass::Residential   => "residential",
            RoadClass::LivingStreet  => "living_street",
            RoadClass::Unclassified  => "unclassified",
            RoadClass::Road          => "road",
            RoadClass::Other         => "other",
        }
    }
}

impl std::fmt::Display for RoadClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an explicit max speed tag.
///
/// Multi-valued tags (`"50;30"`, `"50|30"`) resolve to their maximum.
/// Returns `None` when no positive number can be read.
pub fn parse_max_speed(raw: &str) -> Option<f64> {
    raw.split([';', '|'])
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .reduce(f64::max)
}

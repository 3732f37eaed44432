//! Typed identifiers for graph nodes, graph edges and feed highways.
//!
//! Node and edge ids are dense positions into the graph's column vectors;
//! highway ids come from the feed and may be sparse.  Mixing them up is a
//! type error rather than a silent wrong index.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $label:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Placeholder for "not assigned".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Id for position `i` of a dense column.
            ///
            /// Graphs never hold more than `u32::MAX - 1` elements; larger
            /// indices are a construction bug.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < <$inner>::MAX as usize, "{} index {i} out of range", $label);
                $name(i as $inner)
            }

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, " {}"), self.0)
                } else {
                    f.write_str(concat!($label, " <none>"))
                }
            }
        }
    };
}

typed_id! {
    /// Street-graph node, numbered in insertion order.
    pub struct NodeId(u32) => "node";
}

typed_id! {
    /// Directed street-graph edge, numbered in CSR order.
    pub struct EdgeId(u32) => "edge";
}

typed_id! {
    /// Highway number assigned by the highway feed.
    pub struct HighwayId(u32) => "highway";
}

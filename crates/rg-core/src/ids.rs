//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and in
//! ordered sets without ceremony.  The inner integer is `pub` to allow
//! direct indexing into `Vec`s, but callers should prefer `.index()`.
//!
//! Each graph numbers its own ids from zero: a `PersonId` indexes the
//! population graph, a `NodeId`/`EdgeId` the road network, a `BusId` the
//! power topology.  The types keep them from being mixed up.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Node of the population (social) graph a rumor spreads over.
    pub struct PersonId(u32);
}

typed_id! {
    /// Junction of the road network.
    pub struct NodeId(u32);
}

typed_id! {
    /// Directed road-network edge.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Bus of the power topology.
    pub struct BusId(u32);
}

typed_id! {
    /// Vehicle agent, numbered in order of first appearance.
    pub struct AgentId(u32);
}

typed_id! {
    /// Handle of one contagion instance inside the engine.
    pub struct RumorId(u32);
}

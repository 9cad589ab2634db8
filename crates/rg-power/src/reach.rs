//! Down-set bookkeeping and source reachability.

use std::collections::{BTreeSet, VecDeque};

use rg_core::BusId;

use crate::PowerTopology;

// ── DownSet ───────────────────────────────────────────────────────────────────

/// Buses currently out of service.  Never contains a source bus when
/// maintained through [`FailureEngine`](crate::FailureEngine).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownSet(BTreeSet<BusId>);

impl DownSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, bus: BusId) -> bool {
        self.0.contains(&bus)
    }

    /// `true` if `bus` was not already down.
    pub fn insert(&mut self, bus: BusId) -> bool {
        self.0.insert(bus)
    }

    /// `true` if `bus` was down.
    pub fn remove(&mut self, bus: BusId) -> bool {
        self.0.remove(&bus)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Down buses in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = BusId> + '_ {
        self.0.iter().copied()
    }

    pub fn as_set(&self) -> &BTreeSet<BusId> {
        &self.0
    }
}

impl FromIterator<BusId> for DownSet {
    fn from_iter<I: IntoIterator<Item = BusId>>(iter: I) -> Self {
        DownSet(iter.into_iter().collect())
    }
}

// ── Reachability ──────────────────────────────────────────────────────────────

/// Every bus reachable from a source bus through buses not in `down`,
/// sources included.
///
/// Down buses are neither returned nor traversed.  A topology whose sources
/// are all down yields an empty set.
pub fn powered_nodes(topology: &PowerTopology, down: &DownSet) -> BTreeSet<BusId> {
    let mut seen = vec![false; topology.bus_count()];
    let mut queue = VecDeque::new();
    for src in topology.sources() {
        if !down.contains(src) && !seen[src.index()] {
            seen[src.index()] = true;
            queue.push_back(src);
        }
    }
    while let Some(bus) = queue.pop_front() {
        for &next in topology.neighbours(bus) {
            if !seen[next.index()] && !down.contains(next) {
                seen[next.index()] = true;
                queue.push_back(next);
            }
        }
    }
    seen.iter()
        .enumerate()
        .filter(|(_, s)| **s)
        .map(|(i, _)| BusId(i as u32))
        .collect()
}

/// Non-source buses that are up but cut off from every source.
pub fn islanded_nodes(topology: &PowerTopology, down: &DownSet) -> BTreeSet<BusId> {
    let powered = powered_nodes(topology, down);
    topology
        .load_buses()
        .filter(|b| !down.contains(*b) && !powered.contains(b))
        .collect()
}

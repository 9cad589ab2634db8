//! `FailureEngine` — randomized bus failures, partitions, and recoveries.
//!
//! # Per-bus state machine
//!
//! ```text
//! Up ──(single failure | partition)──▶ Down ──(recovery)──▶ Up
//! ```
//!
//! Source buses sit outside the machine and are always up.  Taking a bus
//! down zeroes its load; bringing it up restores the nominal load.  The bus
//! itself stays in the topology either way.
//!
//! # Step order
//!
//! [`FailureEngine::step`] rolls its three checks in a fixed order:
//!
//! 1. single-bus failure,
//! 2. partition failure,
//! 3. recovery.
//!
//! Recovery therefore sees buses downed earlier in the same step.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use rg_core::{BusId, PowerParams, SimRng};

use crate::{powered_nodes, DownSet, PowerError, PowerResult, PowerTopology};

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Result of a partition failure attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartitionOutcome {
    /// `group` (center first, BFS order) was taken down.
    Failed { center: BusId, depth: u32, group: Vec<BusId> },
    /// No up, non-source bus exists to serve as center.
    NoCandidates,
    /// The requested center is a source, already down, or not in the topology.
    InvalidCenter(BusId),
}

impl fmt::Display for PartitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionOutcome::Failed { center, group, .. } => {
                write!(f, "partition from {center} ({} buses)", group.len())
            }
            PartitionOutcome::NoCandidates     => f.write_str("no partition candidates"),
            PartitionOutcome::InvalidCenter(b) => write!(f, "invalid partition center {b}"),
        }
    }
}

/// Result of a recovery attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RecoveryOutcome {
    Recovered(BusId),
    NothingDown,
}

/// What one [`FailureEngine::step`] did.  `None` means that check's roll
/// did not fire.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FailureStepReport {
    pub failed:    Option<BusId>,
    pub partition: Option<PartitionOutcome>,
    pub recovery:  Option<RecoveryOutcome>,
}

impl FailureStepReport {
    /// Buses that went down during the step, in order.
    pub fn downed(&self) -> Vec<BusId> {
        let mut out: Vec<BusId> = self.failed.into_iter().collect();
        if let Some(PartitionOutcome::Failed { group, .. }) = &self.partition {
            out.extend(group.iter().copied());
        }
        out
    }

    pub fn recovered(&self) -> Option<BusId> {
        match self.recovery {
            Some(RecoveryOutcome::Recovered(b)) => Some(b),
            _ => None,
        }
    }
}

// ── FailureEngine ─────────────────────────────────────────────────────────────

/// Owns the down-set and per-bus load of one power topology.
pub struct FailureEngine {
    topology: Arc<PowerTopology>,
    down:     DownSet,
    /// Current load per bus in MW; zero while down.
    load_mw:  Vec<f64>,
    rng:      SimRng,
}

impl FailureEngine {
    /// Engine with every bus up at its nominal load.
    pub fn new(topology: Arc<PowerTopology>, rng: SimRng) -> Self {
        let load_mw = topology.buses.iter().map(|b| b.load_mw).collect();
        Self { topology, down: DownSet::new(), load_mw, rng }
    }

    pub fn topology(&self) -> &Arc<PowerTopology> {
        &self.topology
    }

    pub fn down(&self) -> &DownSet {
        &self.down
    }

    #[inline]
    pub fn is_down(&self, bus: BusId) -> bool {
        self.down.contains(bus)
    }

    /// Current load of `bus` in MW (0 while down or unknown).
    pub fn load_of(&self, bus: BusId) -> f64 {
        self.load_mw.get(bus.index()).copied().unwrap_or(0.0)
    }

    /// Current load of every bus, indexed by `BusId`.
    pub fn loads(&self) -> &[f64] {
        &self.load_mw
    }

    /// Buses reachable from a source through up buses.
    pub fn powered(&self) -> BTreeSet<BusId> {
        powered_nodes(&self.topology, &self.down)
    }

    // ── Manual toggles ────────────────────────────────────────────────────

    /// Take `bus` down and zero its load.  Returns `false` if it was already
    /// down.
    ///
    /// # Errors
    ///
    /// [`PowerError::SourceBus`] for a source, [`PowerError::UnknownBus`]
    /// for a bus outside the topology.
    pub fn set_down(&mut self, bus: BusId) -> PowerResult<bool> {
        self.check_toggleable(bus)?;
        self.load_mw[bus.index()] = 0.0;
        Ok(self.down.insert(bus))
    }

    /// Bring `bus` back up at its nominal load.  Returns `false` if it was
    /// already up.
    pub fn set_up(&mut self, bus: BusId) -> PowerResult<bool> {
        self.check_toggleable(bus)?;
        self.load_mw[bus.index()] = self.topology.buses[bus.index()].load_mw;
        Ok(self.down.remove(bus))
    }

    fn check_toggleable(&self, bus: BusId) -> PowerResult<()> {
        if !self.topology.contains(bus) {
            return Err(PowerError::UnknownBus(bus));
        }
        if self.topology.is_source(bus) {
            return Err(PowerError::SourceBus(bus));
        }
        Ok(())
    }

    /// Up, non-source buses in id order.
    fn up_loads(&self) -> Vec<BusId> {
        self.topology.load_buses().filter(|b| !self.down.contains(*b)).collect()
    }

    // ── Randomized events ─────────────────────────────────────────────────

    /// Take one random up, non-source bus down.  `None` if every load bus
    /// is already down.
    pub fn inject_random_failure(&mut self) -> Option<BusId> {
        let candidates = self.up_loads();
        let bus = *self.rng.choose(&candidates)?;
        self.take_down(bus);
        info!(bus = self.topology.name_of(bus), "bus failed");
        Some(bus)
    }

    /// Bring one random down bus back up.
    pub fn recover_random(&mut self) -> RecoveryOutcome {
        let down: Vec<BusId> = self.down.iter().collect();
        let Some(&bus) = self.rng.choose(&down) else {
            return RecoveryOutcome::NothingDown;
        };
        self.bring_up(bus);
        info!(bus = self.topology.name_of(bus), "bus recovered");
        RecoveryOutcome::Recovered(bus)
    }

    /// Take down every bus within `depth` hops of `center` (or of a random
    /// up, non-source bus when `center` is `None`).
    ///
    /// The traversal crosses every up bus, sources included, so a partition
    /// can spread between feeders through the substation.  Sources count
    /// as hops but are never part of the group, and down buses block the
    /// traversal.  With `depth == 0` the group is the center alone.
    pub fn simulate_partition_failure(&mut self, depth: u32, center: Option<BusId>) -> PartitionOutcome {
        let center = match center {
            Some(c) => {
                if !self.topology.contains(c) || self.topology.is_source(c) || self.down.contains(c) {
                    warn!(center = %c, "partition center is not an up load bus; skipped");
                    return PartitionOutcome::InvalidCenter(c);
                }
                c
            }
            None => {
                let candidates = self.up_loads();
                match self.rng.choose(&candidates) {
                    Some(&c) => c,
                    None => {
                        info!("no candidates for partition failure");
                        return PartitionOutcome::NoCandidates;
                    }
                }
            }
        };

        let group = self.partition_group(center, depth);
        for &bus in &group {
            self.take_down(bus);
        }
        info!(
            center = self.topology.name_of(center),
            depth,
            failed = group.len(),
            "partition failure"
        );
        PartitionOutcome::Failed { center, depth, group }
    }

    /// BFS from `center` over up buses.  Only buses whose level is below
    /// `depth` are expanded, so every returned bus lies within `depth` hops.
    /// Sources are expanded but left out of the group.
    fn partition_group(&self, center: BusId, depth: u32) -> Vec<BusId> {
        let topo = &self.topology;
        let mut level: Vec<Option<u32>> = vec![None; topo.bus_count()];
        level[center.index()] = Some(0);
        let mut group = vec![center];
        let mut queue = VecDeque::from([(center, 0u32)]);

        while let Some((bus, lvl)) = queue.pop_front() {
            if lvl >= depth {
                continue;
            }
            for &next in topo.neighbours(bus) {
                if level[next.index()].is_some() || self.down.contains(next) {
                    continue;
                }
                level[next.index()] = Some(lvl + 1);
                if !topo.is_source(next) {
                    group.push(next);
                }
                queue.push_back((next, lvl + 1));
            }
        }
        group
    }

    fn take_down(&mut self, bus: BusId) {
        self.load_mw[bus.index()] = 0.0;
        self.down.insert(bus);
    }

    fn bring_up(&mut self, bus: BusId) {
        self.load_mw[bus.index()] = self.topology.buses[bus.index()].load_mw;
        self.down.remove(bus);
    }

    // ── Per-tick schedule ─────────────────────────────────────────────────

    /// One tick of the failure schedule: failure, then partition, then
    /// recovery, each gated by its own probability roll.
    pub fn step(&mut self, params: &PowerParams) -> FailureStepReport {
        let mut report = FailureStepReport::default();
        if self.rng.gen_bool(params.failure_probability) {
            report.failed = self.inject_random_failure();
        }
        if self.rng.gen_bool(params.partition_probability) {
            report.partition = Some(self.simulate_partition_failure(params.partition_depth, None));
        }
        if self.rng.gen_bool(params.recovery_probability) {
            report.recovery = Some(self.recover_random());
        }
        report
    }
}

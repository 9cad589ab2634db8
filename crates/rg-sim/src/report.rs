//! Per-tick and end-of-run records handed to observers.

use std::collections::BTreeSet;

use rg_contagion::ContagionSummary;
use rg_core::{BusId, EdgeId, Tick};
use rg_hazard::IntakeOutcome;
use rg_power::{BusKind, DownSet, FailureStepReport, PowerTopology};

// ── TickReport ────────────────────────────────────────────────────────────────

/// What one tick did.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub tick: Tick,

    /// Vehicles registered this tick.
    pub departed: usize,

    /// Result of this tick's rumor injection, if one was attempted.
    pub rumor: Option<IntakeOutcome>,

    /// Contagion instances advanced this tick (0 off-cadence).
    pub advanced: usize,

    /// Instances still spreading after the contagion phase.
    pub live_rumors: usize,

    pub rerouted:     usize,
    pub no_safe_path: usize,
    /// Active vehicles the registry has never seen.
    pub unassigned:   usize,

    pub power:   FailureStepReport,
    pub down:    usize,
    pub powered: usize,

    /// Collaborator calls that failed and were skipped.
    pub collaborator_errors: usize,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            departed:            0,
            rumor:               None,
            advanced:            0,
            live_rumors:         0,
            rerouted:            0,
            no_safe_path:        0,
            unassigned:          0,
            power:               FailureStepReport::default(),
            down:                0,
            powered:             0,
            collaborator_errors: 0,
        }
    }
}

// ── Power snapshot ────────────────────────────────────────────────────────────

/// One bus row of a [`PowerSnapshot`].
#[derive(Clone, Debug, PartialEq)]
pub struct BusState<'a> {
    pub bus:     BusId,
    pub name:    &'a str,
    pub kind:    BusKind,
    pub down:    bool,
    pub powered: bool,
    pub load_mw: f64,
    /// Voltage magnitude from the power-flow solver, if one ran.
    pub voltage: Option<f64>,
}

/// Read-only view of the power network after a tick's failure step.
pub struct PowerSnapshot<'a> {
    pub topology: &'a PowerTopology,
    pub down:     &'a DownSet,
    pub powered:  &'a BTreeSet<BusId>,
    pub loads_mw: &'a [f64],
    pub voltages: Option<&'a [f64]>,
}

impl<'a> PowerSnapshot<'a> {
    /// Every bus in id order.
    pub fn bus_states(&self) -> impl Iterator<Item = BusState<'a>> + '_ {
        let topology: &'a PowerTopology = self.topology;
        topology.buses().map(move |(bus, info)| {
            BusState {
                bus,
                name:    info.name.as_str(),
                kind:    info.kind,
                down:    self.down.contains(bus),
                powered: self.powered.contains(&bus),
                load_mw: self.loads_mw.get(bus.index()).copied().unwrap_or(0.0),
                voltage: self.voltages.and_then(|v| v.get(bus.index()).copied()),
            }
        })
    }
}

// ── End of run ────────────────────────────────────────────────────────────────

/// Accumulated vehicle count on one edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreetCrossing {
    pub edge:      EdgeId,
    pub edge_name: String,
    pub street:    Option<String>,
    pub count:     u64,
}

/// Statistics handed to [`SimObserver::on_sim_end`](crate::SimObserver::on_sim_end).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub rumors:    Vec<ContagionSummary>,
    pub crossings: Vec<StreetCrossing>,
}

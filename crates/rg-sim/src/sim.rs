//! The `Sim` struct and its tick loop.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use rg_contagion::ContagionEngine;
use rg_core::{BusId, EdgeId, SimClock, SimConfig, SimRng, Tick};
use rg_graph::{RoadNetwork, Router};
use rg_hazard::{AgentRegistry, Assignment, HazardError, IntakeOutcome, RumorClassifier, RumorIntake};
use rg_power::{FailureEngine, PowerError, PowerFlowSolver};
use rg_routing::{RerouteOutcome, Rerouter, VehicleAgent, VehicleStore};

use crate::{
    PowerSnapshot, RumorFeed, RunSummary, SimObserver, SimResult, StreetCrossing, TickReport,
    TrafficService,
};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<T, R>` owns the three engines and drives them in lock-step with the
/// traffic simulator.  Each tick runs, in order:
///
/// 1. **Traffic**: advance the traffic service and register newly departed
///    vehicles with the hazard registry.
/// 2. **Rumors**: on the `rumor.interval_ticks` cadence, with probability
///    `rumor.probability`, offer one rumor from the feed to the intake.
/// 3. **Contagion**: on the `contagion.step_interval_ticks` cadence, advance
///    every live instance.
/// 4. **Reroute**: check every active vehicle against the rumors it
///    believes and push new routes back to the traffic service.
/// 5. **Crossings**: add each edge's vehicle count to its running total.
/// 6. **Power**: one failure step, then reachability, then the optional
///    power-flow solve.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<T: TrafficService, R: Router> {
    /// Global configuration (total ticks, seed, engine parameters, …).
    pub config: SimConfig,

    /// Simulation clock: the current tick and its wall-time mapping.
    pub clock: SimClock,

    /// Road network shared by intake, rerouting, and crossing statistics.
    pub network: RoadNetwork,

    /// Vehicle name → agent → population node.
    pub registry: AgentRegistry,

    /// Route state of every registered vehicle, indexed by `AgentId`.
    pub vehicles: VehicleStore,

    pub contagion: ContagionEngine,
    pub intake:    RumorIntake,
    pub rerouter:  Rerouter<R>,
    pub failures:  FailureEngine,
    pub traffic:   T,

    pub(crate) classifier: Option<Box<dyn RumorClassifier>>,
    pub(crate) feed:       Option<Box<dyn RumorFeed>>,
    pub(crate) solver:     Option<Box<dyn PowerFlowSolver>>,

    /// Stream for the rumor cadence roll and feed draws.
    pub(crate) rng: SimRng,

    /// Running vehicle count per edge, indexed by `EdgeId`.
    pub(crate) crossings: Vec<u64>,

    /// Powered buses after the latest failure step.
    pub(crate) powered: BTreeSet<BusId>,

    /// Voltages from the latest successful power-flow solve.
    pub(crate) voltages: Option<Vec<f64>>,
}

impl<T: TrafficService, R: Router> Sim<T, R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let remaining = self.config.end_tick().since(self.clock.current_tick);
        self.run_ticks(remaining, observer)?;
        observer.on_sim_end(self.clock.current_tick, &self.summary());
        info!(ticks = self.clock.current_tick.0, rumors = self.contagion.len(), "simulation finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            let report = self.process_tick(now)?;
            observer.on_tick_end(&report);
            if self.config.output_interval_ticks > 0
                && now.0.is_multiple_of(self.config.output_interval_ticks)
            {
                observer.on_snapshot(now, &self.power_snapshot());
            }
            self.clock.advance();
        }
        Ok(())
    }

    /// Register `name` with the hazard registry and give it route state.
    ///
    /// A vehicle registered earlier keeps its original assignment and state.
    pub fn register_vehicle(&mut self, name: &str) -> SimResult<Assignment> {
        if let Some(known) = self.registry.get(name) {
            return Ok(known);
        }
        let assignment = self.registry.assign(name);
        self.vehicles.insert(VehicleAgent::new(name, assignment, self.config.seed))?;
        Ok(assignment)
    }

    /// Current power network state.
    pub fn power_snapshot(&self) -> PowerSnapshot<'_> {
        PowerSnapshot {
            topology: self.failures.topology(),
            down:     self.failures.down(),
            powered:  &self.powered,
            loads_mw: self.failures.loads(),
            voltages: self.voltages.as_deref(),
        }
    }

    /// Per-edge crossing totals in `EdgeId` order.
    pub fn street_crossings(&self) -> Vec<StreetCrossing> {
        self.network
            .edges()
            .map(|edge| StreetCrossing {
                edge,
                edge_name: self.network.edge_name[edge.index()].clone(),
                street:    self.network.street_of(edge).map(str::to_owned),
                count:     self.crossings[edge.index()],
            })
            .collect()
    }

    /// Rumor statistics and crossing totals so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            rumors:    self.contagion.summaries(),
            crossings: self.street_crossings(),
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<TickReport> {
        let mut report = TickReport::new(now);

        // ── Phase 1: traffic and departures ───────────────────────────────
        if let Err(error) = self.traffic.advance(now) {
            warn!(tick = %now, %error, "traffic advance failed");
            report.collaborator_errors += 1;
        }
        match self.traffic.departed() {
            Ok(names) => {
                for name in &names {
                    self.register_vehicle(name)?;
                }
                report.departed = names.len();
            }
            Err(error) => {
                warn!(tick = %now, %error, "departure query failed");
                report.collaborator_errors += 1;
            }
        }

        // ── Phase 2: rumor injection ──────────────────────────────────────
        let rumor = &self.config.rumor;
        if now.is_cadence(rumor.interval_ticks) && self.rng.gen_bool(rumor.probability) {
            report.rumor = self.inject_rumor(now, &mut report.collaborator_errors)?;
        }

        // ── Phase 3: contagion ────────────────────────────────────────────
        if now.is_cadence(self.config.contagion.step_interval_ticks) {
            report.advanced = self.contagion.advance_all();
        }
        report.live_rumors = self.contagion.live_count();

        // ── Phase 4: reroute active vehicles ──────────────────────────────
        if report.live_rumors > 0 {
            self.reroute_active(now, &mut report);
        }

        // ── Phase 5: street crossings ─────────────────────────────────────
        self.count_crossings(now, &mut report);

        // ── Phase 6: power ────────────────────────────────────────────────
        report.power = self.failures.step(&self.config.power);
        self.powered = self.failures.powered();
        report.down    = self.failures.down().len();
        report.powered = self.powered.len();
        self.solve_flow(now, &mut report);

        Ok(report)
    }

    /// Offer one rumor from the feed to the intake.
    ///
    /// `None` when no classifier or feed is configured, or the feed is dry.
    fn inject_rumor(&mut self, now: Tick, errors: &mut usize) -> SimResult<Option<IntakeOutcome>> {
        let (Some(classifier), Some(feed)) = (self.classifier.as_deref(), self.feed.as_mut()) else {
            return Ok(None);
        };
        let Some(text) = feed.next_rumor(now, &mut self.rng) else {
            debug!(tick = %now, "rumor feed empty");
            return Ok(None);
        };
        match self.intake.submit(&text, classifier, &self.network, &mut self.contagion, None, now) {
            Ok(outcome) => Ok(Some(outcome)),
            Err(HazardError::Classifier(error)) => {
                warn!(tick = %now, %error, "rumor classification failed");
                *errors += 1;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn reroute_active(&mut self, now: Tick, report: &mut TickReport) {
        let active = match self.traffic.active() {
            Ok(active) => active,
            Err(error) => {
                warn!(tick = %now, %error, "active vehicle query failed");
                report.collaborator_errors += 1;
                return;
            }
        };

        for name in &active {
            let Some(assignment) = self.registry.get(name) else {
                debug!(vehicle = %name, "unassigned vehicle; skipped");
                report.unassigned += 1;
                continue;
            };
            let (route, index) = match self.traffic.route_of(name) {
                Ok(state) => state,
                Err(error) => {
                    warn!(vehicle = %name, %error, "route query failed");
                    report.collaborator_errors += 1;
                    continue;
                }
            };
            let Ok(vehicle) = self.vehicles.get_mut(assignment.agent) else {
                debug!(vehicle = %name, agent = %assignment.agent, "vehicle has no route state; skipped");
                report.unassigned += 1;
                continue;
            };
            vehicle.sync(route, index);

            let outcome = self.rerouter.reroute_if_needed(vehicle, self.contagion.instances(), &self.network);
            match outcome {
                Ok(RerouteOutcome::Rerouted { route, .. }) => {
                    report.rerouted += 1;
                    if let Err(error) = self.traffic.set_route(name, &route.edges) {
                        warn!(vehicle = %name, %error, "route update rejected");
                        report.collaborator_errors += 1;
                    }
                }
                Ok(RerouteOutcome::NoSafePath { .. }) => report.no_safe_path += 1,
                Ok(_) => {}
                Err(error) => {
                    warn!(vehicle = %name, %error, "reroute skipped");
                    report.collaborator_errors += 1;
                }
            }
        }
    }

    fn count_crossings(&mut self, now: Tick, report: &mut TickReport) {
        for i in 0..self.crossings.len() {
            let edge = EdgeId(i as u32);
            match self.traffic.vehicles_on(edge) {
                Ok(n) => self.crossings[i] += n as u64,
                Err(error) => {
                    warn!(tick = %now, edge = %edge, %error, "edge occupancy query failed");
                    report.collaborator_errors += 1;
                    return;
                }
            }
        }
    }

    fn solve_flow(&mut self, now: Tick, report: &mut TickReport) {
        let Some(solver) = self.solver.as_deref() else {
            return;
        };
        let solved = solver.solve(self.failures.topology(), self.failures.down(), self.failures.loads());
        match solved {
            Ok(voltages) => self.voltages = Some(voltages),
            Err(e) => {
                let error = PowerError::Flow(e);
                warn!(tick = %now, %error, "power flow failed; voltages dropped");
                report.collaborator_errors += 1;
                self.voltages = None;
            }
        }
    }
}

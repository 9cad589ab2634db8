//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use rg_contagion::ContagionEngine;
use rg_core::{SimConfig, SimRng};
use rg_graph::{PopulationGraph, RoadNetwork, Router};
use rg_hazard::{AgentRegistry, RumorClassifier, RumorIntake};
use rg_power::{FailureEngine, PowerFlowSolver, PowerTopology, PowerTopologyBuilder};
use rg_routing::{Rerouter, VehicleStore};

use crate::{RumorFeed, Sim, SimResult, TrafficService};

/// Offsets of the child RNG streams drawn from the master seed.
const CONTAGION_STREAM: u64 = 1;
const FAILURE_STREAM:   u64 = 2;
const RUMOR_STREAM:     u64 = 3;

/// Fluent builder for [`Sim<T, R>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, engine parameters, …
/// - [`RoadNetwork`] — the traffic topology
/// - [`PopulationGraph`] — the social graph rumors spread over
/// - `T: TrafficService` — the traffic simulator
/// - `R: Router` — shortest-path service for rerouting (e.g. [`rg_graph::DijkstraRouter`])
///
/// # Optional inputs
///
/// | Method                 | Default                                        |
/// |------------------------|------------------------------------------------|
/// | `.classifier(c)`       | none; rumor injection is skipped               |
/// | `.feed(f)`             | none; rumor injection is skipped               |
/// | `.power_topology(t)`   | derived from the road network                  |
/// | `.power_flow(s)`       | none; bus states carry no voltage              |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, network, population, traffic, DijkstraRouter)
///     .classifier(Box::new(classifier))
///     .feed(Box::new(PromptPool::new(prompts)))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<T: TrafficService, R: Router> {
    config:     SimConfig,
    network:    RoadNetwork,
    population: PopulationGraph,
    traffic:    T,
    router:     R,
    classifier: Option<Box<dyn RumorClassifier>>,
    feed:       Option<Box<dyn RumorFeed>>,
    topology:   Option<PowerTopology>,
    solver:     Option<Box<dyn PowerFlowSolver>>,
}

impl<T: TrafficService, R: Router> SimBuilder<T, R> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:     SimConfig,
        network:    RoadNetwork,
        population: PopulationGraph,
        traffic:    T,
        router:     R,
    ) -> Self {
        Self {
            config,
            network,
            population,
            traffic,
            router,
            classifier: None,
            feed:       None,
            topology:   None,
            solver:     None,
        }
    }

    /// Supply the text classifier rumors are judged with.
    pub fn classifier(mut self, classifier: Box<dyn RumorClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Supply the source of rumor texts.
    pub fn feed(mut self, feed: Box<dyn RumorFeed>) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Use `topology` instead of deriving one from the road network.
    pub fn power_topology(mut self, topology: PowerTopology) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Run `solver` after every failure step and attach its voltages to the
    /// bus-state snapshots.
    pub fn power_flow(mut self, solver: Box<dyn PowerFlowSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    /// Validate inputs, derive the power topology if none was given, and
    /// return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<T, R>> {
        self.config.validate()?;

        let registry = AgentRegistry::new(self.population.size())?;

        let mut master = SimRng::new(self.config.seed);
        let contagion = ContagionEngine::new(
            Arc::new(self.population),
            self.config.contagion.clone(),
            master.child(CONTAGION_STREAM),
        )?;

        let topology = match self.topology {
            Some(t) => t,
            None => PowerTopologyBuilder::from_road_network(&self.network, &self.config.power, None)?,
        };
        let failures = FailureEngine::new(Arc::new(topology), master.child(FAILURE_STREAM));
        let powered  = failures.powered();
        let crossings = vec![0; self.network.edge_count()];

        Ok(Sim {
            clock:      self.config.make_clock(),
            intake:     RumorIntake::new(self.config.rumor.clone()),
            config:     self.config,
            network:    self.network,
            registry,
            vehicles:   VehicleStore::new(),
            contagion,
            rerouter:   Rerouter::new(self.router),
            failures,
            traffic:    self.traffic,
            classifier: self.classifier,
            feed:       self.feed,
            solver:     self.solver,
            rng:        master.child(RUMOR_STREAM),
            crossings,
            powered,
            voltages:   None,
        })
    }
}

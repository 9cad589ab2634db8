//! `ContagionEngine` — owns every rumor instance of a run.

use std::sync::Arc;

use rg_core::{ContagionParams, EdgeId, PersonId, RumorId, SimRng, Tick};
use rg_graph::PopulationGraph;
use tracing::{debug, info};

use crate::{ContagionError, ContagionInstance, ContagionResult, ContagionSummary};

/// Owns zero or more independent [`ContagionInstance`]s over one shared
/// population graph and advances them in lock-step.
///
/// Instances are addressed by [`RumorId`], which is also their index.
/// Completed instances are kept (for summaries) but no longer advanced.
pub struct ContagionEngine {
    graph:     Arc<PopulationGraph>,
    params:    ContagionParams,
    rng:       SimRng,
    instances: Vec<ContagionInstance>,
}

impl ContagionEngine {
    /// Create an empty engine.
    ///
    /// `rng` is the root from which each instance's private RNG is derived.
    pub fn new(graph: Arc<PopulationGraph>, params: ContagionParams, rng: SimRng) -> ContagionResult<Self> {
        if !(0.0..=1.0).contains(&params.infection_probability) {
            return Err(ContagionError::InvalidProbability(params.infection_probability));
        }
        Ok(Self { graph, params, rng, instances: Vec::new() })
    }

    /// Start a new rumor.
    ///
    /// `seed` picks the single person infected at tick 0; `None` draws one
    /// uniformly from the population.
    pub fn spawn(
        &mut self,
        label:         impl Into<String>,
        related_edges: impl IntoIterator<Item = EdgeId>,
        seed:          Option<PersonId>,
        now:           Tick,
    ) -> ContagionResult<RumorId> {
        let id = RumorId(self.instances.len() as u32);
        let seed = match seed {
            Some(p) => p,
            None => PersonId(self.rng.gen_range(0..self.graph.size() as u32)),
        };
        let rng = self.rng.child(id.0 as u64);
        let instance = ContagionInstance::new(
            id,
            label,
            Arc::clone(&self.graph),
            seed,
            related_edges,
            &self.params,
            now,
            rng,
        )?;
        debug!(rumor = %id, seed = %seed, edges = instance.related_edges().len(), "contagion instance created");
        self.instances.push(instance);
        Ok(id)
    }

    /// Advance every live instance by one step.
    ///
    /// Returns the number of instances advanced.  With the `parallel`
    /// feature the instances step on Rayon's pool; results are identical
    /// because each instance owns its RNG.
    pub fn advance_all(&mut self) -> usize {
        #[cfg(not(feature = "parallel"))]
        let advanced = self
            .instances
            .iter_mut()
            .filter(|inst| inst.is_live())
            .map(|inst| {
                inst.advance();
                inst.id()
            })
            .collect::<Vec<_>>();

        #[cfg(feature = "parallel")]
        let advanced = {
            use rayon::prelude::*;
            self.instances
                .par_iter_mut()
                .filter(|inst| inst.is_live())
                .map(|inst| {
                    inst.advance();
                    inst.id()
                })
                .collect::<Vec<_>>()
        };

        for &id in &advanced {
            let inst = &self.instances[id.index()];
            if inst.is_complete() {
                info!(rumor = %id, steps = inst.tick().0, label = inst.label(), "rumor exhausted");
            }
        }
        advanced.len()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn get(&self, id: RumorId) -> ContagionResult<&ContagionInstance> {
        self.instances.get(id.index()).ok_or(ContagionError::UnknownRumor(id))
    }

    pub fn get_mut(&mut self, id: RumorId) -> ContagionResult<&mut ContagionInstance> {
        self.instances.get_mut(id.index()).ok_or(ContagionError::UnknownRumor(id))
    }

    /// All instances, live and complete, in creation order.
    pub fn instances(&self) -> &[ContagionInstance] {
        &self.instances
    }

    /// Instances with at least one Infected person.
    pub fn live(&self) -> impl Iterator<Item = &ContagionInstance> + '_ {
        self.instances.iter().filter(|i| i.is_live())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn graph(&self) -> &Arc<PopulationGraph> {
        &self.graph
    }

    pub fn params(&self) -> &ContagionParams {
        &self.params
    }

    pub fn summaries(&self) -> Vec<ContagionSummary> {
        self.instances.iter().map(ContagionInstance::summary).collect()
    }
}

//! `ContagionInstance` — the owned spread state of one rumor.

use std::collections::BTreeSet;
use std::sync::Arc;

use rg_core::{ContagionParams, EdgeId, PersonId, RumorId, SimRng, Tick};
use rg_graph::PopulationGraph;

use crate::{ContagionError, ContagionResult, Status};

/// Spread state of one rumor over the shared population graph.
///
/// The instance owns everything it mutates (status vector, infection
/// ticks, RNG), so separate instances can be stepped on separate threads.
/// Its `tick` counts its own steps and is unrelated to the outer simulation
/// clock.
pub struct ContagionInstance {
    id:    RumorId,
    label: String,
    graph: Arc<PopulationGraph>,

    status:      Vec<Status>,
    infected_at: Vec<Option<Tick>>,

    infection_probability: f64,
    recovery_delay:        u64,

    tick:              Tick,
    recovery_eligible: bool,
    infected:          usize,
    recovered:         usize,

    related_edges: BTreeSet<EdgeId>,

    /// Simulation tick at which the rumor was accepted.
    created_at:   Tick,
    /// Instance tick at which the last infected person recovered.
    completed_at: Option<Tick>,

    rng: SimRng,
}

/// Terminal (or current) statistics of one instance, for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ContagionSummary {
    pub id:                RumorId,
    pub label:             String,
    pub created_at:        Tick,
    pub steps:             u64,
    pub population:        usize,
    pub infected:          usize,
    pub recovered:         usize,
    pub recovery_eligible: bool,
    pub complete:          bool,
    pub related_edges:     Vec<EdgeId>,
}

impl ContagionInstance {
    /// Create an instance with `seed` infected at tick 0 and everyone else
    /// susceptible.
    ///
    /// # Errors
    ///
    /// - [`ContagionError::SeedOutOfRange`] if `seed` is not in the graph.
    /// - [`ContagionError::NoRelatedEdges`] if `related_edges` is empty.
    /// - [`ContagionError::InvalidProbability`] for `p ∉ [0, 1]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id:            RumorId,
        label:         impl Into<String>,
        graph:         Arc<PopulationGraph>,
        seed:          PersonId,
        related_edges: impl IntoIterator<Item = EdgeId>,
        params:        &ContagionParams,
        created_at:    Tick,
        rng:           SimRng,
    ) -> ContagionResult<Self> {
        if !graph.contains(seed) {
            return Err(ContagionError::SeedOutOfRange(seed, graph.size()));
        }
        let p = params.infection_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ContagionError::InvalidProbability(p));
        }
        let related_edges: BTreeSet<EdgeId> = related_edges.into_iter().collect();
        if related_edges.is_empty() {
            return Err(ContagionError::NoRelatedEdges);
        }

        let n = graph.size();
        let mut status = vec![Status::Susceptible; n];
        let mut infected_at = vec![None; n];
        status[seed.index()] = Status::Infected;
        infected_at[seed.index()] = Some(Tick::ZERO);

        Ok(Self {
            id,
            label: label.into(),
            graph,
            status,
            infected_at,
            infection_probability: p,
            recovery_delay: params.recovery_delay,
            tick: Tick::ZERO,
            recovery_eligible: n == 1,
            infected: 1,
            recovered: 0,
            related_edges,
            created_at,
            completed_at: None,
            rng,
        })
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Perform exactly one step and return the updated status of every
    /// person, indexed by `PersonId`.
    ///
    /// A complete instance is terminal: further calls change nothing.
    pub fn advance(&mut self) -> &[Status] {
        if self.is_complete() {
            return &self.status;
        }
        let now = self.tick;

        // ① Infection, reading only the pre-step snapshot.
        let mut next = self.status.clone();
        if self.infection_probability > 0.0 {
            let status = &self.status;
            let graph  = &self.graph;
            let rng    = &mut self.rng;
            let escape = 1.0 - self.infection_probability;
            let infected_before = self.infected;

            for person in graph.people() {
                if status[person.index()] != Status::Susceptible {
                    continue;
                }
                let k = graph.infected_neighbours(person, infected_before, |q| {
                    status[q.index()] == Status::Infected
                });
                if k == 0 {
                    continue;
                }
                let p_any = 1.0 - escape.powf(k as f64);
                if rng.gen_bool(p_any) {
                    next[person.index()] = Status::Infected;
                    self.infected_at[person.index()] = Some(now);
                    self.infected += 1;
                }
            }
        }
        self.status = next;

        // ② Recovery latch.
        if !self.recovery_eligible && self.ever_infected() == self.status.len() {
            self.recovery_eligible = true;
        }

        // ③ Recovery.
        if self.recovery_eligible {
            for (i, s) in self.status.iter_mut().enumerate() {
                if *s != Status::Infected {
                    continue;
                }
                let Some(at) = self.infected_at[i] else { continue };
                if now.since(at) >= self.recovery_delay {
                    *s = Status::Recovered;
                    self.infected -= 1;
                    self.recovered += 1;
                }
            }
        }

        // ④ Clock.
        self.tick = self.tick + 1;
        if self.infected == 0 {
            self.completed_at = Some(self.tick);
        }

        &self.status
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` iff nobody is currently Infected.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.infected == 0
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        !self.is_complete()
    }

    /// Status of `person`; `Susceptible` for ids outside the population.
    #[inline]
    pub fn status(&self, person: PersonId) -> Status {
        self.status.get(person.index()).copied().unwrap_or_default()
    }

    #[inline]
    pub fn is_infected(&self, person: PersonId) -> bool {
        self.status(person) == Status::Infected
    }

    pub fn statuses(&self) -> &[Status] {
        &self.status
    }

    /// Instance tick at which `person` became Infected.
    pub fn infected_at(&self, person: PersonId) -> Option<Tick> {
        self.infected_at.get(person.index()).copied().flatten()
    }

    pub fn id(&self) -> RumorId { self.id }
    pub fn label(&self) -> &str { &self.label }
    pub fn tick(&self) -> Tick { self.tick }
    pub fn created_at(&self) -> Tick { self.created_at }
    pub fn completed_at(&self) -> Option<Tick> { self.completed_at }
    pub fn recovery_delay(&self) -> u64 { self.recovery_delay }
    pub fn recovery_eligible(&self) -> bool { self.recovery_eligible }
    pub fn infected_count(&self) -> usize { self.infected }
    pub fn recovered_count(&self) -> usize { self.recovered }
    pub fn population(&self) -> usize { self.status.len() }

    /// People who have been Infected at some point, recovered or not.
    #[inline]
    pub fn ever_infected(&self) -> usize {
        self.infected + self.recovered
    }

    /// Edges this rumor renders dangerous to the people who believe it.
    pub fn related_edges(&self) -> &BTreeSet<EdgeId> {
        &self.related_edges
    }

    pub fn summary(&self) -> ContagionSummary {
        ContagionSummary {
            id:                self.id,
            label:             self.label.clone(),
            created_at:        self.created_at,
            steps:             self.tick.0,
            population:        self.status.len(),
            infected:          self.infected,
            recovered:         self.recovered,
            recovery_eligible: self.recovery_eligible,
            complete:          self.is_complete(),
            related_edges:     self.related_edges.iter().copied().collect(),
        }
    }
}

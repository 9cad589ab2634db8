//! `AgentRegistry` — maps traffic-stream vehicle names to population nodes.
//!
//! Vehicles are numbered in order of first appearance.  The `n`-th vehicle
//! (zero-based) is assigned population node `n % population`; the mapping is
//! made once and never changes for the life of the vehicle.

use rg_core::{AgentId, PersonId};
use tracing::debug;

use crate::{HazardError, HazardResult};

#[cfg(feature = "fx-hash")]
type NameIndex = rustc_hash::FxHashMap<String, AgentId>;
#[cfg(not(feature = "fx-hash"))]
type NameIndex = std::collections::HashMap<String, AgentId>;

/// A vehicle's fixed identity inside the hazard layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub agent:  AgentId,
    pub person: PersonId,
}

/// Order-of-appearance registry of vehicle agents.
pub struct AgentRegistry {
    population: usize,
    by_name:    NameIndex,
    /// `names[agent]`.
    names:      Vec<String>,
    /// `person[agent]`.
    person:     Vec<PersonId>,
}

impl AgentRegistry {
    /// Create a registry for a population of `population` people.
    pub fn new(population: usize) -> HazardResult<Self> {
        if population == 0 {
            return Err(HazardError::EmptyPopulation);
        }
        Ok(Self {
            population,
            by_name: NameIndex::default(),
            names:   Vec::new(),
            person:  Vec::new(),
        })
    }

    /// Register `name` if unseen and return its assignment.
    ///
    /// Registering a known vehicle again returns the original assignment.
    pub fn assign(&mut self, name: &str) -> Assignment {
        if let Some(&agent) = self.by_name.get(name) {
            return Assignment { agent, person: self.person[agent.index()] };
        }
        let order  = self.names.len();
        let agent  = AgentId(order as u32);
        let person = PersonId((order % self.population) as u32);
        self.by_name.insert(name.to_owned(), agent);
        self.names.push(name.to_owned());
        self.person.push(person);
        debug!(vehicle = name, agent = %agent, person = %person, "vehicle assigned");
        Assignment { agent, person }
    }

    /// Assignment of a previously registered vehicle.
    pub fn get(&self, name: &str) -> Option<Assignment> {
        self.by_name
            .get(name)
            .map(|&agent| Assignment { agent, person: self.person[agent.index()] })
    }

    /// Like [`get`](Self::get) but reports an unknown vehicle as
    /// [`HazardError::UnassignedAgent`].
    pub fn require(&self, name: &str) -> HazardResult<Assignment> {
        self.get(name).ok_or_else(|| HazardError::UnassignedAgent(name.to_owned()))
    }

    pub fn person_of(&self, agent: AgentId) -> Option<PersonId> {
        self.person.get(agent.index()).copied()
    }

    pub fn name_of(&self, agent: AgentId) -> Option<&str> {
        self.names.get(agent.index()).map(String::as_str)
    }

    pub fn population(&self) -> usize {
        self.population
    }

    /// Number of registered vehicles.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered agents in order of appearance.
    pub fn agents(&self) -> impl Iterator<Item = (AgentId, &str)> + '_ {
        self.names.iter().enumerate().map(|(i, n)| (AgentId(i as u32), n.as_str()))
    }
}

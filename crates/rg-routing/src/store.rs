//! The `VehicleStore` — every known vehicle, indexed by `AgentId`.

use rg_core::AgentId;

use crate::{RoutingError, RoutingResult, VehicleAgent};

/// Dense storage of [`VehicleAgent`]s.
///
/// Agents are numbered contiguously in order of appearance by the hazard
/// registry, so `agents[id.index()]` is the agent with that id.
#[derive(Default)]
pub struct VehicleStore {
    pub agents: Vec<VehicleAgent>,
}

impl VehicleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `vehicle`.  A vehicle whose id is already present replaces the
    /// stored one.
    ///
    /// # Errors
    ///
    /// [`RoutingError::OutOfOrder`] if the id would leave a gap.
    pub fn insert(&mut self, vehicle: VehicleAgent) -> RoutingResult<()> {
        let i = vehicle.agent.index();
        match i.cmp(&self.agents.len()) {
            std::cmp::Ordering::Less => self.agents[i] = vehicle,
            std::cmp::Ordering::Equal => self.agents.push(vehicle),
            std::cmp::Ordering::Greater => {
                return Err(RoutingError::OutOfOrder { agent: vehicle.agent, len: self.agents.len() });
            }
        }
        Ok(())
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.agents.len()
    }

    pub fn get(&self, agent: AgentId) -> RoutingResult<&VehicleAgent> {
        self.agents.get(agent.index()).ok_or(RoutingError::UnknownAgent(agent))
    }

    pub fn get_mut(&mut self, agent: AgentId) -> RoutingResult<&mut VehicleAgent> {
        self.agents.get_mut(agent.index()).ok_or(RoutingError::UnknownAgent(agent))
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VehicleAgent> + '_ {
        self.agents.iter()
    }
}

//! Per-vehicle route state.

use rg_core::{AgentId, AgentRng, EdgeId, PersonId};
use rg_hazard::Assignment;

/// One vehicle of the traffic stream as the reroute engine sees it.
///
/// `route` and `index` mirror the traffic simulator's view and are
/// refreshed with [`sync`](Self::sync) before every reroute check.  The
/// population assignment never changes after construction.
pub struct VehicleAgent {
    pub name:   String,
    pub agent:  AgentId,
    pub person: PersonId,

    /// Planned edges, the current one included.
    pub route: Vec<EdgeId>,

    /// Position of the current edge in `route`.
    pub index: usize,

    /// Private RNG for choosing among safe reroute destinations.
    pub rng: AgentRng,
}

impl VehicleAgent {
    /// New vehicle with an empty route.
    pub fn new(name: impl Into<String>, assignment: Assignment, global_seed: u64) -> Self {
        Self {
            name:   name.into(),
            agent:  assignment.agent,
            person: assignment.person,
            route:  Vec::new(),
            index:  0,
            rng:    AgentRng::new(global_seed, assignment.agent),
        }
    }

    /// Replace route and position with the traffic simulator's current view.
    pub fn sync(&mut self, route: Vec<EdgeId>, index: usize) {
        self.route = route;
        self.index = index;
    }

    /// The edge the vehicle is on, if it has a route.
    #[inline]
    pub fn current_edge(&self) -> Option<EdgeId> {
        self.route.get(self.index).copied()
    }

    /// The edge the vehicle will enter next; `None` on the last edge.
    #[inline]
    pub fn next_edge(&self) -> Option<EdgeId> {
        self.route.get(self.index + 1).copied()
    }

    /// Edges still ahead, the current one included.
    pub fn remaining(&self) -> &[EdgeId] {
        self.route.get(self.index..).unwrap_or(&[])
    }
}

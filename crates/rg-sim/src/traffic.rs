//! Collaborator seams: the traffic simulator and the rumor source.
//!
//! Both are synchronous calls made by [`Sim`](crate::Sim) between engine
//! steps.  Their failures come back as [`ServiceError`]s, are logged, and
//! never stop the tick loop.

use rg_core::{EdgeId, SimRng, Tick};

/// Boxed error returned by a collaborator.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// The microscopic traffic simulator as the orchestrator sees it.
///
/// Vehicles are identified by the simulator's own names; the orchestrator
/// maps them to agents through the hazard registry.
pub trait TrafficService {
    /// Move the traffic simulation forward to `now`.
    fn advance(&mut self, _now: Tick) -> Result<(), ServiceError> {
        Ok(())
    }

    /// Vehicles that entered the network during the last advance.
    fn departed(&mut self) -> Result<Vec<String>, ServiceError>;

    /// Vehicles currently on the network.
    fn active(&self) -> Result<Vec<String>, ServiceError>;

    /// Planned route of `vehicle` and the position of its current edge in it.
    fn route_of(&self, vehicle: &str) -> Result<(Vec<EdgeId>, usize), ServiceError>;

    /// Replace the route of `vehicle`.  `route` starts with its current edge.
    fn set_route(&mut self, vehicle: &str, route: &[EdgeId]) -> Result<(), ServiceError>;

    /// Number of vehicles on `edge` after the last advance.
    fn vehicles_on(&self, edge: EdgeId) -> Result<usize, ServiceError>;
}

/// Source of rumor texts offered to the intake at each injection attempt.
pub trait RumorFeed {
    /// The next rumor text, or `None` when the feed has nothing to offer.
    fn next_rumor(&mut self, now: Tick, rng: &mut SimRng) -> Option<String>;
}

/// A fixed pool of prompts; each attempt draws one uniformly.
#[derive(Clone, Debug, Default)]
pub struct PromptPool {
    pub prompts: Vec<String>,
}

impl PromptPool {
    pub fn new<I, S>(prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { prompts: prompts.into_iter().map(Into::into).collect() }
    }
}

impl RumorFeed for PromptPool {
    fn next_rumor(&mut self, _now: Tick, rng: &mut SimRng) -> Option<String> {
        rng.choose(&self.prompts).cloned()
    }
}

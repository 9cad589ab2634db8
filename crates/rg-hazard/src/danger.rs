//! Dangerous-edge queries over the live contagion instances.
//!
//! Danger is personal: an edge is dangerous for a vehicle only if the
//! vehicle's population node is currently Infected in a rumor that names
//! the edge.  Vehicles that have not heard a rumor, or have recovered from
//! it, drive through its streets.

use std::collections::BTreeSet;

use rg_contagion::ContagionInstance;
use rg_core::{EdgeId, PersonId};

/// A set of road edges to avoid.
pub type DangerSet = BTreeSet<EdgeId>;

/// Union of `related_edges` over instances in which `person` is Infected.
///
/// Empty whenever `person` is not Infected in any instance.  A person
/// outside an instance's population is never Infected in it.
pub fn dangerous_for(person: PersonId, instances: &[ContagionInstance]) -> DangerSet {
    instances
        .iter()
        .filter(|inst| inst.is_infected(person))
        .flat_map(|inst| inst.related_edges().iter().copied())
        .collect()
}

/// `true` iff `edge` is dangerous for `person`.
pub fn is_dangerous_for(edge: EdgeId, person: PersonId, instances: &[ContagionInstance]) -> bool {
    instances
        .iter()
        .any(|inst| inst.is_infected(person) && inst.related_edges().contains(&edge))
}

/// Union of `related_edges` over every live instance, regardless of who
/// believes it.  Reported per tick for logging and export.
pub fn dangerous_edges(instances: &[ContagionInstance]) -> DangerSet {
    instances
        .iter()
        .filter(|inst| inst.is_live())
        .flat_map(|inst| inst.related_edges().iter().copied())
        .collect()
}

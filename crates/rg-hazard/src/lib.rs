//! `rg-hazard` — who avoids which road edges.
//!
//! Sits between the contagion engine and the reroute engine: it maps
//! vehicles onto population nodes, derives each vehicle's dangerous-edge set
//! from the live rumors it believes, and admits new rumors from an external
//! classifier.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`registry`] | `AgentRegistry`, `Assignment` — order-of-appearance mapping    |
//! | [`danger`]   | `dangerous_for`, `is_dangerous_for`, `dangerous_edges`         |
//! | [`intake`]   | `RumorClassifier`, `Classification`, `RumorIntake`, verdicts   |
//! | [`error`]    | `HazardError`, `HazardResult<T>`, `ClassifierError`            |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                          |
//! |-----------|-------------------------------------------------|
//! | `fx-hash` | FxHash for the vehicle-name index.              |

pub mod danger;
pub mod error;
pub mod intake;
pub mod registry;

#[cfg(test)]
mod tests;

pub use danger::{dangerous_edges, dangerous_for, is_dangerous_for, DangerSet};
pub use error::{ClassifierError, HazardError, HazardResult};
pub use intake::{Classification, IntakeOutcome, Rejection, RumorClassifier, RumorIntake, Verdict};
pub use registry::{AgentRegistry, Assignment};

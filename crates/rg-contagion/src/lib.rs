//! `rg-contagion` — the per-rumor contagion state machine.
//!
//! # Model
//!
//! Each rumor is an independent SIR process over the population graph:
//!
//! ```text
//! Susceptible ──(infected neighbour, prob p each)──▶ Infected ──(delay)──▶ Recovered
//! ```
//!
//! One step of an instance:
//!
//! 1. every Susceptible person with `k` Infected neighbours in the pre-step
//!    snapshot becomes Infected with probability `1 - (1 - p)^k`;
//! 2. once every person has been Infected at least once, the recovery latch
//!    closes (one-way);
//! 3. with the latch closed, every Infected person whose infection is at
//!    least `recovery_delay` steps old becomes Recovered;
//! 4. the instance's own tick counter advances.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`status`]   | `Status`                                                  |
//! | [`instance`] | `ContagionInstance` — owned state of one rumor            |
//! | [`engine`]   | `ContagionEngine` — owns instances, advances them in step |
//! | [`error`]    | `ContagionError`, `ContagionResult<T>`                    |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                |
//! |------------|-------------------------------------------------------|
//! | `parallel` | `ContagionEngine::advance_all` runs on Rayon.         |

pub mod engine;
pub mod error;
pub mod instance;
pub mod status;

#[cfg(test)]
mod tests;

pub use engine::ContagionEngine;
pub use error::{ContagionError, ContagionResult};
pub use instance::{ContagionInstance, ContagionSummary};
pub use status::Status;

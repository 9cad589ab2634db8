use rg_core::{PersonId, RumorId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContagionError {
    #[error("seed {0} is not a member of the population ({1} people)")]
    SeedOutOfRange(PersonId, usize),

    #[error("infection probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("a rumor must render at least one edge dangerous")]
    NoRelatedEdges,

    #[error("unknown rumor {0}")]
    UnknownRumor(RumorId),
}

pub type ContagionResult<T> = Result<T, ContagionError>;

//! Graph-store error type.

use thiserror::Error;

use rg_core::{EdgeId, PersonId};

/// Errors produced by `rg-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: EdgeId, to: EdgeId },

    #[error("edge {0} not found in network")]
    EdgeNotFound(EdgeId),

    #[error("person {0} outside population of {1}")]
    PersonOutOfRange(PersonId, usize),

    #[error("duplicate edge id {0:?}")]
    DuplicateEdge(String),

    #[error("population graph must have at least one node")]
    EmptyPopulation,

    #[error("topology parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

use rg_core::BusId;
use thiserror::Error;

use crate::BusKind;

/// Boxed error returned by an external power-flow solver.
pub type FlowError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum PowerError {
    #[error("power topology has no {0} bus")]
    MissingSource(BusKind),

    #[error("power topology already has a {0} bus")]
    DuplicateSource(BusKind),

    #[error("duplicate bus name `{0}`")]
    DuplicateBus(String),

    #[error("bus {0} is not part of the topology")]
    UnknownBus(BusId),

    #[error("branch `{0}` joins a bus to itself")]
    SelfLoop(String),

    #[error("source bus {0} cannot be taken down")]
    SourceBus(BusId),

    #[error("power flow failed: {0}")]
    Flow(#[source] FlowError),
}

pub type PowerResult<T> = Result<T, PowerError>;

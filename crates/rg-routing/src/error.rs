use rg_core::AgentId;
use rg_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("agent {0} is not in the vehicle store")]
    UnknownAgent(AgentId),

    #[error("agent {agent} inserted out of order into a store of {len}")]
    OutOfOrder { agent: AgentId, len: usize },

    #[error("agent {agent} route index {index} is past the end of its {len}-edge route")]
    IndexOutOfRoute { agent: AgentId, index: usize, len: usize },

    #[error("routing failed: {0}")]
    Graph(#[from] GraphError),
}

pub type RoutingResult<T> = Result<T, RoutingError>;

use rg_contagion::ContagionError;
use rg_core::RgError;
use rg_hazard::HazardError;
use rg_power::PowerError;
use rg_routing::RoutingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation setup failed: {0}")]
    Config(#[from] RgError),

    #[error("hazard registry error: {0}")]
    Hazard(#[from] HazardError),

    #[error("contagion error: {0}")]
    Contagion(#[from] ContagionError),

    #[error("routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("power error: {0}")]
    Power(#[from] PowerError),
}

pub type SimResult<T> = Result<T, SimError>;

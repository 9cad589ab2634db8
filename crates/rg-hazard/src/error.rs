use rg_contagion::ContagionError;
use thiserror::Error;

/// Boxed error returned by an external classifier.
pub type ClassifierError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum HazardError {
    #[error("population graph is empty; vehicles cannot be assigned")]
    EmptyPopulation,

    #[error("vehicle `{0}` has no population assignment")]
    UnassignedAgent(String),

    #[error("classifier failed: {0}")]
    Classifier(#[source] ClassifierError),

    #[error("contagion error: {0}")]
    Contagion(#[from] ContagionError),
}

pub type HazardResult<T> = Result<T, HazardError>;

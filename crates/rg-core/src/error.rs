//! Workspace-wide base error type.
//!
//! Sub-crates define their own error enums and either wrap `RgError` as one
//! variant or keep it separate, whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `rg-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum RgError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `rg-core`.
pub type RgResult<T> = Result<T, RgError>;

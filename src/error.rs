//! Error types for solver runs.

use thiserror::Error;

/// Errors that abort a solver run or reject its inputs.
///
/// An unsuccessful trial is not an error: it is recorded and the search
/// continues. Only these variants stop a run.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The ball left the representable range during a trial.
    #[error("simulation produced a non-finite ball state at step {step}")]
    NonFiniteState {
        /// Trial step on which the corruption was observed.
        step: u32,
    },

    /// A solver configuration value is out of range.
    #[error("invalid solver config: {0}")]
    InvalidConfig(String),

    /// Config or attempt log (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for solver operations.
pub type SolverResult<T> = std::result::Result<T, SolverError>;

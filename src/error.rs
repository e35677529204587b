use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by a simulation run. None of them are retried.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Problem not properly solved. Status: {status}, termination condition: {termination}")]
    Solver { status: String, termination: String },

    #[error("Model invariant violated: {0}")]
    ModelInvariant(String),

    #[error("Solver backend unavailable: {0}")]
    SolverUnavailable(String),

    #[error("Failed to write model file: {0}")]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    /// Short name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationError::Configuration(_) => "ConfigurationError",
            SimulationError::Solver { .. } => "SolverError",
            SimulationError::ModelInvariant(_) => "ModelInvariantViolation",
            SimulationError::SolverUnavailable(_) => "SolverUnavailable",
            SimulationError::Io(_) => "IoError",
        }
    }
}

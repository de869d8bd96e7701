//! Error types shared across the crate

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T, E = OrbitChaosError> = std::result::Result<T, E>;

/// Canonical error type for simulation setup, analysis and persistence.
///
/// Numerical degeneracies that have a well-defined physical fallback (coincident
/// bodies in the force model, radial or equatorial orbits in element extraction)
/// are not errors and never surface here.
#[derive(Debug, Error)]
pub enum OrbitChaosError {
    /// Invalid setup: masses, body counts, step sizes, sampling cadence, indices.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Analysis inputs that cannot produce a meaningful answer.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The least-squares growth-rate fit could not produce a finite slope.
    #[error("fit failed: {0}")]
    Fit(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl OrbitChaosError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub(crate) fn fit(message: impl Into<String>) -> Self {
        Self::Fit(message.into())
    }
}

impl From<serde_json::Error> for OrbitChaosError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<config::ConfigError> for OrbitChaosError {
    fn from(error: config::ConfigError) -> Self {
        Self::Configuration(error.to_string())
    }
}

impl From<toml::ser::Error> for OrbitChaosError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

//! Error types for workload setup and descriptor synthesis

use thiserror::Error;

/// Errors returned by the workload model, session and generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Spc1Error {
    /// Scale configuration or profile rejected at construction time
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Session already handed out generators for the current configuration
    #[error("workload already initialized and generators have been created")]
    AlreadyInitialized,

    /// Generator requested from a session that has no configuration yet
    #[error("workload not initialized")]
    NotInitialized,

    /// Internal invariant violated while synthesizing a descriptor
    #[error("generator fault: {0}")]
    GeneratorFault(String),
}

impl Spc1Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn fault(msg: impl Into<String>) -> Self {
        Self::GeneratorFault(msg.into())
    }
}

//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
///
/// Progress steps never produce these; they report through
/// [`Outcome`](crate::core::Outcome). Only the surrounding machinery can fail.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Configuration did not pass validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The blocking readiness wait failed with something other than `EINTR`.
    #[error("readiness wait failed: {0}")]
    Readiness(#[from] std::io::Error),
    /// A process-wide scheduler is already installed.
    #[error("scheduler already initialized")]
    AlreadyInitialized,
    /// No process-wide scheduler is installed.
    #[error("scheduler not initialized")]
    NotInitialized,
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;

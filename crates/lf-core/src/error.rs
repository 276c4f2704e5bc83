//! # AppError
//!
//! Centralized error handling for the lost-and-found board.
//! Messages are user-facing and are meant to be shown verbatim.

use thiserror::Error;

/// The primary error type for all service operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Not logged in, or credentials do not match
    #[error("unauthorized: {0}")]
    AuthError(String),

    /// Missing, duplicate or unrecognized input (e.g., username taken)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Resource not found (e.g., Post, User). Services return `None` for
    /// lookups; callers that need a hard failure raise this themselves.
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Infrastructure failure (e.g., unreadable document, disk full)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{err:#}"))
    }
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, AppError>;

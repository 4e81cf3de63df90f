//! Error types for route matching operations.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RouteMatchError>;

/// Errors produced by index construction and input validation.
///
/// Per-point outcomes are never errors: a query point that matches no route
/// resolves to [`Assignment::Unassigned`](crate::Assignment::Unassigned), so a
/// resolution run always completes and the summary can be inspected for
/// coverage gaps.
#[derive(Debug, Error)]
pub enum RouteMatchError {
    /// The reference set is empty; a spatial index cannot be built over zero
    /// points.
    #[error("reference set is empty, cannot build a spatial index")]
    EmptyReferenceSet,

    /// A coordinate or row failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A configuration value is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

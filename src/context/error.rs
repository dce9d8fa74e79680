//! Context manager error types.

use thiserror::Error;

/// Errors reported by a context duplicator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The duplicator could not produce a copy of the context
    #[error("Context duplication failed: {0}")]
    DuplicationFailed(String),
}

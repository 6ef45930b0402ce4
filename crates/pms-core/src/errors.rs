//! Cross-cutting error types.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `ArtifactError`) are defined
//! in their respective crates. `StoreError` is the contract error every store
//! implementation surfaces to the engine.

use thiserror::Error;

/// Errors that can be raised by any pms crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation at construction time.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors surfaced by a store collaborator.
///
/// `Unavailable` carries the backend error untouched so callers can decide
/// whether to retry.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The backend failed while serving `operation`.
    #[error("store unavailable during {operation}: {source}")]
    Unavailable {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl StoreError {
    /// Wrap a backend error raised during `operation`.
    pub fn unavailable(
        operation: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Unavailable {
            operation,
            source: source.into(),
        }
    }
}

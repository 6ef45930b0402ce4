//! Artifact store error types.

/// Errors from reading or writing stage artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// The backing object store failed.
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// A document could not be encoded or decoded.
    #[error("Artifact JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error preparing a local artifact directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The selected backend is missing required settings.
    #[error("Artifact backend not configured: {0}")]
    NotConfigured(String),

    /// A file name that is not one of the known artifacts.
    #[error("Unknown artifact: {0}")]
    UnknownArtifact(String),
}

//! Errors delivered through the completion queues.

use relief_mesh::MeshError;

/// Why a generation request produced no result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The height field could not be meshed with the requested settings.
    #[error("mesh generation failed: {0}")]
    Mesh(#[from] MeshError),

    /// The background task panicked; the payload message is preserved.
    #[error("generation task panicked: {0}")]
    Panicked(String),

    /// The worker pool was shut down before the request could be queued.
    #[error("generator has been shut down")]
    ShutDown,
}

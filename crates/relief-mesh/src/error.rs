//! Mesh building errors.

/// Reasons a height field cannot be meshed with the requested settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The height field is not square.
    #[error("height field must be square, got {width}x{height}")]
    NotSquare { width: usize, height: usize },

    /// The field leaves fewer than two interior samples per side after the border is removed.
    #[error("height field {width}x{height} is too small for a border of {border}")]
    FieldTooSmall {
        width: usize,
        height: usize,
        border: usize,
    },

    /// The LOD stride does not evenly divide the interior.
    #[error("stride {stride} does not divide interior of {interior} samples (needs (interior - 1) % stride == 0)")]
    StrideMismatch { interior: usize, stride: usize },
}

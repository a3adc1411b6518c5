use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for buffer arithmetic, filtering and haze removal
///
/// Every operation in the pipeline is deterministic, so none of these
/// errors is retryable: the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two buffers taking part in one operation have different sizes
    ///
    /// Returned by element-wise arithmetic, channel joining, the guided
    /// filter and haze removal whenever their inputs disagree in size.
    #[error("Image dimensions mismatch: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },

    /// The input makes the computation undefined
    ///
    /// Raised when normalising a flat depth map (zero value range) or when
    /// a local guide covariance stays singular after regularisation.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid parameter provided to the operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An image file could not be opened or decoded
    #[error("Failed to load image '{}': {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// An image file could not be encoded or written
    #[error("Failed to save image '{}': {message}", path.display())]
    Save { path: PathBuf, message: String },
}

/// The local 3x3 covariance matrix had no usable inverse
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Covariance matrix is singular (determinant {determinant})")]
pub struct SingularMatrixError {
    pub determinant: f32,
}

impl From<SingularMatrixError> for Error {
    fn from(err: SingularMatrixError) -> Self {
        Self::DegenerateInput(err.to_string())
    }
}

impl Error {
    pub(crate) const fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

//! Error types for resampling operations.
//!
//! Every fatal condition is raised before an output buffer is allocated, so a
//! failed call never leaves partial output behind. Points that map outside the
//! source image are not errors; they receive the default pixel value.

use thiserror::Error;

/// Main error type for geometry, transform and resampling operations.
#[derive(Error, Debug)]
pub enum WarpError {
    /// No reference geometry was supplied.
    #[error("No reference image specified")]
    MissingReference,

    /// No input image was supplied but a warped image was requested.
    #[error("An input image is required")]
    MissingInput,

    /// Wrong number of scalar components for a vector or tensor image.
    #[error("Component count mismatch: expected {expected}, got {actual}")]
    ComponentCountMismatch {
        expected: usize,
        actual: usize,
    },

    /// Dimensionality the requested operation does not support.
    #[error("Unsupported dimensionality: {0}")]
    UnsupportedDimension(usize),

    /// Interpolation name that is not part of the kernel family.
    #[error("Unknown interpolation kernel: {0}")]
    UnknownInterpolator(String),

    /// Images that must share a grid do not.
    #[error("Geometry mismatch: {0}")]
    GeometryMismatch(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Transform cannot be built as requested (e.g. a missing inverse).
    #[error("Transform error: {0}")]
    TransformError(String),

    /// Tensor data could not be read back or has an unexpected layout.
    #[error("Tensor data error: {0}")]
    TensorData(String),
}

/// Result type for warpkit operations.
pub type Result<T> = std::result::Result<T, WarpError>;

impl WarpError {
    /// Create a transform error.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::TransformError(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a geometry mismatch error.
    pub fn geometry_mismatch(msg: impl Into<String>) -> Self {
        Self::GeometryMismatch(msg.into())
    }

    /// Create a tensor data error.
    pub fn tensor_data(msg: impl Into<String>) -> Self {
        Self::TensorData(msg.into())
    }

    /// Whether this error belongs to the configuration class (bad or missing
    /// inputs detected before any work starts).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingReference
                | Self::MissingInput
                | Self::ComponentCountMismatch { .. }
                | Self::UnsupportedDimension(_)
                | Self::UnknownInterpolator(_)
                | Self::GeometryMismatch(_)
                | Self::InvalidConfiguration(_)
        )
    }
}

//! Interpolation types and operations.
//!
//! This module provides the interpolator trait, the kernel family and the
//! [`InterpolatorKind`] selection that binds a kernel to one scalar image.

pub mod trait_;
pub mod buffer;
pub mod nearest;
pub mod linear;
pub mod bspline;
pub mod gaussian;
pub mod label_gaussian;
pub mod windowed_sinc;
pub mod kind;

pub use trait_::Interpolator;
pub use buffer::VoxelBuffer;
pub use nearest::NearestNeighborInterpolator;
pub use linear::LinearInterpolator;
pub use bspline::BSplineInterpolator;
pub use gaussian::GaussianInterpolator;
pub use label_gaussian::LabelImageGaussianInterpolator;
pub use windowed_sinc::{WindowFunction, WindowedSincInterpolator};
pub use kind::InterpolatorKind;

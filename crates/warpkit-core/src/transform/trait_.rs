//! Transform trait for spatial coordinate transformations.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::image::grid::{points_to_tensor, tensor_to_points};
use crate::spatial::Point;

/// Maps points from one physical space to another.
///
/// During resampling a transform maps reference-space points to moving-space
/// points. Transforms are applied to batches of points so parametric
/// transforms can run as tensor operations.
///
/// Resampling maps grid points through [`Transform::transform_host_points`],
/// which keeps coordinates in `f64`. Its default round-trips through
/// `transform_points` and is limited to the backend's float precision.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `D` - The spatial dimensionality
pub trait Transform<B: Backend, const D: usize> {
    /// Apply transform to a batch of points.
    ///
    /// # Arguments
    /// * `points` - Tensor of shape `[Batch, D]` containing the input points
    ///
    /// # Returns
    /// Tensor of shape `[Batch, D]` containing the transformed points
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Apply transform to host points in double precision.
    fn transform_host_points(&self, points: &[Point<D>], device: &B::Device) -> Result<Vec<Point<D>>> {
        tensor_to_points(self.transform_points(points_to_tensor(points, device)))
    }

    /// Get the inverse transform (if available).
    ///
    /// Not all transforms are invertible, so this returns an Option.
    fn inverse(&self) -> Option<Box<dyn Transform<B, D>>> {
        None
    }

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

//! Interpolator trait for sampling values at continuous coordinates.
//!
//! This module defines the core Interpolator trait that all interpolation methods must implement.

use crate::spatial::Point;
use super::buffer::VoxelBuffer;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// An interpolator is bound to exactly one scalar buffer. Each variant owns
/// its sampling domain: [`Interpolator::evaluate`] returns `None` for points
/// the kernel cannot support, and the resampler substitutes its default value.
///
/// # Type Parameters
/// * `D` - The spatial dimensionality
pub trait Interpolator<const D: usize>: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// The buffer this interpolator samples.
    fn buffer(&self) -> &VoxelBuffer<D>;

    /// Voxels of support the kernel needs inside the lattice edge.
    fn support_margin(&self) -> f64 {
        0.0
    }

    /// Whether a continuous index lies in this interpolator's domain.
    fn is_inside_buffer(&self, index: &Point<D>) -> bool {
        self.buffer().is_inside(index, self.support_margin())
    }

    /// Interpolate at a continuous index already known to be inside the domain.
    fn evaluate_at_continuous_index(&self, index: &Point<D>) -> f64;

    /// Interpolate at a physical point, or `None` outside the domain.
    fn evaluate(&self, point: &Point<D>) -> Option<f64> {
        let index = self.buffer().geometry().physical_to_continuous_index(point);
        if self.is_inside_buffer(&index) {
            Some(self.evaluate_at_continuous_index(&index))
        } else {
            None
        }
    }
}

//! Nearest-neighbor interpolation implementation.

use super::buffer::VoxelBuffer;
use super::trait_::Interpolator;
use crate::spatial::Point;

/// Nearest Neighbor Interpolator.
///
/// Returns the voxel at `floor(c + 0.5)` along each axis, so exact half-voxel
/// positions round up.
#[derive(Debug, Clone)]
pub struct NearestNeighborInterpolator<const D: usize> {
    buffer: VoxelBuffer<D>,
}

impl<const D: usize> NearestNeighborInterpolator<D> {
    /// Create a new nearest neighbor interpolator.
    pub fn new(buffer: VoxelBuffer<D>) -> Self {
        Self { buffer }
    }
}

impl<const D: usize> Interpolator<D> for NearestNeighborInterpolator<D> {
    fn name(&self) -> &'static str {
        "NearestNeighbor"
    }

    fn buffer(&self) -> &VoxelBuffer<D> {
        &self.buffer
    }

    fn evaluate_at_continuous_index(&self, index: &Point<D>) -> f64 {
        let mut rounded = [0i64; D];
        for a in 0..D {
            rounded[a] = (index[a] + 0.5).floor() as i64;
        }
        self.buffer.at_clamped(&rounded)
    }
}

//! Linear interpolation implementation.
//!
//! Multilinear blend of the `2^D` voxels surrounding a continuous index
//! (bilinear in 2D, trilinear in 3D).

use super::buffer::VoxelBuffer;
use super::trait_::Interpolator;
use crate::spatial::Point;

/// Linear offsets and weights of the `2^D` corners around `index`.
///
/// Corners past the lattice edge are clamped onto it; corners with zero
/// weight are skipped.
pub(crate) fn linear_taps<const D: usize>(size: &[usize; D], index: &Point<D>) -> Vec<(usize, f64)> {
    let mut base = [0i64; D];
    let mut frac = [0.0; D];
    let mut strides = [1usize; D];
    for a in 0..D {
        let floor = index[a].floor();
        base[a] = floor as i64;
        frac[a] = index[a] - floor;
        if a > 0 {
            strides[a] = strides[a - 1] * size[a - 1];
        }
    }

    let mut taps = Vec::with_capacity(1 << D);
    for corner in 0..(1usize << D) {
        let mut weight = 1.0;
        let mut offset = 0;
        for a in 0..D {
            let upper = (corner >> a) & 1 == 1;
            weight *= if upper { frac[a] } else { 1.0 - frac[a] };
            let i = (base[a] + upper as i64).clamp(0, size[a] as i64 - 1) as usize;
            offset += i * strides[a];
        }
        if weight != 0.0 {
            taps.push((offset, weight));
        }
    }
    taps
}

/// Linear Interpolator.
#[derive(Debug, Clone)]
pub struct LinearInterpolator<const D: usize> {
    buffer: VoxelBuffer<D>,
}

impl<const D: usize> LinearInterpolator<D> {
    /// Create a new linear interpolator.
    pub fn new(buffer: VoxelBuffer<D>) -> Self {
        Self { buffer }
    }
}

impl<const D: usize> Interpolator<D> for LinearInterpolator<D> {
    fn name(&self) -> &'static str {
        "Linear"
    }

    fn buffer(&self) -> &VoxelBuffer<D> {
        &self.buffer
    }

    fn evaluate_at_continuous_index(&self, index: &Point<D>) -> f64 {
        linear_taps(&self.buffer.size(), index)
            .into_iter()
            .map(|(offset, weight)| weight * self.buffer.at_offset(offset))
            .sum()
    }
}

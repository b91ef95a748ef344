//! Gaussian interpolation implementation.
//!
//! The value at a point is the normalized, Gaussian-weighted mean of the
//! voxels within `alpha · sigma` of it along every axis.

use crate::error::{Result, WarpError};
use crate::spatial::Point;
use super::buffer::VoxelBuffer;
use super::trait_::Interpolator;

/// Cut-off in units of sigma when none is given.
pub const DEFAULT_GAUSSIAN_ALPHA: f64 = 1.0;

/// Gaussian kernel parameters in physical units.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GaussianKernel<const D: usize> {
    sigma: [f64; D],
    alpha: f64,
}

impl<const D: usize> GaussianKernel<D> {
    pub(crate) fn new(sigma: [f64; D], alpha: f64) -> Result<Self> {
        if sigma.iter().any(|s| !(*s > 0.0)) {
            return Err(WarpError::invalid_configuration(format!(
                "Gaussian sigma must be positive, got {:?}",
                sigma
            )));
        }
        if !(alpha > 0.0) {
            return Err(WarpError::invalid_configuration(format!(
                "Gaussian alpha must be positive, got {}",
                alpha
            )));
        }
        Ok(Self { sigma, alpha })
    }

    /// Offsets and unnormalized weights of the voxels in the kernel window,
    /// in raster order.
    ///
    /// When the window holds no voxel centre the nearest voxel is used alone.
    pub(crate) fn taps(&self, buffer: &VoxelBuffer<D>, index: &Point<D>) -> Vec<(usize, f64)> {
        let size = buffer.size();
        let spacing = buffer.geometry().spacing();
        let strides = buffer.strides();

        let mut lo = [0i64; D];
        let mut hi = [0i64; D];
        for a in 0..D {
            let radius = self.alpha * self.sigma[a] / spacing[a];
            let last = size[a] as i64 - 1;
            lo[a] = ((index[a] - radius).ceil() as i64).max(0);
            hi[a] = ((index[a] + radius).floor() as i64).min(last);
            if lo[a] > hi[a] {
                let nearest = ((index[a] + 0.5).floor() as i64).clamp(0, last);
                lo[a] = nearest;
                hi[a] = nearest;
            }
        }

        let mut taps = Vec::new();
        let mut cursor = lo;
        loop {
            let mut exponent = 0.0;
            let mut offset = 0;
            for a in 0..D {
                let delta = (cursor[a] as f64 - index[a]) * spacing[a] / self.sigma[a];
                exponent += delta * delta;
                offset += cursor[a] as usize * strides[a];
            }
            taps.push((offset, (-0.5 * exponent).exp()));

            let mut axis = 0;
            loop {
                if axis == D {
                    return taps;
                }
                cursor[axis] += 1;
                if cursor[axis] <= hi[axis] {
                    break;
                }
                cursor[axis] = lo[axis];
                axis += 1;
            }
        }
    }
}

/// Gaussian interpolator.
#[derive(Debug, Clone)]
pub struct GaussianInterpolator<const D: usize> {
    buffer: VoxelBuffer<D>,
    kernel: GaussianKernel<D>,
}

impl<const D: usize> GaussianInterpolator<D> {
    /// Create a Gaussian interpolator with per-axis physical `sigma`.
    pub fn new(buffer: VoxelBuffer<D>, sigma: [f64; D], alpha: f64) -> Result<Self> {
        Ok(Self {
            buffer,
            kernel: GaussianKernel::new(sigma, alpha)?,
        })
    }
}

impl<const D: usize> Interpolator<D> for GaussianInterpolator<D> {
    fn name(&self) -> &'static str {
        "Gaussian"
    }

    fn buffer(&self) -> &VoxelBuffer<D> {
        &self.buffer
    }

    fn evaluate_at_continuous_index(&self, index: &Point<D>) -> f64 {
        let mut sum = 0.0;
        let mut total = 0.0;
        for (offset, weight) in self.kernel.taps(&self.buffer, index) {
            sum += weight * self.buffer.at_offset(offset);
            total += weight;
        }
        if total > 0.0 {
            sum / total
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GridGeometry;

    fn buffer() -> VoxelBuffer<1> {
        let geometry = GridGeometry::with_size([5]).unwrap();
        VoxelBuffer::from_values(geometry, vec![0.0, 0.0, 10.0, 0.0, 0.0])
    }

    #[test]
    fn test_constant_image_is_preserved() {
        let geometry = GridGeometry::with_size([4, 4]).unwrap();
        let interp = GaussianInterpolator::new(
            VoxelBuffer::from_values(geometry, vec![3.0; 16]),
            [1.0, 1.0],
            2.0,
        )
        .unwrap();
        let value = interp.evaluate(&Point::new([1.3, 2.2])).unwrap();
        assert!((value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_smoothing() {
        let interp = GaussianInterpolator::new(buffer(), [1.0], 1.0).unwrap();

        // Window [1, 3]: weights e^-0.5, 1, e^-0.5
        let w = (-0.5f64).exp();
        let expected = 10.0 / (1.0 + 2.0 * w);
        let value = interp.evaluate_at_continuous_index(&Point::new([2.0]));
        assert!((value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_narrow_window_falls_back_to_nearest() {
        let interp = GaussianInterpolator::new(buffer(), [0.1], 1.0).unwrap();
        assert_eq!(interp.evaluate_at_continuous_index(&Point::new([2.4])), 10.0);
        assert_eq!(interp.evaluate_at_continuous_index(&Point::new([2.6])), 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(GaussianInterpolator::new(buffer(), [0.0], 1.0).is_err());
        assert!(GaussianInterpolator::new(buffer(), [1.0], -1.0).is_err());
    }
}

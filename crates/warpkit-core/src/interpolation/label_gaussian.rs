//! Label-aware Gaussian interpolation.
//!
//! Gaussian weights are accumulated per distinct label in the kernel window
//! and the label with the largest total wins, so the output is always one of
//! the source labels and never a blend.

use crate::error::Result;
use crate::spatial::Point;
use super::buffer::VoxelBuffer;
use super::gaussian::GaussianKernel;
use super::trait_::Interpolator;

/// Cut-off in units of sigma when none is given.
pub const DEFAULT_LABEL_ALPHA: f64 = 4.0;

/// Multi-label Gaussian interpolator.
#[derive(Debug, Clone)]
pub struct LabelImageGaussianInterpolator<const D: usize> {
    buffer: VoxelBuffer<D>,
    kernel: GaussianKernel<D>,
}

impl<const D: usize> LabelImageGaussianInterpolator<D> {
    pub fn new(buffer: VoxelBuffer<D>, sigma: [f64; D], alpha: f64) -> Result<Self> {
        Ok(Self {
            buffer,
            kernel: GaussianKernel::new(sigma, alpha)?,
        })
    }
}

impl<const D: usize> Interpolator<D> for LabelImageGaussianInterpolator<D> {
    fn name(&self) -> &'static str {
        "MultiLabel"
    }

    fn buffer(&self) -> &VoxelBuffer<D> {
        &self.buffer
    }

    fn evaluate_at_continuous_index(&self, index: &Point<D>) -> f64 {
        // (label, accumulated weight) in order of first appearance
        let mut votes: Vec<(f64, f64)> = Vec::new();
        for (offset, weight) in self.kernel.taps(&self.buffer, index) {
            let label = self.buffer.at_offset(offset);
            match votes.iter_mut().find(|(l, _)| *l == label) {
                Some((_, total)) => *total += weight,
                None => votes.push((label, weight)),
            }
        }

        let mut best = votes[0];
        for &(label, total) in &votes[1..] {
            if total > best.1 {
                best = (label, total);
            }
        }
        best.0
    }
}

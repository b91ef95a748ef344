//! Composite transform to displacement field.
//!
//! Samples a transform on a grid and stores, at every voxel, the vector from
//! the voxel's physical point to where the transform sends it.

use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::image::{GridGeometry, MultiComponentImage, PixelType};
use crate::transform::trait_::Transform;
use super::resample::{map_grid_points, DEFAULT_CHUNK_SIZE};

/// Builds a displacement field image from a transform.
pub struct TransformToDisplacementField<'a, B: Backend, const D: usize> {
    geometry: GridGeometry<D>,
    transform: &'a dyn Transform<B, D>,
    chunk_size: usize,
}

impl<'a, B: Backend, const D: usize> TransformToDisplacementField<'a, B, D> {
    pub fn new(geometry: GridGeometry<D>, transform: &'a dyn Transform<B, D>) -> Self {
        Self {
            geometry,
            transform,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Vector image of `T(p) - p` on the geometry.
    pub fn generate(&self, device: &B::Device) -> Result<MultiComponentImage<B, D>> {
        tracing::debug!(
            "Sampling {} as a displacement field on {:?}",
            self.transform.name(),
            self.geometry.size()
        );
        let mapped = map_grid_points(&self.geometry, self.transform, self.chunk_size, device)?;

        let mut values = Vec::with_capacity(mapped.len() * D);
        for (offset, target) in mapped.iter().enumerate() {
            let source = self.geometry.index_to_physical(&self.geometry.offset_to_index(offset));
            for a in 0..D {
                values.push((target[a] - source[a]) as f32);
            }
        }

        MultiComponentImage::from_vec(values, self.geometry.clone(), PixelType::Vector, device)
    }
}

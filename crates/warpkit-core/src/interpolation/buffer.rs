//! Host-side voxel buffer an interpolator is bound to.

use std::sync::Arc;
use burn::tensor::backend::Backend;
use crate::image::{GridGeometry, Image};
use crate::spatial::Point;

/// Scalar voxel values with the geometry they are sampled on.
///
/// Values are stored in linear-offset order (x fastest) as `f64`, so every
/// kernel evaluates in double precision regardless of the tensor element type.
#[derive(Debug, Clone)]
pub struct VoxelBuffer<const D: usize> {
    geometry: GridGeometry<D>,
    strides: [usize; D],
    values: Arc<[f64]>,
}

impl<const D: usize> VoxelBuffer<D> {
    /// Read a scalar image back to the host.
    pub fn from_image<B: Backend>(image: &Image<B, D>) -> Self {
        Self::from_values(image.geometry().clone(), image.to_vec())
    }

    /// Wrap raw values; `values.len()` must equal the voxel count.
    pub(crate) fn from_values(geometry: GridGeometry<D>, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), geometry.num_voxels());
        Self {
            strides: geometry.strides(),
            geometry,
            values: values.into(),
        }
    }

    pub fn geometry(&self) -> &GridGeometry<D> {
        &self.geometry
    }

    pub fn size(&self) -> [usize; D] {
        self.geometry.size()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at a linear offset.
    #[inline]
    pub fn at_offset(&self, offset: usize) -> f64 {
        self.values[offset]
    }

    /// Clamp a possibly out-of-range index component onto axis `axis`.
    #[inline]
    pub fn clamp_axis(&self, axis: usize, index: i64) -> usize {
        let last = self.geometry.size()[axis] as i64 - 1;
        index.clamp(0, last) as usize
    }

    /// Value at an integer index, clamping each component to the grid
    /// (zero-flux Neumann boundary).
    #[inline]
    pub fn at_clamped(&self, index: &[i64; D]) -> f64 {
        let mut offset = 0;
        for a in 0..D {
            offset += self.clamp_axis(a, index[a]) * self.strides[a];
        }
        self.values[offset]
    }

    pub fn strides(&self) -> &[usize; D] {
        &self.strides
    }

    /// Whether a continuous index lies inside `[-0.5 + margin, size - 0.5 - margin)`
    /// on every axis.
    pub fn is_inside(&self, index: &Point<D>, margin: f64) -> bool {
        let size = self.geometry.size();
        (0..D).all(|a| {
            let c = index[a];
            c >= margin - 0.5 && c < size[a] as f64 - 0.5 - margin
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> VoxelBuffer<2> {
        let geometry = GridGeometry::with_size([3, 2]).unwrap();
        VoxelBuffer::from_values(geometry, vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0])
    }

    #[test]
    fn test_clamped_access() {
        let buffer = buffer();
        assert_eq!(buffer.at_clamped(&[1, 1]), 11.0);
        assert_eq!(buffer.at_clamped(&[-4, 0]), 0.0);
        assert_eq!(buffer.at_clamped(&[7, 9]), 12.0);
    }

    #[test]
    fn test_inside_with_margin() {
        let buffer = buffer();
        assert!(buffer.is_inside(&Point::new([-0.5, 1.49]), 0.0));
        assert!(!buffer.is_inside(&Point::new([2.5, 0.0]), 0.0));
        assert!(!buffer.is_inside(&Point::new([-0.6, 0.0]), 0.0));
        assert!(buffer.is_inside(&Point::new([1.0, 0.5]), 0.5));
        assert!(!buffer.is_inside(&Point::new([0.2, 0.5]), 1.0));
    }
}

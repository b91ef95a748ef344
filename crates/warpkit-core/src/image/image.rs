//! Scalar image type with physical metadata.
//!
//! The pixel data is a burn tensor whose shape is the grid size in reversed
//! axis order (`[Z, Y, X]` for 3-D), so its row-major flattening matches the
//! geometry's linear offsets.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use crate::error::{Result, WarpError};
use crate::spatial::{Direction, Point, Spacing};
use super::geometry::GridGeometry;
use super::grid::tensor_to_vec;

/// Scalar image: a tensor of voxel values on a grid geometry.
///
/// # Examples
/// ```rust
/// use warpkit_core::image::{GridGeometry, Image};
/// use burn::tensor::Tensor;
/// use burn_ndarray::NdArray;
///
/// type Backend = NdArray<f32>;
///
/// let device = Default::default();
/// let geometry = GridGeometry::<3>::with_size([10, 8, 6]).unwrap();
/// let data = Tensor::<Backend, 3>::zeros(geometry.tensor_shape(), &device);
/// let image = Image::new(data, geometry).unwrap();
/// assert_eq!(image.size(), [10, 8, 6]);
/// ```
#[derive(Debug, Clone)]
pub struct Image<B: Backend, const D: usize> {
    /// The voxel data.
    data: Tensor<B, D>,
    /// Physical embedding of the grid.
    geometry: GridGeometry<D>,
}

impl<B: Backend, const D: usize> Image<B, D> {
    /// Create an image, checking that the tensor shape matches the geometry.
    pub fn new(data: Tensor<B, D>, geometry: GridGeometry<D>) -> Result<Self> {
        let expected = geometry.tensor_shape();
        let actual = data.dims();
        if expected != actual {
            return Err(WarpError::geometry_mismatch(format!(
                "tensor shape {:?} does not match grid shape {:?}",
                actual, expected
            )));
        }
        Ok(Self { data, geometry })
    }

    /// Create an image from voxel values in linear-offset order.
    pub fn from_vec(values: Vec<f32>, geometry: GridGeometry<D>, device: &B::Device) -> Result<Self> {
        if values.len() != geometry.num_voxels() {
            return Err(WarpError::geometry_mismatch(format!(
                "{} values supplied for a grid of {} voxels",
                values.len(),
                geometry.num_voxels()
            )));
        }
        let data = Tensor::<B, D>::from_data(
            TensorData::new(values, Shape::new(geometry.tensor_shape())),
            device,
        );
        Ok(Self { data, geometry })
    }

    /// Get the image data tensor.
    pub fn data(&self) -> &Tensor<B, D> {
        &self.data
    }

    /// Get the grid geometry.
    pub fn geometry(&self) -> &GridGeometry<D> {
        &self.geometry
    }

    pub fn origin(&self) -> &Point<D> {
        self.geometry.origin()
    }

    pub fn spacing(&self) -> &Spacing<D> {
        self.geometry.spacing()
    }

    pub fn direction(&self) -> &Direction<D> {
        self.geometry.direction()
    }

    /// Voxel counts in axis order.
    pub fn size(&self) -> [usize; D] {
        self.geometry.size()
    }

    /// Tensor shape (axis order reversed).
    pub fn shape(&self) -> [usize; D] {
        self.data.dims()
    }

    pub fn device(&self) -> B::Device {
        self.data.device()
    }

    /// Voxel values in linear-offset order.
    pub fn to_vec(&self) -> Vec<f64> {
        tensor_to_vec(self.data.clone())
    }

    /// Convert a physical point to a continuous index.
    pub fn transform_physical_point_to_continuous_index(&self, point: &Point<D>) -> Point<D> {
        self.geometry.physical_to_continuous_index(point)
    }

    /// Convert a continuous index to a physical point.
    pub fn transform_continuous_index_to_physical_point(&self, index: &Point<D>) -> Point<D> {
        self.geometry.continuous_index_to_physical(index)
    }
}

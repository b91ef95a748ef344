//! Vector- and tensor-valued images.
//!
//! Components are stored interleaved as a `[voxels, components]` tensor, the
//! voxel axis following the geometry's linear offsets.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use serde::{Deserialize, Serialize};
use crate::error::{Result, WarpError};
use super::geometry::GridGeometry;
use super::grid::tensor_to_vec;

/// Number of independent elements of a symmetric second-rank 3-D tensor.
pub const TENSOR_COMPONENTS: usize = 6;

/// Value kind carried by each voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelType {
    /// One real value.
    Scalar,
    /// One real per spatial dimension.
    Vector,
    /// Symmetric 3x3 tensor packed as xx, xy, xz, yy, yz, zz.
    SymmetricTensor,
}

impl PixelType {
    /// Number of scalar components for an image of the given dimension.
    pub fn components(&self, dimension: usize) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vector => dimension,
            Self::SymmetricTensor => TENSOR_COMPONENTS,
        }
    }
}

/// Image whose voxels hold several scalar components.
#[derive(Debug, Clone)]
pub struct MultiComponentImage<B: Backend, const D: usize> {
    data: Tensor<B, 2>,
    geometry: GridGeometry<D>,
    pixel_type: PixelType,
}

impl<B: Backend, const D: usize> MultiComponentImage<B, D> {
    /// Create a vector or tensor image from a `[voxels, components]` tensor.
    pub fn new(data: Tensor<B, 2>, geometry: GridGeometry<D>, pixel_type: PixelType) -> Result<Self> {
        let components = Self::expected_components(pixel_type)?;
        let [voxels, actual] = data.dims();
        if actual != components {
            return Err(WarpError::ComponentCountMismatch {
                expected: components,
                actual,
            });
        }
        if voxels != geometry.num_voxels() {
            return Err(WarpError::geometry_mismatch(format!(
                "{} voxels supplied for a grid of {} voxels",
                voxels,
                geometry.num_voxels()
            )));
        }
        Ok(Self {
            data,
            geometry,
            pixel_type,
        })
    }

    /// Create an image from interleaved values (all components of voxel 0,
    /// then voxel 1, ...).
    pub fn from_vec(
        values: Vec<f32>,
        geometry: GridGeometry<D>,
        pixel_type: PixelType,
        device: &B::Device,
    ) -> Result<Self> {
        let components = Self::expected_components(pixel_type)?;
        let voxels = geometry.num_voxels();
        if values.len() != voxels * components {
            return Err(WarpError::geometry_mismatch(format!(
                "{} values supplied for {} voxels of {} components",
                values.len(),
                voxels,
                components
            )));
        }
        let data = Tensor::<B, 2>::from_data(
            TensorData::new(values, Shape::new([voxels, components])),
            device,
        );
        Self::new(data, geometry, pixel_type)
    }

    fn expected_components(pixel_type: PixelType) -> Result<usize> {
        match pixel_type {
            PixelType::Scalar => Err(WarpError::invalid_configuration(
                "scalar data belongs in a scalar image",
            )),
            PixelType::SymmetricTensor if D != 3 => Err(WarpError::UnsupportedDimension(D)),
            other => Ok(other.components(D)),
        }
    }

    /// Get the `[voxels, components]` data tensor.
    pub fn data(&self) -> &Tensor<B, 2> {
        &self.data
    }

    pub fn geometry(&self) -> &GridGeometry<D> {
        &self.geometry
    }

    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Components per voxel.
    pub fn components(&self) -> usize {
        self.pixel_type.components(D)
    }

    pub fn device(&self) -> B::Device {
        self.data.device()
    }

    /// Interleaved values in linear-offset order.
    pub fn to_vec(&self) -> Vec<f64> {
        tensor_to_vec(self.data.clone())
    }
}

//! Splitting multi-component images into scalar images and back.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use crate::error::{Result, WarpError};
use crate::image::{Image, MultiComponentImage, PixelType};

/// Tolerance used when checking that component images share a grid.
pub const GEOMETRY_TOLERANCE: f64 = 1e-6;

/// One scalar image per component, in storage order (x, y, z for vectors;
/// xx, xy, xz, yy, yz, zz for tensors), all on the source geometry.
pub fn split_components<B: Backend, const D: usize>(
    image: &MultiComponentImage<B, D>,
) -> Result<Vec<Image<B, D>>> {
    let geometry = image.geometry();
    (0..image.components())
        .map(|c| {
            let column = image.data().clone().narrow(1, c, 1);
            Image::new(column.reshape(geometry.tensor_shape()), geometry.clone())
        })
        .collect()
}

/// Interleave scalar images into a multi-component image.
///
/// The number of images must match `pixel_type` and every image must share
/// the first image's geometry.
pub fn assemble_components<B: Backend, const D: usize>(
    images: Vec<Image<B, D>>,
    pixel_type: PixelType,
) -> Result<MultiComponentImage<B, D>> {
    let expected = match pixel_type {
        PixelType::Scalar => {
            return Err(WarpError::invalid_configuration(
                "cannot assemble components into a scalar image",
            ))
        }
        other => other.components(D),
    };
    if images.len() != expected {
        return Err(WarpError::ComponentCountMismatch {
            expected,
            actual: images.len(),
        });
    }

    let geometry = images[0].geometry().clone();
    if let Some(i) = images
        .iter()
        .position(|image| !image.geometry().is_congruent(&geometry, GEOMETRY_TOLERANCE))
    {
        return Err(WarpError::geometry_mismatch(format!(
            "component {} does not share the grid of component 0",
            i
        )));
    }

    let voxels = geometry.num_voxels();
    let columns: Vec<Tensor<B, 2>> = images
        .into_iter()
        .map(|image| image.data().clone().reshape([voxels, 1]))
        .collect();
    MultiComponentImage::new(Tensor::cat(columns, 1), geometry, pixel_type)
}

//! Inputs handed to the pipeline by the caller.

use burn::tensor::backend::Backend;
use warpkit_core::filter::assemble_components;
use warpkit_core::{Image, MultiComponentImage, PixelType, Result, Transform};

/// The moving image.
#[derive(Debug, Clone)]
pub enum InputImage<B: Backend, const D: usize> {
    /// One value per voxel.
    Scalar(Image<B, D>),
    /// Vector or symmetric tensor voxels, interleaved.
    MultiComponent(MultiComponentImage<B, D>),
    /// A vector or tensor image already split into its scalar components,
    /// in storage order.
    Components {
        pixel_type: PixelType,
        images: Vec<Image<B, D>>,
    },
}

impl<B: Backend, const D: usize> InputImage<B, D> {
    pub fn pixel_type(&self) -> PixelType {
        match self {
            Self::Scalar(_) => PixelType::Scalar,
            Self::MultiComponent(image) => image.pixel_type(),
            Self::Components { pixel_type, .. } => *pixel_type,
        }
    }

    /// Interleave pre-split components; other variants are returned as is.
    ///
    /// Fails on a wrong component count or mismatched component grids.
    pub(crate) fn into_assembled(self) -> Result<Self> {
        match self {
            Self::Components { pixel_type, images } => {
                Ok(Self::MultiComponent(assemble_components(images, pixel_type)?))
            }
            other => Ok(other),
        }
    }
}

impl<B: Backend, const D: usize> From<Image<B, D>> for InputImage<B, D> {
    fn from(image: Image<B, D>) -> Self {
        Self::Scalar(image)
    }
}

impl<B: Backend, const D: usize> From<MultiComponentImage<B, D>> for InputImage<B, D> {
    fn from(image: MultiComponentImage<B, D>) -> Self {
        Self::MultiComponent(image)
    }
}

/// One transform in listing order, optionally used inverted.
pub struct TransformEntry<B: Backend, const D: usize> {
    pub transform: Box<dyn Transform<B, D>>,
    pub use_inverse: bool,
}

impl<B: Backend, const D: usize> TransformEntry<B, D> {
    pub fn new(transform: Box<dyn Transform<B, D>>) -> Self {
        Self {
            transform,
            use_inverse: false,
        }
    }

    pub fn inverted(transform: Box<dyn Transform<B, D>>) -> Self {
        Self {
            transform,
            use_inverse: true,
        }
    }
}

//! The apply-transforms pipeline.
//!
//! Given a reference grid, a moving image and an ordered list of transforms,
//! the pipeline builds the transform stack, corrects vector and tensor voxels
//! for differing image directions, resamples every scalar component onto the
//! reference grid and reassembles the result. Alternatively it samples the
//! composite transform as a displacement field.

use burn::tensor::backend::Backend;
use warpkit_core::filter::{
    assemble_components, reorient_to_reference, split_components, ResampleImageFilter,
    TransformToDisplacementField,
};
use warpkit_core::{GridGeometry, Image, MultiComponentImage, PixelType, Result, TransformStack, WarpError};
use crate::config::{ApplyTransformsConfig, InputImageType, OutputMode};
use crate::input::{InputImage, TransformEntry};

/// Result of running the pipeline.
#[derive(Debug, Clone)]
pub enum ApplyOutput<B: Backend, const D: usize> {
    Scalar(Image<B, D>),
    Vector(MultiComponentImage<B, D>),
    Tensor(MultiComponentImage<B, D>),
    /// `T(p) - p` at every reference grid point.
    DisplacementField(MultiComponentImage<B, D>),
}

impl<B: Backend, const D: usize> ApplyOutput<B, D> {
    pub fn as_scalar(&self) -> Option<&Image<B, D>> {
        match self {
            Self::Scalar(image) => Some(image),
            _ => None,
        }
    }

    /// The vector, tensor or displacement field image.
    pub fn as_multi_component(&self) -> Option<&MultiComponentImage<B, D>> {
        match self {
            Self::Vector(image) | Self::Tensor(image) | Self::DisplacementField(image) => Some(image),
            Self::Scalar(_) => None,
        }
    }

    pub fn geometry(&self) -> &GridGeometry<D> {
        match self {
            Self::Scalar(image) => image.geometry(),
            Self::Vector(image) | Self::Tensor(image) | Self::DisplacementField(image) => image.geometry(),
        }
    }
}

/// Applies an ordered list of transforms to a moving image.
pub struct ApplyTransforms<B: Backend, const D: usize> {
    config: ApplyTransformsConfig,
    reference: Option<GridGeometry<D>>,
    input: Option<InputImage<B, D>>,
    transforms: Vec<TransformEntry<B, D>>,
}

impl<B: Backend, const D: usize> ApplyTransforms<B, D> {
    pub fn new(config: ApplyTransformsConfig) -> Self {
        Self {
            config,
            reference: None,
            input: None,
            transforms: Vec::new(),
        }
    }

    /// Set the grid the output is sampled on.
    pub fn with_reference(mut self, reference: GridGeometry<D>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Set the moving image.
    pub fn with_input(mut self, input: impl Into<InputImage<B, D>>) -> Self {
        self.input = Some(input.into());
        self
    }

    /// Append a transform in listing order.
    pub fn with_transform(mut self, entry: TransformEntry<B, D>) -> Self {
        self.transforms.push(entry);
        self
    }

    pub fn config(&self) -> &ApplyTransformsConfig {
        &self.config
    }

    /// Run the pipeline.
    ///
    /// Every configuration and transform error is reported before any output
    /// is allocated.
    pub fn run(self, device: &B::Device) -> Result<ApplyOutput<B, D>> {
        self.config.validate::<D>()?;
        let reference = self.reference.ok_or(WarpError::MissingReference)?;

        let input = match self.config.output_mode {
            OutputMode::WarpedImage => {
                let input = self.input.ok_or(WarpError::MissingInput)?.into_assembled()?;
                let actual = InputImageType::from(input.pixel_type());
                if actual != self.config.input_type {
                    return Err(WarpError::invalid_configuration(format!(
                        "input image type is {} but {} was requested",
                        actual, self.config.input_type
                    )));
                }
                Some(input)
            }
            OutputMode::DisplacementField => None,
        };

        let stack = TransformStack::from_entries(
            self.transforms
                .into_iter()
                .map(|entry| (entry.transform, entry.use_inverse)),
        )?;

        tracing::info!(
            "Reference grid: size {:?}, spacing {:?}, origin {:?}",
            reference.size(),
            reference.spacing().to_array(),
            reference.origin().to_array()
        );
        tracing::info!("Transform stack of {} entries", stack.len());

        let input = match input {
            Some(input) => input,
            None => {
                tracing::info!("Writing composite displacement field");
                let field = TransformToDisplacementField::new(reference, &stack)
                    .with_chunk_size(self.config.chunk_size)
                    .generate(device)?;
                return Ok(ApplyOutput::DisplacementField(field));
            }
        };

        tracing::info!(
            "Input type {}, interpolation {}, default value {}",
            self.config.input_type,
            self.config.interpolation,
            self.config.default_value
        );
        let filter = ResampleImageFilter::new(reference.clone(), &stack)
            .with_default_pixel_value(self.config.default_value)
            .with_chunk_size(self.config.chunk_size);

        match input {
            InputImage::Scalar(image) => {
                let output = filter.apply(&image, &self.config.interpolation)?;
                Ok(ApplyOutput::Scalar(output))
            }
            InputImage::MultiComponent(image) => {
                let pixel_type = image.pixel_type();
                let image = reorient_to_reference(image, &reference)?;
                let components = split_components(&image)?;
                let mapped = filter.map_points(device)?;

                let mut resampled = Vec::with_capacity(components.len());
                for (c, component) in components.iter().enumerate() {
                    let interpolator = self.config.interpolation.bind(component)?;
                    tracing::debug!("Resampling component {} of {}", c + 1, components.len());
                    resampled.push(filter.apply_with(&mapped, interpolator.as_ref(), device)?);
                }

                // Components are already expressed in the reference axes.
                let output = assemble_components(resampled, pixel_type)?;
                match pixel_type {
                    PixelType::SymmetricTensor => Ok(ApplyOutput::Tensor(output)),
                    _ => Ok(ApplyOutput::Vector(output)),
                }
            }
            InputImage::Components { .. } => Err(WarpError::invalid_configuration(
                "component images must be assembled before resampling",
            )),
        }
    }
}

/// Resample `input` onto `reference` through `transforms`.
pub fn apply_transforms<B: Backend, const D: usize>(
    config: ApplyTransformsConfig,
    reference: GridGeometry<D>,
    input: impl Into<InputImage<B, D>>,
    transforms: Vec<TransformEntry<B, D>>,
    device: &B::Device,
) -> Result<ApplyOutput<B, D>> {
    transforms
        .into_iter()
        .fold(
            ApplyTransforms::new(config).with_reference(reference).with_input(input),
            |pipeline, entry| pipeline.with_transform(entry),
        )
        .run(device)
}

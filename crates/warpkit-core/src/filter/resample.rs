//! Resample image filter.
//!
//! This module provides ResampleImageFilter which resamples an image
//! onto a target grid using a transform and an interpolator.

use burn::tensor::backend::Backend;
use rayon::prelude::*;
use crate::error::{Result, WarpError};
use crate::image::grid::physical_points;
use crate::image::{GridGeometry, Image};
use crate::interpolation::{Interpolator, InterpolatorKind};
use crate::spatial::Point;
use crate::transform::trait_::Transform;

/// Points mapped through the transform per tensor batch.
pub const DEFAULT_CHUNK_SIZE: usize = 65536;

/// Map every voxel of `geometry` through `transform`, in linear-offset order.
///
/// Points stay in `f64` from grid generation through the transform, so an
/// identity mapping lands exactly on the source lattice. They are transformed
/// in chunks of `chunk_size` to bound memory for large grids.
pub fn map_grid_points<B: Backend, const D: usize>(
    geometry: &GridGeometry<D>,
    transform: &dyn Transform<B, D>,
    chunk_size: usize,
    device: &B::Device,
) -> Result<Vec<Point<D>>> {
    let total = geometry.num_voxels();
    let chunk_size = chunk_size.max(1);
    let mut mapped = Vec::with_capacity(total);

    let mut start = 0;
    while start < total {
        let end = (start + chunk_size).min(total);
        let points = physical_points(geometry, start..end);
        mapped.extend(transform.transform_host_points(&points, device)?);
        start = end;
    }
    Ok(mapped)
}

/// Resample image filter.
///
/// Resamples an image by applying a transform to map points from the
/// output image space to the input image space, and then interpolating values.
///
/// The transform maps from Output Physical Space -> Input Physical Space.
/// Points that land outside the interpolator's domain receive the default
/// pixel value.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `D` - The dimensionality
pub struct ResampleImageFilter<'a, B: Backend, const D: usize> {
    geometry: GridGeometry<D>,
    transform: &'a dyn Transform<B, D>,
    default_pixel_value: f64,
    chunk_size: usize,
}

impl<'a, B: Backend, const D: usize> ResampleImageFilter<'a, B, D> {
    /// Create a new resample filter.
    ///
    /// # Arguments
    /// * `geometry` - Output grid
    /// * `transform` - Transform from output space to input space
    pub fn new(geometry: GridGeometry<D>, transform: &'a dyn Transform<B, D>) -> Self {
        Self {
            geometry,
            transform,
            default_pixel_value: 0.0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set default pixel value for outside the field of view.
    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.default_pixel_value = value;
        self
    }

    /// Set how many points are transformed per tensor batch.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn geometry(&self) -> &GridGeometry<D> {
        &self.geometry
    }

    /// Map every output voxel into input physical space.
    ///
    /// The result depends only on the output grid and the transform, so it can
    /// be shared by every component of a multi-component image.
    pub fn map_points(&self, device: &B::Device) -> Result<Vec<Point<D>>> {
        map_grid_points(&self.geometry, self.transform, self.chunk_size, device)
    }

    /// Apply filter to an input image, binding a fresh interpolator of `kind`.
    pub fn apply(&self, input: &Image<B, D>, kind: &InterpolatorKind) -> Result<Image<B, D>> {
        let device = input.device();
        let interpolator = kind.bind(input)?;
        let mapped = self.map_points(&device)?;
        self.apply_with(&mapped, interpolator.as_ref(), &device)
    }

    /// Fill the output grid from already mapped points.
    pub fn apply_with(
        &self,
        mapped: &[Point<D>],
        interpolator: &dyn Interpolator<D>,
        device: &B::Device,
    ) -> Result<Image<B, D>> {
        if mapped.len() != self.geometry.num_voxels() {
            return Err(WarpError::geometry_mismatch(format!(
                "{} mapped points for an output grid of {} voxels",
                mapped.len(),
                self.geometry.num_voxels()
            )));
        }
        tracing::debug!(
            "Resampling {} voxels with {} (default {})",
            mapped.len(),
            interpolator.name(),
            self.default_pixel_value
        );

        let default = self.default_pixel_value;
        let values: Vec<f32> = mapped
            .par_iter()
            .map(|point| interpolator.evaluate(point).unwrap_or(default) as f32)
            .collect();

        Image::from_vec(values, self.geometry.clone(), device)
    }
}

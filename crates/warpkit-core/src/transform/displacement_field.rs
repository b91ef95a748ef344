//! Displacement field transform implementation.
//!
//! A dense field stores one physical displacement vector per voxel of its own
//! grid. A point is mapped to `p + u(p)`, where `u` is linearly interpolated
//! from the field; outside the field's domain the displacement is zero.

use std::marker::PhantomData;
use std::sync::Arc;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::image::grid::{points_to_tensor, tensor_to_vec};
use crate::image::{GridGeometry, MultiComponentImage, PixelType};
use crate::interpolation::linear::linear_taps;
use crate::spatial::Point;
use super::trait_::Transform;

/// Sampled displacement vectors on a grid, interleaved per voxel.
#[derive(Debug, Clone)]
struct FieldData<const D: usize> {
    geometry: GridGeometry<D>,
    values: Arc<[f64]>,
}

impl<const D: usize> FieldData<D> {
    fn from_image<B: Backend>(field: &MultiComponentImage<B, D>) -> Result<Self> {
        if field.pixel_type() != PixelType::Vector {
            return Err(WarpError::invalid_configuration(format!(
                "displacement field must hold vectors, got {:?}",
                field.pixel_type()
            )));
        }
        Ok(Self {
            geometry: field.geometry().clone(),
            values: field.to_vec().into(),
        })
    }

    fn displacement_at(&self, point: &Point<D>) -> [f64; D] {
        let mut displacement = [0.0; D];
        let index = self.geometry.physical_to_continuous_index(point);
        let size = self.geometry.size();
        let inside = (0..D).all(|a| index[a] >= -0.5 && index[a] < size[a] as f64 - 0.5);
        if !inside {
            return displacement;
        }
        for (offset, weight) in linear_taps(&size, &index) {
            let v = &self.values[offset * D..(offset + 1) * D];
            for a in 0..D {
                displacement[a] += weight * v[a];
            }
        }
        displacement
    }

    fn map_point(&self, point: &Point<D>) -> Point<D> {
        let u = self.displacement_at(point);
        let mut mapped = *point;
        for a in 0..D {
            mapped[a] += u[a];
        }
        mapped
    }
}

/// Dense displacement field transform.
///
/// The optional inverse field lets the transform be used inverted in a
/// transform stack; without one, [`Transform::inverse`] returns `None`.
#[derive(Debug, Clone)]
pub struct DisplacementFieldTransform<B: Backend, const D: usize> {
    forward: FieldData<D>,
    inverse: Option<FieldData<D>>,
    _phantom: PhantomData<B>,
}

impl<B: Backend, const D: usize> DisplacementFieldTransform<B, D> {
    /// Create a transform from a vector image of physical displacements.
    pub fn from_image(field: &MultiComponentImage<B, D>) -> Result<Self> {
        Ok(Self {
            forward: FieldData::from_image(field)?,
            inverse: None,
            _phantom: PhantomData,
        })
    }

    /// Attach a field approximating the inverse mapping.
    pub fn with_inverse(mut self, inverse: &MultiComponentImage<B, D>) -> Result<Self> {
        self.inverse = Some(FieldData::from_image(inverse)?);
        Ok(self)
    }

    /// A zero displacement field on the given grid.
    pub fn zeros(geometry: GridGeometry<D>) -> Self {
        let values = vec![0.0; geometry.num_voxels() * D];
        Self {
            forward: FieldData {
                geometry,
                values: values.into(),
            },
            inverse: None,
            _phantom: PhantomData,
        }
    }

    /// Grid the displacement vectors are sampled on.
    pub fn geometry(&self) -> &GridGeometry<D> {
        &self.forward.geometry
    }

    /// Displacement at a physical point.
    pub fn displacement_at(&self, point: &Point<D>) -> [f64; D] {
        self.forward.displacement_at(point)
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for DisplacementFieldTransform<B, D> {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let device = points.device();
        let [n, _] = points.dims();
        let flat = tensor_to_vec(points);

        let mapped: Vec<Point<D>> = (0..n)
            .map(|i| self.forward.map_point(&Point::from_slice(&flat[i * D..(i + 1) * D])))
            .collect();

        points_to_tensor(&mapped, &device)
    }

    fn transform_host_points(&self, points: &[Point<D>], _device: &B::Device) -> Result<Vec<Point<D>>> {
        Ok(points.iter().map(|p| self.forward.map_point(p)).collect())
    }

    fn inverse(&self) -> Option<Box<dyn Transform<B, D>>> {
        let inverse = self.inverse.clone()?;
        Some(Box::new(Self {
            forward: inverse,
            inverse: Some(self.forward.clone()),
            _phantom: PhantomData,
        }))
    }

    fn name(&self) -> &'static str {
        "DisplacementFieldTransform"
    }
}

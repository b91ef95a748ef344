//! Identity transform.

use std::marker::PhantomData;
use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::spatial::Point;
use super::trait_::Transform;

/// Transform that returns its input unchanged.
#[derive(Debug, Clone)]
pub struct IdentityTransform<B: Backend, const D: usize> {
    _phantom: PhantomData<B>,
}

impl<B: Backend, const D: usize> IdentityTransform<B, D> {
    pub fn new() -> Self {
        Self { _phantom: PhantomData }
    }
}

impl<B: Backend, const D: usize> Default for IdentityTransform<B, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for IdentityTransform<B, D> {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        points
    }

    fn transform_host_points(&self, points: &[Point<D>], _device: &B::Device) -> Result<Vec<Point<D>>> {
        Ok(points.to_vec())
    }

    fn inverse(&self) -> Option<Box<dyn Transform<B, D>>> {
        Some(Box::new(Self::new()))
    }

    fn name(&self) -> &'static str {
        "IdentityTransform"
    }
}

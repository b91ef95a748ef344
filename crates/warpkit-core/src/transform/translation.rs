//! Translation transform implementation.

use burn::tensor::{Shape, Tensor, TensorData};
use burn::tensor::backend::Backend;
use burn::module::{Module, Param};
use crate::error::Result;
use crate::image::grid::tensor_to_vec;
use crate::spatial::Point;
use super::trait_::Transform;

/// Translates points by a fixed offset vector.
#[derive(Module, Debug)]
pub struct TranslationTransform<B: Backend, const D: usize> {
    translation: Param<Tensor<B, 1>>,
}

impl<B: Backend, const D: usize> TranslationTransform<B, D> {
    /// Create a new translation transform.
    ///
    /// # Arguments
    /// * `translation` - Tensor of shape `[D]` containing the translation vector
    pub fn new(translation: Tensor<B, 1>) -> Self {
        Self {
            translation: Param::from_tensor(translation),
        }
    }

    /// Create a translation from host components.
    pub fn from_offset(offset: [f64; D], device: &B::Device) -> Self {
        let values: Vec<f32> = offset.iter().map(|v| *v as f32).collect();
        Self::new(Tensor::<B, 1>::from_data(TensorData::new(values, Shape::new([D])), device))
    }

    /// Get the translation vector.
    pub fn translation(&self) -> Tensor<B, 1> {
        self.translation.val()
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for TranslationTransform<B, D> {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        // Broadcast [D] over [Batch, D]
        let t = self.translation.val().reshape([1, D]);
        points + t
    }

    fn transform_host_points(&self, points: &[Point<D>], _device: &B::Device) -> Result<Vec<Point<D>>> {
        let offset = tensor_to_vec(self.translation.val());
        Ok(points
            .iter()
            .map(|p| {
                let mut q = *p;
                for a in 0..D {
                    q[a] += offset[a];
                }
                q
            })
            .collect())
    }

    fn inverse(&self) -> Option<Box<dyn Transform<B, D>>> {
        Some(Box::new(Self::new(self.translation.val().neg())))
    }

    fn name(&self) -> &'static str {
        "TranslationTransform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_translation_transform() {
        let device = Default::default();
        let transform = TranslationTransform::<TestBackend, 3>::from_offset([1.0, 2.0, 3.0], &device);

        let points = Tensor::<TestBackend, 2>::from_floats(
            [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            &device,
        );

        let transformed = transform.transform_points(points).into_data();
        assert_eq!(transformed.as_slice::<f32>().unwrap(), &[1.0, 2.0, 3.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_translation_inverse_cancels() {
        let device = Default::default();
        let transform = TranslationTransform::<TestBackend, 2>::from_offset([4.0, -1.5], &device);
        let inverse = transform.inverse().unwrap();

        let points = Tensor::<TestBackend, 2>::from_floats([[3.0, 3.0]], &device);
        let roundtrip = inverse.transform_points(transform.transform_points(points)).into_data();
        assert_eq!(roundtrip.as_slice::<f32>().unwrap(), &[3.0, 3.0]);
    }

    #[test]
    fn test_host_points_shift_in_double_precision() {
        let transform = TranslationTransform::<TestBackend, 2>::from_offset([0.5, -2.0], &Default::default());
        let points = vec![Point::new([-97.3, 121.7])];
        let mapped = transform.transform_host_points(&points, &Default::default()).unwrap();
        assert_eq!(mapped, vec![Point::new([-97.3 + 0.5, 121.7 - 2.0])]);
    }
}

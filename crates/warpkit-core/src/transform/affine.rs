//! Affine transform implementation.
//!
//! This module provides an affine transform (linear transformation + translation).

use burn::tensor::{Shape, Tensor, TensorData};
use burn::tensor::backend::Backend;
use burn::module::{Module, Param};
use nalgebra::SMatrix;
use crate::error::Result;
use crate::image::grid::tensor_to_vec;
use crate::spatial::{Point, Vector};
use super::trait_::Transform;

/// Affine Transform (Linear transformation + Translation).
///
/// Represents a general affine transformation with a fixed center:
/// T(x) = A(x - c) + c + t
///
/// where:
/// * A is a D×D matrix (linear transformation: rotation, scale, shear)
/// * t is a D-dimensional translation vector
/// * c is a D-dimensional fixed center of rotation/scaling
#[derive(Module, Debug)]
pub struct AffineTransform<B: Backend, const D: usize> {
    matrix: Param<Tensor<B, 2>>, // [D, D] linear transformation matrix
    translation: Param<Tensor<B, 1>>, // [D] translation vector
    center: Tensor<B, 1>, // [D] fixed center
}

impl<B: Backend, const D: usize> AffineTransform<B, D> {
    /// Create a new affine transform.
    ///
    /// # Arguments
    /// * `matrix` - Tensor of shape `[D, D]` containing the linear transformation matrix
    /// * `translation` - Tensor of shape `[D]` containing the translation vector
    /// * `center` - Tensor of shape `[D]` containing the fixed center
    pub fn new(matrix: Tensor<B, 2>, translation: Tensor<B, 1>, center: Tensor<B, 1>) -> Self {
        Self {
            matrix: Param::from_tensor(matrix),
            translation: Param::from_tensor(translation),
            center,
        }
    }

    /// Create an affine transform from host-side parameters.
    pub fn from_matrix(
        matrix: SMatrix<f64, D, D>,
        translation: Vector<D>,
        center: Point<D>,
        device: &B::Device,
    ) -> Self {
        let mut m = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                m.push(matrix[(r, c)] as f32);
            }
        }
        let t: Vec<f32> = translation.to_array().iter().map(|v| *v as f32).collect();
        let c: Vec<f32> = center.to_array().iter().map(|v| *v as f32).collect();

        Self::new(
            Tensor::<B, 2>::from_data(TensorData::new(m, Shape::new([D, D])), device),
            Tensor::<B, 1>::from_data(TensorData::new(t, Shape::new([D])), device),
            Tensor::<B, 1>::from_data(TensorData::new(c, Shape::new([D])), device),
        )
    }

    /// Create an identity affine transform about the origin.
    pub fn identity(device: &B::Device) -> Self {
        Self::from_matrix(SMatrix::identity(), Vector::zeros(), Point::origin(), device)
    }

    /// Get the transformation matrix.
    pub fn matrix(&self) -> Tensor<B, 2> {
        self.matrix.val()
    }

    /// Get the translation vector.
    pub fn translation(&self) -> Tensor<B, 1> {
        self.translation.val()
    }

    /// Get the center of rotation.
    pub fn center(&self) -> Tensor<B, 1> {
        self.center.clone()
    }

    /// Matrix, translation and center read back to the host.
    fn host_parameters(&self) -> (SMatrix<f64, D, D>, Vector<D>, Point<D>) {
        let flat = tensor_to_vec(self.matrix.val());
        let matrix = SMatrix::<f64, D, D>::from_fn(|r, c| flat[r * D + c]);
        let translation = Vector::<D>::from_slice(&tensor_to_vec(self.translation.val()));
        let center = Point::<D>::from_slice(&tensor_to_vec(self.center.clone()));
        (matrix, translation, center)
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for AffineTransform<B, D> {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        // Row vector form of T(x) = A(x - c) + c + t:
        // y = (x - c) @ A^T + c + t
        let c = self.center.clone().reshape([1, D]);
        let t = self.translation.val().reshape([1, D]);
        let a = self.matrix.val();

        let centered = points - c.clone();
        let rotated = centered.matmul(a.transpose());

        rotated + c + t
    }

    fn transform_host_points(&self, points: &[Point<D>], _device: &B::Device) -> Result<Vec<Point<D>>> {
        let (a, t, c) = self.host_parameters();
        Ok(points.iter().map(|p| c + Vector(a * (*p - c).0) + t).collect())
    }

    /// T^-1(y) = A^-1(y - c) + c - A^-1 t, about the same center.
    fn inverse(&self) -> Option<Box<dyn Transform<B, D>>> {
        let (matrix, t, c) = self.host_parameters();
        let inverse = matrix.try_inverse()?;
        let inverse_translation = Vector(-(inverse * t.0));

        let device = self.center.device();
        Some(Box::new(Self::from_matrix(inverse, inverse_translation, c, &device)))
    }

    fn name(&self) -> &'static str {
        "AffineTransform"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_affine_transform_identity() {
        let device = Default::default();
        let transform = AffineTransform::<TestBackend, 3>::identity(&device);

        let points = Tensor::<TestBackend, 2>::from_floats(
            [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            &device,
        );

        let data = transform.transform_points(points).into_data();
        assert_eq!(data.as_slice::<f32>().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_affine_transform_scale_with_center() {
        let device = Default::default();

        // Scale by 2 about (1, 1): (2, 1) -> (3, 1)
        let transform = AffineTransform::<TestBackend, 2>::from_matrix(
            SMatrix::<f64, 2, 2>::identity() * 2.0,
            Vector::zeros(),
            Point::new([1.0, 1.0]),
            &device,
        );
        let points = Tensor::<TestBackend, 2>::from_floats([[2.0, 1.0]], &device);

        let data = transform.transform_points(points).into_data();
        let slice = data.as_slice::<f32>().unwrap();
        assert!((slice[0] - 3.0).abs() < 1e-6);
        assert!((slice[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_affine_inverse_roundtrip() {
        let device = Default::default();
        let matrix = SMatrix::<f64, 3, 3>::new(
            0.0, -2.0, 0.0,
            1.0, 0.0, 0.0,
            0.0, 0.5, 1.5,
        );
        let transform = AffineTransform::<TestBackend, 3>::from_matrix(
            matrix,
            Vector::new([1.0, -3.0, 2.0]),
            Point::new([5.0, 5.0, 5.0]),
            &device,
        );
        let inverse = transform.inverse().expect("matrix is invertible");

        let points = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0, 3.0], [-4.0, 0.5, 9.0]], &device);
        let roundtrip = inverse.transform_points(transform.transform_points(points)).into_data();
        let expected = [1.0, 2.0, 3.0, -4.0, 0.5, 9.0];
        for (actual, expected) in roundtrip.as_slice::<f32>().unwrap().iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-4, "{} vs {}", actual, expected);
        }
    }

    #[test]
    fn test_host_points_match_tensor_path() {
        let device = Default::default();
        let matrix = SMatrix::<f64, 2, 2>::new(0.0, -1.0, 1.0, 0.0);
        let transform = AffineTransform::<TestBackend, 2>::from_matrix(
            matrix,
            Vector::new([0.5, 0.25]),
            Point::new([1.0, 2.0]),
            &device,
        );

        // (3, 2) - c = (2, 0) -> (0, 2) + c + t = (1.5, 4.25)
        let mapped = transform.transform_host_points(&[Point::new([3.0, 2.0])], &device).unwrap();
        assert_eq!(mapped, vec![Point::new([1.5, 4.25])]);

        let identity = AffineTransform::<TestBackend, 3>::identity(&device);
        let points = vec![Point::new([-97.3, 121.7, 33.1])];
        assert_eq!(identity.transform_host_points(&points, &device).unwrap(), points);
    }

    #[test]
    fn test_singular_affine_has_no_inverse() {
        let device = Default::default();
        let transform = AffineTransform::<TestBackend, 2>::from_matrix(
            SMatrix::<f64, 2, 2>::zeros(),
            Vector::zeros(),
            Point::origin(),
            &device,
        );
        assert!(transform.inverse().is_none());
    }
}

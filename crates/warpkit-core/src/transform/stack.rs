//! Ordered composition of transforms.
//!
//! Transforms are pushed in the order they are listed. When mapping a point
//! the most recently pushed transform is applied first and the first pushed
//! one last, followed by an implicit identity:
//!
//! `y = T0(T1(...Tn(x)))`

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{Result, WarpError};
use crate::spatial::Point;
use super::identity::IdentityTransform;
use super::trait_::Transform;

/// Composite of transforms applied in reverse push order.
pub struct TransformStack<B: Backend, const D: usize> {
    transforms: Vec<Box<dyn Transform<B, D>>>,
    identity: IdentityTransform<B, D>,
}

impl<B: Backend, const D: usize> TransformStack<B, D> {
    /// Create an empty stack, which maps every point to itself.
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
            identity: IdentityTransform::new(),
        }
    }

    /// Append a transform, replacing it by its inverse when `use_inverse` is set.
    ///
    /// Fails with [`WarpError::TransformError`] if the inverse is requested for
    /// a transform that cannot provide one; the stack is left unchanged.
    pub fn push(&mut self, transform: Box<dyn Transform<B, D>>, use_inverse: bool) -> Result<()> {
        let name = transform.name();
        let entry = if use_inverse {
            transform.inverse().ok_or_else(|| {
                WarpError::transform(format!("{} has no inverse", name))
            })?
        } else {
            transform
        };
        tracing::debug!(
            "Stack entry {}: {}{}",
            self.transforms.len(),
            name,
            if use_inverse { " (inverse)" } else { "" }
        );
        self.transforms.push(entry);
        Ok(())
    }

    /// Build a stack from `(transform, use_inverse)` pairs in listing order.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Box<dyn Transform<B, D>>, bool)>,
    {
        let mut stack = Self::new();
        for (transform, use_inverse) in entries {
            stack.push(transform, use_inverse)?;
        }
        Ok(stack)
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl<B: Backend, const D: usize> Default for TransformStack<B, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for TransformStack<B, D> {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let mapped = self
            .transforms
            .iter()
            .rev()
            .fold(points, |acc, transform| transform.transform_points(acc));
        self.identity.transform_points(mapped)
    }

    fn transform_host_points(&self, points: &[Point<D>], device: &B::Device) -> Result<Vec<Point<D>>> {
        let mut mapped = points.to_vec();
        for transform in self.transforms.iter().rev() {
            mapped = transform.transform_host_points(&mapped, device)?;
        }
        self.identity.transform_host_points(&mapped, device)
    }

    /// Invertible only when every entry is.
    fn inverse(&self) -> Option<Box<dyn Transform<B, D>>> {
        let mut inverse = Self::new();
        for transform in self.transforms.iter().rev() {
            inverse.transforms.push(transform.inverse()?);
        }
        Some(Box::new(inverse))
    }

    fn name(&self) -> &'static str {
        "TransformStack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use nalgebra::SMatrix;
    use crate::spatial::{Point, Vector};
    use crate::transform::affine::AffineTransform;
    use crate::transform::translation::TranslationTransform;

    type TestBackend = NdArray<f32>;

    fn scale(factor: f64) -> Box<dyn Transform<TestBackend, 2>> {
        Box::new(AffineTransform::<TestBackend, 2>::from_matrix(
            SMatrix::<f64, 2, 2>::identity() * factor,
            Vector::zeros(),
            Point::origin(),
            &Default::default(),
        ))
    }

    fn shift(offset: [f64; 2]) -> Box<dyn Transform<TestBackend, 2>> {
        Box::new(TranslationTransform::<TestBackend, 2>::from_offset(offset, &Default::default()))
    }

    fn map(stack: &dyn Transform<TestBackend, 2>, point: [f32; 2]) -> Vec<f32> {
        let points = Tensor::<TestBackend, 2>::from_floats([point], &Default::default());
        stack.transform_points(points).into_data().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_empty_stack_is_identity() {
        let stack = TransformStack::<TestBackend, 2>::new();
        assert!(stack.is_empty());
        assert_eq!(map(&stack, [3.0, -1.0]), vec![3.0, -1.0]);
    }

    #[test]
    fn test_last_pushed_applies_first() {
        // y = scale(shift(x)) = 2 * (x + 1)
        let stack = TransformStack::from_entries(vec![(scale(2.0), false), (shift([1.0, 1.0]), false)])
            .unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(map(&stack, [1.0, 0.0]), vec![4.0, 2.0]);

        // y = shift(scale(x)) = 2x + 1
        let reversed = TransformStack::from_entries(vec![(shift([1.0, 1.0]), false), (scale(2.0), false)])
            .unwrap();
        assert_eq!(map(&reversed, [1.0, 0.0]), vec![3.0, 1.0]);
    }

    #[test]
    fn test_host_points_follow_stack_order() {
        let device = Default::default();
        let stack = TransformStack::from_entries(vec![(scale(2.0), false), (shift([1.0, 1.0]), false)])
            .unwrap();
        let mapped = stack.transform_host_points(&[Point::new([1.0, 0.0])], &device).unwrap();
        assert_eq!(mapped, vec![Point::new([4.0, 2.0])]);

        let empty = TransformStack::<TestBackend, 2>::new();
        let points = vec![Point::new([-97.3, 0.1])];
        assert_eq!(empty.transform_host_points(&points, &device).unwrap(), points);
    }

    #[test]
    fn test_use_inverse_entry() {
        let stack = TransformStack::from_entries(vec![(shift([2.0, -1.0]), true)]).unwrap();
        assert_eq!(map(&stack, [0.0, 0.0]), vec![-2.0, 1.0]);
    }

    #[test]
    fn test_non_invertible_entry_is_rejected() {
        let singular: Box<dyn Transform<TestBackend, 2>> = Box::new(AffineTransform::<TestBackend, 2>::from_matrix(
            SMatrix::<f64, 2, 2>::zeros(),
            Vector::zeros(),
            Point::origin(),
            &Default::default(),
        ));
        let mut stack = TransformStack::new();
        let err = stack.push(singular, true).unwrap_err();
        assert!(matches!(err, WarpError::TransformError(_)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_stack_inverse_roundtrip() {
        let stack = TransformStack::from_entries(vec![(scale(2.0), false), (shift([1.0, 3.0]), false)])
            .unwrap();
        let inverse = stack.inverse().expect("all entries invertible");

        let forward = map(&stack, [0.5, -2.0]);
        let back = map(inverse.as_ref(), [forward[0], forward[1]]);
        assert!((back[0] - 0.5).abs() < 1e-5);
        assert!((back[1] + 2.0).abs() < 1e-5);
    }
}

//! Direction correction for vector and tensor images.
//!
//! Physical vectors and tensors are expressed in the axes of the image they
//! belong to. Before resampling onto a reference grid whose direction differs,
//! each voxel is rotated by `D = Mᵀ · R` (`M` the moving direction, `R` the
//! reference direction): vectors become `D · v` and tensors `D · T · Dᵀ`.

use burn::tensor::backend::Backend;
use nalgebra::{Matrix3, SVector};
use rayon::prelude::*;
use crate::error::Result;
use crate::image::{GridGeometry, MultiComponentImage, PixelType};
use crate::spatial::Direction;

/// Element-wise tolerance below which the correction is the identity.
pub const DIRECTION_TOLERANCE: f64 = 1e-5;

/// The correction matrix, or `None` when the frames already agree.
pub fn direction_correction<const D: usize>(
    moving: &Direction<D>,
    reference: &Direction<D>,
) -> Option<Direction<D>> {
    let correction = moving.transpose() * *reference;
    if correction.is_identity(DIRECTION_TOLERANCE) {
        None
    } else {
        Some(correction)
    }
}

/// Unpack xx, xy, xz, yy, yz, zz into a symmetric matrix.
fn unpack_tensor(packed: &[f64]) -> Matrix3<f64> {
    Matrix3::new(
        packed[0], packed[1], packed[2],
        packed[1], packed[3], packed[4],
        packed[2], packed[4], packed[5],
    )
}

fn pack_tensor(tensor: &Matrix3<f64>, packed: &mut [f64]) {
    packed[0] = tensor[(0, 0)];
    packed[1] = tensor[(0, 1)];
    packed[2] = tensor[(0, 2)];
    packed[3] = tensor[(1, 1)];
    packed[4] = tensor[(1, 2)];
    packed[5] = tensor[(2, 2)];
}

/// Express every voxel of `image` in the axes of `reference`.
///
/// The image geometry is left as is. When no correction is needed the input
/// is returned untouched.
pub fn reorient_to_reference<B: Backend, const D: usize>(
    image: MultiComponentImage<B, D>,
    reference: &GridGeometry<D>,
) -> Result<MultiComponentImage<B, D>> {
    let correction = match direction_correction(image.geometry().direction(), reference.direction()) {
        Some(correction) => correction,
        None => {
            tracing::debug!("Directions agree, skipping direction correction");
            return Ok(image);
        }
    };
    tracing::info!("Applying direction correction to {:?} image", image.pixel_type());

    let pixel_type = image.pixel_type();
    let components = image.components();
    let mut values = image.to_vec();

    match pixel_type {
        PixelType::Vector => {
            let d = *correction.inner();
            values.par_chunks_mut(components).for_each(|voxel| {
                let rotated = d * SVector::<f64, D>::from_column_slice(voxel);
                voxel.copy_from_slice(rotated.as_slice());
            });
        }
        PixelType::SymmetricTensor => {
            // Tensor images are 3-D by construction.
            let d = Matrix3::from_fn(|r, c| correction[(r, c)]);
            values.par_chunks_mut(components).for_each(|voxel| {
                let rotated = d * unpack_tensor(voxel) * d.transpose();
                pack_tensor(&rotated, voxel);
            });
        }
        PixelType::Scalar => {}
    }

    let device = image.device();
    let values = values.into_iter().map(|v| v as f32).collect();
    MultiComponentImage::from_vec(values, image.geometry().clone(), pixel_type, &device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use crate::spatial::{Point, Spacing};

    type TestBackend = NdArray<f32>;

    fn geometry(direction: Direction<3>) -> GridGeometry<3> {
        GridGeometry::new([2, 1, 1], Point::origin(), Spacing::uniform(1.0), direction).unwrap()
    }

    fn swap_xy() -> Direction<3> {
        Direction::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
    }

    #[test]
    fn test_equal_directions_skip_correction() {
        let direction = swap_xy();
        assert!(direction_correction(&direction, &direction).is_none());

        let image = MultiComponentImage::<TestBackend, 3>::from_vec(
            vec![0.1, 0.2, 0.3, 1.0 / 3.0, 0.7, 0.9],
            geometry(direction),
            PixelType::Vector,
            &Default::default(),
        )
        .unwrap();
        let before = image.to_vec();
        let after = reorient_to_reference(image, &geometry(direction)).unwrap();
        assert_eq!(after.to_vec(), before);
    }

    #[test]
    fn test_vector_reoriented_onto_swapped_axis() {
        let image = MultiComponentImage::<TestBackend, 3>::from_vec(
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 2.0],
            geometry(Direction::identity()),
            PixelType::Vector,
            &Default::default(),
        )
        .unwrap();

        // D = I^T * R = R; R * x̂ = ŷ
        let reoriented = reorient_to_reference(image, &geometry(swap_xy())).unwrap();
        let values = reoriented.to_vec();
        let expected = [0.0, 1.0, 0.0, 0.0, 0.0, 2.0];
        for (a, b) in values.iter().zip(expected) {
            assert!((a - b).abs() < 1e-6, "{:?}", values);
        }
        assert_eq!(reoriented.geometry().direction(), &Direction::identity());
    }

    #[test]
    fn test_four_dimensional_vectors_roundtrip() {
        let device = Default::default();
        let swap = Direction::<4>::from_rows([
            [0.0, -1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let moving = GridGeometry::new([2, 1, 1, 2], Point::origin(), Spacing::uniform(1.0), Direction::identity())
            .unwrap();
        let reference = GridGeometry::new([2, 1, 1, 2], Point::origin(), Spacing::uniform(1.0), swap).unwrap();
        let values: Vec<f32> = (0..16).map(|v| v as f32 - 3.5).collect();

        let image =
            MultiComponentImage::<TestBackend, 4>::from_vec(values.clone(), moving.clone(), PixelType::Vector, &device)
                .unwrap();
        let rotated = reorient_to_reference(image, &reference).unwrap().to_vec();

        // (x, y, z, t) -> (-y, x, z, t)
        assert_eq!(&rotated[..4], &[2.5, -3.5, -1.5, -0.5]);

        let rotated: Vec<f32> = rotated.into_iter().map(|v| v as f32).collect();
        let back = MultiComponentImage::<TestBackend, 4>::from_vec(rotated, reference, PixelType::Vector, &device)
            .unwrap();
        let restored = reorient_to_reference(back, &moving).unwrap().to_vec();
        let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
        assert_eq!(restored, expected);
    }

    #[test]
    fn test_tensor_reoriented() {
        // diag(1, 2, 3) rotated by the xy swap becomes diag(2, 1, 3).
        let image = MultiComponentImage::<TestBackend, 3>::from_vec(
            [1.0, 0.0, 0.0, 2.0, 0.0, 3.0].repeat(2),
            geometry(Direction::identity()),
            PixelType::SymmetricTensor,
            &Default::default(),
        )
        .unwrap();

        let reoriented = reorient_to_reference(image, &geometry(swap_xy())).unwrap();
        let values = reoriented.to_vec();
        let expected = [2.0, 0.0, 0.0, 1.0, 0.0, 3.0];
        for (a, b) in values[..6].iter().zip(expected) {
            assert!((a - b).abs() < 1e-6, "{:?}", values);
        }
    }
}

use warpkit_core::image::grid::{physical_points_tensor, tensor_to_points};
use warpkit_core::image::GridGeometry;
use warpkit_core::spatial::{Point, Spacing, Direction};
use warpkit_core::transform::{AffineTransform, Transform};
use burn::tensor::Tensor;
use burn_ndarray::NdArray;
use proptest::prelude::*;

type Backend = NdArray<f32>;
const D: usize = 3;

fn make_rotation(angle_x: f64, angle_y: f64, angle_z: f64) -> Direction<D> {
    let cx = angle_x.cos(); let sx = angle_x.sin();
    let cy = angle_y.cos(); let sy = angle_y.sin();
    let cz = angle_z.cos(); let sz = angle_z.sin();

    let rz = nalgebra::SMatrix::<f64, 3, 3>::new(
        cz, -sz, 0.0,
        sz, cz, 0.0,
        0.0, 0.0, 1.0
    );
    let ry = nalgebra::SMatrix::<f64, 3, 3>::new(
        cy, 0.0, sy,
        0.0, 1.0, 0.0,
        -sy, 0.0, cy
    );
    let rx = nalgebra::SMatrix::<f64, 3, 3>::new(
        1.0, 0.0, 0.0,
        0.0, cx, -sx,
        0.0, sx, cx
    );

    // Rx * Ry * Rz
    Direction(rx * ry * rz)
}

proptest! {
    #[test]
    fn test_coordinate_roundtrip(
        ox in -100.0f64..100.0, oy in -100.0f64..100.0, oz in -100.0f64..100.0,
        sx in 0.1f64..5.0, sy in 0.1f64..5.0, sz in 0.1f64..5.0,
        ax in -3.14f64..3.14, ay in -3.14f64..3.14, az in -3.14f64..3.14,
        px in -50.0f64..50.0, py in -50.0f64..50.0, pz in -50.0f64..50.0
    ) {
        let geometry = GridGeometry::<D>::new(
            [2, 2, 2],
            Point::new([ox, oy, oz]),
            Spacing::new([sx, sy, sz]),
            make_rotation(ax, ay, az),
        ).unwrap();
        let point = Point::<D>::new([px, py, pz]);

        let index = geometry.physical_to_continuous_index(&point);
        let recovered = geometry.continuous_index_to_physical(&index);

        prop_assert!((point[0] - recovered[0]).abs() < 1e-4, "X mismatch: {} vs {}", point[0], recovered[0]);
        prop_assert!((point[1] - recovered[1]).abs() < 1e-4, "Y mismatch: {} vs {}", point[1], recovered[1]);
        prop_assert!((point[2] - recovered[2]).abs() < 1e-4, "Z mismatch: {} vs {}", point[2], recovered[2]);
    }

    #[test]
    fn test_tensor_batch_consistency(
        ox in -10.0f64..10.0,
        sx in 0.5f64..2.0,
        angle in -3.14f64..3.14
    ) {
        let device = Default::default();
        let geometry = GridGeometry::<D>::new(
            [3, 2, 2],
            Point::new([ox, -ox, 0.5 * ox]),
            Spacing::new([sx, 2.0 * sx, sx]),
            make_rotation(0.0, 0.0, angle),
        ).unwrap();

        let tensor = physical_points_tensor::<Backend, D>(&geometry, 0..geometry.num_voxels(), &device);
        let points = tensor_to_points::<Backend, D>(tensor).unwrap();

        for (offset, point) in points.iter().enumerate() {
            let expected = geometry.index_to_physical(&geometry.offset_to_index(offset));
            for a in 0..D {
                prop_assert!((point[a] - expected[a]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_affine_inverse_is_identity(
        ax in -3.14f64..3.14, az in -3.14f64..3.14,
        scale in 0.5f64..2.0,
        tx in -10.0f64..10.0, ty in -10.0f64..10.0,
        cx in -5.0f64..5.0
    ) {
        let device = Default::default();
        let matrix = make_rotation(ax, 0.0, az).0 * scale;
        let affine = AffineTransform::<Backend, D>::from_matrix(
            matrix,
            warpkit_core::Vector::new([tx, ty, 0.0]),
            Point::new([cx, 0.0, -cx]),
            &device,
        );
        let inverse = affine.inverse().unwrap();

        let points = Tensor::<Backend, 2>::from_floats([[1.0, -2.0, 3.0], [0.0, 4.5, -1.0]], &device);
        let roundtrip = inverse.transform_points(affine.transform_points(points.clone()));
        let diff = (roundtrip - points).abs().max().into_scalar();
        prop_assert!(diff < 1e-3, "round trip error {}", diff);
    }
}

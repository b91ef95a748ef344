//! Conversions between host-side point lists and burn tensors.
//!
//! Transforms consume batches of points as `[N, D]` tensors; geometry and
//! interpolation work on the host in `f64`. These helpers move data across
//! that boundary.

use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor, TensorData};
use crate::error::{Result, WarpError};
use crate::spatial::Point;
use super::geometry::GridGeometry;

/// Read every element of a tensor back to the host as `f64`, row-major.
pub fn tensor_to_vec<B: Backend, const K: usize>(tensor: Tensor<B, K>) -> Vec<f64> {
    tensor.into_data().iter::<f64>().collect()
}

/// Pack points into a `[N, D]` tensor.
pub fn points_to_tensor<B: Backend, const D: usize>(
    points: &[Point<D>],
    device: &B::Device,
) -> Tensor<B, 2> {
    let n = points.len();
    let mut flat = Vec::with_capacity(n * D);
    for p in points {
        for a in 0..D {
            flat.push(p[a] as f32);
        }
    }
    Tensor::<B, 1>::from_data(TensorData::new(flat, Shape::new([n * D])), device).reshape([n, D])
}

/// Unpack a `[N, D]` tensor into points.
pub fn tensor_to_points<B: Backend, const D: usize>(tensor: Tensor<B, 2>) -> Result<Vec<Point<D>>> {
    let [n, d] = tensor.dims();
    if d != D {
        return Err(WarpError::tensor_data(format!(
            "expected points of dimension {}, got {}",
            D, d
        )));
    }
    let flat = tensor_to_vec(tensor);
    Ok((0..n).map(|i| Point::from_slice(&flat[i * D..(i + 1) * D])).collect())
}

/// Physical points of the voxels `offsets` of a grid.
///
/// The full grid is usually mapped in chunks to bound memory, so the caller
/// passes the range of linear offsets to generate.
pub fn physical_points<const D: usize>(
    geometry: &GridGeometry<D>,
    offsets: std::ops::Range<usize>,
) -> Vec<Point<D>> {
    offsets
        .map(|offset| geometry.index_to_physical(&geometry.offset_to_index(offset)))
        .collect()
}

/// Physical points of the voxels `offsets` of a grid, as a `[N, D]` tensor.
pub fn physical_points_tensor<B: Backend, const D: usize>(
    geometry: &GridGeometry<D>,
    offsets: std::ops::Range<usize>,
    device: &B::Device,
) -> Tensor<B, 2> {
    points_to_tensor(&physical_points(geometry, offsets), device)
}

//! Grid geometry: the physical embedding of a voxel lattice.
//!
//! A geometry maps discrete voxel indices to physical points and back:
//! `point = origin + Direction * (index * spacing)`.
//! Axis order is `x, y, z, t`; the linear buffer offset runs x fastest.

use crate::error::{Result, WarpError};
use crate::spatial::{Direction, Point, Spacing, Vector};

/// Size, spacing, origin and direction of an image grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridGeometry<const D: usize> {
    /// Number of voxels along each axis.
    size: [usize; D],
    /// Physical coordinate of the first voxel.
    origin: Point<D>,
    /// Physical distance between voxels along each axis.
    spacing: Spacing<D>,
    /// Orientation of the image axes.
    direction: Direction<D>,
    /// Cached inverse of `direction`.
    inverse_direction: Direction<D>,
}

impl<const D: usize> GridGeometry<D> {
    /// Create a geometry, rejecting empty extents, non-positive spacing and
    /// singular direction matrices.
    pub fn new(
        size: [usize; D],
        origin: Point<D>,
        spacing: Spacing<D>,
        direction: Direction<D>,
    ) -> Result<Self> {
        if D == 0 || D > 4 {
            return Err(WarpError::UnsupportedDimension(D));
        }
        if size.iter().any(|&s| s == 0) {
            return Err(WarpError::invalid_configuration(format!(
                "grid size must be non-zero along every axis, got {:?}",
                size
            )));
        }
        if !spacing.is_positive() {
            return Err(WarpError::invalid_configuration(format!(
                "spacing must be positive, got {:?}",
                spacing.to_array()
            )));
        }
        let inverse_direction = direction.try_inverse().ok_or_else(|| {
            WarpError::invalid_configuration("direction matrix is singular")
        })?;

        Ok(Self {
            size,
            origin,
            spacing,
            direction,
            inverse_direction,
        })
    }

    /// Unit-spaced, axis-aligned geometry at the origin.
    pub fn with_size(size: [usize; D]) -> Result<Self> {
        Self::new(size, Point::origin(), Spacing::uniform(1.0), Direction::identity())
    }

    /// Copy of this geometry with a new origin.
    pub fn with_origin(&self, origin: Point<D>) -> Self {
        Self { origin, ..self.clone() }
    }

    /// Voxel counts in axis order.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Total number of voxels.
    pub fn num_voxels(&self) -> usize {
        self.size.iter().product()
    }

    /// Tensor shape for this grid: the axis order reversed (`[Z, Y, X]`).
    pub fn tensor_shape(&self) -> [usize; D] {
        let mut shape = self.size;
        shape.reverse();
        shape
    }

    /// Linear offset strides, x fastest.
    pub fn strides(&self) -> [usize; D] {
        let mut strides = [1usize; D];
        for a in 1..D {
            strides[a] = strides[a - 1] * self.size[a - 1];
        }
        strides
    }

    /// Linear buffer offset of a discrete index.
    pub fn index_to_offset(&self, index: &[usize; D]) -> usize {
        let strides = self.strides();
        (0..D).map(|a| index[a] * strides[a]).sum()
    }

    /// Discrete index of a linear buffer offset.
    pub fn offset_to_index(&self, offset: usize) -> [usize; D] {
        let mut index = [0usize; D];
        let mut rest = offset;
        for a in 0..D {
            index[a] = rest % self.size[a];
            rest /= self.size[a];
        }
        index
    }

    /// Physical point of a discrete index.
    pub fn index_to_physical(&self, index: &[usize; D]) -> Point<D> {
        let mut continuous = Point::<D>::origin();
        for a in 0..D {
            continuous[a] = index[a] as f64;
        }
        self.continuous_index_to_physical(&continuous)
    }

    /// `point = origin + Direction * (index * spacing)`
    pub fn continuous_index_to_physical(&self, index: &Point<D>) -> Point<D> {
        let mut scaled = Vector::<D>::zeros();
        for a in 0..D {
            scaled[a] = index[a] * self.spacing[a];
        }
        self.origin + self.direction * scaled
    }

    /// `index = (Direction^-1 * (point - origin)) / spacing`
    pub fn physical_to_continuous_index(&self, point: &Point<D>) -> Point<D> {
        let rotated = self.inverse_direction * (*point - self.origin);
        let mut index = Point::<D>::origin();
        for a in 0..D {
            index[a] = rotated[a] / self.spacing[a];
        }
        index
    }

    /// Whether two geometries describe the same lattice within `tolerance`.
    pub fn is_congruent(&self, other: &Self, tolerance: f64) -> bool {
        self.size == other.size
            && (0..D).all(|a| {
                (self.origin[a] - other.origin[a]).abs() <= tolerance
                    && (self.spacing[a] - other.spacing[a]).abs() <= tolerance
                    && (0..D).all(|b| {
                        (self.direction[(a, b)] - other.direction[(a, b)]).abs() <= tolerance
                    })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Point3 = Point<3>;
    type Spacing3 = Spacing<3>;
    type Direction3 = Direction<3>;

    #[test]
    fn test_geometry_rejects_invalid_input() {
        let origin = Point3::origin();
        let direction = Direction3::identity();

        let zero_size = GridGeometry::new([0, 4, 4], origin, Spacing3::uniform(1.0), direction);
        assert!(matches!(zero_size, Err(WarpError::InvalidConfiguration(_))));

        let bad_spacing = GridGeometry::new([4, 4, 4], origin, Spacing3::new([1.0, -1.0, 1.0]), direction);
        assert!(bad_spacing.is_err());

        let singular = GridGeometry::new([4, 4, 4], origin, Spacing3::uniform(1.0), Direction3::zeros());
        assert!(singular.is_err());
    }

    #[test]
    fn test_offsets_run_x_fastest() {
        let geometry = GridGeometry::<3>::with_size([4, 3, 2]).unwrap();
        assert_eq!(geometry.num_voxels(), 24);
        assert_eq!(geometry.strides(), [1, 4, 12]);
        assert_eq!(geometry.tensor_shape(), [2, 3, 4]);
        assert_eq!(geometry.index_to_offset(&[1, 2, 1]), 1 + 8 + 12);
        assert_eq!(geometry.offset_to_index(21), [1, 2, 1]);
    }

    #[test]
    fn test_physical_mapping_with_spacing_and_origin() {
        let geometry = GridGeometry::new(
            [10, 10, 10],
            Point3::new([10.0, 20.0, 30.0]),
            Spacing3::new([2.0, 2.0, 2.0]),
            Direction3::identity(),
        )
        .unwrap();

        let point = geometry.index_to_physical(&[1, 2, 3]);
        assert_eq!(point, Point3::new([12.0, 24.0, 36.0]));

        let index = geometry.physical_to_continuous_index(&Point3::new([15.0, 25.0, 35.0]));
        assert!((index[0] - 2.5).abs() < 1e-12);
        assert!((index[1] - 2.5).abs() < 1e-12);
        assert!((index[2] - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_geometry() {
        // 90 degrees about z: index x runs along physical y.
        let direction = Direction3::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let geometry = GridGeometry::new([10, 10, 10], Point3::origin(), Spacing3::uniform(1.0), direction).unwrap();

        let index = geometry.physical_to_continuous_index(&Point3::new([1.0, 0.0, 0.0]));
        assert!((index[0] - 0.0).abs() < 1e-12);
        assert!((index[1] + 1.0).abs() < 1e-12);
        assert!((index[2] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_congruence() {
        let a = GridGeometry::<2>::with_size([5, 5]).unwrap();
        let b = a.with_origin(Point::new([1e-9, 0.0]));
        let c = a.with_origin(Point::new([1.0, 0.0]));
        assert!(a.is_congruent(&b, 1e-6));
        assert!(!a.is_congruent(&c, 1e-6));
    }
}

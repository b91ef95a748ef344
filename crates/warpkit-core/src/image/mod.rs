//! Image types and grid geometry.

pub mod geometry;
pub mod grid;
pub mod image;
pub mod multi_component;

pub use geometry::GridGeometry;
pub use image::Image;
pub use multi_component::{MultiComponentImage, PixelType, TENSOR_COMPONENTS};

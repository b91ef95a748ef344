pub mod error;
pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;
pub mod filter;

pub use error::{Result, WarpError};
pub use image::{GridGeometry, Image, MultiComponentImage, PixelType};
pub use spatial::{Point, Vector, Spacing, Direction};
pub use transform::{Transform, TransformStack};
pub use interpolation::{Interpolator, InterpolatorKind, WindowFunction};

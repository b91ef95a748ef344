//! Image filters: resampling, direction correction, component handling and
//! displacement field generation.

pub mod resample;
pub mod reorient;
pub mod components;
pub mod displacement;

pub use resample::{map_grid_points, ResampleImageFilter};
pub use reorient::{direction_correction, reorient_to_reference};
pub use components::{assemble_components, split_components};
pub use displacement::TransformToDisplacementField;

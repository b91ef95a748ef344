pub mod config;
pub mod input;
pub mod pipeline;

pub use config::{ApplyTransformsConfig, InputImageType, OutputMode};
pub use input::{InputImage, TransformEntry};
pub use pipeline::{apply_transforms, ApplyOutput, ApplyTransforms};

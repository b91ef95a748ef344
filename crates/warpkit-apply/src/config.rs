//! Typed options for applying transforms.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use warpkit_core::filter::resample::DEFAULT_CHUNK_SIZE;
use warpkit_core::{InterpolatorKind, PixelType, Result, WarpError};

/// Kind of voxel value carried by the moving image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputImageType {
    #[default]
    Scalar,
    Vector,
    Tensor,
}

impl InputImageType {
    pub fn pixel_type(&self) -> PixelType {
        match self {
            Self::Scalar => PixelType::Scalar,
            Self::Vector => PixelType::Vector,
            Self::Tensor => PixelType::SymmetricTensor,
        }
    }
}

impl From<PixelType> for InputImageType {
    fn from(pixel_type: PixelType) -> Self {
        match pixel_type {
            PixelType::Scalar => Self::Scalar,
            PixelType::Vector => Self::Vector,
            PixelType::SymmetricTensor => Self::Tensor,
        }
    }
}

impl fmt::Display for InputImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "scalar",
            Self::Vector => "vector",
            Self::Tensor => "tensor",
        };
        f.write_str(name)
    }
}

/// Accepts `scalar`, `vector`, `tensor` or their codes `0`, `1`, `2`.
impl FromStr for InputImageType {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "0" => Ok(Self::Scalar),
            "vector" | "1" => Ok(Self::Vector),
            "tensor" | "2" => Ok(Self::Tensor),
            other => Err(WarpError::invalid_configuration(format!(
                "unknown input image type '{}'",
                other
            ))),
        }
    }
}

/// What the pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    /// The moving image resampled onto the reference grid.
    #[default]
    WarpedImage,
    /// The composite transform sampled as a displacement field on the
    /// reference grid.
    DisplacementField,
}

/// Configuration for applying transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyTransformsConfig {
    /// Spatial dimensionality of the images (2, 3 or 4)
    pub dimensionality: usize,
    /// Kind of voxel value in the moving image
    pub input_type: InputImageType,
    /// Interpolation kernel
    pub interpolation: InterpolatorKind,
    /// Value written where the mapped point falls outside the moving image
    pub default_value: f64,
    pub output_mode: OutputMode,
    /// Points per tensor batch when mapping the reference grid
    pub chunk_size: usize,
}

impl Default for ApplyTransformsConfig {
    fn default() -> Self {
        Self {
            dimensionality: 3,
            input_type: InputImageType::Scalar,
            interpolation: InterpolatorKind::Linear,
            default_value: 0.0,
            output_mode: OutputMode::WarpedImage,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ApplyTransformsConfig {
    /// Create a configuration for images of the given dimensionality
    pub fn new(dimensionality: usize) -> Self {
        Self {
            dimensionality,
            ..Default::default()
        }
    }

    pub fn with_input_type(mut self, input_type: InputImageType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolatorKind) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_default_value(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validate the configuration for a pipeline of dimension `D`
    pub fn validate<const D: usize>(&self) -> Result<()> {
        if !(2..=4).contains(&self.dimensionality) {
            return Err(WarpError::UnsupportedDimension(self.dimensionality));
        }
        if self.dimensionality != D {
            return Err(WarpError::invalid_configuration(format!(
                "dimensionality {} requested for {}-D images",
                self.dimensionality, D
            )));
        }
        if self.input_type == InputImageType::Tensor && D != 3 {
            return Err(WarpError::UnsupportedDimension(D));
        }
        if self.chunk_size == 0 {
            return Err(WarpError::invalid_configuration("chunk size must be non-zero"));
        }
        self.interpolation.validate()
    }
}

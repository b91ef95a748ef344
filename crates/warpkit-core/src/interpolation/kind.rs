//! Interpolator selection and option parsing.
//!
//! [`InterpolatorKind`] is the closed set of kernels a caller can request. It
//! parses from the option syntax
//!
//! ```text
//! Linear | NearestNeighbor | BSpline[<order>] | Gaussian[<sigma>,<alpha>]
//! MultiLabel[<sigma>,<alpha>] | <Window>WindowedSinc
//! ```
//!
//! (names are case-insensitive, sigma may be given per axis as `1x1x2`) and
//! binds a fresh interpolator to one scalar image at a time.

use std::fmt;
use std::str::FromStr;
use burn::tensor::backend::Backend;
use serde::{Deserialize, Serialize};
use crate::error::{Result, WarpError};
use crate::image::Image;
use super::bspline::{BSplineInterpolator, DEFAULT_SPLINE_ORDER, MAX_SPLINE_ORDER};
use super::buffer::VoxelBuffer;
use super::gaussian::{GaussianInterpolator, DEFAULT_GAUSSIAN_ALPHA};
use super::label_gaussian::{LabelImageGaussianInterpolator, DEFAULT_LABEL_ALPHA};
use super::linear::LinearInterpolator;
use super::nearest::NearestNeighborInterpolator;
use super::trait_::Interpolator;
use super::windowed_sinc::{WindowFunction, WindowedSincInterpolator};

/// Interpolation kernel selection.
///
/// An empty `sigma` means "use the image spacing"; a sigma with fewer entries
/// than the image dimension is broadcast from its first entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum InterpolatorKind {
    #[default]
    Linear,
    NearestNeighbor,
    BSpline { order: usize },
    Gaussian { sigma: Vec<f64>, alpha: f64 },
    MultiLabel { sigma: Vec<f64>, alpha: f64 },
    WindowedSinc { window: WindowFunction },
}

impl InterpolatorKind {
    /// Cubic B-spline.
    pub fn bspline() -> Self {
        Self::BSpline {
            order: DEFAULT_SPLINE_ORDER,
        }
    }

    /// Gaussian with spacing-sized sigma and default alpha.
    pub fn gaussian() -> Self {
        Self::Gaussian {
            sigma: Vec::new(),
            alpha: DEFAULT_GAUSSIAN_ALPHA,
        }
    }

    /// Multi-label Gaussian with spacing-sized sigma and default alpha.
    pub fn multi_label() -> Self {
        Self::MultiLabel {
            sigma: Vec::new(),
            alpha: DEFAULT_LABEL_ALPHA,
        }
    }

    /// Check the kernel parameters without binding an image.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::BSpline { order } if *order > MAX_SPLINE_ORDER => Err(WarpError::invalid_configuration(
                format!("B-spline order must be between 0 and {}, got {}", MAX_SPLINE_ORDER, order),
            )),
            Self::Gaussian { sigma, alpha } | Self::MultiLabel { sigma, alpha } => {
                if sigma.iter().any(|s| !(*s > 0.0)) || !(*alpha > 0.0) {
                    Err(WarpError::invalid_configuration(format!(
                        "{} needs positive sigma and alpha",
                        self
                    )))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// Instantiate an interpolator bound to `image`.
    pub fn bind<B: Backend, const D: usize>(&self, image: &Image<B, D>) -> Result<Box<dyn Interpolator<D>>> {
        let buffer = VoxelBuffer::from_image(image);
        self.bind_buffer(buffer)
    }

    pub(crate) fn bind_buffer<const D: usize>(&self, buffer: VoxelBuffer<D>) -> Result<Box<dyn Interpolator<D>>> {
        let interpolator: Box<dyn Interpolator<D>> = match self {
            Self::Linear => Box::new(LinearInterpolator::new(buffer)),
            Self::NearestNeighbor => Box::new(NearestNeighborInterpolator::new(buffer)),
            Self::BSpline { order } => Box::new(BSplineInterpolator::new(buffer, *order)?),
            Self::Gaussian { sigma, alpha } => {
                let sigma = resolve_sigma(sigma, &buffer);
                Box::new(GaussianInterpolator::new(buffer, sigma, *alpha)?)
            }
            Self::MultiLabel { sigma, alpha } => {
                let sigma = resolve_sigma(sigma, &buffer);
                Box::new(LabelImageGaussianInterpolator::new(buffer, sigma, *alpha)?)
            }
            Self::WindowedSinc { window } => Box::new(WindowedSincInterpolator::new(buffer, *window)),
        };
        Ok(interpolator)
    }
}

fn resolve_sigma<const D: usize>(sigma: &[f64], buffer: &VoxelBuffer<D>) -> [f64; D] {
    if sigma.is_empty() {
        buffer.geometry().spacing().to_array()
    } else if sigma.len() == D {
        let mut resolved = [0.0; D];
        resolved.copy_from_slice(sigma);
        resolved
    } else {
        [sigma[0]; D]
    }
}

fn format_sigma(sigma: &[f64]) -> String {
    sigma.iter().map(|s| s.to_string()).collect::<Vec<_>>().join("x")
}

impl fmt::Display for InterpolatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::NearestNeighbor => write!(f, "NearestNeighbor"),
            Self::BSpline { order } => write!(f, "BSpline[{}]", order),
            Self::Gaussian { sigma, alpha } if sigma.is_empty() => write!(f, "Gaussian[,{}]", alpha),
            Self::Gaussian { sigma, alpha } => write!(f, "Gaussian[{},{}]", format_sigma(sigma), alpha),
            Self::MultiLabel { sigma, alpha } if sigma.is_empty() => write!(f, "MultiLabel[,{}]", alpha),
            Self::MultiLabel { sigma, alpha } => write!(f, "MultiLabel[{},{}]", format_sigma(sigma), alpha),
            Self::WindowedSinc { window } => write!(f, "{}WindowedSinc", window),
        }
    }
}

fn parse_number<T: FromStr>(option: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        WarpError::invalid_configuration(format!("bad parameter '{}' in interpolation option '{}'", value, option))
    })
}

fn parse_sigma(option: &str, value: &str) -> Result<Vec<f64>> {
    value.split('x').map(|s| parse_number(option, s)).collect()
}

impl FromStr for InterpolatorKind {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self> {
        let option = s.trim();
        let (name, params) = match option.find('[') {
            Some(open) => {
                let inner = option[open + 1..].strip_suffix(']').ok_or_else(|| {
                    WarpError::invalid_configuration(format!("unterminated parameters in '{}'", option))
                })?;
                let params: Vec<&str> = if inner.trim().is_empty() {
                    Vec::new()
                } else {
                    inner.split(',').map(str::trim).collect()
                };
                (option[..open].trim(), params)
            }
            None => (option, Vec::new()),
        };
        let lower = name.to_ascii_lowercase();

        let max_params = match lower.as_str() {
            "bspline" => 1,
            "gaussian" | "multilabel" => 2,
            _ => 0,
        };
        if params.len() > max_params {
            return Err(WarpError::invalid_configuration(format!(
                "too many parameters in interpolation option '{}'",
                option
            )));
        }
        // Empty positions fall back to the default.
        let param = |i: usize| params.get(i).copied().filter(|p| !p.is_empty());

        match lower.as_str() {
            "linear" => Ok(Self::Linear),
            "nearestneighbor" => Ok(Self::NearestNeighbor),
            "bspline" => {
                let order = match param(0) {
                    Some(p) => parse_number(option, p)?,
                    None => DEFAULT_SPLINE_ORDER,
                };
                Ok(Self::BSpline { order })
            }
            "gaussian" | "multilabel" => {
                let sigma = match param(0) {
                    Some(p) => parse_sigma(option, p)?,
                    None => Vec::new(),
                };
                let default_alpha = if lower == "gaussian" {
                    DEFAULT_GAUSSIAN_ALPHA
                } else {
                    DEFAULT_LABEL_ALPHA
                };
                let alpha = match param(1) {
                    Some(p) => parse_number(option, p)?,
                    None => default_alpha,
                };
                if lower == "gaussian" {
                    Ok(Self::Gaussian { sigma, alpha })
                } else {
                    Ok(Self::MultiLabel { sigma, alpha })
                }
            }
            other => {
                let window = other
                    .strip_suffix("windowedsinc")
                    .and_then(|w| w.parse::<WindowFunction>().ok())
                    .ok_or_else(|| WarpError::UnknownInterpolator(name.to_string()))?;
                Ok(Self::WindowedSinc { window })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GridGeometry;
    use crate::spatial::{Direction, Point, Spacing};

    #[test]
    fn test_parse_simple_names() {
        assert_eq!("Linear".parse::<InterpolatorKind>().unwrap(), InterpolatorKind::Linear);
        assert_eq!(
            "nearestNeighbor".parse::<InterpolatorKind>().unwrap(),
            InterpolatorKind::NearestNeighbor
        );
        assert_eq!("BSpline".parse::<InterpolatorKind>().unwrap(), InterpolatorKind::bspline());
        assert_eq!(
            "bspline[5]".parse::<InterpolatorKind>().unwrap(),
            InterpolatorKind::BSpline { order: 5 }
        );
        assert_eq!(
            "LanczosWindowedSinc".parse::<InterpolatorKind>().unwrap(),
            InterpolatorKind::WindowedSinc {
                window: WindowFunction::Lanczos
            }
        );
    }

    #[test]
    fn test_parse_gaussian_parameters() {
        assert_eq!("Gaussian".parse::<InterpolatorKind>().unwrap(), InterpolatorKind::gaussian());
        assert_eq!(
            "Gaussian[1x1x2,0.5]".parse::<InterpolatorKind>().unwrap(),
            InterpolatorKind::Gaussian {
                sigma: vec![1.0, 1.0, 2.0],
                alpha: 0.5
            }
        );
        assert_eq!(
            "MultiLabel[0.3]".parse::<InterpolatorKind>().unwrap(),
            InterpolatorKind::MultiLabel {
                sigma: vec![0.3],
                alpha: DEFAULT_LABEL_ALPHA
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = "Cubic".parse::<InterpolatorKind>().unwrap_err();
        assert!(matches!(err, WarpError::UnknownInterpolator(_)));

        let err = "KaiserWindowedSinc".parse::<InterpolatorKind>().unwrap_err();
        assert!(matches!(err, WarpError::UnknownInterpolator(_)));

        assert!("BSpline[three]".parse::<InterpolatorKind>().is_err());
        assert!("Gaussian[1,2,3]".parse::<InterpolatorKind>().is_err());
        assert!("BSpline[3".parse::<InterpolatorKind>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for kind in [
            InterpolatorKind::Linear,
            InterpolatorKind::BSpline { order: 2 },
            InterpolatorKind::Gaussian {
                sigma: vec![1.0, 2.5],
                alpha: 3.0,
            },
            InterpolatorKind::multi_label(),
            InterpolatorKind::Gaussian {
                sigma: Vec::new(),
                alpha: 2.0,
            },
            InterpolatorKind::WindowedSinc {
                window: WindowFunction::Welch,
            },
        ] {
            assert_eq!(kind.to_string().parse::<InterpolatorKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_sigma_resolution() {
        let geometry = GridGeometry::new(
            [4, 4, 4],
            Point::origin(),
            Spacing::new([1.0, 2.0, 3.0]),
            Direction::identity(),
        )
        .unwrap();
        let buffer = VoxelBuffer::from_values(geometry, vec![0.0; 64]);

        assert_eq!(resolve_sigma(&[], &buffer), [1.0, 2.0, 3.0]);
        assert_eq!(resolve_sigma(&[0.5], &buffer), [0.5, 0.5, 0.5]);
        assert_eq!(resolve_sigma(&[0.5, 0.6, 0.7], &buffer), [0.5, 0.6, 0.7]);
    }

    #[test]
    fn test_bind_names() {
        let geometry = GridGeometry::with_size([8, 8]).unwrap();
        let buffer = VoxelBuffer::from_values(geometry, vec![1.0; 64]);
        for (kind, name) in [
            (InterpolatorKind::Linear, "Linear"),
            (InterpolatorKind::bspline(), "BSpline"),
            (InterpolatorKind::gaussian(), "Gaussian"),
            (
                InterpolatorKind::WindowedSinc {
                    window: WindowFunction::Cosine,
                },
                "CosineWindowedSinc",
            ),
        ] {
            assert_eq!(kind.bind_buffer(buffer.clone()).unwrap().name(), name);
        }
        assert!(InterpolatorKind::BSpline { order: 9 }.bind_buffer(buffer).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(InterpolatorKind::bspline().validate().is_ok());
        assert!(InterpolatorKind::BSpline { order: 6 }.validate().is_err());
        assert!(InterpolatorKind::Gaussian {
            sigma: vec![1.0, -1.0],
            alpha: 1.0
        }
        .validate()
        .is_err());
        assert!(InterpolatorKind::MultiLabel {
            sigma: Vec::new(),
            alpha: 0.0
        }
        .validate()
        .is_err());
    }
}

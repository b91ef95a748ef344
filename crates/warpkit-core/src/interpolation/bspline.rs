//! B-Spline interpolation implementation.
//!
//! Samples are first converted to B-spline coefficients by a recursive
//! causal/anti-causal prefilter along every axis (mirror boundary). The value
//! at a continuous index is then `Σ c[k] · βⁿ(x - k)` over the `n + 1` taps
//! per axis that the kernel support covers.

use rayon::prelude::*;
use crate::error::{Result, WarpError};
use crate::spatial::Point;
use super::buffer::VoxelBuffer;
use super::trait_::Interpolator;

/// Highest supported spline order.
pub const MAX_SPLINE_ORDER: usize = 5;

/// Spline order used when none is given.
pub const DEFAULT_SPLINE_ORDER: usize = 3;

const PREFILTER_TOLERANCE: f64 = 1e-10;

/// Poles of the discrete B-spline filter of order `order`.
fn poles(order: usize) -> Vec<f64> {
    match order {
        2 => vec![8.0f64.sqrt() - 3.0],
        3 => vec![3.0f64.sqrt() - 2.0],
        4 => vec![
            (664.0 - 438976.0f64.sqrt()).sqrt() + 304.0f64.sqrt() - 19.0,
            (664.0 + 438976.0f64.sqrt()).sqrt() - 304.0f64.sqrt() - 19.0,
        ],
        5 => vec![
            (135.0 / 2.0 - (17745.0f64 / 4.0).sqrt()).sqrt() + (105.0f64 / 4.0).sqrt() - 13.0 / 2.0,
            (135.0 / 2.0 + (17745.0f64 / 4.0).sqrt()).sqrt() - (105.0f64 / 4.0).sqrt() - 13.0 / 2.0,
        ],
        _ => Vec::new(),
    }
}

/// Centered B-spline basis function of the given order.
fn bspline_weight(order: usize, x: f64) -> f64 {
    let ax = x.abs();
    match order {
        // Half-open so exactly one tap covers a half-voxel position.
        0 => {
            if (-0.5..0.5).contains(&x) {
                1.0
            } else {
                0.0
            }
        }
        1 => (1.0 - ax).max(0.0),
        2 => {
            if ax < 0.5 {
                0.75 - ax * ax
            } else if ax < 1.5 {
                let t = 1.5 - ax;
                0.5 * t * t
            } else {
                0.0
            }
        }
        3 => {
            if ax < 1.0 {
                2.0 / 3.0 - ax * ax + 0.5 * ax * ax * ax
            } else if ax < 2.0 {
                let t = 2.0 - ax;
                t * t * t / 6.0
            } else {
                0.0
            }
        }
        4 => {
            if ax < 0.5 {
                let x2 = ax * ax;
                115.0 / 192.0 + x2 * (-5.0 / 8.0 + x2 / 4.0)
            } else if ax < 1.5 {
                55.0 / 96.0 + ax * (5.0 / 24.0 + ax * (-5.0 / 4.0 + ax * (5.0 / 6.0 - ax / 6.0)))
            } else if ax < 2.5 {
                let t = 2.5 - ax;
                t.powi(4) / 24.0
            } else {
                0.0
            }
        }
        5 => {
            if ax < 1.0 {
                let x2 = ax * ax;
                11.0 / 20.0 + x2 * (-0.5 + x2 / 4.0) - x2 * x2 * ax / 12.0
            } else if ax < 2.0 {
                17.0 / 40.0
                    + ax * (5.0 / 8.0 + ax * (-7.0 / 4.0 + ax * (5.0 / 4.0 + ax * (-3.0 / 8.0 + ax / 24.0))))
            } else if ax < 3.0 {
                let t = 3.0 - ax;
                t.powi(5) / 120.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Mirror an index into `[0, len)` with period `2 * len - 2`.
fn mirror(index: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * len as i64 - 2;
    let i = index.rem_euclid(period);
    if i >= len as i64 {
        (period - i) as usize
    } else {
        i as usize
    }
}

fn initial_causal(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    let horizon = (PREFILTER_TOLERANCE.ln() / z.abs().ln()).ceil() as usize;
    if horizon < n {
        let mut zn = z;
        let mut sum = c[0];
        for value in &c[1..horizon] {
            sum += zn * value;
            zn *= z;
        }
        sum
    } else {
        let iz = 1.0 / z;
        let mut zn = z;
        let mut z2n = z.powi(n as i32 - 1);
        let mut sum = c[0] + z2n * c[n - 1];
        z2n *= z2n * iz;
        for value in &c[1..n - 1] {
            sum += (zn + z2n) * value;
            zn *= z;
            z2n *= iz;
        }
        sum / (1.0 - zn * zn)
    }
}

fn initial_anticausal(c: &[f64], z: f64) -> f64 {
    let n = c.len();
    (z / (z * z - 1.0)) * (z * c[n - 2] + c[n - 1])
}

/// Convert one line of samples to spline coefficients in place.
fn prefilter_line(line: &mut [f64], poles: &[f64]) {
    let n = line.len();
    if n < 2 || poles.is_empty() {
        return;
    }
    let gain: f64 = poles.iter().map(|z| (1.0 - z) * (1.0 - 1.0 / z)).product();
    line.iter_mut().for_each(|v| *v *= gain);

    for &z in poles {
        line[0] = initial_causal(line, z);
        for k in 1..n {
            line[k] += z * line[k - 1];
        }
        line[n - 1] = initial_anticausal(line, z);
        for k in (0..n - 1).rev() {
            line[k] = z * (line[k + 1] - line[k]);
        }
    }
}

/// Run the prefilter along every axis of a buffer.
fn compute_coefficients<const D: usize>(buffer: &VoxelBuffer<D>, order: usize) -> Vec<f64> {
    let mut coefficients = buffer.values().to_vec();
    let poles = poles(order);
    if poles.is_empty() {
        return coefficients;
    }

    let size = buffer.size();
    let strides = *buffer.strides();
    for axis in 0..D {
        let len = size[axis];
        if len < 2 {
            continue;
        }
        let stride = strides[axis];
        let starts: Vec<usize> = (0..coefficients.len())
            .filter(|offset| (offset / stride) % len == 0)
            .collect();

        let filtered: Vec<Vec<f64>> = starts
            .par_iter()
            .map(|&start| {
                let mut line: Vec<f64> = (0..len).map(|k| coefficients[start + k * stride]).collect();
                prefilter_line(&mut line, &poles);
                line
            })
            .collect();

        for (start, line) in starts.into_iter().zip(filtered) {
            for (k, value) in line.into_iter().enumerate() {
                coefficients[start + k * stride] = value;
            }
        }
    }
    coefficients
}

/// B-Spline interpolator of order 0 to 5.
#[derive(Debug, Clone)]
pub struct BSplineInterpolator<const D: usize> {
    buffer: VoxelBuffer<D>,
    coefficients: Vec<f64>,
    order: usize,
}

impl<const D: usize> BSplineInterpolator<D> {
    /// Create a B-Spline interpolator, prefiltering the buffer once.
    pub fn new(buffer: VoxelBuffer<D>, order: usize) -> Result<Self> {
        if order > MAX_SPLINE_ORDER {
            return Err(WarpError::invalid_configuration(format!(
                "B-spline order must be between 0 and {}, got {}",
                MAX_SPLINE_ORDER, order
            )));
        }
        let coefficients = compute_coefficients(&buffer, order);
        Ok(Self {
            buffer,
            coefficients,
            order,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Mirrored tap indices and weights along one axis.
    fn axis_taps(&self, axis: usize, c: f64) -> Vec<(usize, f64)> {
        let len = self.buffer.size()[axis];
        let half = (self.order / 2) as i64;
        let start = if self.order % 2 == 1 {
            c.floor() as i64 - half
        } else {
            (c + 0.5).floor() as i64 - half
        };
        (start..=start + self.order as i64)
            .map(|k| (mirror(k, len), bspline_weight(self.order, c - k as f64)))
            .collect()
    }
}

impl<const D: usize> Interpolator<D> for BSplineInterpolator<D> {
    fn name(&self) -> &'static str {
        "BSpline"
    }

    fn buffer(&self) -> &VoxelBuffer<D> {
        &self.buffer
    }

    /// Orders 0 and 1 reduce to nearest and linear and share their domain.
    fn support_margin(&self) -> f64 {
        if self.order < 2 {
            0.0
        } else {
            ((self.order + 1) / 2) as f64
        }
    }

    fn evaluate_at_continuous_index(&self, index: &Point<D>) -> f64 {
        let taps: Vec<Vec<(usize, f64)>> = (0..D).map(|a| self.axis_taps(a, index[a])).collect();
        let strides = self.buffer.strides();
        let width = self.order + 1;

        let mut value = 0.0;
        let mut cursor = [0usize; D];
        loop {
            let mut weight = 1.0;
            let mut offset = 0;
            for a in 0..D {
                let (i, w) = taps[a][cursor[a]];
                weight *= w;
                offset += i * strides[a];
            }
            value += weight * self.coefficients[offset];

            // Odometer over the (order + 1)^D taps.
            let mut axis = 0;
            loop {
                if axis == D {
                    return value;
                }
                cursor[axis] += 1;
                if cursor[axis] < width {
                    break;
                }
                cursor[axis] = 0;
                axis += 1;
            }
        }
    }
}

// src/encode/haar/quant.rs

//! Uniform scalar quantization of wavelet coefficients.
//!
//! The LL band (top-left `h >> levels` by `w >> levels`) is stored as the
//! rounded coefficient itself instead of `coef / step`, and dequantization
//! reads it back unscaled. The two overrides must stay paired.

use super::transform::ll_dimensions;
use crate::utils::error::{HaarRiceError, Result};
use crate::utils::matrix::Matrix;

/// Rejects steps that are not finite and strictly positive.
pub fn check_step(step: f32) -> Result<()> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(HaarRiceError::InvalidParameter(format!(
            "quantization step must be positive, got {}",
            step
        )))
    }
}

/// Rounds half to even; levels outside `i32` cannot be stored.
#[inline]
fn to_level(v: f64) -> Result<i32> {
    let level = v.round_ties_even();
    if level.is_finite() && (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&level) {
        Ok(level as i32)
    } else {
        Err(HaarRiceError::InvalidParameter(format!(
            "quantization step too small for coefficient range ({} does not fit in 32 bits)",
            v
        )))
    }
}

/// `round(coef / step)` everywhere, `round(coef)` inside the LL band.
pub fn quantize(coefs: &Matrix<f64>, step: f32, levels: u8) -> Result<Matrix<i32>> {
    check_step(step)?;
    let step = f64::from(step);

    let (ll_h, ll_w) = ll_dimensions(coefs.height(), coefs.width(), levels);
    let mut out = Vec::with_capacity(coefs.len());
    for i in 0..coefs.height() {
        for (j, &c) in coefs.row(i).iter().enumerate() {
            let v = if i < ll_h && j < ll_w { c } else { c / step };
            out.push(to_level(v)?);
        }
    }
    Matrix::from_vec(coefs.height(), coefs.width(), out)
}

/// `q * step` everywhere, `q` unscaled inside the LL band.
pub fn dequantize(q: &Matrix<i32>, step: f32, levels: u8) -> Result<Matrix<f64>> {
    check_step(step)?;
    let step = f64::from(step);

    let mut f = q.map(|v| f64::from(v) * step);
    let (ll_h, ll_w) = ll_dimensions(q.height(), q.width(), levels);
    for i in 0..ll_h {
        for j in 0..ll_w {
            f[(i, j)] = f64::from(q[(i, j)]);
        }
    }
    Ok(f)
}

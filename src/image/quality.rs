// src/image/quality.rs

//! Reconstruction quality metrics over 8-bit planes.

use crate::utils::error::{HaarRiceError, Result};
use crate::utils::matrix::Matrix;

fn check_shapes(a: &Matrix<u8>, b: &Matrix<u8>) -> Result<()> {
    if a.shape() != b.shape() || a.is_empty() {
        return Err(HaarRiceError::InvalidParameter(format!(
            "cannot compare {:?} with {:?}",
            a.shape(),
            b.shape()
        )));
    }
    Ok(())
}

pub fn mean_abs_diff(a: &Matrix<u8>, b: &Matrix<u8>) -> Result<f64> {
    check_shapes(a, b)?;
    let total: u64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum();
    Ok(total as f64 / a.len() as f64)
}

pub fn mse(a: &Matrix<u8>, b: &Matrix<u8>) -> Result<f64> {
    check_shapes(a, b)?;
    let total: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    Ok(total / a.len() as f64)
}

/// Peak signal-to-noise ratio in dB; infinite for identical planes.
pub fn psnr(a: &Matrix<u8>, b: &Matrix<u8>) -> Result<f64> {
    let mse = mse(a, b)?;
    if mse == 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(20.0 * (255.0 / mse.sqrt()).log10())
}

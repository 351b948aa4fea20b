// src/encode/haar/transform.rs

//! Multilevel 2D Haar decomposition.
//!
//! Each level runs the 1D step over the rows and then the columns of the
//! top-left `sh x sw` region, where `sh = h >> lev` and `sw = w >> lev`.
//! Only the previous level's approximation quadrant is decomposed again, so
//! the result is the usual pyramid layout with the LL band at the origin.

use crate::utils::error::{HaarRiceError, Result};
use crate::utils::matrix::Matrix;

/// Checks that `height x width` can be halved `levels` times.
pub fn check_dimensions(height: usize, width: usize, levels: u8) -> Result<()> {
    let invalid = HaarRiceError::InvalidDimension {
        height,
        width,
        levels,
    };
    if height == 0 || width == 0 || u32::from(levels) >= usize::BITS {
        return Err(invalid);
    }
    let mask = (1usize << levels) - 1;
    if height & mask != 0 || width & mask != 0 {
        return Err(invalid);
    }
    Ok(())
}

/// Shape of the LL band left after `levels` decompositions.
#[inline]
pub fn ll_dimensions(height: usize, width: usize, levels: u8) -> (usize, usize) {
    (height >> levels, width >> levels)
}

/// Forward 1D step: pair averages into the first half of `dst`, pair
/// half-differences into the second half.
pub fn haar_step(src: &[f64], dst: &mut [f64]) {
    debug_assert!(src.len() % 2 == 0 && src.len() == dst.len());
    let half = src.len() / 2;
    let (avg, diff) = dst.split_at_mut(half);
    for (i, pair) in src.chunks_exact(2).enumerate() {
        avg[i] = (pair[0] + pair[1]) / 2.0;
        diff[i] = (pair[0] - pair[1]) / 2.0;
    }
}

/// Inverse 1D step: `s0 = a + d`, `s1 = a - d`, interleaved.
pub fn haar_unstep(src: &[f64], dst: &mut [f64]) {
    debug_assert!(src.len() % 2 == 0 && src.len() == dst.len());
    let half = src.len() / 2;
    let (avg, diff) = src.split_at(half);
    for (i, pair) in dst.chunks_exact_mut(2).enumerate() {
        pair[0] = avg[i] + diff[i];
        pair[1] = avg[i] - diff[i];
    }
}

fn transform_rows(
    arr: &mut Matrix<f64>,
    sh: usize,
    sw: usize,
    scratch: &mut [f64],
    step: fn(&[f64], &mut [f64]),
) {
    let scratch = &mut scratch[..sw];
    for i in 0..sh {
        let row = &mut arr.row_mut(i)[..sw];
        step(row, scratch);
        row.copy_from_slice(scratch);
    }
}

fn transform_cols(
    arr: &mut Matrix<f64>,
    sh: usize,
    sw: usize,
    scratch: &mut [f64],
    step: fn(&[f64], &mut [f64]),
) {
    let mut column = vec![0.0; sh];
    let scratch = &mut scratch[..sh];
    for j in 0..sw {
        for (i, v) in column.iter_mut().enumerate() {
            *v = arr[(i, j)];
        }
        step(&column, scratch);
        for (i, &v) in scratch.iter().enumerate() {
            arr[(i, j)] = v;
        }
    }
}

/// Forward transform of `input` with `levels` decompositions.
pub fn forward(input: &Matrix<f64>, levels: u8) -> Result<Matrix<f64>> {
    let (h, w) = input.shape();
    check_dimensions(h, w, levels)?;

    let mut arr = input.clone();
    let mut scratch = vec![0.0; h.max(w)];
    for lev in 0..levels {
        let sh = h >> lev;
        let sw = w >> lev;
        transform_rows(&mut arr, sh, sw, &mut scratch, haar_step);
        transform_cols(&mut arr, sh, sw, &mut scratch, haar_step);
    }
    Ok(arr)
}

/// Inverse of [`forward`]: levels in reverse, columns before rows.
pub fn inverse(coefs: &Matrix<f64>, levels: u8) -> Result<Matrix<f64>> {
    let (h, w) = coefs.shape();
    check_dimensions(h, w, levels)?;

    let mut arr = coefs.clone();
    let mut scratch = vec![0.0; h.max(w)];
    for lev in (0..levels).rev() {
        let sh = h >> lev;
        let sw = w >> lev;
        transform_cols(&mut arr, sh, sw, &mut scratch, haar_unstep);
        transform_rows(&mut arr, sh, sw, &mut scratch, haar_unstep);
    }
    Ok(arr)
}

// src/utils/matrix.rs

//! Explicitly dimensioned, row-major, owned 2D buffers.
//!
//! Sample, coefficient and quantized planes are all `Matrix<T>` with a
//! different element type (`u8`, `f64`, `i32`). The shape travels with the
//! data so the transform and quantizer never have to infer it.

use crate::utils::error::{HaarRiceError, Result};
use std::ops::{Index, IndexMut};

/// A `height x width` grid stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    height: usize,
    width: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> Matrix<T> {
    /// Creates a matrix filled with `T::default()`.
    pub fn new(height: usize, width: usize) -> Self {
        Self::filled(height, width, T::default())
    }
}

impl<T: Copy> Matrix<T> {
    pub fn filled(height: usize, width: usize, value: T) -> Self {
        Self {
            height,
            width,
            data: vec![value; height * width],
        }
    }

    /// Wraps a row-major buffer. The buffer length must equal `height * width`.
    pub fn from_vec(height: usize, width: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != height * width {
            return Err(HaarRiceError::SampleCount {
                expected: height * width,
                actual: data.len(),
            });
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    /// Builds a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            height,
            width,
            data,
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.height && col < self.width {
            Some(self.data[row * self.width + col])
        } else {
            None
        }
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let start = row * self.width;
        &mut self.data[start..start + self.width]
    }

    /// Row-major view of every cell.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Applies `f` to every cell, keeping the shape.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Matrix<U> {
        Matrix {
            height: self.height,
            width: self.width,
            data: self.data.iter().copied().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.height && col < self.width);
        &self.data[row * self.width + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.height && col < self.width);
        &mut self.data[row * self.width + col]
    }
}

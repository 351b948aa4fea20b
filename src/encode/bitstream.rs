// src/encode/bitstream.rs

//! MSB-first bit packing for the Rice coder.
//!
//! The writer records the exact number of bits it produced; the reader is
//! told that number explicitly and never looks at the zero padding that
//! fills out the last byte.

use crate::utils::error::{HaarRiceError, Result};
use bitvec::prelude::*;
use thiserror::Error;

/// Returned by [`BitReader`] once every declared bit has been consumed.
///
/// This is how a block decoder learns that the block is over, so it is a
/// normal outcome rather than a codec failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("bit stream exhausted at bit {position}")]
pub struct Exhausted {
    pub position: usize,
}

/// Accumulates bits most-significant first.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Writes the low `count` bits of `value`, most significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32);
        debug_assert!(
            count == 32 || value >> count == 0,
            "value {:#x} does not fit in {} bits",
            value,
            count
        );
        for i in (0..count).rev() {
            self.bits.push((value >> i) & 1 == 1);
        }
    }

    /// Writes `q` one-bits followed by a terminating zero-bit.
    #[inline]
    pub fn write_unary(&mut self, q: u32) {
        let start = self.bits.len();
        self.bits.resize(start + q as usize, true);
        self.bits.push(false);
    }

    /// Number of bits written so far.
    #[inline]
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Returns the packed bytes and the exact bit length.
    ///
    /// A partial last byte is zero padded on its low end.
    pub fn finish(mut self) -> (Vec<u8>, usize) {
        let bit_length = self.bits.len();
        self.bits.set_uninitialized(false);
        (self.bits.into_vec(), bit_length)
    }
}

/// Reads back a bit sequence produced by [`BitWriter`].
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a reader over the first `bit_length` bits of `data`.
    pub fn new(data: &'a [u8], bit_length: usize) -> Result<Self> {
        let bits = data
            .view_bits::<Msb0>()
            .get(..bit_length)
            .ok_or(HaarRiceError::Truncated {
                context: "bit stream",
                needed: bit_length.div_ceil(8),
                available: data.len(),
            })?;
        Ok(Self { bits, pos: 0 })
    }

    #[inline]
    pub fn read_bit(&mut self) -> std::result::Result<bool, Exhausted> {
        if self.pos >= self.bits.len() {
            return Err(Exhausted { position: self.pos });
        }
        let bit = self.bits[self.pos];
        self.pos += 1;
        Ok(bit)
    }

    /// Reads `count` bits into the low end of a `u32`, most significant first.
    pub fn read_bits(&mut self, count: u8) -> std::result::Result<u32, Exhausted> {
        debug_assert!(count <= 32);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Counts one-bits up to the terminating zero-bit.
    pub fn read_unary(&mut self) -> std::result::Result<u32, Exhausted> {
        let mut q = 0u32;
        while self.read_bit()? {
            q += 1;
        }
        Ok(q)
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }
}

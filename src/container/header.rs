// src/container/header.rs

//! The fixed 23-byte container header.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "HR01"
//! 4       1     version
//! 5       4     height
//! 9       4     width
//! 13      1     level count
//! 14      1     channel count
//! 15      4     quantization step (f32)
//! 19      4     block size
//! ```
//!
//! All multi-byte fields are big-endian.

use crate::encode::haar::quant::check_step;
use crate::encode::haar::transform::check_dimensions;
use crate::utils::error::{HaarRiceError, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

/// Tag at offset 0 of every container.
pub const MAGIC: [u8; 4] = *b"HR01";

/// The only format revision this crate reads or writes.
pub const VERSION: u8 = 1;

/// Encoded size of [`Header`].
pub const HEADER_LEN: usize = 23;

/// Channel counts a container may declare: grayscale, or luma + two chroma.
pub const SUPPORTED_CHANNELS: [u8; 2] = [1, 3];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Header {
    pub version: u8,
    pub height: u32,
    pub width: u32,
    pub levels: u8,
    pub channels: u8,
    pub qstep: f32,
    pub block_size: u32,
}

impl Header {
    /// Checks everything the decoder relies on before touching a payload.
    pub fn validate(&self) -> Result<()> {
        if self.version != VERSION {
            return Err(HaarRiceError::UnsupportedVersion(self.version));
        }
        if !SUPPORTED_CHANNELS.contains(&self.channels) {
            return Err(HaarRiceError::UnsupportedChannelCount(self.channels as usize));
        }
        check_dimensions(self.height as usize, self.width as usize, self.levels)?;
        check_step(self.qstep)?;
        if self.block_size == 0 {
            return Err(HaarRiceError::InvalidParameter(
                "block size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of samples in one channel.
    #[inline]
    pub fn samples_per_channel(&self) -> usize {
        self.height as usize * self.width as usize
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_u8(self.version)?;
        writer.write_u32::<BigEndian>(self.height)?;
        writer.write_u32::<BigEndian>(self.width)?;
        writer.write_u8(self.levels)?;
        writer.write_u8(self.channels)?;
        writer.write_f32::<BigEndian>(self.qstep)?;
        writer.write_u32::<BigEndian>(self.block_size)?;
        Ok(())
    }

    /// Reads the header fields from the start of `bytes` and validates them.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(HaarRiceError::Truncated {
                context: "header",
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        }

        let mut cursor = Cursor::new(&bytes[..HEADER_LEN]);
        let mut magic = [0u8; 4];
        cursor.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(HaarRiceError::InvalidMagic {
                expected: MAGIC,
                found: magic,
            });
        }

        let header = Header {
            version: cursor.read_u8()?,
            height: cursor.read_u32::<BigEndian>()?,
            width: cursor.read_u32::<BigEndian>()?,
            levels: cursor.read_u8()?,
            channels: cursor.read_u8()?,
            qstep: cursor.read_f32::<BigEndian>()?,
            block_size: cursor.read_u32::<BigEndian>()?,
        };
        header.validate()?;
        Ok(header)
    }
}

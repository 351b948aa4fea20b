// src/utils/error.rs

use std::io;
use thiserror::Error;

/// Main error type for the Haar/Rice codec.
///
/// Every variant aborts the whole compress or decompress call; nothing is
/// returned alongside an error.
#[derive(Error, Debug)]
pub enum HaarRiceError {
    /// Height or width is zero or not divisible by `2^levels`.
    #[error("Invalid dimension: {height}x{width} is not divisible by 2^{levels}")]
    InvalidDimension {
        height: usize,
        width: usize,
        levels: u8,
    },
    /// The container does not start with the expected tag.
    #[error("Invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },
    /// The container was written by an unknown format revision.
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(u8),
    /// A length field declares more bytes than are available.
    #[error("Truncated container: {context} needs {needed} bytes, {available} available")]
    Truncated {
        context: &'static str,
        needed: usize,
        available: usize,
    },
    /// Only grayscale (1) and luma/chroma (3) containers exist.
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),
    /// A caller-supplied or header parameter is out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// A Rice block holds bits no encoder could have produced.
    #[error("Corrupt block: {0}")]
    CorruptBlock(String),
    /// A channel payload decoded to the wrong number of samples.
    #[error("Sample count mismatch: expected {expected}, decoded {actual}")]
    SampleCount { expected: usize, actual: usize },
    /// Bytes remain after the last channel payload.
    #[error("Trailing data: {0} bytes after the last channel")]
    TrailingData(usize),
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] ::image::ImageError),
}

/// A specialized `Result` type for Haar/Rice operations.
pub type Result<T> = std::result::Result<T, HaarRiceError>;

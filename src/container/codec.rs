// src/container/codec.rs

//! Per-channel pipeline and container framing.
//!
//! Encode: samples -> Haar forward -> quantize -> row-major blocks -> Rice.
//! Each channel payload is written as a 32-bit length plus its bytes, in
//! channel order (Y, or Y/Cb/Cr). Decode runs the same steps backwards.

use super::header::{HEADER_LEN, Header, SUPPORTED_CHANNELS, VERSION};
use crate::encode::haar::quant::{check_step, dequantize, quantize};
use crate::encode::haar::transform::{self, check_dimensions};
use crate::encode::rice;
use crate::utils::error::{HaarRiceError, Result};
use crate::utils::matrix::Matrix;
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use log::{debug, info};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Width of the length field in front of each channel payload.
pub const PAYLOAD_LEN_BYTES: usize = 4;

const CHANNEL_NAMES: [&str; 3] = ["Y", "Cb", "Cr"];

/// Encoder settings stored in the container header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressParams {
    /// Number of wavelet decompositions.
    pub levels: u8,
    /// Uniform quantization step for the detail bands.
    pub qstep: f32,
    /// Values per Rice block.
    pub block_size: u32,
}

impl Default for CompressParams {
    fn default() -> Self {
        Self {
            levels: 1,
            qstep: 10.0,
            block_size: 32,
        }
    }
}

impl CompressParams {
    pub fn validate(&self) -> Result<()> {
        check_step(self.qstep)?;
        if self.block_size == 0 {
            return Err(HaarRiceError::InvalidParameter(
                "block size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn channel_name(index: usize) -> &'static str {
    CHANNEL_NAMES.get(index).copied().unwrap_or("?")
}

fn encode_channel(index: usize, plane: &Matrix<u8>, params: &CompressParams) -> Result<Vec<u8>> {
    let coefs = transform::forward(&plane.map(f64::from), params.levels)?;
    let q = quantize(&coefs, params.qstep, params.levels)?;
    let payload = rice::encode_blocks(q.as_slice(), params.block_size as usize)?;
    debug!(
        "channel {}: {} samples -> {} payload bytes ({} blocks)",
        channel_name(index),
        q.len(),
        payload.len(),
        q.len().div_ceil(params.block_size as usize)
    );
    Ok(payload)
}

fn decode_channel(index: usize, payload: &[u8], header: &Header) -> Result<Matrix<u8>> {
    let blocks = rice::decode_blocks(payload)?;
    let block_count = blocks.len();
    let samples: Vec<i32> = blocks.into_iter().flatten().collect();

    let expected = header.samples_per_channel();
    if samples.len() != expected {
        return Err(HaarRiceError::SampleCount {
            expected,
            actual: samples.len(),
        });
    }
    debug!(
        "channel {}: {} payload bytes -> {} blocks",
        channel_name(index),
        payload.len(),
        block_count
    );

    let q = Matrix::from_vec(header.height as usize, header.width as usize, samples)?;
    let coefs = dequantize(&q, header.qstep, header.levels)?;
    let rec = transform::inverse(&coefs, header.levels)?;
    Ok(rec.map(|v| v.round_ties_even().clamp(0.0, 255.0) as u8))
}

#[cfg(not(feature = "rayon"))]
fn encode_channels(planes: &[Matrix<u8>], params: &CompressParams) -> Result<Vec<Vec<u8>>> {
    planes
        .iter()
        .enumerate()
        .map(|(i, plane)| encode_channel(i, plane, params))
        .collect()
}

#[cfg(feature = "rayon")]
fn encode_channels(planes: &[Matrix<u8>], params: &CompressParams) -> Result<Vec<Vec<u8>>> {
    planes
        .par_iter()
        .enumerate()
        .map(|(i, plane)| encode_channel(i, plane, params))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn decode_channels(payloads: &[&[u8]], header: &Header) -> Result<Vec<Matrix<u8>>> {
    payloads
        .iter()
        .enumerate()
        .map(|(i, payload)| decode_channel(i, payload, header))
        .collect()
}

#[cfg(feature = "rayon")]
fn decode_channels(payloads: &[&[u8]], header: &Header) -> Result<Vec<Matrix<u8>>> {
    payloads
        .par_iter()
        .enumerate()
        .map(|(i, payload)| decode_channel(i, payload, header))
        .collect()
}

/// Compresses one (grayscale) or three (Y, Cb, Cr) equally sized planes.
pub fn compress(planes: &[Matrix<u8>], params: &CompressParams) -> Result<Vec<u8>> {
    params.validate()?;
    let channels = u8::try_from(planes.len())
        .ok()
        .filter(|c| SUPPORTED_CHANNELS.contains(c))
        .ok_or(HaarRiceError::UnsupportedChannelCount(planes.len()))?;

    let (h, w) = planes[0].shape();
    if let Some(plane) = planes.iter().find(|p| p.shape() != (h, w)) {
        return Err(HaarRiceError::InvalidParameter(format!(
            "channel shapes differ: {}x{} vs {}x{}",
            h,
            w,
            plane.height(),
            plane.width()
        )));
    }
    check_dimensions(h, w, params.levels)?;

    let dim = |v: usize| {
        u32::try_from(v).map_err(|_| {
            HaarRiceError::InvalidParameter(format!("dimension {} exceeds 32 bits", v))
        })
    };
    let header = Header {
        version: VERSION,
        height: dim(h)?,
        width: dim(w)?,
        levels: params.levels,
        channels,
        qstep: params.qstep,
        block_size: params.block_size,
    };

    let payloads = encode_channels(planes, params)?;

    let body: usize = payloads.iter().map(|p| PAYLOAD_LEN_BYTES + p.len()).sum();
    let mut out = Vec::with_capacity(HEADER_LEN + body);
    header.write_to(&mut out)?;
    for payload in &payloads {
        let len = u32::try_from(payload.len()).map_err(|_| {
            HaarRiceError::InvalidParameter(format!(
                "channel payload of {} bytes exceeds the 32-bit length field",
                payload.len()
            ))
        })?;
        out.write_u32::<BigEndian>(len)?;
        out.extend_from_slice(payload);
    }

    info!(
        "compressed {}x{}x{} (levels={}, qstep={}, block_size={}) into {} bytes",
        h,
        w,
        channels,
        params.levels,
        params.qstep,
        params.block_size,
        out.len()
    );
    Ok(out)
}

/// Decodes a container back into its planes, in channel order.
pub fn decompress(bytes: &[u8]) -> Result<Vec<Matrix<u8>>> {
    let header = Header::parse(bytes)?;

    let mut pos = HEADER_LEN;
    let mut payloads = Vec::with_capacity(header.channels as usize);
    for _ in 0..header.channels {
        let available = bytes.len() - pos;
        if available < PAYLOAD_LEN_BYTES {
            return Err(HaarRiceError::Truncated {
                context: "payload length",
                needed: PAYLOAD_LEN_BYTES,
                available,
            });
        }
        let len = BigEndian::read_u32(&bytes[pos..]) as usize;
        pos += PAYLOAD_LEN_BYTES;

        let available = bytes.len() - pos;
        if len > available {
            return Err(HaarRiceError::Truncated {
                context: "channel payload",
                needed: len,
                available,
            });
        }
        payloads.push(&bytes[pos..pos + len]);
        pos += len;
    }
    if pos != bytes.len() {
        return Err(HaarRiceError::TrailingData(bytes.len() - pos));
    }

    let planes = decode_channels(&payloads, &header)?;
    info!(
        "decompressed {} bytes into {}x{}x{}",
        bytes.len(),
        header.height,
        header.width,
        header.channels
    );
    Ok(planes)
}

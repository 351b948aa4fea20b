// src/encode/rice.rs

//! Adaptive Rice (Golomb power-of-two) coding of integer blocks.
//!
//! Each block carries its own 4-bit parameter `m`, picked by an exact bit
//! count over the candidates `0..=8`. Values are zig-zag folded to unsigned,
//! then written as a unary quotient `u >> m` and an `m`-bit remainder.
//!
//! Inside a channel payload every block is framed as a 32-bit big-endian
//! bit length followed by `ceil(bit_length / 8)` bytes.

use super::bitstream::{BitReader, BitWriter};
use crate::utils::error::{HaarRiceError, Result};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use log::trace;

/// Candidate parameters, tested in this order. Ties keep the earlier one.
pub const M_CHOICES: [u8; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Width of the per-block parameter field.
pub const PARAM_BITS: u8 = 4;

/// Width of the bit-length field framing each block.
pub const BLOCK_LEN_BYTES: usize = 4;

/// Folds a signed value onto the non-negative integers: 0, -1, 1, -2, 2, ...
#[inline]
pub fn zigzag_encode(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

#[inline]
pub fn zigzag_decode(u: u32) -> i32 {
    ((u >> 1) as i32) ^ -((u & 1) as i32)
}

/// Exact number of bits `encode_block` would emit for `block` with parameter `m`.
pub fn estimate_bits(block: &[i32], m: u8) -> u64 {
    block.iter().fold(u64::from(PARAM_BITS), |bits, &n| {
        let u = zigzag_encode(n);
        bits + u64::from(u >> m) + 1 + u64::from(m)
    })
}

/// Picks the cheapest parameter for `block`, scanning [`M_CHOICES`] in order.
pub fn select_parameter(block: &[i32]) -> u8 {
    let mut best_m = M_CHOICES[0];
    let mut best_bits = u64::MAX;
    for &m in M_CHOICES.iter() {
        let bits = estimate_bits(block, m);
        if bits < best_bits {
            best_bits = bits;
            best_m = m;
        }
    }
    best_m
}

/// One Rice-coded block. `bit_length` is authoritative: bits past it in the
/// last byte are padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlock {
    pub bit_length: usize,
    pub bytes: Vec<u8>,
}

/// Encodes one block with its best parameter.
pub fn encode_block(block: &[i32]) -> EncodedBlock {
    let m = select_parameter(block);
    let mask = (1u32 << m) - 1;

    let mut writer = BitWriter::new();
    writer.write_bits(u32::from(m), PARAM_BITS);
    for &n in block {
        let u = zigzag_encode(n);
        writer.write_unary(u >> m);
        if m > 0 {
            writer.write_bits(u & mask, m);
        }
    }

    let (bytes, bit_length) = writer.finish();
    trace!("rice block: {} values, m={}, {} bits", block.len(), m, bit_length);
    EncodedBlock { bit_length, bytes }
}

/// Decodes the values of one block, stopping where its bit length ends.
pub fn decode_block(bytes: &[u8], bit_length: usize) -> Result<Vec<i32>> {
    let mut reader = BitReader::new(bytes, bit_length)?;

    let m = match reader.read_bits(PARAM_BITS) {
        Ok(m) => m,
        Err(_) => return Ok(Vec::new()),
    };
    if m > u32::from(M_CHOICES[M_CHOICES.len() - 1]) {
        return Err(HaarRiceError::CorruptBlock(format!(
            "parameter {} out of range",
            m
        )));
    }
    let m = m as u8;

    let mut values = Vec::new();
    loop {
        let Ok(q) = reader.read_unary() else { break };
        let r = if m > 0 {
            match reader.read_bits(m) {
                Ok(r) => r,
                Err(_) => break,
            }
        } else {
            0
        };
        if q > u32::MAX >> m {
            return Err(HaarRiceError::CorruptBlock(format!(
                "quotient {} overflows with m={}",
                q, m
            )));
        }
        values.push(zigzag_decode((q << m) | r));
    }
    Ok(values)
}

/// Rice-codes `samples` in chunks of `block_size` and frames the blocks.
pub fn encode_blocks(samples: &[i32], block_size: usize) -> Result<Vec<u8>> {
    if block_size == 0 {
        return Err(HaarRiceError::InvalidParameter(
            "block size must be positive".to_string(),
        ));
    }
    let mut out = Vec::new();
    for chunk in samples.chunks(block_size) {
        let block = encode_block(chunk);
        let bit_length = u32::try_from(block.bit_length).map_err(|_| {
            HaarRiceError::InvalidParameter(format!(
                "block of {} bits exceeds the 32-bit length field",
                block.bit_length
            ))
        })?;
        out.write_u32::<BigEndian>(bit_length)?;
        out.extend_from_slice(&block.bytes);
    }
    Ok(out)
}

/// Splits a channel payload into its blocks and decodes each one, in order.
pub fn decode_blocks(payload: &[u8]) -> Result<Vec<Vec<i32>>> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let available = payload.len() - pos;
        if available < BLOCK_LEN_BYTES {
            return Err(HaarRiceError::Truncated {
                context: "block length",
                needed: BLOCK_LEN_BYTES,
                available,
            });
        }
        let bit_length = BigEndian::read_u32(&payload[pos..]) as usize;
        pos += BLOCK_LEN_BYTES;

        let byte_len = bit_length.div_ceil(8);
        let available = payload.len() - pos;
        if byte_len > available {
            return Err(HaarRiceError::Truncated {
                context: "block body",
                needed: byte_len,
                available,
            });
        }
        blocks.push(decode_block(&payload[pos..pos + byte_len], bit_length)?);
        pos += byte_len;
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_mapping() {
        let expected = [(0, 0u32), (1, 2), (-1, 1), (2, 4), (-2, 3), (100, 200), (-100, 199)];
        for &(n, u) in &expected {
            assert_eq!(zigzag_encode(n), u, "zigzag({})", n);
            assert_eq!(zigzag_decode(u), n, "unzigzag({})", u);
        }
        for n in -1000..=1000 {
            assert_eq!(zigzag_decode(zigzag_encode(n)), n);
        }
        assert_eq!(zigzag_encode(i32::MAX), u32::MAX - 1);
        assert_eq!(zigzag_encode(i32::MIN), u32::MAX);
        assert_eq!(zigzag_decode(u32::MAX), i32::MIN);
    }

    #[test]
    fn test_estimate_bits() {
        // u = 6: m=0 -> 4 + 7, m=2 -> 4 + 2 + 2
        assert_eq!(estimate_bits(&[3], 0), 11);
        assert_eq!(estimate_bits(&[3], 2), 8);
        assert_eq!(estimate_bits(&[], 5), 4);
    }

    #[test]
    fn test_parameter_ties_prefer_smaller_m() {
        // m=2 and m=3 both cost 8 bits for u = 6.
        assert_eq!(estimate_bits(&[3], 3), 8);
        assert_eq!(select_parameter(&[3]), 2);
        // Every candidate costs 4 bits for an empty block.
        assert_eq!(select_parameter(&[]), 0);
        assert_eq!(select_parameter(&[0, 0, 0, 0]), 0);
    }

    #[test]
    fn test_large_values_pick_large_m() {
        let block = vec![300, -280, 255, 310];
        assert_eq!(select_parameter(&block), 8);
    }

    #[test]
    fn test_exact_block_bits() {
        // m=2 (0010), unary(1) = 10, remainder 2 = 10
        let block = encode_block(&[3]);
        assert_eq!(block.bit_length, 8);
        assert_eq!(block.bytes, vec![0b0010_1010]);

        // m=0 (0000), unary(0) = 0
        let block = encode_block(&[0]);
        assert_eq!(block.bit_length, 5);
        assert_eq!(block.bytes, vec![0]);
    }

    #[test]
    fn test_block_round_trip() {
        let cases: Vec<Vec<i32>> = vec![
            vec![],
            vec![0; 32],
            vec![1, -1, 2, -2, 0, 5, -7, 12],
            (-40..40).collect(),
            vec![255, 0, 0, 0, -3, 1],
            vec![1000, -1000, 3],
        ];
        for case in cases {
            let block = encode_block(&case);
            assert_eq!(block.bytes.len(), block.bit_length.div_ceil(8));
            let decoded = decode_block(&block.bytes, block.bit_length).unwrap();
            assert_eq!(decoded, case);
        }
    }

    #[test]
    fn test_decode_rejects_bad_parameter() {
        // 1111 as parameter field
        let err = decode_block(&[0xF0], 4).unwrap_err();
        assert!(matches!(err, HaarRiceError::CorruptBlock(_)));
    }

    #[test]
    fn test_decode_rejects_quotient_overflow() {
        let mut writer = BitWriter::new();
        writer.write_bits(8, PARAM_BITS);
        writer.write_unary(1 << 24);
        writer.write_bits(0xFF, 8);
        let (bytes, bit_length) = writer.finish();
        assert!(matches!(
            decode_block(&bytes, bit_length),
            Err(HaarRiceError::CorruptBlock(_))
        ));
    }

    #[test]
    fn test_short_parameter_field_is_empty_block() {
        for bits in 0..PARAM_BITS as usize {
            assert_eq!(decode_block(&[0xF0], bits).unwrap(), Vec::<i32>::new());
        }
    }

    #[test]
    fn test_framed_blocks_round_trip() {
        let samples: Vec<i32> = (0..37).map(|i| (i * 13 % 11) - 5).collect();
        let payload = encode_blocks(&samples, 16).unwrap();
        let blocks = decode_blocks(&payload).unwrap();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].len(), 16);
        assert_eq!(blocks[2].len(), 5);
        let flat: Vec<i32> = blocks.into_iter().flatten().collect();
        assert_eq!(flat, samples);
    }

    #[test]
    fn test_framing_layout() {
        let payload = encode_blocks(&[3], 4).unwrap();
        assert_eq!(payload, vec![0, 0, 0, 8, 0b0010_1010]);
    }

    #[test]
    fn test_truncated_framing() {
        let payload = encode_blocks(&[1, 2, 3, 4, 5], 2).unwrap();

        let err = decode_blocks(&payload[..payload.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            HaarRiceError::Truncated {
                context: "block body",
                ..
            }
        ));

        let mut short_len = payload.clone();
        short_len.extend_from_slice(&[0, 0]);
        let err = decode_blocks(&short_len).unwrap_err();
        assert!(matches!(
            err,
            HaarRiceError::Truncated {
                context: "block length",
                needed: 4,
                available: 2
            }
        ));
    }

    #[test]
    fn test_zero_block_size_rejected() {
        assert!(matches!(
            encode_blocks(&[1, 2], 0),
            Err(HaarRiceError::InvalidParameter(_))
        ));
    }
}

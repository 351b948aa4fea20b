// src/encode/haar/mod.rs

//! Haar wavelet decomposition and the quantizer that follows it.

pub mod quant;
pub mod transform;

pub use quant::{dequantize, quantize};
pub use transform::{forward, inverse, ll_dimensions};

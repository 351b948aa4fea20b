// src/container/mod.rs

//! Self-describing container: a fixed header followed by one
//! length-prefixed Rice payload per channel.

pub mod codec;
pub mod header;

pub use codec::{CompressParams, compress, decompress};
pub use header::{HEADER_LEN, Header, MAGIC, VERSION};

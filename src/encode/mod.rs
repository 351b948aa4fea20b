pub mod bitstream;
pub mod haar;
pub mod rice;

// Re-export commonly used encoding functionality
pub use bitstream::{BitReader, BitWriter, Exhausted};
pub use rice::{EncodedBlock, decode_block, encode_block};

// Re-export error types for convenience
pub use crate::utils::error::{HaarRiceError, Result};

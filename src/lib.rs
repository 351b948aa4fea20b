//! # Haar/Rice Image Codec
//!
//! A lossy still-image compressor: a multilevel 2D Haar wavelet transform,
//! uniform scalar quantization that keeps the LL band lossless, and an
//! adaptive Rice coder, wrapped in a small self-describing container.
//!
//! This library is organized into several modules:
//! - `utils`: Error type and the row-major `Matrix` buffer
//! - `encode`: Bit stream, Rice coder, Haar transform and quantizer
//! - `container`: Header framing and the per-channel pipeline
//! - `image`: Colour conversion, image file I/O, demo picture and metrics
//!
//! ```no_run
//! use haar_rice::{CompressParams, Matrix, compress, decompress};
//!
//! let plane = Matrix::from_fn(8, 8, |r, c| (r * 8 + c) as u8);
//! let container = compress(&[plane], &CompressParams::default())?;
//! let planes = decompress(&container)?;
//! assert_eq!(planes[0].shape(), (8, 8));
//! # Ok::<(), haar_rice::HaarRiceError>(())
//! ```

// Re-export commonly used types at the crate root
pub use utils::error::{HaarRiceError, Result};
pub use utils::matrix::Matrix;

pub mod utils {
    pub mod error;
    pub mod matrix;
}

pub mod encode;

pub mod container;

pub mod image {
    pub mod color;
    pub mod io;
    pub mod quality;
    pub mod synthetic;

    pub use self::io::{ColorMode, compress_image, decompress_image, load_planes, save_planes};
}

// Public API exports
pub use crate::container::{CompressParams, Header, compress, decompress};

// Constants
pub use crate::container::header::{MAGIC as HR_MAGIC, VERSION as FORMAT_VERSION};

// src/image/synthetic.rs

//! Generated test picture used by the demo when no input file is given.

use ::image::{Rgb, RgbImage};

/// `floor(i * 255 / (n - 1))`, the 8-bit linear ramp over `n` samples.
#[inline]
fn ramp(i: u32, n: u32) -> u8 {
    if n <= 1 {
        0
    } else {
        (f64::from(i) * 255.0 / f64::from(n - 1)) as u8
    }
}

/// Horizontal red ramp, vertical green ramp, and a blue 32-pixel-band
/// checker derived from both.
pub fn synthetic_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = ramp(x, width);
        let g = ramp(y, height);
        let b = ((r / 32) ^ (g / 32)) * 32;
        Rgb([r, g, b])
    })
}

// src/image/io.rs

//! Image files in, sample planes out (and back).
//!
//! This is the glue between the `image` crate and the container codec: a
//! grayscale image becomes one plane, a colour image becomes Y, Cb and Cr.

use super::color::{rgb_to_ycbcr_planes, ycbcr_planes_to_rgb};
use crate::container::{CompressParams, compress, decompress};
use crate::utils::error::{HaarRiceError, Result};
use crate::utils::matrix::Matrix;
use ::image::{DynamicImage, GrayImage};
use log::info;
use std::path::Path;

/// How an input image is split into planes before compression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// A single luma plane.
    #[default]
    Gray,
    /// Luma plus two chroma planes.
    Color,
}

fn gray_plane(img: &GrayImage) -> Result<Matrix<u8>> {
    let (w, h) = img.dimensions();
    Matrix::from_vec(h as usize, w as usize, img.as_raw().clone())
}

/// Splits `img` into planes according to `mode`.
pub fn planes_from_image(img: &DynamicImage, mode: ColorMode) -> Result<Vec<Matrix<u8>>> {
    match mode {
        ColorMode::Gray => Ok(vec![gray_plane(&img.to_luma8())?]),
        ColorMode::Color => Ok(Vec::from(rgb_to_ycbcr_planes(&img.to_rgb8()))),
    }
}

/// Rebuilds an image from one (grayscale) or three (YCbCr) planes.
pub fn image_from_planes(planes: &[Matrix<u8>]) -> Result<DynamicImage> {
    match planes {
        [luma] => {
            let (h, w) = luma.shape();
            let w32 = u32::try_from(w).ok();
            let h32 = u32::try_from(h).ok();
            w32.zip(h32)
                .and_then(|(w, h)| GrayImage::from_raw(w, h, luma.as_slice().to_vec()))
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| {
                    HaarRiceError::InvalidParameter(format!("cannot build a {}x{} image", w, h))
                })
        }
        [_, _, _] => Ok(DynamicImage::ImageRgb8(ycbcr_planes_to_rgb(planes)?)),
        _ => Err(HaarRiceError::UnsupportedChannelCount(planes.len())),
    }
}

/// Loads an image file as sample planes.
pub fn load_planes<P: AsRef<Path>>(path: P, mode: ColorMode) -> Result<Vec<Matrix<u8>>> {
    let path = path.as_ref();
    let img = ::image::open(path)?;
    info!(
        "loaded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        mode
    );
    planes_from_image(&img, mode)
}

/// Saves planes as an image file; the format follows the file extension.
pub fn save_planes<P: AsRef<Path>>(planes: &[Matrix<u8>], path: P) -> Result<()> {
    let path = path.as_ref();
    image_from_planes(planes)?.save(path)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Compresses a decoded image in one call.
pub fn compress_image(
    img: &DynamicImage,
    mode: ColorMode,
    params: &CompressParams,
) -> Result<Vec<u8>> {
    compress(&planes_from_image(img, mode)?, params)
}

/// Decompresses a container straight to an image.
pub fn decompress_image(bytes: &[u8]) -> Result<DynamicImage> {
    image_from_planes(&decompress(bytes)?)
}

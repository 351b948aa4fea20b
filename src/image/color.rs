// src/image/color.rs

//! Full-range BT.601 (JFIF) RGB <-> YCbCr conversion.
//!
//! Both directions use 16.16 fixed-point lookup tables built once per
//! process. Chroma planes are stored with the usual +128 offset so every
//! plane fits the 8-bit sample matrices the codec consumes.

use crate::utils::error::{HaarRiceError, Result};
use crate::utils::matrix::Matrix;
use ::image::RgbImage;
use log::debug;
use std::sync::OnceLock;

const SCALE: f32 = 65536.0;
const ROUND: i32 = 1 << 15;
const CHROMA_OFFSET: i32 = 128 << 16;

const RGB_TO_YCC: [[f32; 3]; 3] = [
    [0.299, 0.587, 0.114],          // Y
    [-0.168736, -0.331264, 0.5],    // Cb
    [0.5, -0.418688, -0.081312],    // Cr
];

const CR_TO_R: f32 = 1.402;
const CB_TO_G: f32 = -0.344136;
const CR_TO_G: f32 = -0.714136;
const CB_TO_B: f32 = 1.772;

struct ForwardTables {
    y: [[i32; 256]; 3],
    cb: [[i32; 256]; 3],
    cr: [[i32; 256]; 3],
}

struct InverseTables {
    cr_r: [i32; 256],
    cb_g: [i32; 256],
    cr_g: [i32; 256],
    cb_b: [i32; 256],
}

static FORWARD_TABLES: OnceLock<ForwardTables> = OnceLock::new();
static INVERSE_TABLES: OnceLock<InverseTables> = OnceLock::new();

fn forward_tables() -> &'static ForwardTables {
    FORWARD_TABLES.get_or_init(|| {
        let mut t = ForwardTables {
            y: [[0; 256]; 3],
            cb: [[0; 256]; 3],
            cr: [[0; 256]; 3],
        };
        for k in 0..256 {
            for c in 0..3 {
                t.y[c][k] = (k as f32 * SCALE * RGB_TO_YCC[0][c]) as i32;
                t.cb[c][k] = (k as f32 * SCALE * RGB_TO_YCC[1][c]) as i32;
                t.cr[c][k] = (k as f32 * SCALE * RGB_TO_YCC[2][c]) as i32;
            }
        }
        t
    })
}

fn inverse_tables() -> &'static InverseTables {
    INVERSE_TABLES.get_or_init(|| {
        let mut t = InverseTables {
            cr_r: [0; 256],
            cb_g: [0; 256],
            cr_g: [0; 256],
            cb_b: [0; 256],
        };
        for k in 0..256 {
            let centered = (k as i32 - 128) as f32 * SCALE;
            t.cr_r[k] = (centered * CR_TO_R) as i32;
            t.cb_g[k] = (centered * CB_TO_G) as i32;
            t.cr_g[k] = (centered * CR_TO_G) as i32;
            t.cb_b[k] = (centered * CB_TO_B) as i32;
        }
        t
    })
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Converts one RGB pixel to `(Y, Cb, Cr)`.
#[inline]
pub fn rgb_to_ycbcr([r, g, b]: [u8; 3]) -> [u8; 3] {
    let t = forward_tables();
    let (r, g, b) = (r as usize, g as usize, b as usize);
    let y = t.y[0][r] + t.y[1][g] + t.y[2][b] + ROUND;
    let cb = t.cb[0][r] + t.cb[1][g] + t.cb[2][b] + CHROMA_OFFSET + ROUND;
    let cr = t.cr[0][r] + t.cr[1][g] + t.cr[2][b] + CHROMA_OFFSET + ROUND;
    [clamp_u8(y >> 16), clamp_u8(cb >> 16), clamp_u8(cr >> 16)]
}

/// Converts one `(Y, Cb, Cr)` triple back to RGB.
#[inline]
pub fn ycbcr_to_rgb([y, cb, cr]: [u8; 3]) -> [u8; 3] {
    let t = inverse_tables();
    let y = y as i32;
    let (cb, cr) = (cb as usize, cr as usize);
    let r = y + ((t.cr_r[cr] + ROUND) >> 16);
    let g = y + ((t.cb_g[cb] + t.cr_g[cr] + ROUND) >> 16);
    let b = y + ((t.cb_b[cb] + ROUND) >> 16);
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

/// Splits an RGB image into Y, Cb and Cr planes, in that order.
pub fn rgb_to_ycbcr_planes(img: &RgbImage) -> [Matrix<u8>; 3] {
    let (w, h) = img.dimensions();
    let (w, h) = (w as usize, h as usize);
    let pixels: &[[u8; 3]] = bytemuck::cast_slice(img.as_raw());

    let mut y = Matrix::new(h, w);
    let mut cb = Matrix::new(h, w);
    let mut cr = Matrix::new(h, w);
    for (i, &px) in pixels.iter().enumerate() {
        let [py, pcb, pcr] = rgb_to_ycbcr(px);
        y.as_mut_slice()[i] = py;
        cb.as_mut_slice()[i] = pcb;
        cr.as_mut_slice()[i] = pcr;
    }

    debug!("YCbCr conversion completed for {}x{} image", w, h);
    [y, cb, cr]
}

/// Merges Y, Cb and Cr planes back into an RGB image.
pub fn ycbcr_planes_to_rgb(planes: &[Matrix<u8>]) -> Result<RgbImage> {
    let [y, cb, cr] = planes else {
        return Err(HaarRiceError::UnsupportedChannelCount(planes.len()));
    };
    let (h, w) = y.shape();
    if cb.shape() != (h, w) || cr.shape() != (h, w) {
        return Err(HaarRiceError::InvalidParameter(
            "luma and chroma planes differ in shape".to_string(),
        ));
    }

    let mut raw = Vec::with_capacity(h * w * 3);
    for ((&py, &pcb), &pcr) in y.as_slice().iter().zip(cb.as_slice()).zip(cr.as_slice()) {
        raw.extend_from_slice(&ycbcr_to_rgb([py, pcb, pcr]));
    }

    let dims = u32::try_from(w).ok().zip(u32::try_from(h).ok());
    dims.and_then(|(w, h)| RgbImage::from_raw(w, h, raw))
        .ok_or_else(|| HaarRiceError::InvalidParameter(format!("cannot build a {}x{} image", w, h)))
}

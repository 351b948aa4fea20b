use haar_rice::image::color::rgb_to_ycbcr_planes;
use haar_rice::image::quality::{mean_abs_diff, psnr};
use haar_rice::image::synthetic::synthetic_rgb;
use haar_rice::image::{ColorMode, compress_image, decompress_image, load_planes, save_planes};
use haar_rice::{CompressParams, HaarRiceError, Header, Matrix, compress, decompress};
use image::{DynamicImage, GrayImage, Luma};

/// 8x8 row-major gradient 0..63 through the grayscale path
#[test]
fn test_small_gradient_round_trip() {
    let img = Matrix::from_vec(8, 8, (0u8..64).collect()).unwrap();
    let params = CompressParams {
        levels: 1,
        qstep: 5.0,
        block_size: 16,
    };

    let container = compress(std::slice::from_ref(&img), &params).unwrap();
    let rec = decompress(&container).unwrap();

    assert_eq!(rec.len(), 1);
    assert_eq!(rec[0].shape(), img.shape());
    let mad = mean_abs_diff(&img, &rec[0]).unwrap();
    assert!(mad < 10.0, "mean absolute difference {}", mad);
}

/// 256x256 synthetic colour image, luma/chroma path
#[test]
fn test_synthetic_rgb_round_trip() {
    let src = synthetic_rgb(256, 256);
    let raw_size = src.as_raw().len();
    let params = CompressParams {
        levels: 1,
        qstep: 10.0,
        block_size: 32,
    };

    let container =
        compress_image(&DynamicImage::ImageRgb8(src.clone()), ColorMode::Color, &params).unwrap();
    assert!(
        container.len() < raw_size,
        "container {} bytes is not smaller than raw {} bytes",
        container.len(),
        raw_size
    );

    let header = Header::parse(&container).unwrap();
    assert_eq!(header.channels, 3);
    assert_eq!((header.height, header.width), (256, 256));

    let rec = decompress_image(&container).unwrap();
    let DynamicImage::ImageRgb8(rec) = rec else {
        panic!("expected an RGB image");
    };
    assert_eq!(rec.dimensions(), src.dimensions());

    let [y_src, _, _] = rgb_to_ycbcr_planes(&src);
    let [y_rec, _, _] = rgb_to_ycbcr_planes(&rec);
    let db = psnr(&y_src, &y_rec).unwrap();
    assert!(db > 25.0, "luma PSNR {:.2} dB", db);
}

#[test]
fn test_more_levels_still_round_trip() {
    let img = Matrix::from_fn(32, 64, |r, c| ((r * 3 + c * 2) % 256) as u8);
    for levels in 0..=5u8 {
        for &block_size in &[1u32, 7, 32, 4096] {
            let params = CompressParams {
                levels,
                qstep: 1.0,
                block_size,
            };
            let container = compress(std::slice::from_ref(&img), &params).unwrap();
            let rec = decompress(&container).unwrap();
            assert_eq!(rec[0].shape(), (32, 64));
            let mad = mean_abs_diff(&img, &rec[0]).unwrap();
            assert!(mad < 3.0, "levels={} block_size={} mad={}", levels, block_size, mad);
        }
    }
}

#[test]
fn test_malformed_headers() {
    for len in [0usize, 1, 4, 22] {
        let buf = vec![0u8; len];
        assert!(
            matches!(decompress(&buf), Err(HaarRiceError::Truncated { .. })),
            "length {}",
            len
        );
    }

    let img = Matrix::filled(4, 4, 50u8);
    let mut container = compress(&[img], &CompressParams::default()).unwrap();
    container[..4].copy_from_slice(b"JPEG");
    assert!(matches!(
        decompress(&container),
        Err(HaarRiceError::InvalidMagic { .. })
    ));
}

#[test]
fn test_corrupted_payload_is_rejected() {
    use haar_rice::container::HEADER_LEN;

    let img = Matrix::from_fn(16, 16, |r, c| (r * 16 + c) as u8);
    let container = compress(&[img], &CompressParams::default()).unwrap();

    // Drop the last bit of the first block, keeping the framing consistent.
    let mut forged = container.clone();
    let block_len_at = HEADER_LEN + 4;
    let field = |buf: &[u8], at: usize| u32::from_be_bytes(buf[at..at + 4].try_into().unwrap());
    let bits = field(&forged, block_len_at);
    forged[block_len_at..block_len_at + 4].copy_from_slice(&(bits - 1).to_be_bytes());
    if (bits - 1).div_ceil(8) < bits.div_ceil(8) {
        forged.remove(block_len_at + 4 + (bits - 1).div_ceil(8) as usize);
        let payload_len = field(&forged, HEADER_LEN);
        forged[HEADER_LEN..HEADER_LEN + 4].copy_from_slice(&(payload_len - 1).to_be_bytes());
    }

    assert!(matches!(
        decompress(&forged),
        Err(HaarRiceError::SampleCount {
            expected: 256,
            actual: 255
        })
    ));
}

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let src_path = dir.path().join("input.png");
    let out_path = dir.path().join("output.png");
    let hr_path = dir.path().join("image.hr");

    let gray = GrayImage::from_fn(32, 32, |x, y| Luma([((x * 7 + y * 5) % 256) as u8]));
    gray.save(&src_path).unwrap();

    let planes = load_planes(&src_path, ColorMode::Gray).unwrap();
    let container = compress(&planes, &CompressParams::default()).unwrap();
    std::fs::write(&hr_path, &container).unwrap();

    let read_back = std::fs::read(&hr_path).unwrap();
    let decoded = decompress(&read_back).unwrap();
    save_planes(&decoded, &out_path).unwrap();

    let reloaded = image::open(&out_path).unwrap().to_luma8();
    assert_eq!(reloaded.dimensions(), (32, 32));
    assert_eq!(reloaded.as_raw(), decoded[0].as_slice());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.png");
    assert!(matches!(
        load_planes(&missing, ColorMode::Color),
        Err(HaarRiceError::Image(_))
    ));
}

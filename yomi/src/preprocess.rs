//! Language-aware image preprocessing.
//!
//! Every strategy first reduces the input to single-channel grayscale and
//! always ends with a binary (two-level) image, which is what Tesseract
//! segments best. The strategies differ in how they get there:
//!
//! - [`PreprocessStrategy::EastAsian`]: Gaussian smoothing followed by a
//!   Gaussian-weighted adaptive threshold. East-Asian glyphs have high local
//!   stroke-density variance that a single global threshold misrepresents.
//! - [`PreprocessStrategy::CurvedScript`]: a minimal (1×1 kernel) grayscale
//!   dilation to reconnect thin strokes, then Otsu global binarization.
//! - [`PreprocessStrategy::LatinDefault`]: Otsu global binarization directly.

use image::{GrayImage, ImageFormat, ImageReader};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{grayscale_dilate, Mask};

use crate::error::{Result, YomiError};

/// Normalization strategy selected from the declared language family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreprocessStrategy {
    EastAsian,
    CurvedScript,
    LatinDefault,
}

/// Smoothing kernel size for the East-Asian pass.
const SMOOTHING_KERNEL: u32 = 5;
/// Local neighborhood size for adaptive thresholding.
const ADAPTIVE_BLOCK: u32 = 11;
/// Constant subtracted from the local mean before comparison.
const ADAPTIVE_OFFSET: i16 = 2;
/// Dilation mask radius for curved scripts. Radius 0 is a 1×1 window;
/// anything wider bleeds diacritics together.
const DILATE_RADIUS: u8 = 0;

/// Run the given strategy over raw image bytes and return the processed
/// image encoded as PNG. Fails with [`YomiError::Decode`] when the bytes are
/// not a readable image; the original input is never mutated.
pub fn preprocess(bytes: &[u8], strategy: PreprocessStrategy) -> Result<Vec<u8>> {
    let gray = decode_grayscale(bytes)?;

    let binary = match strategy {
        PreprocessStrategy::EastAsian => {
            let blurred = gaussian_blur_f32(&gray, sigma_for_kernel(SMOOTHING_KERNEL));
            adaptive_threshold_gaussian(&blurred, ADAPTIVE_BLOCK, ADAPTIVE_OFFSET)
        }
        PreprocessStrategy::CurvedScript => {
            let dilated = grayscale_dilate(&gray, &Mask::square(DILATE_RADIUS));
            otsu_binarize(&dilated)
        }
        PreprocessStrategy::LatinDefault => otsu_binarize(&gray),
    };

    encode_png(&binary)
}

/// Decode bytes with a guessed format and collapse to 8-bit grayscale.
fn decode_grayscale(bytes: &[u8]) -> Result<GrayImage> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| YomiError::Decode(format!("unreadable image data: {e}")))?;

    let img = reader
        .decode()
        .map_err(|e| YomiError::Decode(e.to_string()))?;

    Ok(img.to_luma8())
}

fn encode_png(img: &GrayImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| YomiError::Internal(format!("failed to encode processed image: {e}")))?;
    Ok(out)
}

/// Sigma matching a square blur kernel of the given odd size,
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
fn sigma_for_kernel(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Global binarization with an automatically selected (Otsu) threshold.
fn otsu_binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    threshold(gray, level, ThresholdType::Binary)
}

/// Per-pixel binarization against a Gaussian-weighted local mean: a pixel is
/// foreground when it exceeds the mean of its `block`-sized neighborhood
/// minus `offset`.
fn adaptive_threshold_gaussian(gray: &GrayImage, block: u32, offset: i16) -> GrayImage {
    let local_mean = gaussian_blur_f32(gray, sigma_for_kernel(block));

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let px = gray.get_pixel(x, y)[0] as i16;
        let mean = local_mean.get_pixel(x, y)[0] as i16;
        if px > mean - offset {
            image::Luma([255])
        } else {
            image::Luma([0])
        }
    })
}

//! Image variant generation for prediction.
//!
//! Each source image is rendered as a small fixed set of grayscale variants
//! before being sent to the model. The variants trade off differently against
//! glare, low contrast, and sensor noise, and the evaluator keeps whichever
//! one the model reads best.

use anyhow::{anyhow, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};

/// Edge length of the square canvas every variant is resized to.
pub const VARIANT_SIZE: u32 = 224;

/// Fixed contrast strength for the contrast-enhanced variant.
const CONTRAST_FACTOR: f32 = 2.0;

/// Gaussian blur radius for the blurred variant, in pixels.
const BLUR_SIGMA: f32 = 1.0;

/// Renders the preprocessed variants of one source image, in fixed order:
/// grayscale, contrast-enhanced, histogram-equalized, blurred.
///
/// A variant step that fails (e.g. equalization on a degenerate image) is
/// logged and omitted rather than aborting the image, so the result holds
/// 3 or 4 entries.
pub fn generate_variants(image: &DynamicImage) -> Vec<GrayImage> {
    let gray = image.to_luma8();
    let mut variants = Vec::with_capacity(4);

    variants.push(resize_to_canvas(&gray));
    variants.push(resize_to_canvas(&enhance_contrast(&gray, CONTRAST_FACTOR)));
    match equalize_histogram(&gray) {
        Ok(equalized) => variants.push(resize_to_canvas(&equalized)),
        Err(e) => crate::log(&format!("Skipping equalized variant: {}", e)),
    }
    variants.push(resize_to_canvas(&imageops::blur(&gray, BLUR_SIGMA)));

    variants
}

fn resize_to_canvas(img: &GrayImage) -> GrayImage {
    imageops::resize(img, VARIANT_SIZE, VARIANT_SIZE, FilterType::CatmullRom)
}

/// Scales each pixel away from the image's mean gray level.
///
/// `factor` 1.0 leaves the image unchanged; 2.0 doubles the distance of each
/// pixel from the mean, clamped to the 8-bit range.
fn enhance_contrast(img: &GrayImage, factor: f32) -> GrayImage {
    let pixel_count = (img.width() as u64) * (img.height() as u64);
    if pixel_count == 0 {
        return img.clone();
    }

    let sum: u64 = img.pixels().map(|p| p[0] as u64).sum();
    let mean = sum as f32 / pixel_count as f32;

    let mut output = img.clone();
    for pixel in output.pixels_mut() {
        let value = mean + factor * (pixel[0] as f32 - mean);
        pixel[0] = value.round().clamp(0.0, 255.0) as u8;
    }
    output
}

/// Classic histogram equalization over the 8-bit gray range.
fn equalize_histogram(img: &GrayImage) -> Result<GrayImage> {
    let total = (img.width() as u64) * (img.height() as u64);
    if total == 0 {
        return Err(anyhow!("image has no pixels"));
    }

    let mut histogram = [0u64; 256];
    for pixel in img.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let mut cdf = [0u64; 256];
    let mut running = 0u64;
    for (level, &count) in histogram.iter().enumerate() {
        running += count;
        cdf[level] = running;
    }

    let cdf_min = cdf
        .iter()
        .copied()
        .find(|&v| v > 0)
        .ok_or_else(|| anyhow!("empty histogram"))?;
    if cdf_min == total {
        // Single gray level: nothing to spread
        return Ok(img.clone());
    }

    let mut lut = [0u8; 256];
    let denom = (total - cdf_min) as f64;
    for level in 0..256 {
        let scaled = ((cdf[level].saturating_sub(cdf_min)) as f64 / denom * 255.0).round();
        lut[level] = scaled.clamp(0.0, 255.0) as u8;
    }

    let mut output = img.clone();
    for pixel in output.pixels_mut() {
        pixel[0] = lut[pixel[0] as usize];
    }
    Ok(output)
}

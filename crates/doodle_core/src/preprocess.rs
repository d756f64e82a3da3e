//! Image preprocessing module
//!
//! Prepares a player's drawing for the vision model:
//! - Resize to a fixed 512x512 canvas (aspect ratio is not preserved)
//! - Per-channel auto-contrast with a small histogram cutoff, so thin
//!   strokes on a white background get the full dynamic range
//!
//! Both steps are pure functions of the input pixels.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageError, ImageFormat, RgbImage};
use imageproc::stats::histogram;
use std::io::Cursor;

/// Edge length of the square canvas sent to the model
pub const TARGET_SIZE: u32 = 512;

/// Percentage of samples ignored at each end of a channel histogram
pub const AUTOCONTRAST_CUTOFF_PERCENT: u64 = 2;

/// Resize and contrast-stretch a decoded drawing
pub fn preprocess_image(input: &DynamicImage) -> RgbImage {
    let resized = resize_canvas(&input.to_rgb8());
    autocontrast(&resized, AUTOCONTRAST_CUTOFF_PERCENT)
}

/// Stretch to a `TARGET_SIZE` square using bicubic (Catmull-Rom) sampling
pub fn resize_canvas(input: &RgbImage) -> RgbImage {
    if input.dimensions() == (TARGET_SIZE, TARGET_SIZE) {
        return input.clone();
    }
    imageops::resize(input, TARGET_SIZE, TARGET_SIZE, FilterType::CatmullRom)
}

/// Maximize contrast independently in each channel
///
/// `cutoff_percent` of the samples are dropped from both the dark and the
/// light end of each histogram before the darkest remaining value is mapped
/// to 0 and the lightest to 255.
pub fn autocontrast(input: &RgbImage, cutoff_percent: u64) -> RgbImage {
    let hist = histogram(input);
    let luts: Vec<[u8; 256]> = hist
        .channels
        .iter()
        .map(|channel| channel_lut(channel, cutoff_percent))
        .collect();

    let mut output = input.clone();
    for pixel in output.pixels_mut() {
        for (value, lut) in pixel.0.iter_mut().zip(&luts) {
            *value = lut[*value as usize];
        }
    }
    output
}

/// Lookup table for a single channel histogram
pub fn channel_lut(counts: &[u32; 256], cutoff_percent: u64) -> [u8; 256] {
    let mut bins = counts.map(u64::from);
    let total: u64 = bins.iter().sum();

    trim_tail(bins.iter_mut(), total * cutoff_percent / 100);
    trim_tail(bins.iter_mut().rev(), total * cutoff_percent / 100);

    let lo = bins.iter().position(|&count| count > 0);
    let hi = bins.iter().rposition(|&count| count > 0);

    let mut lut = [0u8; 256];
    match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => {
            let scale = 255.0 / (hi - lo) as f64;
            let offset = -(lo as f64) * scale;
            for (ix, slot) in lut.iter_mut().enumerate() {
                let mapped = (ix as f64 * scale + offset) as i64;
                *slot = mapped.clamp(0, 255) as u8;
            }
        }
        _ => {
            for (ix, slot) in lut.iter_mut().enumerate() {
                *slot = ix as u8;
            }
        }
    }
    lut
}

fn trim_tail<'a>(bins: impl Iterator<Item = &'a mut u64>, mut cut: u64) {
    for bin in bins {
        if cut > *bin {
            cut -= *bin;
            *bin = 0;
        } else {
            *bin -= cut;
            cut = 0;
        }
        if cut == 0 {
            break;
        }
    }
}

/// Encode as PNG for transport to the model service
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let mut png_bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)?;
    Ok(png_bytes)
}

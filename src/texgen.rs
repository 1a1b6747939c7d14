//! Image to ASCII texture conversion
//!
//! Produces the day/night texture files the renderer loads. Pixels close to the
//! ocean colour become a single flat character; everything else is shaded by
//! grayscale brightness along the palette.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

#[derive(Debug, thiserror::Error)]
pub enum TexgenError {
    #[error("Failed to open image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to write texture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid texture options: {0}")]
    Options(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TexgenOptions {
    /// Characters from darkest to brightest
    pub palette: String,
    pub width: u32,
    pub height: u32,
    pub ocean_color: [u8; 3],
    pub ocean_char: char,
    /// Per-channel tolerance for ocean matching
    pub color_threshold: u32,
}

impl Default for TexgenOptions {
    fn default() -> Self {
        Self {
            palette: crate::DEFAULT_PALETTE.to_string(),
            width: 202,
            height: 80,
            ocean_color: [1, 4, 19],
            ocean_char: '.',
            color_threshold: 20,
        }
    }
}

impl TexgenOptions {
    fn validate(&self) -> Result<(), TexgenError> {
        if self.palette.is_empty() {
            return Err(TexgenError::Options("palette is empty".to_string()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TexgenError::Options(format!(
                "target size {}x{} is empty",
                self.width, self.height
            )));
        }
        // output must load back against the same palette
        if !self.palette.contains(self.ocean_char) {
            return Err(TexgenError::Options(format!(
                "ocean character {:?} is not in the palette {:?}",
                self.ocean_char, self.palette
            )));
        }
        Ok(())
    }
}

/// ITU-R 601-2 luma, rounded
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

/// Map already-resized pixels to texture rows
pub fn convert_pixels(pixels: &RgbImage, options: &TexgenOptions) -> String {
    let palette: Vec<char> = options.palette.chars().collect();
    let last = palette.len().saturating_sub(1);
    let step = 255.0 / last as f64;
    let [ocean_r, ocean_g, ocean_b] = options.ocean_color;

    let mut rows = Vec::with_capacity(pixels.height() as usize);
    for y in 0..pixels.height() {
        let mut row = String::with_capacity(pixels.width() as usize);
        for x in 0..pixels.width() {
            let [r, g, b] = pixels.get_pixel(x, y).0;
            let diff = r.abs_diff(ocean_r) as u32
                + g.abs_diff(ocean_g) as u32
                + b.abs_diff(ocean_b) as u32;
            if diff <= options.color_threshold * 3 {
                row.push(options.ocean_char);
            } else {
                let index = (luma(r, g, b) as f64 / step) as usize;
                row.push(palette[index.min(last)]);
            }
        }
        rows.push(row);
    }
    rows.join("\n")
}

/// Resize `image` to the target size and convert it
pub fn convert_image(image: &DynamicImage, options: &TexgenOptions) -> Result<String, TexgenError> {
    options.validate()?;
    let resized = image.resize_exact(options.width, options.height, FilterType::Lanczos3);
    Ok(convert_pixels(&resized.to_rgb8(), options))
}

pub fn convert_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    options: &TexgenOptions,
) -> Result<(), TexgenError> {
    let image = image::open(input.as_ref())?;
    let texture = convert_image(&image, options)?;
    std::fs::write(output.as_ref(), texture)?;
    tracing::info!(
        input = %input.as_ref().display(),
        output = %output.as_ref().display(),
        width = options.width,
        height = options.height,
        "Wrote ASCII texture"
    );
    Ok(())
}

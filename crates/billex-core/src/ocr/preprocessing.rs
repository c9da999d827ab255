//! Image cleanup ahead of text recognition.

use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::median_filter;
use imageproc::morphology::close;
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::PreprocessConfig;

/// Grayscale, upscale, denoise, binarize and close gaps between strokes.
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    pub fn new(config: &PreprocessConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Run every configured step. A disabled preprocessor returns the image unchanged.
    pub fn process(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        if !self.config.enabled {
            return Ok(image.clone());
        }

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let (new_width, new_height) = self.scaled_dimensions(width, height)?;
        debug!(
            "Preprocessing {}x{} image, scaled to {}x{}",
            width, height, new_width, new_height
        );

        let gray = DynamicImage::ImageLuma8(image.to_luma8());
        let resized = gray
            .resize_exact(new_width, new_height, image::imageops::FilterType::CatmullRom)
            .to_luma8();

        let denoised = match self.config.median_radius {
            0 => resized,
            radius => median_filter(&resized, radius, radius),
        };
        let binary = match self.config.threshold_block {
            0 => denoised,
            block => adaptive_threshold(&denoised, block, self.config.threshold_offset),
        };
        let result = if self.config.close_gaps {
            close(&binary, Norm::LInf, 1)
        } else {
            binary
        };

        Ok(DynamicImage::ImageLuma8(result))
    }

    fn scaled_dimensions(&self, width: u32, height: u32) -> Result<(u32, u32), OcrError> {
        let scale = self.config.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(OcrError::Preprocessing(format!("invalid scale factor {}", scale)));
        }

        let new_width = ((width as f32 * scale).round() as u32).max(1);
        let new_height = ((height as f32 * scale).round() as u32).max(1);
        Ok((new_width, new_height))
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(&PreprocessConfig::default())
    }
}

/// Binarize against the local mean: a pixel is white when it is brighter than
/// the mean of its block minus `c`.
fn adaptive_threshold(image: &GrayImage, block_size: u32, c: i32) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);

    let half_block = block_size / 2;

    for y in 0..height {
        for x in 0..width {
            let mut sum = 0u32;
            let mut count = 0u32;

            let y_start = y.saturating_sub(half_block);
            let y_end = (y + half_block + 1).min(height);
            let x_start = x.saturating_sub(half_block);
            let x_end = (x + half_block + 1).min(width);

            for ly in y_start..y_end {
                for lx in x_start..x_end {
                    sum += image.get_pixel(lx, ly)[0] as u32;
                    count += 1;
                }
            }

            let mean = (sum / count) as i32;
            let threshold = mean - c;
            let pixel_value = image.get_pixel(x, y)[0] as i32;

            let output = if pixel_value > threshold { 255 } else { 0 };
            result.put_pixel(x, y, Luma([output]));
        }
    }

    result
}

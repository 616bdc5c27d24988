// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image processing operations for blueprint edge detection

use crate::error::{Error, Result};
use crate::types::IntensityBuffer;
use image::{GrayImage, Luma};

/// Produces a binary edge raster from a source buffer
pub trait EdgeDetector {
    /// Detect edges with hysteresis thresholds `low` and `high`.
    ///
    /// The result is single-channel, has the source's dimensions and marks
    /// edge pixels with 255.
    fn detect(&self, source: &IntensityBuffer, low: f32, high: f32) -> Result<IntensityBuffer>;
}

/// Canny edge detection with optional Gaussian pre-blur
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CannyEdgeDetector {
    /// Standard deviation of the pre-blur, `None` to skip it
    pub blur_sigma: Option<f32>,
}

impl CannyEdgeDetector {
    pub fn new() -> Self {
        Self { blur_sigma: None }
    }

    pub fn with_blur(sigma: f32) -> Self {
        Self {
            blur_sigma: Some(sigma),
        }
    }
}

impl EdgeDetector for CannyEdgeDetector {
    fn detect(&self, source: &IntensityBuffer, low: f32, high: f32) -> Result<IntensityBuffer> {
        if !(low >= 0.0) || !(high >= low) {
            return Err(Error::InvalidConfig(format!(
                "Canny thresholds must satisfy 0 <= low <= high, got low={} high={}",
                low, high
            )));
        }

        let gray = to_grayscale(source)?;
        let gray = match self.blur_sigma {
            Some(sigma) if sigma > 0.0 => gaussian_blur(&gray, sigma),
            _ => gray,
        };

        let edges = canny_edges(&gray, low, high);
        tracing::debug!(
            width = edges.width(),
            height = edges.height(),
            low,
            high,
            edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count(),
            "Detected edges"
        );

        Ok(IntensityBuffer::from_gray_image(edges))
    }
}

/// Apply Gaussian blur for noise reduction
pub fn gaussian_blur(image: &GrayImage, sigma: f32) -> GrayImage {
    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Apply Canny edge detection
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    imageproc::edges::canny(image, low_threshold, high_threshold)
}

/// Convert any supported buffer into a grayscale image.
///
/// Single-channel buffers are copied as-is; gray+alpha keeps the gray
/// channel; RGB and RGBA use the ITU-R BT.601 luminance weights.
pub fn to_grayscale(buffer: &IntensityBuffer) -> Result<GrayImage> {
    if buffer.is_empty() {
        return Err(Error::EmptyBuffer {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let (width, height) = (buffer.width(), buffer.height());
    let channels = buffer.channels();

    if channels == 1 {
        let packed = buffer.to_packed();
        let actual = packed.len();
        return GrayImage::from_raw(width, height, packed).ok_or(Error::InvalidBufferLayout {
            expected: width as usize * height as usize,
            actual,
        });
    }
    if channels > 4 {
        return Err(Error::UnsupportedChannels(channels));
    }

    let mut gray = GrayImage::new(width, height);
    for y in 0..height {
        let row = buffer.row(y);
        for (x, px) in row.chunks_exact(channels as usize).enumerate() {
            let luma = match channels {
                2 => px[0],
                _ => {
                    let r = px[0] as f32;
                    let g = px[1] as f32;
                    let b = px[2] as f32;
                    // Standard luminance formula (ITU-R BT.601)
                    (0.299 * r + 0.587 * g + 0.114 * b).round() as u8
                }
            };
            gray.put_pixel(x as u32, y, Luma([luma]));
        }
    }

    Ok(gray)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of raw sample buffers into displayable RGBA previews
//!
//! Single-channel rasters (grayscale sources, Canny output) take a direct
//! copy: every sample `v` becomes the pixel `(v, v, v, 255)`, with output
//! pixel index equal to input sample index. Packed gray+alpha, RGB and RGBA
//! buffers are swizzled directly as well. Buffers that cannot be read as one
//! packed slice fall back to a PNG encode/decode round trip.

use crate::error::{Error, Result};
use crate::types::IntensityBuffer;
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

/// Which conversion produced a [`DisplayImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPath {
    /// Single-channel identity copy
    Gray,
    /// Direct channel swizzle of a packed multi-channel buffer
    Swizzle,
    /// PNG encode/decode round trip
    Encoded,
}

/// RGBA8 image ready to hand to a host for display
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayImage {
    pixels: RgbaImage,
    path: ConversionPath,
}

impl DisplayImage {
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGBA value at `(x, y)`
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels.get_pixel(x, y).0
    }

    /// Row-major RGBA bytes
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn path(&self) -> ConversionPath {
        self.path
    }

    pub fn into_rgba(self) -> RgbaImage {
        self.pixels
    }
}

/// Convert a raw buffer into a display image.
///
/// Only a zero-sized buffer is a hard error; layouts that cannot be read
/// directly are converted through the encoded path instead.
pub fn convert(buffer: &IntensityBuffer) -> Result<DisplayImage> {
    if buffer.is_empty() {
        return Err(Error::EmptyBuffer {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let channels = buffer.channels();
    if channels > 4 {
        return Err(Error::UnsupportedChannels(channels));
    }

    let raw = match buffer.as_raw() {
        Ok(raw) => raw,
        Err(Error::UnreadableBuffer) => {
            tracing::debug!(
                width = buffer.width(),
                height = buffer.height(),
                stride = buffer.stride(),
                "Buffer not packed, using encoded conversion"
            );
            return convert_encoded(buffer);
        }
        Err(e) => return Err(e),
    };

    let (width, height) = (buffer.width(), buffer.height());
    if channels == 1 {
        let rgba = gray_to_rgba(raw);
        return finish(width, height, rgba, ConversionPath::Gray);
    }

    let rgba = swizzle_to_rgba(raw, channels);
    finish(width, height, rgba, ConversionPath::Swizzle)
}

/// Replicate each gray sample across RGB with an opaque alpha
#[inline]
fn gray_to_rgba(raw: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(raw.len() * 4);
    for &v in raw {
        rgba.extend_from_slice(&[v, v, v, 255]);
    }
    rgba
}

fn swizzle_to_rgba(raw: &[u8], channels: u8) -> Vec<u8> {
    let pixel_count = raw.len() / channels as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);
    match channels {
        2 => {
            for px in raw.chunks_exact(2) {
                rgba.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
            }
        }
        3 => {
            for px in raw.chunks_exact(3) {
                rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
        }
        _ => rgba.extend_from_slice(raw),
    }
    rgba
}

/// Re-encode the buffer as PNG in memory, then decode it as RGBA8
fn convert_encoded(buffer: &IntensityBuffer) -> Result<DisplayImage> {
    let (width, height) = (buffer.width(), buffer.height());
    let packed = buffer.to_packed();
    let actual = packed.len();
    let layout_error = || Error::InvalidBufferLayout {
        expected: width as usize * height as usize * buffer.channels() as usize,
        actual,
    };

    let source = match buffer.channels() {
        1 => DynamicImage::ImageLuma8(
            GrayImage::from_raw(width, height, packed).ok_or_else(layout_error)?,
        ),
        2 => DynamicImage::ImageLumaA8(
            GrayAlphaImage::from_raw(width, height, packed).ok_or_else(layout_error)?,
        ),
        3 => DynamicImage::ImageRgb8(
            RgbImage::from_raw(width, height, packed).ok_or_else(layout_error)?,
        ),
        4 => DynamicImage::ImageRgba8(
            RgbaImage::from_raw(width, height, packed).ok_or_else(layout_error)?,
        ),
        n => return Err(Error::UnsupportedChannels(n)),
    };

    let mut png = Vec::new();
    source.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)?;

    Ok(DisplayImage {
        pixels: decoded.to_rgba8(),
        path: ConversionPath::Encoded,
    })
}

fn finish(width: u32, height: u32, rgba: Vec<u8>, path: ConversionPath) -> Result<DisplayImage> {
    let actual = rgba.len();
    let pixels = RgbaImage::from_raw(width, height, rgba).ok_or(Error::InvalidBufferLayout {
        expected: width as usize * height as usize * 4,
        actual,
    })?;
    Ok(DisplayImage { pixels, path })
}

/// Holder for a displayed preview.
///
/// Replacing the image drops the previous one before the new one is stored.
#[derive(Debug, Default)]
pub struct PreviewSlot {
    image: Option<DisplayImage>,
}

impl PreviewSlot {
    pub fn new() -> Self {
        Self { image: None }
    }

    /// Release the current image, then convert and store the new one
    pub fn show(&mut self, buffer: &IntensityBuffer) -> Result<&DisplayImage> {
        self.image = None;
        let image = self.image.insert(convert(buffer)?);
        Ok(&*image)
    }

    /// Release the current image
    pub fn release(&mut self) {
        self.image = None;
    }

    pub fn get(&self) -> Option<&DisplayImage> {
        self.image.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_fast_path() {
        let buffer = IntensityBuffer::new(2, 2, 1, vec![10, 20, 30, 40]).unwrap();
        let image = convert(&buffer).unwrap();

        assert_eq!(image.path(), ConversionPath::Gray);
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        assert_eq!(
            image.as_raw(),
            &[10, 10, 10, 255, 20, 20, 20, 255, 30, 30, 30, 255, 40, 40, 40, 255]
        );
        assert_eq!(image.pixel(1, 0), [20, 20, 20, 255]);
        assert_eq!(image.pixel(0, 1), [30, 30, 30, 255]);
    }

    #[test]
    fn test_gray_matches_every_sample() {
        let samples: Vec<u8> = (0..=255).collect();
        let buffer = IntensityBuffer::new(16, 16, 1, samples.clone()).unwrap();
        let image = convert(&buffer).unwrap();

        for (i, v) in samples.iter().enumerate() {
            let (x, y) = ((i % 16) as u32, (i / 16) as u32);
            assert_eq!(image.pixel(x, y), [*v, *v, *v, 255]);
        }
    }

    #[test]
    fn test_empty_buffer_fails() {
        let buffer = IntensityBuffer::new(0, 0, 1, vec![]).unwrap();
        assert!(matches!(
            convert(&buffer),
            Err(Error::EmptyBuffer {
                width: 0,
                height: 0
            })
        ));

        let buffer = IntensityBuffer::new(4, 0, 3, vec![]).unwrap();
        assert!(matches!(convert(&buffer), Err(Error::EmptyBuffer { .. })));
    }

    #[test]
    fn test_rgb_swizzle() {
        let buffer = IntensityBuffer::new(2, 1, 3, vec![255, 0, 0, 1, 2, 3]).unwrap();
        let image = convert(&buffer).unwrap();

        assert_eq!(image.path(), ConversionPath::Swizzle);
        assert_eq!(image.pixel(0, 0), [255, 0, 0, 255]);
        assert_eq!(image.pixel(1, 0), [1, 2, 3, 255]);
    }

    #[test]
    fn test_gray_alpha_and_rgba() {
        let la = IntensityBuffer::new(1, 1, 2, vec![90, 128]).unwrap();
        assert_eq!(convert(&la).unwrap().pixel(0, 0), [90, 90, 90, 128]);

        let rgba = IntensityBuffer::new(1, 1, 4, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(convert(&rgba).unwrap().pixel(0, 0), [1, 2, 3, 4]);
    }

    #[test]
    fn test_strided_gray_uses_encoded_path() {
        let buffer =
            IntensityBuffer::with_stride(2, 2, 1, 3, vec![10, 20, 99, 30, 40, 99]).unwrap();
        let image = convert(&buffer).unwrap();

        assert_eq!(image.path(), ConversionPath::Encoded);
        let packed = IntensityBuffer::new(2, 2, 1, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(image.as_raw(), convert(&packed).unwrap().as_raw());
    }

    #[test]
    fn test_strided_rgb_uses_encoded_path() {
        let buffer =
            IntensityBuffer::with_stride(1, 2, 3, 4, vec![1, 2, 3, 0, 4, 5, 6, 0]).unwrap();
        let image = convert(&buffer).unwrap();

        assert_eq!(image.path(), ConversionPath::Encoded);
        assert_eq!(image.pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(image.pixel(0, 1), [4, 5, 6, 255]);
    }

    #[test]
    fn test_too_many_channels() {
        let buffer = IntensityBuffer::new(1, 1, 5, vec![0; 5]).unwrap();
        assert!(matches!(convert(&buffer), Err(Error::UnsupportedChannels(5))));
    }

    #[test]
    fn test_preview_slot_replaces_image() {
        let mut slot = PreviewSlot::new();
        assert!(slot.is_empty());

        let first = IntensityBuffer::new(1, 1, 1, vec![7]).unwrap();
        slot.show(&first).unwrap();
        assert_eq!(slot.get().unwrap().pixel(0, 0), [7, 7, 7, 255]);

        let second = IntensityBuffer::new(2, 1, 1, vec![8, 9]).unwrap();
        slot.show(&second).unwrap();
        let shown = slot.get().unwrap();
        assert_eq!(shown.width(), 2);
        assert_eq!(shown.pixel(1, 0), [9, 9, 9, 255]);

        slot.release();
        assert!(slot.is_empty());
    }

    #[test]
    fn test_failed_show_leaves_slot_empty() {
        let mut slot = PreviewSlot::new();
        slot.show(&IntensityBuffer::new(1, 1, 1, vec![1]).unwrap()).unwrap();

        let empty = IntensityBuffer::new(0, 0, 1, vec![]).unwrap();
        assert!(slot.show(&empty).is_err());
        assert!(slot.is_empty());
    }
}

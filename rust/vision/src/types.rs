// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for blueprint rasters and traced room outlines

use crate::error::{Error, Result};
use blueprint3d_geometry::signed_area;
use image::GrayImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Raw 2D sample buffer: a loaded blueprint or an edge raster.
///
/// Samples are row-major with `channels` interleaved bytes per pixel. Rows
/// are normally packed (`stride == width * channels`); a buffer built with
/// [`IntensityBuffer::with_stride`] may carry padding at the end of each row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityBuffer {
    width: u32,
    height: u32,
    channels: u8,
    stride: usize,
    samples: Vec<u8>,
}

impl IntensityBuffer {
    /// Create a packed buffer. `samples.len()` must equal
    /// `width * height * channels`.
    pub fn new(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Result<Self> {
        let row = width as usize * channels as usize;
        Self::with_stride(width, height, channels, row, samples)
    }

    /// Create a buffer whose rows are `stride` bytes apart
    pub fn with_stride(
        width: u32,
        height: u32,
        channels: u8,
        stride: usize,
        samples: Vec<u8>,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(Error::UnsupportedChannels(0));
        }

        let row = width as usize * channels as usize;
        if stride < row {
            return Err(Error::InvalidBufferLayout {
                expected: row.saturating_mul(height as usize),
                actual: stride.saturating_mul(height as usize),
            });
        }

        let expected = stride
            .checked_mul(height as usize)
            .ok_or(Error::InvalidBufferLayout {
                expected: usize::MAX,
                actual: samples.len(),
            })?;
        if samples.len() != expected {
            return Err(Error::InvalidBufferLayout {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            channels,
            stride,
            samples,
        })
    }

    /// Wrap a single-channel image without copying
    pub fn from_gray_image(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: 1,
            stride: width as usize,
            samples: image.into_raw(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Bytes between the starts of consecutive rows
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// True when the buffer has no pixels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes of pixel data in one row (excluding padding)
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Samples of row `y`, without padding
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.samples[start..start + self.row_len()]
    }

    /// All samples as one packed slice.
    ///
    /// Fails with [`Error::UnreadableBuffer`] when rows are padded.
    #[inline]
    pub fn as_raw(&self) -> Result<&[u8]> {
        if self.stride == self.row_len() {
            Ok(&self.samples)
        } else {
            Err(Error::UnreadableBuffer)
        }
    }

    /// Copy the pixel data into a packed vector, dropping row padding
    pub fn to_packed(&self) -> Vec<u8> {
        if let Ok(raw) = self.as_raw() {
            return raw.to_vec();
        }
        let mut packed = Vec::with_capacity(self.row_len() * self.height as usize);
        for y in 0..self.height {
            packed.extend_from_slice(self.row(y));
        }
        packed
    }
}

/// Integer pixel coordinate (`x` = column, `y` = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Ordered boundary of a traced region in pixel space, implicitly closed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PolygonLoop {
    pub points: Vec<PixelPoint>,
}

impl PolygonLoop {
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    /// Create a loop from `(x, y)` pixel pairs
    pub fn from_coords(coords: &[(i32, i32)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, y)| PixelPoint::new(x, y)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed shoelace area in square pixels
    pub fn signed_area(&self) -> f64 {
        let points: Vec<Point2<f64>> = self
            .points
            .iter()
            .map(|p| Point2::new(p.x as f64, p.y as f64))
            .collect();
        signed_area(&points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_buffer() {
        let buffer = IntensityBuffer::new(2, 2, 1, vec![10, 20, 30, 40]).unwrap();
        assert_eq!(buffer.as_raw().unwrap(), &[10, 20, 30, 40]);
        assert_eq!(buffer.row(1), &[30, 40]);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_layout_mismatch() {
        let result = IntensityBuffer::new(2, 2, 3, vec![0; 4]);
        assert!(matches!(
            result,
            Err(Error::InvalidBufferLayout {
                expected: 12,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(matches!(
            IntensityBuffer::new(1, 1, 0, vec![]),
            Err(Error::UnsupportedChannels(0))
        ));
    }

    #[test]
    fn test_strided_buffer_is_unreadable() {
        let buffer = IntensityBuffer::with_stride(2, 2, 1, 4, vec![1, 2, 0, 0, 3, 4, 0, 0]).unwrap();
        assert!(matches!(buffer.as_raw(), Err(Error::UnreadableBuffer)));
        assert_eq!(buffer.row(1), &[3, 4]);
        assert_eq!(buffer.to_packed(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_stride_too_small() {
        assert!(IntensityBuffer::with_stride(4, 1, 1, 2, vec![0; 2]).is_err());
    }

    #[test]
    fn test_stride_overflow_rejected() {
        let result = IntensityBuffer::with_stride(1, 2, 1, usize::MAX, vec![0; 4]);
        assert!(matches!(
            result,
            Err(Error::InvalidBufferLayout { actual: 4, .. })
        ));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = IntensityBuffer::new(0, 5, 1, vec![]).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_from_gray_image() {
        let img = GrayImage::from_raw(3, 1, vec![1, 2, 3]).unwrap();
        let buffer = IntensityBuffer::from_gray_image(img);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 1);
        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.as_raw().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_loop_area() {
        let square = PolygonLoop::from_coords(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_eq!(square.signed_area(), 100.0);

        let mut reversed = square.clone();
        reversed.points.reverse();
        assert_eq!(reversed.signed_area(), -100.0);
    }

    #[test]
    fn test_loop_area_matches_world_area() {
        let lshape = PolygonLoop::from_coords(&[(0, 0), (20, 0), (20, 10), (10, 10), (10, 30), (0, 30)]);
        let world: Vec<Point2<f64>> = lshape
            .points
            .iter()
            .map(|p| Point2::new(p.x as f64, p.y as f64))
            .collect();
        assert_eq!(lshape.signed_area(), 400.0);
        assert_eq!(lshape.signed_area(), signed_area(&world));
        assert_eq!(PolygonLoop::from_coords(&[(0, 0), (5, 5)]).signed_area(), 0.0);
    }
}

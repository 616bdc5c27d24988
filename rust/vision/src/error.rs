// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for blueprint processing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while previewing or meshing a blueprint
#[derive(Error, Debug)]
pub enum Error {
    #[error("Empty buffer: {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },

    /// The samples are not stored as one contiguous row-major slice.
    #[error("Buffer cannot be read as raw samples")]
    UnreadableBuffer,

    #[error("Invalid buffer layout: expected {expected} samples, got {actual}")]
    InvalidBufferLayout { expected: usize, actual: usize },

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u8),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] blueprint3d_geometry::Error),

    #[error("No edge image available, load a source image first")]
    NoEdges,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint edge previews and 3D wall reconstruction
//!
//! This crate provides the pipeline from a floor plan raster to wall meshes:
//! 1. Converting raw sample buffers into displayable RGBA previews
//! 2. Detecting edges with a user-adjustable Canny threshold
//! 3. Tracing room outlines and rejecting noise contours by area
//! 4. Extruding every surviving outline into a vertical wall ribbon
//!
//! # Usage
//!
//! ```rust,ignore
//! use blueprint3d_vision::{BlueprintConfig, IntensityBuffer, ModelCollection, PreviewSession};
//!
//! let mut session = PreviewSession::new(BlueprintConfig::default());
//! session.load(IntensityBuffer::from_gray_image(grayscale))?;
//! session.set_threshold(60.0)?;
//!
//! let mut model = ModelCollection::default();
//! let report = session.generate(&mut model)?;
//! println!("{} rooms", report.created);
//! ```

pub mod assembly;
pub mod config;
pub mod contours;
pub mod error;
pub mod image_ops;
pub mod obj;
pub mod polygon_filter;
pub mod preview;
pub mod session;
pub mod types;

// Re-export commonly used types and functions
pub use assembly::{DetachedRoot, ModelCollection, RegenerateReport, Room, SceneRoot, WallParams};
pub use blueprint3d_geometry::{extrude_walls, Mesh, WallMesh, WindingPolicy, WorldLoop};
pub use config::BlueprintConfig;
pub use contours::{compress_chain, BorderFollowingTracer, ChainApproximation, ContourTracer};
pub use error::{Error, Result};
pub use image_ops::{to_grayscale, CannyEdgeDetector, EdgeDetector};
pub use obj::write_obj;
pub use polygon_filter::{filter_loops, filter_loops_with_stats, FilterStats};
pub use preview::{convert, ConversionPath, DisplayImage, PreviewSlot};
pub use session::PreviewSession;
pub use types::{IntensityBuffer, PixelPoint, PolygonLoop};

/// Trace an edge raster and build wall meshes in a fresh headless model.
///
/// Convenience for one-shot conversion without a preview session.
pub fn edges_to_walls(edges: &IntensityBuffer, config: &BlueprintConfig) -> Result<ModelCollection> {
    config.validate()?;
    let loops = BorderFollowingTracer::default().trace(edges)?;
    let mut model = ModelCollection::new(DetachedRoot);
    model.regenerate(&loops, &config.wall_params());
    Ok(model)
}

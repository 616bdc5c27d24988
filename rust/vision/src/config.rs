// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint processing configuration

use crate::assembly::WallParams;
use crate::error::{Error, Result};
use blueprint3d_geometry::WindingPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for preview, contour cleanup and wall generation.
///
/// Missing fields in a JSON document fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintConfig {
    /// Wall height in meters
    pub wall_height: f64,
    /// World units per pixel
    pub pixel_to_meter: f64,
    /// Loops with smaller absolute area (square pixels) are dropped
    pub min_contour_area: f64,
    /// Low Canny threshold
    pub threshold: f32,
    /// High Canny threshold as a multiple of `threshold`
    pub high_threshold_ratio: f32,
    /// Orientation applied to loops before extrusion
    pub winding: WindingPolicy,
}

impl Default for BlueprintConfig {
    fn default() -> Self {
        Self {
            wall_height: 3.0,
            pixel_to_meter: 0.01, // 1 px = 1 cm
            min_contour_area: 50.0,
            threshold: 100.0,
            high_threshold_ratio: 2.0,
            winding: WindingPolicy::Outward,
        }
    }
}

impl BlueprintConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.wall_height.is_finite() || self.wall_height <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "wall_height must be positive, got {}",
                self.wall_height
            )));
        }
        if !self.pixel_to_meter.is_finite() || self.pixel_to_meter <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "pixel_to_meter must be positive, got {}",
                self.pixel_to_meter
            )));
        }
        if !self.min_contour_area.is_finite() || self.min_contour_area < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_contour_area must be non-negative, got {}",
                self.min_contour_area
            )));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "threshold must be non-negative, got {}",
                self.threshold
            )));
        }
        if !self.high_threshold_ratio.is_finite() || self.high_threshold_ratio < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "high_threshold_ratio must be at least 1, got {}",
                self.high_threshold_ratio
            )));
        }
        Ok(())
    }

    /// High Canny threshold for the current `threshold`
    #[inline]
    pub fn high_threshold(&self) -> f32 {
        self.high_threshold_for(self.threshold)
    }

    #[inline]
    pub fn high_threshold_for(&self, threshold: f32) -> f32 {
        threshold * self.high_threshold_ratio
    }

    /// Parameters for [`ModelCollection::regenerate`](crate::ModelCollection::regenerate)
    pub fn wall_params(&self) -> WallParams {
        WallParams {
            min_area: self.min_contour_area,
            scale: self.pixel_to_meter,
            height: self.wall_height,
            winding: self.winding,
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room outline tracing on edge rasters

use crate::error::Result;
use crate::image_ops::to_grayscale;
use crate::types::{IntensityBuffer, PixelPoint, PolygonLoop};
use imageproc::contours::{find_contours, BorderType, Contour};
use serde::{Deserialize, Serialize};

/// Extracts ordered boundary loops from a binary edge raster
pub trait ContourTracer {
    /// Trace the outermost boundaries of the foreground (non-zero) regions
    fn trace(&self, edges: &IntensityBuffer) -> Result<Vec<PolygonLoop>>;
}

/// How traced pixel chains are reduced before they are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChainApproximation {
    /// Keep every boundary pixel
    None,
    /// Collapse straight horizontal, vertical and diagonal runs to their
    /// endpoints
    #[default]
    Simple,
}

/// Suzuki-Abe border following via `imageproc::contours::find_contours`.
///
/// Only outer borders without a parent are reported, so holes and regions
/// nested inside other regions are skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderFollowingTracer {
    pub approximation: ChainApproximation,
}

impl BorderFollowingTracer {
    pub fn new(approximation: ChainApproximation) -> Self {
        Self { approximation }
    }
}

impl ContourTracer for BorderFollowingTracer {
    fn trace(&self, edges: &IntensityBuffer) -> Result<Vec<PolygonLoop>> {
        let gray = to_grayscale(edges)?;
        let contours: Vec<Contour<i32>> = find_contours(&gray);
        let total = contours.len();

        let loops: Vec<PolygonLoop> = contours
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
            .map(|c| {
                let mut points: Vec<PixelPoint> =
                    c.points.iter().map(|p| PixelPoint::new(p.x, p.y)).collect();
                points.dedup();
                if points.len() > 1 && points.first() == points.last() {
                    points.pop();
                }
                let points = match self.approximation {
                    ChainApproximation::None => points,
                    ChainApproximation::Simple => compress_chain(&points),
                };
                PolygonLoop::new(points)
            })
            .collect();

        tracing::debug!(
            contours = total,
            external = loops.len(),
            "Traced room outlines"
        );

        Ok(loops)
    }
}

/// Drop every point of a closed chain that continues in the same direction
/// as the step leading into it.
pub fn compress_chain(points: &[PixelPoint]) -> Vec<PixelPoint> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: PixelPoint, b: PixelPoint| ((b.x - a.x).signum(), (b.y - a.y).signum());

    let kept: Vec<PixelPoint> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect();

    if kept.is_empty() {
        points.to_vec()
    } else {
        kept
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Noise rejection and pixel-to-world scaling of traced loops

use crate::types::{PixelPoint, PolygonLoop};
use blueprint3d_geometry::WorldLoop;
use nalgebra::Point2;
use rustc_hash::FxHashSet;

/// Counters gathered while filtering one contour set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    /// Loops offered to the filter
    pub input: usize,
    /// Loops whose absolute area was below the threshold
    pub too_small: usize,
    /// Loops with fewer than 3 distinct points
    pub degenerate: usize,
    /// Loops passed on as world loops
    pub retained: usize,
}

impl FilterStats {
    /// Loops dropped for any reason
    #[inline]
    pub fn rejected(&self) -> usize {
        self.too_small + self.degenerate
    }
}

/// Drop noise loops and scale the survivors into world units.
///
/// A loop is dropped when `abs(area) < min_area` (shoelace area on the raw
/// pixel coordinates) or when it has fewer than 3 distinct points. Survivors
/// keep their relative order and their exact point order and count; pixel
/// `(px, py)` becomes world `(px * scale, py * scale)` on the X-Z plane.
pub fn filter_loops(loops: &[PolygonLoop], min_area: f64, scale: f64) -> Vec<WorldLoop> {
    filter_loops_with_stats(loops, min_area, scale).0
}

/// Same as [`filter_loops`], also reporting what was dropped
pub fn filter_loops_with_stats(
    loops: &[PolygonLoop],
    min_area: f64,
    scale: f64,
) -> (Vec<WorldLoop>, FilterStats) {
    let mut stats = FilterStats {
        input: loops.len(),
        ..Default::default()
    };
    let mut retained = Vec::with_capacity(loops.len());

    for polygon in loops {
        if polygon.signed_area().abs() < min_area {
            stats.too_small += 1;
            continue;
        }
        if distinct_points(&polygon.points) < 3 {
            stats.degenerate += 1;
            continue;
        }
        retained.push(to_world(polygon, scale));
    }

    stats.retained = retained.len();
    tracing::debug!(
        input = stats.input,
        too_small = stats.too_small,
        degenerate = stats.degenerate,
        retained = stats.retained,
        "Filtered contour loops"
    );

    (retained, stats)
}

fn distinct_points(points: &[PixelPoint]) -> usize {
    // Early out: a loop with fewer than 3 entries cannot have 3 distinct points
    if points.len() < 3 {
        return points.len();
    }
    points.iter().copied().collect::<FxHashSet<_>>().len()
}

fn to_world(polygon: &PolygonLoop, scale: f64) -> WorldLoop {
    WorldLoop::new(
        polygon
            .points
            .iter()
            .map(|p| Point2::new(p.x as f64 * scale, p.y as f64 * scale))
            .collect(),
    )
}

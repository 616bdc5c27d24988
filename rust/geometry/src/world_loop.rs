// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed polygon loops on the ground plane

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Closed polygon loop in world units on the X-Z ground plane.
///
/// `Point2::x` holds world X and `Point2::y` holds world Z. The loop is
/// implicitly closed: the last point connects back to the first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorldLoop {
    pub points: Vec<Point2<f64>>,
}

impl WorldLoop {
    /// Create a loop from ground-plane points
    pub fn new(points: Vec<Point2<f64>>) -> Self {
        Self { points }
    }

    /// Create a loop from `(x, z)` pairs
    pub fn from_xz(coords: &[(f64, f64)]) -> Self {
        Self {
            points: coords.iter().map(|&(x, z)| Point2::new(x, z)).collect(),
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

    /// Signed area in the (x, z) plane using the shoelace formula.
    ///
    /// Positive when the loop turns from +X towards +Z.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }

    /// Orientation of the loop, `None` for zero-area loops
    pub fn winding(&self) -> Option<Winding> {
        let area = self.signed_area();
        if area > 0.0 {
            Some(Winding::Positive)
        } else if area < 0.0 {
            Some(Winding::Negative)
        } else {
            None
        }
    }

    /// Reverse the point order in place, flipping the winding
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Reorient the loop so that extruded walls face away from its interior.
    ///
    /// Returns `true` if the point order was reversed.
    pub fn orient_outward(&mut self) -> bool {
        if self.winding() == Some(Winding::Negative) {
            self.reverse();
            true
        } else {
            false
        }
    }

    /// Arithmetic mean of the loop points
    pub fn centroid(&self) -> Point2<f64> {
        if self.points.is_empty() {
            return Point2::origin();
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2::new(sx / n, sy / n)
    }
}

/// Rotational direction of a loop in the (x, z) plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winding {
    /// Positive shoelace area; extruded walls face outward
    Positive,
    /// Negative shoelace area; extruded walls face inward
    Negative,
}

/// How loops are oriented before they are extruded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindingPolicy {
    /// Reverse negatively wound loops so every wall faces outward
    #[default]
    Outward,
    /// Keep the orientation produced by the contour tracer
    AsTraced,
}

/// Shoelace area of an implicitly closed polygon (signed)
pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }

    area / 2.0
}

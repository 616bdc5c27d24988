// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint3D Geometry
//!
//! Turns closed ground-plane loops into vertical wall meshes using
//! nalgebra for vector math.

pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod world_loop;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use error::{Error, Result};
pub use extrusion::extrude_walls;
pub use mesh::{calculate_normals, Mesh, WallMesh};
pub use world_loop::{signed_area, Winding, WindingPolicy, WorldLoop};

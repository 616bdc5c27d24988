// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion of ground-plane loops into vertical wall ribbons

use crate::error::{Error, Result};
use crate::mesh::{calculate_normals, Mesh, WallMesh};
use crate::world_loop::WorldLoop;
use nalgebra::{Point3, Vector3};

/// Extrude a closed loop upwards (+Y) into an open wall ribbon.
///
/// Vertex `2i` is the bottom of loop point `i` (Y = 0) and vertex `2i + 1`
/// its top (Y = `height`). Every edge `i -> i + 1` (wrapping) becomes the two
/// triangles `(b0, t0, t1)` and `(b0, t1, b1)`. No floor or ceiling caps are
/// generated and the loop orientation is used as given: a loop with positive
/// signed area in (x, z) produces outward-facing normals.
pub fn extrude_walls(world_loop: &WorldLoop, height: f64) -> Result<WallMesh> {
    let count = world_loop.len();
    if count < 3 {
        return Err(Error::DegenerateLoop(format!(
            "loop has {} points, at least 3 are required",
            count
        )));
    }
    if !height.is_finite() || height <= 0.0 {
        return Err(Error::DegenerateLoop(format!(
            "wall height must be positive, got {}",
            height
        )));
    }

    let mut mesh = Mesh::with_capacity(count * 2, count * 6);

    for p in &world_loop.points {
        mesh.add_vertex(Point3::new(p.x, 0.0, p.y), Vector3::zeros());
        mesh.add_vertex(Point3::new(p.x, height, p.y), Vector3::zeros());
    }

    for i in 0..count {
        let next = (i + 1) % count;
        let b0 = (i * 2) as u32;
        let t0 = b0 + 1;
        let b1 = (next * 2) as u32;
        let t1 = b1 + 1;

        mesh.add_triangle(b0, t0, t1);
        mesh.add_triangle(b0, t1, b1);
    }

    calculate_normals(&mut mesh);

    tracing::trace!(
        points = count,
        height,
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "Extruded wall ribbon"
    );

    Ok(mesh)
}

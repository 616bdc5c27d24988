// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export of generated wall models

use crate::assembly::{ModelCollection, SceneRoot};
use std::io::{self, Write};

/// Write every room as its own OBJ object.
///
/// Meshes are already Y-up, so positions and normals are written as-is.
/// Faces reference positions and normals with the same 1-based global index.
pub fn write_obj<W: Write, R: SceneRoot>(out: &mut W, model: &ModelCollection<R>) -> io::Result<()> {
    let (vertices, triangles) = model.rooms().iter().fold((0, 0), |(v, t), room| {
        (v + room.mesh.vertex_count(), t + room.mesh.triangle_count())
    });

    writeln!(out, "# Generated by blueprint3d")?;
    writeln!(
        out,
        "# {} rooms, {} vertices, {} triangles",
        model.len(),
        vertices,
        triangles
    )?;
    writeln!(out, "# Coordinate system: Y-up")?;

    let mut vertex_offset: u32 = 0;

    for room in model.rooms() {
        let mesh = &room.mesh;
        writeln!(out)?;
        writeln!(out, "o {}", room.name)?;

        for p in mesh.positions.chunks_exact(3) {
            writeln!(out, "v {:.6} {:.6} {:.6}", p[0], p[1], p[2])?;
        }
        for n in mesh.normals.chunks_exact(3) {
            writeln!(out, "vn {:.6} {:.6} {:.6}", n[0], n[1], n[2])?;
        }
        for tri in mesh.indices.chunks_exact(3) {
            let i0 = tri[0] + vertex_offset + 1;
            let i1 = tri[1] + vertex_offset + 1;
            let i2 = tri[2] + vertex_offset + 1;
            writeln!(out, "f {i0}//{i0} {i1}//{i1} {i2}//{i2}")?;
        }

        vertex_offset += mesh.vertex_count() as u32;
    }

    Ok(())
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall model assembly from traced room outlines

use crate::polygon_filter::filter_loops_with_stats;
use crate::types::PolygonLoop;
use blueprint3d_geometry::{extrude_walls, Mesh, WallMesh, WindingPolicy, WorldLoop};

/// Host container that generated rooms are attached to
pub trait SceneRoot {
    /// Host-side handle for one attached mesh
    type Node;

    fn attach(&mut self, name: &str, mesh: &WallMesh) -> Self::Node;

    fn detach(&mut self, node: Self::Node);
}

/// Root for headless use: nothing is displayed, rooms only live in the
/// collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetachedRoot;

impl SceneRoot for DetachedRoot {
    type Node = ();

    fn attach(&mut self, _name: &str, _mesh: &WallMesh) -> Self::Node {}

    fn detach(&mut self, _node: Self::Node) {}
}

/// Wall generation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallParams {
    /// Minimum absolute loop area in square pixels
    pub min_area: f64,
    /// World units per pixel
    pub scale: f64,
    /// Wall height in world units
    pub height: f64,
    pub winding: WindingPolicy,
}

/// One generated wall mesh and its host node
#[derive(Debug)]
pub struct Room<N> {
    pub name: String,
    pub mesh: WallMesh,
    pub node: N,
}

/// Outcome of one [`ModelCollection::regenerate`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegenerateReport {
    /// Raw loops offered
    pub input: usize,
    /// Loops dropped by the polygon filter
    pub filtered_out: usize,
    /// Meshes added to the collection
    pub created: usize,
    /// Loops that survived filtering but could not be extruded
    pub skipped: usize,
}

/// Wall meshes currently instantiated under one host root
#[derive(Debug)]
pub struct ModelCollection<R: SceneRoot = DetachedRoot> {
    root: R,
    rooms: Vec<Room<R::Node>>,
}

impl Default for ModelCollection<DetachedRoot> {
    fn default() -> Self {
        Self::new(DetachedRoot)
    }
}

impl<R: SceneRoot> ModelCollection<R> {
    pub fn new(root: R) -> Self {
        Self {
            root,
            rooms: Vec::new(),
        }
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn rooms(&self) -> &[Room<R::Node>] {
        &self.rooms
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Filter `raw_loops`, extrude every survivor and append the meshes.
    ///
    /// Existing rooms are kept; call [`clear`](Self::clear) first to rebuild
    /// from scratch. A loop that fails to extrude is logged and skipped, the
    /// remaining loops are still processed.
    pub fn regenerate(&mut self, raw_loops: &[PolygonLoop], params: &WallParams) -> RegenerateReport {
        let (world_loops, stats) = filter_loops_with_stats(raw_loops, params.min_area, params.scale);

        let mut report = RegenerateReport {
            input: stats.input,
            filtered_out: stats.rejected(),
            ..Default::default()
        };

        let outcomes: Vec<_> = world_loops
            .into_iter()
            .enumerate()
            .map(|(index, world_loop)| (index, build_walls(world_loop, params)))
            .collect();

        for (index, outcome) in outcomes {
            match outcome {
                Ok(mesh) => {
                    let name = format!("Room_{}", self.rooms.len());
                    let node = self.root.attach(&name, &mesh);
                    self.rooms.push(Room { name, mesh, node });
                    report.created += 1;
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping room outline");
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            input = report.input,
            filtered_out = report.filtered_out,
            created = report.created,
            skipped = report.skipped,
            total = self.rooms.len(),
            "Regenerated wall model"
        );

        report
    }

    /// Detach and drop every room. Clearing an empty collection is a no-op.
    pub fn clear(&mut self) {
        if self.rooms.is_empty() {
            return;
        }

        let count = self.rooms.len();
        for room in self.rooms.drain(..) {
            self.root.detach(room.node);
        }
        tracing::debug!(removed = count, "Cleared wall model");
    }

    /// All room meshes merged into one
    pub fn combined_mesh(&self) -> Mesh {
        let vertices = self.rooms.iter().map(|r| r.mesh.vertex_count()).sum();
        let indices = self.rooms.iter().map(|r| r.mesh.indices.len()).sum();

        let mut combined = Mesh::with_capacity(vertices, indices);
        for room in &self.rooms {
            combined.merge(&room.mesh);
        }
        combined
    }
}

fn build_walls(
    mut world_loop: WorldLoop,
    params: &WallParams,
) -> blueprint3d_geometry::Result<WallMesh> {
    if params.winding == WindingPolicy::Outward && world_loop.orient_outward() {
        tracing::trace!(points = world_loop.len(), "Reversed inward-wound loop");
    }
    extrude_walls(&world_loop, params.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WallParams {
        WallParams {
            min_area: 50.0,
            scale: 0.01,
            height: 3.0,
            winding: WindingPolicy::Outward,
        }
    }

    fn square(x: i32, y: i32, size: i32) -> PolygonLoop {
        PolygonLoop::from_coords(&[(x, y), (x + size, y), (x + size, y + size), (x, y + size)])
    }

    /// Records every attach and detach
    #[derive(Default)]
    struct RecordingRoot {
        next: usize,
        attached: Vec<(usize, String)>,
        detached: Vec<usize>,
    }

    impl SceneRoot for RecordingRoot {
        type Node = usize;

        fn attach(&mut self, name: &str, _mesh: &WallMesh) -> usize {
            let id = self.next;
            self.next += 1;
            self.attached.push((id, name.to_string()));
            id
        }

        fn detach(&mut self, node: usize) {
            self.detached.push(node);
        }
    }

    #[test]
    fn test_square_scenario() {
        let mut model = ModelCollection::new(DetachedRoot);
        let report = model.regenerate(&[square(0, 0, 10)], &params());

        assert_eq!(report.created, 1);
        assert_eq!(model.len(), 1);
        let mesh = &model.rooms()[0].mesh;
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 8);
        assert_eq!(model.rooms()[0].name, "Room_0");
    }

    #[test]
    fn test_small_loop_creates_nothing() {
        let mut model = ModelCollection::new(DetachedRoot);
        let small = PolygonLoop::from_coords(&[(0, 0), (5, 0), (5, 2), (0, 2)]);
        let report = model.regenerate(&[small], &params());

        assert_eq!(report.created, 0);
        assert_eq!(report.filtered_out, 1);
        assert!(model.is_empty());
    }

    #[test]
    fn test_valid_and_degenerate_mix() {
        let loops = vec![
            square(0, 0, 10),
            PolygonLoop::from_coords(&[(0, 0), (40, 40)]),
            square(100, 0, 20),
            PolygonLoop::from_coords(&[(0, 0), (1, 0), (1, 1)]),
            square(0, 100, 30),
        ];
        let mut model = ModelCollection::new(DetachedRoot);
        let report = model.regenerate(&loops, &params());

        assert_eq!(report.input, 5);
        assert_eq!(report.created, 3);
        assert_eq!(report.filtered_out, 2);
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_extrusion_failures_are_skipped() {
        let mut model = ModelCollection::new(DetachedRoot);
        let flat = WallParams {
            height: 0.0,
            ..params()
        };
        let report = model.regenerate(&[square(0, 0, 10), square(50, 50, 10)], &flat);

        assert_eq!(report.created, 0);
        assert_eq!(report.skipped, 2);
        assert!(model.is_empty());
    }

    #[test]
    fn test_regenerate_appends() {
        let mut model = ModelCollection::new(DetachedRoot);
        model.regenerate(&[square(0, 0, 10)], &params());
        model.regenerate(&[square(0, 0, 10)], &params());

        assert_eq!(model.len(), 2);
        assert_eq!(model.rooms()[1].name, "Room_1");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut model = ModelCollection::new(DetachedRoot);
        model.regenerate(&[square(0, 0, 10)], &params());

        model.clear();
        assert!(model.is_empty());
        model.clear();
        assert!(model.is_empty());
    }

    #[test]
    fn test_clear_detaches_every_node() {
        let mut model = ModelCollection::new(RecordingRoot::default());
        model.regenerate(&[square(0, 0, 10), square(50, 0, 10)], &params());

        assert_eq!(
            model.root().attached,
            vec![(0, "Room_0".to_string()), (1, "Room_1".to_string())]
        );

        model.clear();
        model.clear();
        assert_eq!(model.root().detached, vec![0, 1]);
    }

    #[test]
    fn test_outward_policy_reverses_clockwise_loop() {
        let clockwise = PolygonLoop::from_coords(&[(0, 0), (0, 10), (10, 10), (10, 0)]);

        let mut outward = ModelCollection::new(DetachedRoot);
        outward.regenerate(&[clockwise.clone()], &params());
        let mut traced = ModelCollection::new(DetachedRoot);
        traced.regenerate(
            &[clockwise],
            &WallParams {
                winding: WindingPolicy::AsTraced,
                ..params()
            },
        );

        // Normals of an outward wall point away from the square's center
        let facing = |mesh: &WallMesh| -> Vec<bool> {
            (0..mesh.vertex_count())
                .map(|i| {
                    let p = mesh.position(i);
                    let n = mesh.normal(i);
                    (p.x - 0.05) * n.x + (p.z - 0.05) * n.z > 0.0
                })
                .collect()
        };
        assert!(facing(&outward.rooms()[0].mesh).iter().all(|&out| out));
        assert!(facing(&traced.rooms()[0].mesh).iter().all(|&out| !out));
    }

    #[test]
    fn test_combined_mesh() {
        let mut model = ModelCollection::new(DetachedRoot);
        model.regenerate(&[square(0, 0, 10), square(50, 0, 10)], &params());

        let combined = model.combined_mesh();
        assert_eq!(combined.vertex_count(), 16);
        assert_eq!(combined.triangle_count(), 16);
        assert_eq!(combined.triangle(8), [8, 9, 11]);
    }
}

//! A simple in-memory polygon mesh with named UV channels.
//!
//! [`PolyMesh`] stores faces as runs of loops (one loop per corner), keeps any
//! number of per-loop UV channels and a selection flag per face. Edge
//! adjacency is derived once by [`PolyMeshBuilder`](super::PolyMeshBuilder).

use nalgebra::{Point2, Point3};

use super::access::UvMesh;
use super::index::{ChannelId, FaceId, LoopId};

/// A named per-loop UV layer.
#[derive(Debug, Clone)]
pub struct UvChannel {
    /// Channel name, unique within a mesh.
    pub name: String,
    /// One coordinate per loop, indexed by [`LoopId`].
    pub coords: Vec<Point2<f64>>,
}

/// A polygon mesh with per-corner UV channels and face selection.
#[derive(Debug, Clone)]
pub struct PolyMesh {
    pub(crate) name: String,

    /// Vertex positions.
    pub(crate) positions: Vec<Point3<f64>>,

    /// Loop range of each face: face `f` owns loops `face_start[f]..face_start[f + 1]`.
    pub(crate) face_start: Vec<usize>,

    /// Vertex index of every loop.
    pub(crate) loop_vertex: Vec<usize>,

    /// Faces sharing an edge with each face.
    pub(crate) adjacency: Vec<Vec<FaceId>>,

    pub(crate) selected: Vec<bool>,

    /// Group names, referenced by `face_groups`.
    pub(crate) groups: Vec<String>,
    pub(crate) face_groups: Vec<Vec<usize>>,

    pub(crate) channels: Vec<UvChannel>,

    /// Bumped every time the UVs are committed.
    pub(crate) uv_revision: u64,
}

impl PolyMesh {
    /// Mesh (object) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of loops (face corners) over all faces.
    #[inline]
    pub fn num_loops(&self) -> usize {
        self.loop_vertex.len()
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Vertex indices of a face, in winding order.
    pub fn face_vertices(&self, f: FaceId) -> &[usize] {
        &self.loop_vertex[self.loop_range(f)]
    }

    /// Vertex a loop belongs to.
    #[inline]
    pub fn loop_vertex(&self, lp: LoopId) -> usize {
        self.loop_vertex[lp.index()]
    }

    fn loop_range(&self, f: FaceId) -> std::ops::Range<usize> {
        self.face_start[f.index()]..self.face_start[f.index() + 1]
    }

    // ==================== Selection ====================

    /// Select or deselect one face.
    pub fn set_selected(&mut self, f: FaceId, selected: bool) {
        self.selected[f.index()] = selected;
    }

    /// Deselect every face.
    pub fn deselect_all(&mut self) {
        self.selected.iter_mut().for_each(|s| *s = false);
    }

    /// Number of selected faces.
    pub fn num_selected(&self) -> usize {
        self.selected.iter().filter(|&&s| s).count()
    }

    /// Add the faces of a named group to the selection.
    ///
    /// Returns the number of faces in the group, 0 if no such group exists.
    pub fn select_group(&mut self, group: &str) -> usize {
        let Some(gi) = self.groups.iter().position(|g| g == group) else {
            return 0;
        };
        let mut count = 0;
        for (f, fg) in self.face_groups.iter().enumerate() {
            if fg.contains(&gi) {
                self.selected[f] = true;
                count += 1;
            }
        }
        count
    }

    // ==================== Groups ====================

    /// Names of the face groups.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Groups a face belongs to, in the order they were declared.
    pub fn face_groups(&self, f: FaceId) -> impl Iterator<Item = &str> + '_ {
        self.face_groups[f.index()]
            .iter()
            .map(|&g| self.groups[g].as_str())
    }

    // ==================== UV channels ====================

    /// Coordinates of a UV channel by name.
    pub fn channel(&self, name: &str) -> Option<&[Point2<f64>]> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.coords.as_slice())
    }

    /// Number of times UVs have been committed.
    pub fn uv_revision(&self) -> u64 {
        self.uv_revision
    }
}

impl UvMesh for PolyMesh {
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn num_faces(&self) -> usize {
        self.selected.len()
    }

    #[inline]
    fn is_selected(&self, face: FaceId) -> bool {
        self.selected[face.index()]
    }

    fn face_loops(&self, face: FaceId) -> impl Iterator<Item = LoopId> + '_ {
        self.loop_range(face).map(LoopId::new)
    }

    fn adjacent_faces(&self, face: FaceId) -> impl Iterator<Item = FaceId> + '_ {
        self.adjacency[face.index()].iter().copied()
    }

    fn find_channel(&self, name: &str) -> Option<ChannelId> {
        self.channels
            .iter()
            .position(|c| c.name == name)
            .map(ChannelId::new)
    }

    #[inline]
    fn uv(&self, channel: ChannelId, lp: LoopId) -> Point2<f64> {
        self.channels[channel.index()].coords[lp.index()]
    }

    #[inline]
    fn set_uv(&mut self, channel: ChannelId, lp: LoopId, uv: Point2<f64>) {
        self.channels[channel.index()].coords[lp.index()] = uv;
    }

    fn commit_uvs(&mut self) {
        self.uv_revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PolyMeshBuilder;

    /// Two quads sharing the edge 1-4, with a group on the right quad.
    fn two_quads() -> PolyMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.5, 0.0),
            Point2::new(0.5, 0.5),
            Point2::new(0.0, 0.5),
            Point2::new(0.5, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.5),
            Point2::new(0.5, 0.5),
        ];
        let mut builder = PolyMeshBuilder::new("quads").with_positions(positions);
        builder.add_face(&[0, 1, 4, 3]);
        builder.set_group("right");
        builder.add_face(&[1, 2, 5, 4]);
        builder.with_channel("ch3", uvs).build().unwrap()
    }

    #[test]
    fn test_counts() {
        let mesh = two_quads();
        assert_eq!(mesh.name(), "quads");
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_loops(), 8);
        assert_eq!(mesh.face_vertices(FaceId::new(1)), &[1, 2, 5, 4]);
        assert_eq!(mesh.loop_vertex(LoopId::new(6)), 5);
    }

    #[test]
    fn test_face_loops_and_adjacency() {
        let mesh = two_quads();
        let loops: Vec<_> = mesh.face_loops(FaceId::new(1)).collect();
        assert_eq!(loops, vec![LoopId::new(4), LoopId::new(5), LoopId::new(6), LoopId::new(7)]);

        let adj: Vec<_> = mesh.adjacent_faces(FaceId::new(0)).collect();
        assert_eq!(adj, vec![FaceId::new(1)]);
    }

    #[test]
    fn test_selection() {
        let mut mesh = two_quads();
        assert_eq!(mesh.num_selected(), 2);
        mesh.deselect_all();
        assert_eq!(mesh.selected_faces().count(), 0);

        assert_eq!(mesh.select_group("right"), 1);
        assert_eq!(mesh.select_group("missing"), 0);
        let selected: Vec<_> = mesh.selected_faces().collect();
        assert_eq!(selected, vec![FaceId::new(1)]);
        assert!(mesh.face_groups(FaceId::new(1)).eq(["right"]));
        assert_eq!(mesh.face_groups(FaceId::new(0)).count(), 0);
    }

    #[test]
    fn test_channels() {
        let mut mesh = two_quads();
        assert!(mesh.find_channel("UVMap").is_none());
        let ch = mesh.find_channel("ch3").unwrap();

        let lp = LoopId::new(2);
        assert_eq!(mesh.uv(ch, lp), Point2::new(0.5, 0.5));
        mesh.set_uv(ch, lp, Point2::new(0.25, 0.75));
        assert_eq!(mesh.channel("ch3").unwrap()[2], Point2::new(0.25, 0.75));

        assert_eq!(mesh.uv_revision(), 0);
        mesh.commit_uvs();
        assert_eq!(mesh.uv_revision(), 1);
    }
}

//! The accessor interface the algorithms run against.
//!
//! Island detection and the grid transforms never touch a concrete mesh type.
//! They read topology, selection flags and UV coordinates through [`UvMesh`],
//! so any host representation (an editor's live mesh, [`PolyMesh`], a test
//! fixture) can be plugged in.
//!
//! [`PolyMesh`]: super::PolyMesh

use nalgebra::Point2;

use super::index::{ChannelId, FaceId, LoopId};

/// Read/write access to the parts of a mesh that UV snapping needs.
///
/// Implementors own the mesh; the algorithms only hold [`FaceId`] and
/// [`LoopId`] handles and write coordinates back through [`UvMesh::set_uv`].
pub trait UvMesh {
    /// Name used in reports and logs.
    fn name(&self) -> &str {
        "mesh"
    }

    /// Number of faces. Face ids are `0..num_faces()`.
    fn num_faces(&self) -> usize;

    /// Whether the face is part of the host's current selection.
    fn is_selected(&self, face: FaceId) -> bool;

    /// The loops (corners) of a face, in winding order.
    fn face_loops(&self, face: FaceId) -> impl Iterator<Item = LoopId> + '_;

    /// Faces sharing at least one edge with `face`.
    fn adjacent_faces(&self, face: FaceId) -> impl Iterator<Item = FaceId> + '_;

    /// Resolve a UV channel by name.
    fn find_channel(&self, name: &str) -> Option<ChannelId>;

    /// UV coordinate of a loop in a channel.
    fn uv(&self, channel: ChannelId, lp: LoopId) -> Point2<f64>;

    /// Overwrite the UV coordinate of a loop in a channel.
    fn set_uv(&mut self, channel: ChannelId, lp: LoopId, uv: Point2<f64>);

    /// Tell the host that UVs changed and derived geometry must be refreshed.
    ///
    /// The default does nothing, which suits purely in-memory meshes.
    fn commit_uvs(&mut self) {}

    /// Iterate over all face ids.
    fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.num_faces()).map(FaceId::new)
    }

    /// Iterate over the selected faces.
    fn selected_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.num_faces())
            .map(FaceId::new)
            .filter(move |&f| self.is_selected(f))
    }
}

//! UV island detection.
//!
//! An island is a maximal group of selected faces that are connected both on
//! the mesh and in UV space. Two faces are UV-connected when they share an
//! edge **and** at least one pair of their corners lies within `epsilon` of
//! each other in UV space. Mesh adjacency alone is not enough: faces on either
//! side of a UV seam are adjacent but must end up in different islands.
//!
//! Unselected faces never take part, not even as bridges between two
//! selected regions.
//!
//! # Example
//!
//! ```
//! use cellsnap::algo::island::{find_islands, IslandOptions};
//! use cellsnap::mesh::PolyMeshBuilder;
//! use nalgebra::{Point2, Point3};
//!
//! let mut builder = PolyMeshBuilder::new("strip").with_positions(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(2.0, 1.0, 0.0),
//! ]);
//! builder.add_face(&[0, 1, 4, 3]);
//! builder.add_face(&[1, 2, 5, 4]);
//!
//! // The second quad is placed away from the first: a seam runs along edge 1-4.
//! let uvs = vec![
//!     Point2::new(0.0, 0.0), Point2::new(0.2, 0.0), Point2::new(0.2, 0.2), Point2::new(0.0, 0.2),
//!     Point2::new(0.6, 0.0), Point2::new(0.8, 0.0), Point2::new(0.8, 0.2), Point2::new(0.6, 0.2),
//! ];
//! let mesh = builder.with_channel("ch3", uvs).build().unwrap();
//!
//! let islands = find_islands(&mesh, "ch3", &IslandOptions::default()).unwrap();
//! assert_eq!(islands.len(), 2);
//! ```

use tracing::debug;

use crate::error::{SnapError, SnapResult};
use crate::mesh::{ChannelId, FaceId, LoopId, UvMesh};

/// Default UV proximity tolerance.
pub const DEFAULT_EPSILON: f64 = 0.001;

/// Options for island detection.
#[derive(Debug, Clone)]
pub struct IslandOptions {
    /// Two corners closer than this in UV space count as shared.
    pub epsilon: f64,
}

impl Default for IslandOptions {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl IslandOptions {
    /// Set the UV proximity tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that the tolerance is a positive finite number.
    pub fn validate(&self) -> SnapResult<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SnapError::invalid_param(
                "epsilon",
                self.epsilon,
                "must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// A connected group of selected faces and the loops they own.
///
/// Islands are views into a mesh: they hold handles, not coordinates, and are
/// only meaningful for the mesh and invocation they were detected in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Island {
    faces: Vec<FaceId>,
    loops: Vec<LoopId>,
}

impl Island {
    /// Faces of the island, in traversal order.
    pub fn faces(&self) -> &[FaceId] {
        &self.faces
    }

    /// Every loop of every face of the island.
    pub fn loops(&self) -> &[LoopId] {
        &self.loops
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Whether the island has no loops at all.
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

impl FromIterator<LoopId> for Island {
    /// Build a face-less island from raw loop handles.
    fn from_iter<T: IntoIterator<Item = LoopId>>(iter: T) -> Self {
        Self {
            faces: Vec::new(),
            loops: iter.into_iter().collect(),
        }
    }
}

/// Whether two faces have at least one pair of corners within `epsilon` in UV space.
///
/// Does not look at mesh adjacency; see [`detect_islands`] for the full relation.
pub fn uvs_touch<M: UvMesh>(
    mesh: &M,
    channel: ChannelId,
    a: FaceId,
    b: FaceId,
    epsilon: f64,
) -> bool {
    mesh.face_loops(a).any(|la| {
        let ua = mesh.uv(channel, la);
        mesh.face_loops(b)
            .any(|lb| (mesh.uv(channel, lb) - ua).norm() < epsilon)
    })
}

/// Partition the selected faces of a mesh into UV islands.
///
/// Runs a depth-first traversal from every selected face not yet assigned to
/// an island. A neighbour joins the island when it is selected, unassigned and
/// UV-connected to the face being expanded. Every selected face ends up in
/// exactly one island; with no selected faces the result is empty.
///
/// The order of islands, and of faces within an island, is unspecified.
pub fn detect_islands<M: UvMesh>(
    mesh: &M,
    channel: ChannelId,
    options: &IslandOptions,
) -> Vec<Island> {
    let epsilon = options.epsilon;
    let mut assigned = vec![false; mesh.num_faces()];
    let mut islands = Vec::new();
    let mut stack: Vec<FaceId> = Vec::new();

    for seed in mesh.selected_faces() {
        if assigned[seed.index()] {
            continue;
        }

        assigned[seed.index()] = true;
        let mut faces = vec![seed];
        stack.push(seed);

        while let Some(face) = stack.pop() {
            for neighbour in mesh.adjacent_faces(face) {
                if assigned[neighbour.index()] || !mesh.is_selected(neighbour) {
                    continue;
                }
                if uvs_touch(mesh, channel, face, neighbour, epsilon) {
                    assigned[neighbour.index()] = true;
                    faces.push(neighbour);
                    stack.push(neighbour);
                }
            }
        }

        let loops: Vec<LoopId> = faces.iter().flat_map(|&f| mesh.face_loops(f)).collect();
        debug!(faces = faces.len(), loops = loops.len(), "found UV island");
        islands.push(Island { faces, loops });
    }

    islands
}

/// Resolve `channel_name` on the mesh, then detect its islands.
///
/// Fails with [`SnapError::ChannelNotFound`] before any traversal when the
/// mesh has no such channel.
pub fn find_islands<M: UvMesh>(
    mesh: &M,
    channel_name: &str,
    options: &IslandOptions,
) -> SnapResult<Vec<Island>> {
    options.validate()?;
    let channel = mesh
        .find_channel(channel_name)
        .ok_or_else(|| SnapError::ChannelNotFound {
            channel: channel_name.to_string(),
        })?;
    Ok(detect_islands(mesh, channel, options))
}

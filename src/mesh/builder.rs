//! Mesh construction utilities.
//!
//! [`PolyMeshBuilder`] collects positions, polygon faces, face groups and UV
//! channels, validates them, and derives edge adjacency between faces.

use std::collections::HashMap;

use nalgebra::{Point2, Point3};

use super::index::FaceId;
use super::poly::{PolyMesh, UvChannel};
use crate::error::{MeshError, Result};

/// Incremental builder for [`PolyMesh`].
///
/// # Example
/// ```
/// use cellsnap::mesh::{PolyMeshBuilder, UvMesh};
/// use nalgebra::{Point2, Point3};
///
/// let mut builder = PolyMeshBuilder::new("tri").with_positions(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ]);
/// builder.add_face(&[0, 1, 2]);
/// let mesh = builder
///     .with_channel("ch3", vec![
///         Point2::new(0.0, 0.0),
///         Point2::new(1.0, 0.0),
///         Point2::new(0.0, 1.0),
///     ])
///     .build()
///     .unwrap();
///
/// assert_eq!(mesh.num_faces(), 1);
/// assert!(mesh.find_channel("ch3").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PolyMeshBuilder {
    name: String,
    positions: Vec<Point3<f64>>,
    faces: Vec<Vec<usize>>,
    groups: Vec<String>,
    face_groups: Vec<Vec<usize>>,
    current_groups: Vec<usize>,
    channels: Vec<(String, Vec<Point2<f64>>)>,
}

impl PolyMeshBuilder {
    /// Start a new mesh with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set all vertex positions at once.
    pub fn with_positions(mut self, positions: Vec<Point3<f64>>) -> Self {
        self.positions = positions;
        self
    }

    /// Append a vertex and return its index.
    pub fn add_position(&mut self, p: Point3<f64>) -> usize {
        self.positions.push(p);
        self.positions.len() - 1
    }

    /// Number of loops added so far.
    pub fn num_loops(&self) -> usize {
        self.faces.iter().map(Vec::len).sum()
    }

    /// Faces added after this call belong to `group` only.
    pub fn set_group(&mut self, group: &str) {
        self.set_groups(&[group]);
    }

    /// Faces added after this call belong to every group in `groups`.
    ///
    /// Repeated names are kept once; an empty list clears the groups.
    pub fn set_groups<S: AsRef<str>>(&mut self, groups: &[S]) {
        self.current_groups.clear();
        for group in groups {
            let group = group.as_ref();
            let gi = match self.groups.iter().position(|g| g == group) {
                Some(gi) => gi,
                None => {
                    self.groups.push(group.to_string());
                    self.groups.len() - 1
                }
            };
            if !self.current_groups.contains(&gi) {
                self.current_groups.push(gi);
            }
        }
    }

    /// Faces added after this call belong to no group.
    pub fn clear_group(&mut self) {
        self.current_groups.clear();
    }

    /// Append a polygon face given its vertex indices in winding order.
    ///
    /// Validation happens in [`build`](Self::build).
    pub fn add_face(&mut self, vertices: &[usize]) -> FaceId {
        self.faces.push(vertices.to_vec());
        self.face_groups.push(self.current_groups.clone());
        FaceId::new(self.faces.len() - 1)
    }

    /// Attach a UV channel with one coordinate per loop.
    pub fn with_channel(mut self, name: impl Into<String>, coords: Vec<Point2<f64>>) -> Self {
        self.add_channel(name, coords);
        self
    }

    /// Attach a UV channel with one coordinate per loop.
    pub fn add_channel(&mut self, name: impl Into<String>, coords: Vec<Point2<f64>>) {
        self.channels.push((name.into(), coords));
    }

    /// Validate the input and build the mesh. All faces start selected.
    pub fn build(self) -> Result<PolyMesh> {
        if self.faces.is_empty() {
            return Err(MeshError::EmptyMesh);
        }

        for (fi, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace { face: fi });
            }
            for (i, &vi) in face.iter().enumerate() {
                if vi >= self.positions.len() {
                    return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
                }
                if face[..i].contains(&vi) {
                    return Err(MeshError::DegenerateFace { face: fi });
                }
            }
        }

        let num_loops = self.num_loops();
        let mut channels: Vec<UvChannel> = Vec::with_capacity(self.channels.len());
        for (name, coords) in self.channels {
            if coords.len() != num_loops {
                return Err(MeshError::ChannelLength {
                    channel: name,
                    expected: num_loops,
                    found: coords.len(),
                });
            }
            if channels.iter().any(|c| c.name == name) {
                return Err(MeshError::DuplicateChannel(name));
            }
            channels.push(UvChannel { name, coords });
        }

        let mut face_start = Vec::with_capacity(self.faces.len() + 1);
        let mut loop_vertex = Vec::with_capacity(num_loops);
        for face in &self.faces {
            face_start.push(loop_vertex.len());
            loop_vertex.extend_from_slice(face);
        }
        face_start.push(loop_vertex.len());

        let adjacency = build_adjacency(&self.faces);
        let num_faces = self.faces.len();

        Ok(PolyMesh {
            name: self.name,
            positions: self.positions,
            face_start,
            loop_vertex,
            adjacency,
            selected: vec![true; num_faces],
            groups: self.groups,
            face_groups: self.face_groups,
            channels,
            uv_revision: 0,
        })
    }
}

/// Faces sharing an undirected edge become neighbours of each other.
fn build_adjacency(faces: &[Vec<usize>]) -> Vec<Vec<FaceId>> {
    let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

    for (fi, face) in faces.iter().enumerate() {
        for i in 0..face.len() {
            let a = face[i];
            let b = face[(i + 1) % face.len()];
            let key = if a < b { (a, b) } else { (b, a) };
            edge_faces.entry(key).or_default().push(fi);
        }
    }

    let mut adjacency: Vec<Vec<FaceId>> = vec![Vec::new(); faces.len()];
    for incident in edge_faces.values() {
        for &f in incident {
            for &g in incident {
                if f != g {
                    adjacency[f].push(FaceId::new(g));
                }
            }
        }
    }

    // Two faces may share more than one edge
    for neighbours in &mut adjacency {
        neighbours.sort_unstable();
        neighbours.dedup();
    }

    adjacency
}

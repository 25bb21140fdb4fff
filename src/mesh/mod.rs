//! Mesh data access.
//!
//! The algorithms in [`crate::algo`] work against the [`UvMesh`] trait, which
//! exposes exactly what UV snapping needs: faces with a selection flag, the
//! loops (corners) of each face, edge adjacency between faces, and per-loop
//! coordinates in named UV channels.
//!
//! [`PolyMesh`] is the crate's own implementation, used by the file loaders
//! and the command-line tool.
//!
//! # Index Types
//!
//! - [`FaceId`] - Identifies a face
//! - [`LoopId`] - Identifies a face corner
//! - [`ChannelId`] - Identifies a UV channel resolved on one mesh
//!
//! # Construction
//!
//! ```
//! use cellsnap::mesh::{PolyMeshBuilder, UvMesh};
//! use nalgebra::{Point2, Point3};
//!
//! let mut builder = PolyMeshBuilder::new("quad").with_positions(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//! builder.add_face(&[0, 1, 2, 3]);
//! let mesh = builder
//!     .with_channel("ch3", vec![
//!         Point2::new(0.0, 0.0),
//!         Point2::new(0.5, 0.0),
//!         Point2::new(0.5, 0.5),
//!         Point2::new(0.0, 0.5),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(mesh.num_faces(), 1);
//! ```

mod access;
mod builder;
mod index;
mod poly;

pub use access::UvMesh;
pub use builder::PolyMeshBuilder;
pub use index::{ChannelId, FaceId, LoopId};
pub use poly::{PolyMesh, UvChannel};

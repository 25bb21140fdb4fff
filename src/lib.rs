//! # cellsnap
//!
//! Detect UV islands in a mesh selection and move them onto the cells of a
//! fixed grid.
//!
//! A UV island is a connected group of selected faces whose corners touch in
//! UV space. cellsnap finds the islands of every selected mesh and either
//! centers each one on a chosen grid cell or steps it by one cell in a
//! cardinal direction. Islands are always moved rigidly, and a step that would
//! push an island's center out of the unit square is rejected instead of
//! clamped.
//!
//! ## Features
//!
//! - **Host-agnostic**: algorithms run against the [`mesh::UvMesh`] trait
//! - **Seam-aware islands**: adjacency plus UV proximity, unselected faces never bridge
//! - **Multi-object operators**: per-mesh failure isolation with structured outcomes
//! - **OBJ I/O**: one mesh per object, texture coordinates as a named UV channel
//!
//! ## Quick Start
//!
//! ```no_run
//! use cellsnap::prelude::*;
//!
//! let config = GridConfig::default();
//! let options = ObjOptions::default().with_uv_channel(config.uv_channel.clone());
//! let mut meshes = cellsnap::io::load("scene.obj", &options).unwrap();
//!
//! let outcome = snap_selected(
//!     meshes.iter_mut(),
//!     &config,
//!     5,
//!     &IslandOptions::default(),
//!     &Reporter::none(),
//! );
//! println!("moved {} islands", outcome.islands_moved());
//!
//! cellsnap::io::save(&meshes, "snapped.obj", &config.uv_channel).unwrap();
//! ```
//!
//! ## Working with islands directly
//!
//! ```
//! use cellsnap::prelude::*;
//! use nalgebra::{Point2, Point3};
//!
//! let mut builder = PolyMeshBuilder::new("quad").with_positions(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//! builder.add_face(&[0, 1, 2, 3]);
//! let mut mesh = builder
//!     .with_channel("ch3", vec![
//!         Point2::new(0.0, 0.0),
//!         Point2::new(0.2, 0.0),
//!         Point2::new(0.2, 0.2),
//!         Point2::new(0.0, 0.2),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let channel = mesh.find_channel("ch3").unwrap();
//! let islands = detect_islands(&mesh, channel, &IslandOptions::default());
//! let grid = Grid::new(4, 2).unwrap();
//!
//! let delta = snap_to_cell(&mut mesh, channel, &islands[0], &grid, 5).unwrap().unwrap();
//! assert!((delta.x - 0.275).abs() < 1e-12);
//! assert!((delta.y - 0.15).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod error;
pub mod io;
pub mod mesh;
pub mod ops;

#[cfg(test)]
mod testing;

/// Prelude module for convenient imports.
///
/// ```
/// use cellsnap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        detect_islands, find_islands, offset, snap_to_cell, Direction, Grid, Island,
        IslandOptions, UvBounds,
    };
    pub use crate::config::GridConfig;
    pub use crate::error::{MeshError, Result, SnapError, SnapResult};
    pub use crate::io::ObjOptions;
    pub use crate::mesh::{ChannelId, FaceId, LoopId, PolyMesh, PolyMeshBuilder, UvMesh};
    pub use crate::ops::{
        offset_selected, snap_selected, OperatorOutcome, OperatorStatus, Reporter, Severity,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

//! UV island algorithms.
//!
//! - [`island`]: Partition selected faces into UV islands
//! - [`grid`]: Snap islands to grid cells or step them across the grid
//!
//! Both work on any [`UvMesh`](crate::mesh::UvMesh) and are combined into
//! multi-mesh operators in [`crate::ops`].

pub mod grid;
pub mod island;

pub use grid::{offset, snap_to_cell, Direction, Grid, UvBounds};
pub use island::{detect_islands, find_islands, Island, IslandOptions};

//! Grid snapping and stepping for UV islands.
//!
//! The unit UV square is divided into `columns x rows` cells. Cells are
//! numbered row by row, left to right, with row 0 at the **top** (v near 1):
//!
//! ```text
//!  v=1 +----+----+----+----+
//!      |  0 |  1 |  2 |  3 |
//!      +----+----+----+----+
//!      |  4 |  5 |  6 |  7 |
//!  v=0 +----+----+----+----+
//!     u=0                 u=1
//! ```
//!
//! Both operations move an island rigidly: one translation vector is computed
//! from the island's bounding box and added to every loop, so the island's
//! shape is preserved exactly.
//!
//! # Example
//!
//! ```
//! use cellsnap::algo::grid::Grid;
//!
//! let grid = Grid::new(4, 2).unwrap();
//! let center = grid.cell_center(5).unwrap();
//! assert!((center.x - 0.375).abs() < 1e-12);
//! assert!((center.y - 0.25).abs() < 1e-12);
//! ```

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point2, Vector2};
use tracing::debug;

use super::island::Island;
use crate::error::{SnapError, SnapResult};
use crate::mesh::{ChannelId, UvMesh};

/// A fixed grid over the unit UV square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
}

/// Row and column of a grid cell. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Row index, increasing downwards.
    pub row: u32,
    /// Column index, increasing to the right.
    pub column: u32,
}

impl Grid {
    /// Create a grid. Both dimensions must be at least 1.
    pub fn new(columns: u32, rows: u32) -> SnapResult<Self> {
        if columns < 1 {
            return Err(SnapError::invalid_param("grid_columns", columns, "must be at least 1"));
        }
        if rows < 1 {
            return Err(SnapError::invalid_param("grid_rows", rows, "must be at least 1"));
        }
        Ok(Self { columns, rows })
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Row and column of a cell index.
    pub fn cell(&self, index: usize) -> SnapResult<Cell> {
        let cells = self.cell_count();
        if index >= cells {
            return Err(SnapError::CellIndexOutOfBounds { index, cells });
        }
        let columns = self.columns as usize;
        Ok(Cell {
            row: (index / columns) as u32,
            column: (index % columns) as u32,
        })
    }

    /// Cell index of a row and column.
    pub fn cell_index(&self, cell: Cell) -> usize {
        cell.row as usize * self.columns as usize + cell.column as usize
    }

    /// Geometric center of a cell in UV space.
    pub fn cell_center(&self, index: usize) -> SnapResult<Point2<f64>> {
        let cell = self.cell(index)?;
        let columns = self.columns as f64;
        let rows = self.rows as f64;

        let x = cell.column as f64 / columns + 1.0 / (2.0 * columns);
        let y = (1.0 - cell.row as f64 / rows) - 1.0 / (2.0 * rows);
        Ok(Point2::new(x, y))
    }

    /// Cell containing a UV point, `None` outside the unit square.
    ///
    /// Points on a shared border belong to the cell to their right and below;
    /// the outer borders belong to the edge cells.
    pub fn cell_at(&self, uv: Point2<f64>) -> Option<usize> {
        if !(0.0..=1.0).contains(&uv.x) || !(0.0..=1.0).contains(&uv.y) {
            return None;
        }
        let column = ((uv.x * self.columns as f64) as u32).min(self.columns - 1);
        let row = (((1.0 - uv.y) * self.rows as f64) as u32).min(self.rows - 1);
        Some(self.cell_index(Cell { row, column }))
    }

    /// Size of one grid step along each axis, clamped to `[0, 1]`.
    pub fn step(&self) -> Vector2<f64> {
        Vector2::new(
            (1.0 / self.columns as f64).clamp(0.0, 1.0),
            (1.0 / self.rows as f64).clamp(0.0, 1.0),
        )
    }
}

/// A cardinal direction in UV display space. Up increases v.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards v = 1.
    Up,
    /// Towards v = 0.
    Down,
    /// Towards u = 0.
    Left,
    /// Towards u = 1.
    Right,
}

impl Direction {
    /// All directions, in the order the arrow buttons are laid out.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses `"up"`, `"down"`, `"left"` and `"right"` leniently: case is
/// ignored and surrounding whitespace is trimmed, so `" Left "` is accepted.
impl FromStr for Direction {
    type Err = SnapError;

    fn from_str(s: &str) -> SnapResult<Self> {
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                SnapError::invalid_param("direction", s, "expected up, down, left or right")
            })
    }
}

/// Axis-aligned bounding box in UV space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvBounds {
    /// Minimum corner.
    pub min: Point2<f64>,
    /// Maximum corner.
    pub max: Point2<f64>,
}

impl UvBounds {
    /// Bounds of a set of points, `None` when there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2<f64>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = UvBounds {
            min: first,
            max: first,
        };
        for p in points {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Point2<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Width and height.
    pub fn size(&self) -> Vector2<f64> {
        self.max - self.min
    }
}

/// Bounding box of an island's UVs, `None` for an empty island.
pub fn island_bounds<M: UvMesh>(mesh: &M, channel: ChannelId, island: &Island) -> Option<UvBounds> {
    UvBounds::from_points(island.loops().iter().map(|&lp| mesh.uv(channel, lp)))
}

/// Translation that centers an island's bounding box on a grid cell.
///
/// Returns `Ok(None)` for an empty island, and an error when the cell does
/// not exist. Nothing is written to the mesh.
pub fn plan_snap<M: UvMesh>(
    mesh: &M,
    channel: ChannelId,
    island: &Island,
    grid: &Grid,
    cell_index: usize,
) -> SnapResult<Option<Vector2<f64>>> {
    let target = grid.cell_center(cell_index)?;
    Ok(island_bounds(mesh, channel, island).map(|bounds| target - bounds.center()))
}

/// Translation that moves an island one grid step in `direction`.
///
/// Returns `None` when the island is empty or when its bounding-box center
/// would leave the open interval `(0, 1)` on the moving axis. In that case the
/// island must stay exactly where it is; it is never moved partway.
pub fn plan_offset<M: UvMesh>(
    mesh: &M,
    channel: ChannelId,
    island: &Island,
    grid: &Grid,
    direction: Direction,
) -> Option<Vector2<f64>> {
    let center = island_bounds(mesh, channel, island)?.center();
    let step = grid.step();

    match direction {
        Direction::Up if center.y + step.y < 1.0 => Some(Vector2::new(0.0, step.y)),
        Direction::Down if center.y - step.y > 0.0 => Some(Vector2::new(0.0, -step.y)),
        Direction::Right if center.x + step.x < 1.0 => Some(Vector2::new(step.x, 0.0)),
        Direction::Left if center.x - step.x > 0.0 => Some(Vector2::new(-step.x, 0.0)),
        _ => None,
    }
}

/// Add `delta` to every UV of the island.
pub fn translate_island<M: UvMesh>(
    mesh: &mut M,
    channel: ChannelId,
    island: &Island,
    delta: Vector2<f64>,
) {
    for &lp in island.loops() {
        let uv = mesh.uv(channel, lp);
        mesh.set_uv(channel, lp, uv + delta);
    }
}

/// Move an island so its bounding-box center lands on the center of a cell.
///
/// Returns the translation that was applied, `None` for an empty island.
/// An out-of-range cell is an error and leaves the island untouched.
pub fn snap_to_cell<M: UvMesh>(
    mesh: &mut M,
    channel: ChannelId,
    island: &Island,
    grid: &Grid,
    cell_index: usize,
) -> SnapResult<Option<Vector2<f64>>> {
    let delta = plan_snap(&*mesh, channel, island, grid, cell_index)?;
    if let Some(delta) = delta {
        debug!(cell = cell_index, dx = delta.x, dy = delta.y, "snapping island");
        translate_island(mesh, channel, island, delta);
    }
    Ok(delta)
}

/// Move an island by one grid step, if it stays inside the unit square.
///
/// Returns the translation that was applied, or `None` when the move was
/// rejected and the island left unchanged.
pub fn offset<M: UvMesh>(
    mesh: &mut M,
    channel: ChannelId,
    island: &Island,
    grid: &Grid,
    direction: Direction,
) -> Option<Vector2<f64>> {
    let delta = plan_offset(&*mesh, channel, island, grid, direction);
    match delta {
        Some(delta) => {
            debug!(%direction, dx = delta.x, dy = delta.y, "offsetting island");
            translate_island(mesh, channel, island, delta);
        }
        None => debug!(%direction, "offset rejected at grid boundary"),
    }
    delta
}

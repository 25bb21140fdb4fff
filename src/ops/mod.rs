//! Snap and offset operators over a selection of meshes.
//!
//! An invocation validates its parameters once, then processes every selected
//! mesh in order: resolve the UV channel, detect islands, plan one translation
//! per island, apply them, and commit the UVs back to the host.
//!
//! Failures are isolated per mesh. A mesh without the configured channel is
//! reported as an error and skipped, a mesh without selected faces as a
//! warning, and the remaining meshes are still processed. Only invalid
//! invocation parameters (an out-of-range cell, a bad grid) cancel the whole
//! invocation, and they do so before any mesh is touched.
//!
//! # Example
//!
//! ```
//! use cellsnap::config::GridConfig;
//! use cellsnap::mesh::PolyMeshBuilder;
//! use cellsnap::ops::{snap_selected, OperatorStatus, Reporter};
//! use cellsnap::algo::IslandOptions;
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
//! let outcome = snap_selected(
//!     [&mut mesh],
//!     &GridConfig::default(),
//!     5,
//!     &IslandOptions::default(),
//!     &Reporter::none(),
//! );
//! assert_eq!(outcome.status, OperatorStatus::Finished);
//! assert_eq!(outcome.islands_moved(), 1);
//! ```

mod report;

pub use report::{Report, ReportLog, Reporter, Severity};

use nalgebra::Vector2;
use tracing::{info, warn};

use crate::algo::grid::{plan_offset, plan_snap, translate_island, Direction, Grid};
use crate::algo::island::{detect_islands, IslandOptions};
use crate::config::GridConfig;
use crate::error::{SnapError, SnapResult};
use crate::mesh::UvMesh;

/// What an invocation does to each island.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Center every island on a grid cell.
    Snap {
        /// Target cell, numbered row by row from the top left.
        cell_index: usize,
    },
    /// Move every island one grid step.
    Offset {
        /// Direction of the step.
        direction: Direction,
    },
}

/// Overall result of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorStatus {
    /// Every mesh was processed (possibly with warnings).
    Finished,
    /// At least one mesh failed with an error, others were processed.
    PartiallyFinished,
    /// Nothing was processed: the parameters were invalid or every mesh failed.
    Cancelled,
}

/// Per-mesh statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshSummary {
    /// Islands detected in the selection.
    pub islands: usize,
    /// Islands that were actually translated.
    pub moved: usize,
}

/// What happened to one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshOutcome {
    /// Mesh name.
    pub name: String,
    /// Statistics, or the reason the mesh was skipped.
    pub result: SnapResult<MeshSummary>,
}

/// Result of an invocation over a selection of meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorOutcome {
    /// Overall status.
    pub status: OperatorStatus,
    /// One entry per mesh, in processing order. Empty when cancelled up front.
    pub meshes: Vec<MeshOutcome>,
    /// Invocation-level error that cancelled before any mesh was touched.
    pub error: Option<SnapError>,
}

impl OperatorOutcome {
    fn cancelled(error: SnapError) -> Self {
        Self {
            status: OperatorStatus::Cancelled,
            meshes: Vec::new(),
            error: Some(error),
        }
    }

    /// Total number of islands translated over all meshes.
    pub fn islands_moved(&self) -> usize {
        self.meshes
            .iter()
            .filter_map(|m| m.result.as_ref().ok())
            .map(|s| s.moved)
            .sum()
    }

    /// Errors and warnings, including the invocation-level error.
    pub fn problems(&self) -> impl Iterator<Item = &SnapError> + '_ {
        self.error
            .iter()
            .chain(self.meshes.iter().filter_map(|m| m.result.as_ref().err()))
    }
}

/// Snap the selected islands of every mesh to the center of a grid cell.
pub fn snap_selected<'m, M, I>(
    meshes: I,
    config: &GridConfig,
    cell_index: usize,
    options: &IslandOptions,
    reporter: &Reporter,
) -> OperatorOutcome
where
    M: UvMesh + 'm,
    I: IntoIterator<Item = &'m mut M>,
{
    run(meshes, Operation::Snap { cell_index }, config, options, reporter)
}

/// Step the selected islands of every mesh by one grid cell.
pub fn offset_selected<'m, M, I>(
    meshes: I,
    config: &GridConfig,
    direction: Direction,
    options: &IslandOptions,
    reporter: &Reporter,
) -> OperatorOutcome
where
    M: UvMesh + 'm,
    I: IntoIterator<Item = &'m mut M>,
{
    run(meshes, Operation::Offset { direction }, config, options, reporter)
}

/// Run an operation over a selection of meshes.
pub fn run<'m, M, I>(
    meshes: I,
    operation: Operation,
    config: &GridConfig,
    options: &IslandOptions,
    reporter: &Reporter,
) -> OperatorOutcome
where
    M: UvMesh + 'm,
    I: IntoIterator<Item = &'m mut M>,
{
    let grid = match validate(operation, config, options) {
        Ok(grid) => grid,
        Err(err) => {
            warn!(error = %err, "invocation cancelled");
            reporter.report(err.severity(), &err.to_string());
            return OperatorOutcome::cancelled(err);
        }
    };

    let mut outcomes = Vec::new();
    for mesh in meshes {
        let name = mesh.name().to_string();
        let result = process_mesh(mesh, operation, &grid, config, options);
        match &result {
            Ok(summary) => info!(
                mesh = %name,
                islands = summary.islands,
                moved = summary.moved,
                "processed mesh"
            ),
            Err(err) => {
                warn!(mesh = %name, error = %err, "skipped mesh");
                reporter.report(err.severity(), &err.to_string());
            }
        }
        outcomes.push(MeshOutcome { name, result });
    }

    let failed = outcomes
        .iter()
        .filter(|m| matches!(&m.result, Err(e) if e.severity() == Severity::Error))
        .count();
    let status = if failed == 0 {
        OperatorStatus::Finished
    } else if failed == outcomes.len() {
        OperatorStatus::Cancelled
    } else {
        OperatorStatus::PartiallyFinished
    };

    let outcome = OperatorOutcome {
        status,
        meshes: outcomes,
        error: None,
    };
    if status != OperatorStatus::Cancelled {
        let processed = outcome.meshes.iter().filter(|m| m.result.is_ok()).count();
        reporter.report(
            Severity::Info,
            &format!(
                "Moved {} island(s) on {} mesh(es)",
                outcome.islands_moved(),
                processed
            ),
        );
    }
    outcome
}

/// Check everything that would cancel the invocation as a whole.
fn validate(
    operation: Operation,
    config: &GridConfig,
    options: &IslandOptions,
) -> SnapResult<Grid> {
    config.validate()?;
    options.validate()?;
    let grid = config.grid()?;
    if let Operation::Snap { cell_index } = operation {
        grid.cell(cell_index)?;
    }
    Ok(grid)
}

fn process_mesh<M: UvMesh>(
    mesh: &mut M,
    operation: Operation,
    grid: &Grid,
    config: &GridConfig,
    options: &IslandOptions,
) -> SnapResult<MeshSummary> {
    let channel = mesh
        .find_channel(&config.uv_channel)
        .ok_or_else(|| SnapError::ChannelNotFound {
            channel: config.uv_channel.clone(),
        })?;

    let islands = detect_islands(&*mesh, channel, options);
    if islands.is_empty() {
        return Err(SnapError::EmptySelection);
    }

    // Plan every move before writing anything
    let mut plan: Vec<(usize, Vector2<f64>)> = Vec::with_capacity(islands.len());
    for (i, island) in islands.iter().enumerate() {
        let delta = match operation {
            Operation::Snap { cell_index } => {
                plan_snap(&*mesh, channel, island, grid, cell_index)?
            }
            Operation::Offset { direction } => {
                plan_offset(&*mesh, channel, island, grid, direction)
            }
        };
        if let Some(delta) = delta {
            plan.push((i, delta));
        }
    }

    for &(i, delta) in &plan {
        translate_island(mesh, channel, &islands[i], delta);
    }
    mesh.commit_uvs();

    Ok(MeshSummary {
        islands: islands.len(),
        moved: plan.len(),
    })
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point2, Vector2};

    use super::*;
    use crate::mesh::{FaceId, PolyMesh, PolyMeshBuilder};
    use crate::testing::{quad_grid, uv_quad, CHANNEL};

    fn uvs(mesh: &PolyMesh) -> Vec<Point2<f64>> {
        mesh.channel(CHANNEL).unwrap().to_vec()
    }

    fn without_channel() -> PolyMesh {
        let mesh = uv_quad(Point2::new(0.0, 0.0), Point2::new(0.2, 0.2));
        let mut builder = PolyMeshBuilder::new("no_ch3").with_positions(mesh.positions().to_vec());
        builder.add_face(&[0, 1, 2, 3]);
        builder
            .with_channel("UVMap", vec![Point2::origin(); 4])
            .build()
            .unwrap()
    }

    #[test]
    fn test_snap_two_islands_to_same_cell() {
        let mut mesh = quad_grid(3, 1, 0.1, |i, _| {
            if i == 2 {
                Vector2::new(0.5, 0.5)
            } else {
                Vector2::zeros()
            }
        });
        let (reporter, log) = Reporter::collecting();
        let outcome = snap_selected(
            [&mut mesh],
            &GridConfig::default(),
            0,
            &IslandOptions::default(),
            &reporter,
        );

        assert_eq!(outcome.status, OperatorStatus::Finished);
        assert_eq!(
            outcome.meshes[0].result,
            Ok(MeshSummary { islands: 2, moved: 2 })
        );
        assert_eq!(mesh.uv_revision(), 1);

        let reports = log.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].severity, Severity::Info);
    }

    #[test]
    fn test_out_of_bounds_cancels_before_mutation() {
        let mut mesh = uv_quad(Point2::new(0.0, 0.0), Point2::new(0.2, 0.2));
        let before = uvs(&mesh);
        let (reporter, log) = Reporter::collecting();

        let outcome = snap_selected(
            [&mut mesh],
            &GridConfig::default(),
            8,
            &IslandOptions::default(),
            &reporter,
        );

        assert_eq!(outcome.status, OperatorStatus::Cancelled);
        assert_eq!(
            outcome.error,
            Some(SnapError::CellIndexOutOfBounds { index: 8, cells: 8 })
        );
        assert!(outcome.meshes.is_empty());
        assert_eq!(uvs(&mesh), before);
        assert_eq!(mesh.uv_revision(), 0);

        let reports = log.lock().unwrap();
        assert_eq!(
            *reports,
            vec![Report {
                severity: Severity::Error,
                message: "Cell index out of bounds".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_channel_isolated_per_mesh() {
        let mut missing = without_channel();
        let mut present = uv_quad(Point2::new(0.0, 0.0), Point2::new(0.2, 0.2));
        let (reporter, log) = Reporter::collecting();

        let outcome = snap_selected(
            [&mut missing, &mut present],
            &GridConfig::default(),
            5,
            &IslandOptions::default(),
            &reporter,
        );

        assert_eq!(outcome.status, OperatorStatus::PartiallyFinished);
        assert_eq!(outcome.meshes[0].name, "no_ch3");
        assert_eq!(
            outcome.meshes[0].result,
            Err(SnapError::ChannelNotFound {
                channel: "ch3".to_string()
            })
        );
        assert_eq!(outcome.meshes[1].result, Ok(MeshSummary { islands: 1, moved: 1 }));

        let moved = uvs(&present);
        assert!((moved[0] - Point2::new(0.275, 0.15)).norm() < 1e-12);
        assert_eq!(missing.uv_revision(), 0);
        assert_eq!(present.uv_revision(), 1);

        let reports = log.lock().unwrap();
        assert_eq!(reports[0].severity, Severity::Error);
        assert_eq!(reports[0].message, "UV channel 'ch3' not found");
    }

    #[test]
    fn test_all_meshes_failing_cancels() {
        let mut a = without_channel();
        let mut b = without_channel();
        let outcome = offset_selected(
            [&mut a, &mut b],
            &GridConfig::default(),
            Direction::Up,
            &IslandOptions::default(),
            &Reporter::none(),
        );
        assert_eq!(outcome.status, OperatorStatus::Cancelled);
        assert_eq!(outcome.problems().count(), 2);
    }

    #[test]
    fn test_empty_selection_warns_and_continues() {
        let mut empty = uv_quad(Point2::new(0.0, 0.0), Point2::new(0.2, 0.2));
        empty.set_selected(FaceId::new(0), false);
        let mut full = uv_quad(Point2::new(0.05, 0.05), Point2::new(0.1, 0.1));
        let before = uvs(&empty);
        let (reporter, log) = Reporter::collecting();

        let outcome = offset_selected(
            [&mut empty, &mut full],
            &GridConfig::default(),
            Direction::Up,
            &IslandOptions::default(),
            &reporter,
        );

        assert_eq!(outcome.status, OperatorStatus::Finished);
        assert_eq!(outcome.meshes[0].result, Err(SnapError::EmptySelection));
        assert_eq!(outcome.islands_moved(), 1);
        assert_eq!(uvs(&empty), before);

        let reports = log.lock().unwrap();
        assert_eq!(reports[0].severity, Severity::Warning);
        assert_eq!(reports[0].message, "No selected UVs found");
    }

    #[test]
    fn test_offset_rejects_per_island() {
        // Left column sits near the top, right column near the bottom
        let mut mesh = quad_grid(2, 1, 0.1, |i, _| {
            if i == 0 {
                Vector2::new(0.0, 0.85)
            } else {
                Vector2::new(0.5, 0.1)
            }
        });
        let before = uvs(&mesh);

        let outcome = offset_selected(
            [&mut mesh],
            &GridConfig::default(),
            Direction::Up,
            &IslandOptions::default(),
            &Reporter::none(),
        );
        assert_eq!(outcome.meshes[0].result, Ok(MeshSummary { islands: 2, moved: 1 }));

        let after = uvs(&mesh);
        // Face 0 (loops 0..4) stays, face 1 (loops 4..8) moves up by half the grid
        assert_eq!(&after[..4], &before[..4]);
        for (a, b) in before[4..].iter().zip(&after[4..]) {
            assert!((b - a - Vector2::new(0.0, 0.5)).norm() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_config_cancels() {
        let mut mesh = uv_quad(Point2::new(0.0, 0.0), Point2::new(0.2, 0.2));
        let config = GridConfig::default().with_grid(0, 2);
        let outcome = offset_selected(
            [&mut mesh],
            &config,
            Direction::Right,
            &IslandOptions::default(),
            &Reporter::none(),
        );
        assert_eq!(outcome.status, OperatorStatus::Cancelled);
        assert!(matches!(
            outcome.error,
            Some(SnapError::InvalidParameter { name: "grid_columns", .. })
        ));
    }
}

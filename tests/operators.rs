//! End-to-end operator runs on OBJ scenes.

use cellsnap::algo::grid::island_bounds;
use cellsnap::io::{self, ObjOptions};
use cellsnap::prelude::*;
use nalgebra::Point2;

/// Two objects: `left` with two separate UV islands, `bare` without texture coordinates.
const SCENE: &str = "\
o left
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 2 0 0
v 2 1 0
vt 0.00 0.00
vt 0.10 0.00
vt 0.10 0.10
vt 0.00 0.10
vt 0.60 0.60
vt 0.70 0.60
vt 0.70 0.70
vt 0.60 0.70
g first
f 1/1 2/2 3/3 4/4
g second
f 2/5 5/6 6/7 3/8
o bare
v 0 0 1
v 1 0 1
v 1 1 1
f 7 8 9
";

fn load_scene(dir: &tempfile::TempDir) -> Vec<PolyMesh> {
    let path = dir.path().join("scene.obj");
    std::fs::write(&path, SCENE).unwrap();
    io::load(&path, &ObjOptions::default()).unwrap()
}

fn centers(mesh: &PolyMesh) -> Vec<Point2<f64>> {
    let channel = mesh.find_channel("ch3").unwrap();
    detect_islands(mesh, channel, &IslandOptions::default())
        .iter()
        .map(|island| island_bounds(mesh, channel, island).unwrap().center())
        .collect()
}

#[test]
fn test_snap_isolates_mesh_without_channel() {
    let dir = tempfile::tempdir().unwrap();
    let mut meshes = load_scene(&dir);
    assert_eq!(meshes.len(), 2);

    let (reporter, log) = Reporter::collecting();
    let config = GridConfig::default();
    let outcome = snap_selected(
        meshes.iter_mut(),
        &config,
        2,
        &IslandOptions::default(),
        &reporter,
    );

    assert_eq!(outcome.status, OperatorStatus::PartiallyFinished);
    assert_eq!(outcome.islands_moved(), 2);
    assert!(outcome
        .problems()
        .any(|e| matches!(e, SnapError::ChannelNotFound { .. })));

    let reports = log.lock().unwrap();
    assert!(reports
        .iter()
        .any(|r| r.severity == Severity::Error && r.message.contains("'ch3' not found")));

    let target = Grid::new(4, 2).unwrap().cell_center(2).unwrap();
    for center in centers(&meshes[0]) {
        assert!((center - target).norm() < 1e-9);
    }
}

#[test]
fn test_offset_group_selection_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut meshes = load_scene(&dir);
    let left = &mut meshes[0];
    left.deselect_all();
    assert_eq!(left.select_group("second"), 1);

    let config = GridConfig::default();
    let outcome = offset_selected(
        [&mut *left],
        &config,
        Direction::Left,
        &IslandOptions::default(),
        &Reporter::none(),
    );
    assert_eq!(outcome.status, OperatorStatus::Finished);
    assert_eq!(outcome.islands_moved(), 1);

    let out = dir.path().join("out.obj");
    io::save(&meshes, &out, &config.uv_channel).unwrap();
    let reloaded = io::load(&out, &ObjOptions::default()).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded[1].find_channel("ch3").is_none());

    // The unselected island stays put, the selected one moved a quarter to the left
    let uvs = reloaded[0].channel("ch3").unwrap();
    assert!((uvs[0] - Point2::new(0.0, 0.0)).norm() < 1e-6);
    assert!((uvs[4] - Point2::new(0.35, 0.60)).norm() < 1e-6);
    assert!((uvs[6] - Point2::new(0.45, 0.70)).norm() < 1e-6);
}

#[test]
fn test_out_of_range_cell_cancels_before_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let mut meshes = load_scene(&dir);
    let before = meshes[0].channel("ch3").unwrap().to_vec();

    let outcome = snap_selected(
        meshes.iter_mut(),
        &GridConfig::default(),
        8,
        &IslandOptions::default(),
        &Reporter::none(),
    );
    assert_eq!(outcome.status, OperatorStatus::Cancelled);
    assert!(matches!(
        outcome.error,
        Some(SnapError::CellIndexOutOfBounds { index: 8, cells: 8 })
    ));
    assert_eq!(meshes[0].channel("ch3").unwrap(), before.as_slice());
    assert_eq!(meshes[0].uv_revision(), 0);
}

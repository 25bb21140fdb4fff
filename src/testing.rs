//! Synthetic meshes shared by the unit tests.

use nalgebra::{Point2, Point3, Vector2};

use crate::mesh::{PolyMesh, PolyMeshBuilder};

/// UV channel name used by the fixtures.
pub const CHANNEL: &str = "ch3";

/// An `nx` by `ny` grid of unit quads.
///
/// Quad `(i, j)` gets UVs equal to its corner positions scaled by `scale`,
/// shifted by `shift(i, j)`. Neighbouring quads with the same shift share UV
/// corners; different shifts cut a seam between them.
pub fn quad_grid<F>(nx: usize, ny: usize, scale: f64, shift: F) -> PolyMesh
where
    F: Fn(usize, usize) -> Vector2<f64>,
{
    let mut positions = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            positions.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    let mut builder = PolyMeshBuilder::new("grid").with_positions(positions.clone());
    let mut uvs = Vec::with_capacity(nx * ny * 4);
    for j in 0..ny {
        for i in 0..nx {
            let v00 = j * (nx + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (nx + 1);
            let v11 = v01 + 1;
            let corners = [v00, v10, v11, v01];
            builder.add_face(&corners);

            let s = shift(i, j);
            for v in corners {
                let p = positions[v];
                uvs.push(Point2::new(p.x * scale, p.y * scale) + s);
            }
        }
    }

    builder
        .with_channel(CHANNEL, uvs)
        .build()
        .expect("fixture grid is valid")
}

/// A single quad spanning `[min, max]` in UV space.
pub fn uv_quad(min: Point2<f64>, max: Point2<f64>) -> PolyMesh {
    let mut builder = PolyMeshBuilder::new("quad").with_positions(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
    ]);
    builder.add_face(&[0, 1, 2, 3]);
    builder
        .with_channel(
            CHANNEL,
            vec![
                Point2::new(min.x, min.y),
                Point2::new(max.x, min.y),
                Point2::new(max.x, max.y),
                Point2::new(min.x, max.y),
            ],
        )
        .build()
        .expect("fixture quad is valid")
}

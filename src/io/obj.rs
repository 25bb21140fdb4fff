//! Wavefront OBJ support.
//!
//! Every `o` block becomes one [`PolyMesh`], so a file with several objects
//! loads as a multi-object selection. Texture coordinates (`vt`) are imported
//! into a UV channel whose name is chosen by the caller; an object whose faces
//! carry no texture indices has no UV channel at all. Face groups (`g`) are
//! kept and can be used to select faces.
//!
//! Normals, materials and smoothing groups are ignored on load and not
//! written back.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};
use thiserror::Error;
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, PolyMesh, PolyMeshBuilder, UvMesh};

/// Name given to faces that appear before any `o` statement.
pub const DEFAULT_OBJECT: &str = "default";

/// Options for loading OBJ files.
#[derive(Debug, Clone)]
pub struct ObjOptions {
    /// Channel that receives the `vt` coordinates.
    pub uv_channel: String,
}

impl Default for ObjOptions {
    fn default() -> Self {
        Self {
            uv_channel: crate::config::DEFAULT_UV_CHANNEL.to_string(),
        }
    }
}

impl ObjOptions {
    /// Set the channel that receives the `vt` coordinates.
    pub fn with_uv_channel(mut self, name: impl Into<String>) -> Self {
        self.uv_channel = name.into();
        self
    }
}

/// Load all objects from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use cellsnap::io::obj::{self, ObjOptions};
///
/// let meshes = obj::load("scene.obj", &ObjOptions::default()).unwrap();
/// for mesh in &meshes {
///     println!("{}: {} vertices", mesh.name(), mesh.num_vertices());
/// }
/// ```
pub fn load<P: AsRef<Path>>(path: P, options: &ObjOptions) -> Result<Vec<PolyMesh>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    parse(BufReader::new(file), options).map_err(|e| match e {
        ParseError::Mesh(err) => err,
        err @ ParseError::Line { .. } => MeshError::LoadError {
            path: path.to_path_buf(),
            message: err.to_string(),
        },
    })
}

/// Save meshes to an OBJ file, writing the UVs of `uv_channel`.
pub fn save<P: AsRef<Path>>(meshes: &[PolyMesh], path: P, uv_channel: &str) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(meshes, &mut writer, uv_channel)
        .and_then(|_| writer.flush())
        .map_err(|e| MeshError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Errors from [`parse`].
#[derive(Error, Debug)]
pub enum ParseError {
    /// Malformed input on a given line (1-based).
    #[error("line {line}: {message}")]
    Line {
        /// Line number.
        line: usize,
        /// What was wrong.
        message: String,
    },
    /// A parsed object failed mesh validation, or reading failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

type ParseResult<T> = std::result::Result<T, ParseError>;

/// One object being assembled.
struct ObjectState {
    builder: PolyMeshBuilder,
    /// Global position index to local vertex index.
    vertex_map: HashMap<usize, usize>,
    uvs: Vec<Point2<f64>>,
    corners_with_uv: usize,
    corners_without_uv: usize,
    faces: usize,
}

impl ObjectState {
    fn new(name: &str) -> Self {
        Self {
            builder: PolyMeshBuilder::new(name),
            vertex_map: HashMap::new(),
            uvs: Vec::new(),
            corners_with_uv: 0,
            corners_without_uv: 0,
            faces: 0,
        }
    }

    fn finish(self, channel: &str, line: usize) -> ParseResult<Option<PolyMesh>> {
        if self.faces == 0 {
            return Ok(None);
        }
        if self.corners_with_uv > 0 && self.corners_without_uv > 0 {
            return Err(ParseError::Line {
                line,
                message: "object mixes faces with and without texture coordinates".to_string(),
            });
        }
        let mut builder = self.builder;
        if self.corners_with_uv > 0 {
            builder.add_channel(channel, self.uvs);
        }
        Ok(Some(builder.build()?))
    }
}

fn resolve_index(token: &str, len: usize, what: &str, line: usize) -> ParseResult<usize> {
    let bad = |message: String| ParseError::Line { line, message };
    let raw: i64 = token
        .parse()
        .map_err(|_| bad(format!("invalid {} index '{}'", what, token)))?;
    let index = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        len as i64 + raw
    } else {
        return Err(bad(format!("{} index must not be 0", what)));
    };
    if index < 0 || index as usize >= len {
        return Err(bad(format!("{} index {} out of range", what, raw)));
    }
    Ok(index as usize)
}

fn parse_floats<'a, I>(parts: I, count: usize, line: usize) -> ParseResult<Vec<f64>>
where
    I: Iterator<Item = &'a str>,
{
    let values = parts
        .take(count)
        .map(|p| p.parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .map_err(|e| ParseError::Line {
            line,
            message: e.to_string(),
        })?;
    if values.len() < count {
        return Err(ParseError::Line {
            line,
            message: format!("expected {} coordinates", count),
        });
    }
    Ok(values)
}

/// Parse OBJ text into one mesh per object.
pub fn parse<R: BufRead>(reader: R, options: &ObjOptions) -> ParseResult<Vec<PolyMesh>> {
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut texcoords: Vec<Point2<f64>> = Vec::new();
    let mut meshes = Vec::new();
    let mut current = ObjectState::new(DEFAULT_OBJECT);
    let mut line_no = 0;

    for line in reader.lines() {
        let line = line.map_err(|e| ParseError::Mesh(e.into()))?;
        line_no += 1;
        let content = line.split('#').next().unwrap_or("").trim();
        let mut parts = content.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let c = parse_floats(parts, 3, line_no)?;
                positions.push(Point3::new(c[0], c[1], c[2]));
            }
            "vt" => {
                let c = parse_floats(parts, 2, line_no)?;
                texcoords.push(Point2::new(c[0], c[1]));
            }
            "o" => {
                let name = parts.collect::<Vec<_>>().join(" ");
                let next = ObjectState::new(if name.is_empty() { DEFAULT_OBJECT } else { &name });
                let done = std::mem::replace(&mut current, next);
                if let Some(mesh) = done.finish(&options.uv_channel, line_no)? {
                    meshes.push(mesh);
                }
            }
            "g" => {
                // Each whitespace-separated name is a group of its own
                let groups: Vec<&str> = parts.collect();
                current.builder.set_groups(&groups);
            }
            "f" => {
                let mut face = Vec::new();
                for corner in parts {
                    let mut refs = corner.split('/');
                    let v = refs.next().unwrap_or("");
                    let global = resolve_index(v, positions.len(), "vertex", line_no)?;
                    let local = match current.vertex_map.get(&global) {
                        Some(&local) => local,
                        None => {
                            let local = current.builder.add_position(positions[global]);
                            current.vertex_map.insert(global, local);
                            local
                        }
                    };
                    face.push(local);

                    match refs.next().filter(|t| !t.is_empty()) {
                        Some(vt) => {
                            let t = resolve_index(vt, texcoords.len(), "texture", line_no)?;
                            current.uvs.push(texcoords[t]);
                            current.corners_with_uv += 1;
                        }
                        None => {
                            current.uvs.push(Point2::origin());
                            current.corners_without_uv += 1;
                        }
                    }
                }
                current.builder.add_face(&face);
                current.faces += 1;
            }
            _ => {}
        }
    }

    if let Some(mesh) = current.finish(&options.uv_channel, line_no)? {
        meshes.push(mesh);
    }
    debug!(objects = meshes.len(), vertices = positions.len(), "parsed OBJ");
    Ok(meshes)
}

/// Write meshes as OBJ text.
///
/// Identical UVs within a mesh share one `vt` line.
pub fn write<W: Write>(
    meshes: &[PolyMesh],
    writer: &mut W,
    uv_channel: &str,
) -> std::io::Result<()> {
    let mut vertex_base = 1;
    let mut texture_base = 1;

    for mesh in meshes {
        writeln!(writer, "o {}", mesh.name())?;
        for p in mesh.positions() {
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }

        let mut loop_texture: Vec<usize> = Vec::new();
        let mut seen: HashMap<(u64, u64), usize> = HashMap::new();
        if let Some(uvs) = mesh.channel(uv_channel) {
            for uv in uvs {
                let next = seen.len();
                let index = *seen.entry((uv.x.to_bits(), uv.y.to_bits())).or_insert(next);
                if index == next {
                    writeln!(writer, "vt {} {}", uv.x, uv.y)?;
                }
                loop_texture.push(index);
            }
        }

        let mut groups: Vec<&str> = Vec::new();
        for f in mesh.face_ids() {
            let fg: Vec<&str> = mesh.face_groups(f).collect();
            if fg != groups {
                if fg.is_empty() {
                    writeln!(writer, "g")?;
                } else {
                    writeln!(writer, "g {}", fg.join(" "))?;
                }
                groups = fg;
            }
            write_face(writer, mesh, f, &loop_texture, vertex_base, texture_base)?;
        }

        vertex_base += mesh.num_vertices();
        texture_base += seen.len();
    }
    Ok(())
}

fn write_face<W: Write>(
    writer: &mut W,
    mesh: &PolyMesh,
    f: FaceId,
    loop_texture: &[usize],
    vertex_base: usize,
    texture_base: usize,
) -> std::io::Result<()> {
    write!(writer, "f")?;
    for lp in mesh.face_loops(f) {
        let v = mesh.loop_vertex(lp) + vertex_base;
        match loop_texture.get(lp.index()) {
            Some(t) => write!(writer, " {}/{}", v, t + texture_base)?,
            None => write!(writer, " {}", v)?,
        }
    }
    writeln!(writer)
}

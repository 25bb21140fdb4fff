//! Mesh file I/O.
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | One mesh per `o` object, `vt` as a UV channel |
//!
//! ```no_run
//! use cellsnap::io::obj::{self, ObjOptions};
//!
//! let meshes = obj::load("scene.obj", &ObjOptions::default()).unwrap();
//! obj::save(&meshes, "snapped.obj", "ch3").unwrap();
//! ```

pub mod obj;

pub use obj::{load, save, ObjOptions};

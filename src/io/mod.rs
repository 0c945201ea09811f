//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | PLY | `.ply` | ✓ | ✓ | `face` or `tetra` element, fixed-point count in a comment |
//! | Legacy VTK | `.vtk` | ✗ | ✓ | Unstructured grid for ParaView and FE tools |
//!
//! # Usage
//!
//! ```no_run
//! use distmesh::io::{load, save};
//! use distmesh::mesh::Mesh2;
//!
//! let mesh: Mesh2 = load("disk.ply").unwrap();
//! save(&mesh, "disk.vtk").unwrap();
//! ```

pub mod ply;
pub mod vtk;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PLY (Stanford polygon) format.
    Ply,
    /// Legacy VTK unstructured grid.
    Vtk,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "ply" => Some(Format::Ply),
            "vtk" => Some(Format::Vtk),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>, const D: usize>(path: P) -> Result<Mesh<D>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load(path),
        Format::Vtk => Err(MeshError::UnsupportedFormat {
            extension: "vtk (load)".to_string(),
        }),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>, const D: usize>(mesh: &Mesh<D>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::save(mesh, path),
        Format::Vtk => vtk::save(mesh, path),
    }
}

//! PLY (Stanford polygon) format support.
//!
//! Triangle meshes are stored as the usual `vertex` and `face` elements.
//! Tetrahedral meshes use a `tetra` element with the same
//! `vertex_indices` list property. Planar meshes are written with `z = 0`.
//! The number of fixed points is kept in a `fixed_points` header comment.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, SimplexSet};

const AXES: [&str; 3] = ["x", "y", "z"];
const FIXED_COMMENT: &str = "fixed_points";

/// Name of the element holding simplices of dimension `D`.
fn cell_element(dim: usize) -> Option<&'static str> {
    match dim {
        2 => Some("face"),
        3 => Some("tetra"),
        _ => None,
    }
}

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use distmesh::io::ply;
/// use distmesh::mesh::Mesh2;
///
/// let mesh: Mesh2 = ply::load("disk.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, const D: usize>(path: P) -> Result<Mesh<D>> {
    let path = path.as_ref();
    let load_error = |message: String| MeshError::LoadError {
        path: path.to_path_buf(),
        message,
    };
    let cell_name = cell_element(D).ok_or_else(|| load_error(format!("{}D meshes are not supported", D)))?;

    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element".to_string()))?;

    let mut points: Vec<Point<f64, D>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let mut p = Point::<f64, D>::origin();
        for (axis, name) in AXES.iter().enumerate().take(D) {
            p[axis] = get_float_property(vertex, name)
                .ok_or_else(|| load_error(format!("vertex missing {name} coordinate")))?;
        }
        points.push(p);
    }

    let cell_data = ply
        .payload
        .get(cell_name)
        .ok_or_else(|| load_error(format!("PLY file has no {cell_name} element")))?;

    let mut simplices = SimplexSet::with_capacity(D + 1, cell_data.len());
    for cell in cell_data {
        let indices = get_list_property(cell, "vertex_indices")
            .or_else(|| get_list_property(cell, "vertex_index"))
            .ok_or_else(|| load_error(format!("{cell_name} missing vertex_indices property")))?;
        if indices.len() != D + 1 {
            return Err(load_error(format!(
                "{cell_name} has {} vertices, expected {}",
                indices.len(),
                D + 1
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&v| v >= points.len()) {
            return Err(load_error(format!("vertex index {bad} out of range")));
        }
        simplices.push(&indices);
    }

    let nfix = ply
        .header
        .comments
        .iter()
        .find_map(|c| c.trim_start().strip_prefix(FIXED_COMMENT))
        .and_then(|rest| rest.trim().parse::<usize>().ok())
        .unwrap_or(0);
    if nfix > points.len() {
        return Err(load_error(format!(
            "{nfix} fixed points declared but only {} vertices",
            points.len()
        )));
    }

    Ok(Mesh::new(points, simplices, nfix))
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => v.iter().map(|&x| usize::try_from(x).ok()).collect(),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
///
/// Coordinates are written in full precision, so [`load`] returns the
/// same points.
///
/// # Example
///
/// ```no_run
/// use distmesh::algo::distmesh::{build, DistMeshOptions};
/// use distmesh::io::ply;
/// use distmesh::shape::{area_uniform, circle};
/// use nalgebra::Point2;
///
/// let mesh = build(circle(Point2::origin(), 1.0), area_uniform, &DistMeshOptions::default()).unwrap();
/// ply::save(&mesh, "disk.ply").unwrap();
/// ```
pub fn save<P: AsRef<Path>, const D: usize>(mesh: &Mesh<D>, path: P) -> Result<()> {
    let path = path.as_ref();
    let cell_name = cell_element(D).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: format!("ply ({}D)", D),
    })?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by distmesh")?;
    writeln!(writer, "comment {} {}", FIXED_COMMENT, mesh.nfix)?;
    writeln!(writer, "element vertex {}", mesh.num_points())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element {} {}", cell_name, mesh.num_simplices())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    // Write vertices
    for p in &mesh.points {
        let z = if D == 3 { p[D - 1] } else { 0.0 };
        writeln!(writer, "{} {} {}", p[0], p[1], z)?;
    }

    // Write cells
    for simplex in &mesh.simplices {
        write!(writer, "{}", simplex.len())?;
        for v in simplex {
            write!(writer, " {}", v)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

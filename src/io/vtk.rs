//! Legacy VTK unstructured grid output.
//!
//! Write-only; the files open directly in ParaView and most finite-element
//! pre-processors. Fixed points are flagged in a `fixed` point-data array.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::Mesh;

/// VTK cell type codes.
const VTK_TRIANGLE: u8 = 5;
const VTK_TETRA: u8 = 10;

/// Save a mesh as an ASCII legacy VTK file.
///
/// # Example
///
/// ```no_run
/// use distmesh::io::vtk;
/// use distmesh::mesh::{Mesh2, SimplexSet};
/// use nalgebra::Point2;
///
/// let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
/// let mesh = Mesh2::new(points, SimplexSet::from_flat(3, vec![0, 1, 2]).unwrap(), 0);
/// vtk::save(&mesh, "triangle.vtk").unwrap();
/// ```
pub fn save<P: AsRef<Path>, const D: usize>(mesh: &Mesh<D>, path: P) -> Result<()> {
    let path = path.as_ref();
    let cell_type = match D {
        2 => VTK_TRIANGLE,
        3 => VTK_TETRA,
        _ => {
            return Err(MeshError::UnsupportedFormat {
                extension: format!("vtk ({}D)", D),
            })
        }
    };

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_grid(&mut writer, mesh, cell_type)?;
    writer.flush()?;
    Ok(())
}

fn write_grid<W: Write, const D: usize>(writer: &mut W, mesh: &Mesh<D>, cell_type: u8) -> std::io::Result<()> {
    let k = D + 1;
    writeln!(writer, "# vtk DataFile Version 3.0")?;
    writeln!(writer, "Generated by distmesh")?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(writer, "POINTS {} double", mesh.num_points())?;
    for p in &mesh.points {
        let z = if D == 3 { p[D - 1] } else { 0.0 };
        writeln!(writer, "{} {} {}", p[0], p[1], z)?;
    }

    let n = mesh.num_simplices();
    writeln!(writer, "CELLS {} {}", n, n * (k + 1))?;
    for simplex in &mesh.simplices {
        write!(writer, "{}", k)?;
        for v in simplex {
            write!(writer, " {}", v)?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "CELL_TYPES {}", n)?;
    for _ in 0..n {
        writeln!(writer, "{}", cell_type)?;
    }

    writeln!(writer, "POINT_DATA {}", mesh.num_points())?;
    writeln!(writer, "SCALARS fixed int 1")?;
    writeln!(writer, "LOOKUP_TABLE default")?;
    for i in 0..mesh.num_points() {
        writeln!(writer, "{}", u8::from(i < mesh.nfix))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::SimplexSet;
    use nalgebra::Point2;

    #[test]
    fn test_triangle_grid() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let simplices = SimplexSet::from_flat(3, vec![0, 1, 2, 0, 2, 3]).unwrap();
        let mesh = Mesh::new(points, simplices, 1);

        let mut out = Vec::new();
        write_grid(&mut out, &mesh, VTK_TRIANGLE).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("POINTS 4 double"));
        assert!(text.contains("CELLS 2 8\n3 0 1 2\n3 0 2 3\n"));
        assert!(text.contains("CELL_TYPES 2\n5\n5\n"));
        assert!(text.ends_with("LOOKUP_TABLE default\n1\n0\n0\n0\n"));
    }
}

//! Element quality measures.
//!
//! The radius ratio `D · r_in / r_circ` is 1 for the regular simplex and
//! tends to 0 as the element flattens. It is the usual way to judge a mesh
//! that stopped at `max_iter` before converging.

use nalgebra::{DMatrix, Point};
use rayon::prelude::*;

use crate::geometry::{circumsphere, signed_volume};
use crate::mesh::Mesh;

/// Radius ratio of a simplex given by `D + 1` points.
///
/// Returns 0 for degenerate simplices.
///
/// # Example
///
/// ```
/// use distmesh::algo::quality::simplex_quality;
/// use nalgebra::Point2;
///
/// let h = 3.0_f64.sqrt() / 2.0;
/// let q = simplex_quality(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, h)]);
/// assert!((q - 1.0).abs() < 1e-12);
/// ```
pub fn simplex_quality<const D: usize>(simplex: &[Point<f64, D>]) -> f64 {
    debug_assert_eq!(simplex.len(), D + 1);
    let volume = signed_volume(simplex).abs();
    if !(volume > 0.0) {
        return 0.0;
    }
    let Some((_, r2)) = circumsphere(simplex) else {
        return 0.0;
    };

    let surface: f64 = (0..=D).map(|skip| facet_measure(simplex, skip)).sum();
    if !(surface > 0.0) {
        return 0.0;
    }
    let r_in = D as f64 * volume / surface;
    let q = D as f64 * r_in / r2.sqrt();
    q.clamp(0.0, 1.0)
}

/// Measure of the facet opposite vertex `skip`, from its Gram determinant.
fn facet_measure<const D: usize>(simplex: &[Point<f64, D>], skip: usize) -> f64 {
    let facet: Vec<&Point<f64, D>> = simplex
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != skip)
        .map(|(_, p)| p)
        .collect();
    let k = facet.len() - 1;
    if k == 0 {
        return 1.0;
    }
    let edges = DMatrix::from_fn(D, k, |row, col| facet[col + 1][row] - facet[0][row]);
    let gram = edges.transpose() * &edges;
    let factorial: f64 = (1..=k).map(|i| i as f64).product();
    gram.determinant().max(0.0).sqrt() / factorial
}

/// Summary of element quality over a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityStats {
    /// Worst element.
    pub min: f64,
    /// Average over all elements.
    pub mean: f64,
    /// Number of elements measured.
    pub count: usize,
}

/// Radius ratio of every simplex of `mesh`.
pub fn simplex_qualities<const D: usize>(mesh: &Mesh<D>, parallel: bool) -> Vec<f64> {
    let quality = |i: usize| simplex_quality(&mesh.simplex_points(i));
    if parallel {
        (0..mesh.num_simplices()).into_par_iter().map(quality).collect()
    } else {
        (0..mesh.num_simplices()).map(quality).collect()
    }
}

/// Minimum and mean radius ratio of `mesh`, or `None` for an empty mesh.
pub fn mesh_quality<const D: usize>(mesh: &Mesh<D>) -> Option<QualityStats> {
    let qualities = simplex_qualities(mesh, true);
    if qualities.is_empty() {
        return None;
    }
    let min = qualities.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = qualities.iter().sum::<f64>() / qualities.len() as f64;
    Some(QualityStats {
        min,
        mean,
        count: qualities.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::SimplexSet;
    use nalgebra::{Point2, Point3};

    #[test]
    fn test_regular_tetrahedron() {
        let tet = [
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
        ];
        assert!((simplex_quality(&tet) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_right_triangle() {
        // r_in = (2 - √2) / 2, R = √2 / 2 for the unit right triangle.
        let tri = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 1.0)];
        let expected = 2.0 * (2.0 - 2.0_f64.sqrt()) / 2.0 / (2.0_f64.sqrt() / 2.0);
        assert!((simplex_quality(&tri) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_is_zero() {
        let tri = [Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)];
        assert_eq!(simplex_quality(&tri), 0.0);
    }

    #[test]
    fn test_mesh_quality() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let simplices = SimplexSet::from_flat(3, vec![0, 1, 2, 0, 2, 3]).unwrap();
        let mesh = Mesh::new(points, simplices, 0);
        let stats = mesh_quality(&mesh).unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.min - stats.mean).abs() < 1e-12);
        assert!(stats.min > 0.8 && stats.min < 0.9);

        let empty = Mesh::<2>::new(vec![], SimplexSet::new(3), 0);
        assert!(mesh_quality(&empty).is_none());
    }
}

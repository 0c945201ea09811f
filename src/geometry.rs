//! Small geometric kernels shared by the mesher and the triangulators.
//!
//! Everything here is dimension-generic over `const D: usize` and works on
//! plain nalgebra points. Small dense systems go through nalgebra's dynamic
//! matrices so callers need no dimension trait bounds.

use nalgebra::{DMatrix, DVector, Point, SVector};
use rayon::prelude::*;

use crate::shape::DistanceField;

/// Euclidean length of every vector in a batch.
pub fn lengths<const D: usize>(vectors: &[SVector<f64, D>]) -> Vec<f64> {
    vectors.iter().map(|v| v.norm()).collect()
}

/// Largest distance between corresponding points of two equally long slices.
///
/// Returns `f64::INFINITY` when the slices differ in length, so a stale
/// snapshot always reads as "moved too far".
pub fn max_displacement<const D: usize>(a: &[Point<f64, D>], b: &[Point<f64, D>]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(p, q)| (p - q).norm())
        .fold(0.0, f64::max)
}

/// Finite-difference step used by [`edge_project`] for a mesh of spacing `h0`.
#[inline]
pub fn projection_step(h0: f64) -> f64 {
    f64::EPSILON.sqrt() * h0
}

/// Numerical gradient of a distance field by symmetric differences.
pub fn numerical_gradient<const D: usize, F>(fd: &F, p: &Point<f64, D>, step: f64) -> SVector<f64, D>
where
    F: DistanceField<D> + ?Sized,
{
    let mut grad = SVector::<f64, D>::zeros();
    for axis in 0..D {
        let mut forward = *p;
        let mut backward = *p;
        forward[axis] += step;
        backward[axis] -= step;
        grad[axis] = (fd.distance(&forward) - fd.distance(&backward)) / (2.0 * step);
    }
    grad
}

/// Displacement that moves `p` onto the zero level set of `fd`.
///
/// Subtracting the returned vector from `p` performs one Newton step along
/// the numerical gradient: `d · g / |g|²`. For an exact signed distance
/// function `|g| = 1` and this is the closest boundary point.
pub fn edge_project<const D: usize, F>(fd: &F, p: &Point<f64, D>, h0: f64) -> SVector<f64, D>
where
    F: DistanceField<D> + ?Sized,
{
    let d = fd.distance(p);
    let grad = numerical_gradient(fd, p, projection_step(h0));
    let g2 = grad.norm_squared();
    if !(g2 > 0.0) || !g2.is_finite() {
        return SVector::zeros();
    }
    grad * (d / g2)
}

/// Projects every point in `points` with `fd > 0` back onto the boundary.
///
/// `distances` must hold `fd` evaluated at `points`.
pub fn project_exterior<const D: usize, F>(
    fd: &F,
    points: &mut [Point<f64, D>],
    distances: &[f64],
    h0: f64,
    parallel: bool,
) where
    F: DistanceField<D> + ?Sized,
{
    debug_assert_eq!(points.len(), distances.len());
    if parallel {
        points
            .par_iter_mut()
            .zip(distances.par_iter())
            .filter(|(_, d)| **d > 0.0)
            .for_each(|(p, _)| {
                let delta = edge_project(fd, p, h0);
                *p -= delta;
            });
    } else {
        for (p, &d) in points.iter_mut().zip(distances) {
            if d > 0.0 {
                let delta = edge_project(fd, p, h0);
                *p -= delta;
            }
        }
    }
}

/// Arithmetic mean of a set of points.
pub fn centroid<const D: usize>(points: &[Point<f64, D>]) -> Point<f64, D> {
    if points.is_empty() {
        return Point::origin();
    }
    let sum: SVector<f64, D> = points.iter().map(|p| p.coords).sum();
    Point::from(sum / points.len() as f64)
}

/// Matrix whose row `r` is `scale · (simplex[r + 1] - simplex[0])`.
pub fn edge_matrix<const D: usize>(simplex: &[&Point<f64, D>], scale: f64) -> DMatrix<f64> {
    debug_assert_eq!(simplex.len(), D + 1);
    DMatrix::from_fn(D, D, |row, col| scale * (simplex[row + 1][col] - simplex[0][col]))
}

/// Signed volume of a simplex given by `D + 1` points.
///
/// Positive for counter-clockwise triangles and for tetrahedra whose fourth
/// vertex lies on the side the right-handed normal of the first three
/// points points to.
pub fn signed_volume<const D: usize>(simplex: &[Point<f64, D>]) -> f64 {
    let corners: Vec<&Point<f64, D>> = simplex.iter().collect();
    edge_matrix(&corners, 1.0).determinant() / factorial(D)
}

/// Circumcenter and squared circumradius of a simplex of `D + 1` points.
///
/// Returns `None` for a degenerate (flat) simplex.
pub fn circumsphere<const D: usize>(simplex: &[Point<f64, D>]) -> Option<(Point<f64, D>, f64)> {
    let corners: Vec<&Point<f64, D>> = simplex.iter().collect();
    let origin = simplex[0];
    let m = edge_matrix(&corners, 2.0);
    let rhs = DVector::from_iterator(D, simplex[1..].iter().map(|p| (p - origin).norm_squared()));
    let rel = m.lu().solve(&rhs)?;
    let rel = SVector::<f64, D>::from_iterator(rel.iter().copied());
    if !rel.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some((origin + rel, rel.norm_squared()))
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Point3, Vector2};

    fn unit_circle(p: &Point2<f64>) -> f64 {
        p.coords.norm() - 1.0
    }

    #[test]
    fn test_lengths() {
        let v = vec![Vector2::new(3.0, 4.0), Vector2::new(0.0, 0.0)];
        assert_eq!(lengths(&v), vec![5.0, 0.0]);
    }

    #[test]
    fn test_max_displacement_length_mismatch() {
        let a = vec![Point2::new(0.0, 0.0)];
        let b = vec![];
        assert!(max_displacement(&a, &b).is_infinite());
        assert_eq!(max_displacement(&a, &a), 0.0);
    }

    #[test]
    fn test_edge_project_onto_circle() {
        let p = Point2::new(1.5, 0.0);
        let q = p - edge_project(&unit_circle, &p, 0.1);
        assert!((q - Point2::new(1.0, 0.0)).norm() < 1e-6, "{:?}", q);

        let p = Point2::new(0.9, 0.9);
        let q = p - edge_project(&unit_circle, &p, 0.1);
        assert!(unit_circle(&q).abs() < 1e-6);
    }

    #[test]
    fn test_project_exterior_skips_interior() {
        let mut pts = vec![Point2::new(0.2, 0.0), Point2::new(0.0, 2.0)];
        let d: Vec<f64> = pts.iter().map(unit_circle).collect();
        project_exterior(&unit_circle, &mut pts, &d, 0.1, false);
        assert_eq!(pts[0], Point2::new(0.2, 0.0));
        assert!((pts[1] - Point2::new(0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_signed_volume_orientation() {
        let ccw = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert!((signed_volume(&ccw) - 0.5).abs() < 1e-12);
        let cw = [ccw[0], ccw[2], ccw[1]];
        assert!((signed_volume(&cw) + 0.5).abs() < 1e-12);

        let tet = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        assert!((signed_volume(&tet) - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_circumsphere_right_triangle() {
        let tri = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(0.0, 2.0),
        ];
        let (c, r2) = circumsphere(&tri).unwrap();
        assert!((c - Point2::new(1.0, 1.0)).norm() < 1e-12);
        assert!((r2 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_circumsphere_degenerate() {
        let tri = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        assert!(circumsphere(&tri).is_none());
    }

    #[test]
    fn test_edge_matrix_rows() {
        let (a, b, c) = (Point2::new(1.0, 1.0), Point2::new(3.0, 2.0), Point2::new(2.0, 4.0));
        let m = edge_matrix(&[&a, &b, &c], 1.0);
        assert_eq!(m, DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]));
        assert!((m.determinant() - 5.0).abs() < 1e-12);
        assert_eq!(edge_matrix(&[&a, &b, &c], 2.0)[(1, 1)], 6.0);
    }

    #[test]
    fn test_circumsphere_tetrahedron() {
        let tet = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let (c, r2) = circumsphere(&tet).unwrap();
        assert!((c - Point3::new(1.0, 1.0, 1.0)).norm() < 1e-12);
        assert!((r2 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_centroid() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), Point2::new(1.0, 3.0)];
        assert_eq!(centroid(&pts), Point2::new(1.0, 1.0));
    }
}

//! Retriangulation of the current point set.

use nalgebra::Point;
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::geometry::centroid;
use crate::mesh::{Bar, SimplexSet};
use crate::shape::DistanceField;
use crate::triangulate::Triangulator;

/// Delaunay triangulation of `points` restricted to the domain.
///
/// Simplices whose centroid has `fd >= -geps` are dropped, which removes
/// the slivers spanning concave parts of the boundary.
pub fn triangulate<const D: usize, Fd, T>(
    points: &[Point<f64, D>],
    fd: &Fd,
    triangulator: &T,
    geps: f64,
    parallel: bool,
) -> Result<SimplexSet>
where
    Fd: DistanceField<D> + ?Sized,
    T: Triangulator<D> + ?Sized,
{
    if points.len() < D + 1 {
        return Err(MeshError::TooFewPoints {
            required: D + 1,
            actual: points.len(),
        });
    }

    let mut simplices = triangulator.triangulate(points)?;
    let centroids: Vec<Point<f64, D>> = simplices
        .iter()
        .map(|s| {
            let corners: Vec<Point<f64, D>> = s.iter().map(|&v| points[v]).collect();
            centroid(&corners)
        })
        .collect();
    let distances = fd.distances(&centroids, parallel);

    let mut keep = distances.into_iter().map(|d| d < -geps);
    simplices.retain(|_| keep.next().unwrap_or(false));
    Ok(simplices)
}

/// Unique edges of `simplices`, each as `[smaller, larger]`.
pub fn bars(simplices: &SimplexSet) -> Vec<Bar> {
    simplices.bars()
}

/// Midpoints of every bar.
pub fn midpoints<const D: usize>(points: &[Point<f64, D>], bars: &[Bar], parallel: bool) -> Vec<Point<f64, D>> {
    let midpoint = |&[a, b]: &Bar| nalgebra::center(&points[a], &points[b]);
    if parallel {
        bars.par_iter().map(midpoint).collect()
    } else {
        bars.iter().map(midpoint).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::BowyerWatson;
    use nalgebra::Point2;

    fn l_shape(p: &Point2<f64>) -> f64 {
        let square = (p.x.abs()).max(p.y.abs()) - 1.0;
        let notch = (-p.x).max(-p.y);
        square.max(-notch)
    }

    #[test]
    fn test_drops_exterior_simplices() {
        let mut pts = Vec::new();
        for j in 0..5 {
            for i in 0..5 {
                pts.push(Point2::new(-1.0 + 0.5 * i as f64, -1.0 + 0.5 * j as f64));
            }
        }
        let all = BowyerWatson::new().triangulate(&pts).unwrap();
        let kept = triangulate(&pts, &l_shape, &BowyerWatson::new(), 1e-4, false).unwrap();
        assert!(kept.len() < all.len());
        for s in kept.iter() {
            let c = centroid(&[pts[s[0]], pts[s[1]], pts[s[2]]]);
            assert!(l_shape(&c) < 0.0);
        }
        // The notch covers a quarter of the square.
        assert_eq!(kept.len(), all.len() * 3 / 4);
    }

    #[test]
    fn test_too_few_points() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let fd = |_: &Point2<f64>| -1.0;
        let err = triangulate(&pts, &fd, &BowyerWatson::new(), 1e-4, false).unwrap_err();
        assert!(matches!(err, MeshError::TooFewPoints { required: 3, actual: 2 }));
    }

    #[test]
    fn test_bars_are_unique() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let fd = |_: &Point2<f64>| -1.0;
        let simplices = triangulate(&pts, &fd, &BowyerWatson::new(), 1e-4, true).unwrap();
        let bars = bars(&simplices);
        assert_eq!(bars.len(), 5);
        assert!(bars.iter().all(|[a, b]| a < b));
        let mids = midpoints(&pts, &bars, false);
        assert_eq!(mids[0], Point2::new(0.5, 0.0));
    }
}

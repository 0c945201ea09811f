//! Implicit shape description: signed distance and sizing fields.
//!
//! A domain is described by a *distance field* `fd`, negative inside,
//! zero on the boundary and positive outside. The desired local edge length
//! is given by a *sizing field* `fh`, which must be strictly positive.
//!
//! Any `Fn(&Point<f64, D>) -> f64 + Sync` closure (or plain function) is both
//! a [`DistanceField`] and a [`SizingField`], so callers normally just pass
//! closures. The [`primitives`] and [`ops`] modules provide the common
//! analytic shapes and their boolean combinations.
//!
//! # Example
//!
//! ```
//! use distmesh::shape::{self, DistanceField};
//! use nalgebra::Point2;
//!
//! // Annulus: unit disk minus a disk of radius 0.4.
//! let outer = shape::circle(Point2::origin(), 1.0);
//! let inner = shape::circle(Point2::origin(), 0.4);
//! let annulus = shape::difference(outer, inner);
//!
//! assert!(annulus.distance(&Point2::new(0.7, 0.0)) < 0.0);
//! assert!(annulus.distance(&Point2::new(0.1, 0.0)) > 0.0);
//! ```

mod fixed;
pub mod ops;
pub mod primitives;

pub use fixed::{fix_points_circle, fix_points_fd};
pub use ops::{difference, dist_diff, dist_intersect, dist_union, intersection, union};
pub use primitives::{area_uniform, ball, circle, ellipse, ellipsoid, rectangle};

use nalgebra::Point;
use rayon::prelude::*;

/// A signed distance function over `D`-dimensional space.
///
/// Implementations must be pure: the mesher evaluates them from several
/// threads and in no particular order.
pub trait DistanceField<const D: usize>: Sync {
    /// Signed distance at a single point.
    fn distance(&self, p: &Point<f64, D>) -> f64;

    /// Signed distance at every point of a batch.
    fn distances(&self, points: &[Point<f64, D>], parallel: bool) -> Vec<f64> {
        if parallel {
            points.par_iter().map(|p| self.distance(p)).collect()
        } else {
            points.iter().map(|p| self.distance(p)).collect()
        }
    }
}

impl<const D: usize, F> DistanceField<D> for F
where
    F: Fn(&Point<f64, D>) -> f64 + Sync,
{
    #[inline]
    fn distance(&self, p: &Point<f64, D>) -> f64 {
        self(p)
    }
}

/// A sizing (density) function: the desired edge length near a point.
pub trait SizingField<const D: usize>: Sync {
    /// Desired relative edge length at a single point.
    fn size(&self, p: &Point<f64, D>) -> f64;

    /// Desired relative edge length at every point of a batch.
    fn sizes(&self, points: &[Point<f64, D>], parallel: bool) -> Vec<f64> {
        if parallel {
            points.par_iter().map(|p| self.size(p)).collect()
        } else {
            points.iter().map(|p| self.size(p)).collect()
        }
    }
}

impl<const D: usize, F> SizingField<D> for F
where
    F: Fn(&Point<f64, D>) -> f64 + Sync,
{
    #[inline]
    fn size(&self, p: &Point<f64, D>) -> f64 {
        self(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    #[test]
    fn test_closure_is_distance_field() {
        let fd = |p: &Point2<f64>| p.x - 0.5;
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert_eq!(fd.distances(&pts, false), vec![-0.5, 0.5]);
        assert_eq!(fd.distances(&pts, true), vec![-0.5, 0.5]);
    }

    #[test]
    fn test_function_is_sizing_field() {
        let pts = vec![Point2::new(0.3, 0.1); 4];
        assert_eq!(SizingField::<2>::sizes(&area_uniform::<2>, &pts, true), vec![1.0; 4]);
    }
}

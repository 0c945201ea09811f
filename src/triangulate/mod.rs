//! Delaunay triangulation oracles.
//!
//! The mesher only needs one thing from a triangulator: given a point set,
//! return its Delaunay simplices. [`Triangulator`] is that seam.
//!
//! - [`BowyerWatson`]: incremental Delaunay triangulation in any dimension,
//!   used by default for both triangles and tetrahedra.
//! - [`SpadeTriangulator`]: 2D triangulation backed by the `spade` crate
//!   (feature `spade`, enabled by default).
//!
//! # Example
//!
//! ```
//! use distmesh::triangulate::{BowyerWatson, Triangulator};
//! use nalgebra::Point2;
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let simplices = BowyerWatson::default().triangulate(&points).unwrap();
//! assert_eq!(simplices.len(), 2);
//! ```

mod bowyer_watson;
#[cfg(feature = "spade")]
mod spade_2d;

pub use bowyer_watson::BowyerWatson;
#[cfg(feature = "spade")]
pub use spade_2d::SpadeTriangulator;

use nalgebra::Point;

use crate::error::TriangulationError;
use crate::mesh::SimplexSet;

/// A Delaunay triangulation oracle in `D` dimensions.
pub trait Triangulator<const D: usize> {
    /// Delaunay simplices of `points`.
    ///
    /// Simplices index into `points` and have `D + 1` vertices each. Every
    /// returned simplex is Delaunay, but an oracle may omit flat simplices
    /// on the convex hull ([`BowyerWatson`] does when their circumsphere
    /// reaches its super-simplex). Fails
    /// on fewer than `D + 1` points, duplicate points, and point sets that
    /// do not span `D` dimensions.
    fn triangulate(&self, points: &[Point<f64, D>]) -> Result<SimplexSet, TriangulationError>;
}

impl<const D: usize, T> Triangulator<D> for &T
where
    T: Triangulator<D> + ?Sized,
{
    fn triangulate(&self, points: &[Point<f64, D>]) -> Result<SimplexSet, TriangulationError> {
        (**self).triangulate(points)
    }
}

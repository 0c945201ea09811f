//! # Distmesh
//!
//! Unstructured triangle and tetrahedral mesh generation from implicit
//! geometry.
//!
//! The domain is described by a signed distance field (negative inside,
//! zero on the boundary, positive outside) and the desired local edge
//! length by a sizing field. No boundary parametrization is needed: nodes
//! are relaxed as a network of repulsive springs, retriangulated as they
//! move, and projected back onto the zero level set whenever they leave
//! the domain.
//!
//! ## Features
//!
//! - **Dimension generic**: triangles for `D = 2`, tetrahedra for `D = 3`
//! - **Shape library**: circles, balls, ellipses, boxes and their boolean
//!   combinations
//! - **Pluggable triangulation**: built-in Bowyer–Watson in any dimension,
//!   or `spade` in the plane
//! - **Fixed points**: caller-supplied nodes that are kept in place
//!
//! ## Quick Start
//!
//! ```
//! use distmesh::prelude::*;
//! use nalgebra::Point2;
//!
//! // Unit square with a circular hole, corners pinned.
//! let fd = difference(
//!     rectangle(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0)),
//!     circle(Point2::origin(), 0.4),
//! );
//! let fh = |p: &Point2<f64>| 0.05 + 0.3 * (p.coords.norm() - 0.4).max(0.0);
//!
//! let options = DistMeshOptions::default()
//!     .with_h0(0.1)
//!     .with_max_iter(100)
//!     .with_fixed_points(vec![
//!         Point2::new(-1.0, -1.0),
//!         Point2::new(-1.0, 1.0),
//!         Point2::new(1.0, -1.0),
//!         Point2::new(1.0, 1.0),
//!     ]);
//!
//! let mut mesh = build(fd, fh, &options).unwrap();
//! mesh.orient();
//!
//! assert_eq!(mesh.nfix, 4);
//! assert!(mesh.num_simplices() > 0);
//! println!("{} nodes, {} triangles", mesh.num_points(), mesh.num_simplices());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mesh;
pub mod shape;
pub mod triangulate;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use distmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::distmesh::{
        build, build_with_progress, build_with_triangulator, BoundingBox, DistMesh, DistMeshOptions,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{Mesh, Mesh2, Mesh3, SimplexSet};
    pub use crate::shape::{
        area_uniform, ball, circle, difference, ellipse, intersection, rectangle, union, DistanceField,
        SizingField,
    };
    pub use crate::triangulate::{BowyerWatson, Triangulator};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

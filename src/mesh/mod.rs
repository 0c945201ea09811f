//! Core mesh data structures.
//!
//! The mesher works on a plain point list plus a flat [`SimplexSet`]. The
//! finished result is a [`Mesh`], which keeps the fixed points at the front
//! of its point list.
//!
//! ```
//! use distmesh::mesh::{Mesh2, SimplexSet};
//! use nalgebra::Point2;
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let simplices = SimplexSet::from_flat(3, vec![0, 1, 2]).unwrap();
//! let mesh = Mesh2::new(points, simplices, 0);
//!
//! assert_eq!(mesh.num_simplices(), 1);
//! assert_eq!(mesh.bars(), vec![[0, 1], [0, 2], [1, 2]]);
//! ```

mod simplex;
mod simplicial;

pub use simplex::{Bar, SimplexSet};
pub use simplicial::{Mesh, Mesh2, Mesh3};

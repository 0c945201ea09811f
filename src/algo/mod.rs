//! Mesh generation algorithms.
//!
//! - **Distmesh**: spring relaxation of a point set against a signed
//!   distance field and a sizing field, in 2D and 3D
//! - **Quality**: radius-ratio element quality

pub mod distmesh;
mod progress;
pub mod quality;

pub use distmesh::{build, build_with_progress, BuildReport, DistMesh, DistMeshOptions};
pub use progress::Progress;
pub use quality::{mesh_quality, simplex_quality, QualityStats};

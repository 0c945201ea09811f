//! The simplicial mesh produced by the mesher.

use nalgebra::Point;

use super::simplex::{Bar, SimplexSet};
use crate::geometry::{centroid, signed_volume};

/// An unstructured simplicial mesh in `D` dimensions.
///
/// Triangles for `D = 2`, tetrahedra for `D = 3`. The first `nfix` points
/// are the caller's fixed points, in the order they were supplied.
#[derive(Debug, Clone)]
pub struct Mesh<const D: usize> {
    /// Node coordinates, fixed points first.
    pub points: Vec<Point<f64, D>>,
    /// Simplices as tuples of indices into `points`.
    pub simplices: SimplexSet,
    /// Number of leading entries of `points` that are fixed.
    pub nfix: usize,
}

/// A triangle mesh in the plane.
pub type Mesh2 = Mesh<2>;

/// A tetrahedral mesh in space.
pub type Mesh3 = Mesh<3>;

impl<const D: usize> Mesh<D> {
    /// Create a mesh from its parts.
    pub fn new(points: Vec<Point<f64, D>>, simplices: SimplexSet, nfix: usize) -> Self {
        debug_assert_eq!(simplices.vertices_per_simplex(), D + 1);
        debug_assert!(nfix <= points.len());
        Self {
            points,
            simplices,
            nfix,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of simplices.
    #[inline]
    pub fn num_simplices(&self) -> usize {
        self.simplices.len()
    }

    /// The fixed points, in caller order.
    pub fn fixed_points(&self) -> &[Point<f64, D>] {
        &self.points[..self.nfix]
    }

    /// Deduplicated edges of the mesh.
    pub fn bars(&self) -> Vec<Bar> {
        self.simplices.bars()
    }

    /// Vertex coordinates of simplex `i`.
    pub fn simplex_points(&self, i: usize) -> Vec<Point<f64, D>> {
        self.simplices.get(i).iter().map(|&v| self.points[v]).collect()
    }

    /// Centroid of every simplex.
    pub fn centroids(&self) -> Vec<Point<f64, D>> {
        (0..self.num_simplices())
            .map(|i| centroid(&self.simplex_points(i)))
            .collect()
    }

    /// Signed volume (area in 2D) of simplex `i`.
    pub fn signed_volume(&self, i: usize) -> f64 {
        signed_volume(&self.simplex_points(i))
    }

    /// Check structural consistency: simplex arity matches the dimension and
    /// every index refers to an existing point.
    pub fn is_valid(&self) -> bool {
        self.simplices.vertices_per_simplex() == D + 1
            && self.nfix <= self.points.len()
            && self
                .simplices
                .max_index()
                .map_or(true, |max| max < self.points.len())
    }

    /// Reorder every simplex so its signed volume is positive.
    ///
    /// Triangles become counter-clockwise. Returns the number of simplices
    /// that were flipped.
    pub fn orient(&mut self) -> usize {
        let points = &self.points;
        let mut flipped = 0;
        for simplex in self.simplices.iter_mut() {
            let coords: Vec<Point<f64, D>> = simplex.iter().map(|&v| points[v]).collect();
            if signed_volume(&coords) < 0.0 {
                simplex.swap(0, 1);
                flipped += 1;
            }
        }
        flipped
    }

    /// Remove free points that no simplex references.
    ///
    /// Simplices whose centroid falls outside the domain are dropped during
    /// meshing, which can leave a few orphan nodes near the boundary. Fixed
    /// points are always kept at `[0, nfix)`. Returns the number of points
    /// removed.
    pub fn compact(&mut self) -> usize {
        let n = self.points.len();
        let mut used = vec![false; n];
        used[..self.nfix].fill(true);
        for &v in self.simplices.as_flat() {
            used[v] = true;
        }

        let mut remap = vec![usize::MAX; n];
        let mut points = Vec::with_capacity(n);
        for (old, p) in self.points.iter().enumerate() {
            if used[old] {
                remap[old] = points.len();
                points.push(*p);
            }
        }

        let removed = n - points.len();
        if removed > 0 {
            for simplex in self.simplices.iter_mut() {
                for v in simplex.iter_mut() {
                    *v = remap[*v];
                }
            }
            self.points = points;
        }
        removed
    }
}

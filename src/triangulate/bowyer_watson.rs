//! Incremental Bowyer-Watson Delaunay triangulation.
//!
//! Points are inserted one at a time into a triangulation seeded with a
//! large super-simplex:
//!
//! 1. Locate a cell containing the new point by walking across facets.
//! 2. Grow the cavity of cells whose circumsphere strictly contains it.
//! 3. Repair the cavity until every boundary facet is visible from the
//!    point, so the re-triangulated star is positively oriented.
//! 4. Replace the cavity by the cone of its boundary facets to the point.
//!
//! Cells touching a super-simplex vertex are dropped at the end. Nearly
//! flat hull simplices whose circumsphere encloses a super-simplex vertex
//! never form, so the result can miss slivers along the convex hull.
//!
//! # Reference
//!
//! Bowyer, A. (1981). "Computing Dirichlet tessellations." The Computer Journal.
//! Watson, D. F. (1981). "Computing the n-dimensional Delaunay tessellation with
//! application to Voronoi polytopes." The Computer Journal.

use std::collections::HashMap;

use nalgebra::{Point, SVector};

use super::Triangulator;
use crate::error::TriangulationError;
use crate::geometry::{circumsphere, edge_matrix};
use crate::mesh::SimplexSet;

/// Relative slack on the squared circumradius; points this close to a
/// circumsphere count as outside it.
const IN_SPHERE_SLACK: f64 = 1e-12;

/// Two points closer than this fraction of the bounding box are duplicates.
const DUPLICATE_TOLERANCE: f64 = 1e-12;

/// Incremental Delaunay triangulator for any dimension.
#[derive(Debug, Clone, Copy)]
pub struct BowyerWatson {
    /// Size of the super-simplex in multiples of the input's bounding box.
    pub super_scale: f64,
}

impl Default for BowyerWatson {
    fn default() -> Self {
        Self { super_scale: 100.0 }
    }
}

impl BowyerWatson {
    /// Create a triangulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the size of the enclosing super-simplex.
    ///
    /// Larger values lose fewer convex-hull simplices at the cost of
    /// precision in the circumsphere tests.
    pub fn with_super_scale(mut self, super_scale: f64) -> Self {
        self.super_scale = super_scale.max(2.0);
        self
    }
}

impl<const D: usize> Triangulator<D> for BowyerWatson {
    fn triangulate(&self, points: &[Point<f64, D>]) -> Result<SimplexSet, TriangulationError> {
        if D == 0 {
            return Err(TriangulationError::UnsupportedDimension(D));
        }
        if points.len() < D + 1 {
            return Err(TriangulationError::TooFewPoints {
                required: D + 1,
                actual: points.len(),
            });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.coords.iter().all(|x| x.is_finite()))
        {
            return Err(TriangulationError::NonFinitePoint { index });
        }

        let mut cavity = Cavity::new(points, self.super_scale)?;
        for index in 0..points.len() {
            cavity.insert(index)?;
        }
        cavity.finish()
    }
}

struct Cell<const D: usize> {
    vertices: Vec<usize>,
    /// `neighbors[k]` shares the facet opposite `vertices[k]`.
    neighbors: Vec<Option<usize>>,
    center: Point<f64, D>,
    radius2: f64,
    alive: bool,
}

struct Cavity<const D: usize> {
    /// Input points followed by the `D + 1` super-simplex vertices.
    points: Vec<Point<f64, D>>,
    num_input: usize,
    cells: Vec<Cell<D>>,
    /// Per-cell insertion stamp marking cavity membership.
    stamp: Vec<usize>,
    generation: usize,
    last: usize,
    duplicate_tol2: f64,
}

impl<const D: usize> Cavity<D> {
    fn new(input: &[Point<f64, D>], super_scale: f64) -> Result<Self, TriangulationError> {
        let mut lo = input[0].coords;
        let mut hi = input[0].coords;
        for p in input {
            lo = lo.inf(&p.coords);
            hi = hi.sup(&p.coords);
        }
        let span = (hi - lo).max();
        if !(span > 0.0) {
            return Err(TriangulationError::Degenerate(
                "all points coincide".to_string(),
            ));
        }

        let center = (lo + hi) * 0.5;
        let margin = span * super_scale;
        let corner = center - SVector::<f64, D>::repeat(margin);
        let edge = 2.0 * D as f64 * (margin + span);

        let mut points = Vec::with_capacity(input.len() + D + 1);
        points.extend_from_slice(input);
        points.push(Point::from(corner));
        for axis in 0..D {
            let mut v = corner;
            v[axis] += edge;
            points.push(Point::from(v));
        }

        let num_input = input.len();
        let mut cavity = Self {
            points,
            num_input,
            cells: Vec::new(),
            stamp: Vec::new(),
            generation: 0,
            last: 0,
            duplicate_tol2: (span * DUPLICATE_TOLERANCE).powi(2),
        };

        let mut vertices: Vec<usize> = (num_input..num_input + D + 1).collect();
        if cavity.orientation(&vertices, None) < 0.0 {
            vertices.swap(0, 1);
        }
        let cell = cavity.make_cell(vertices);
        cavity.cells.push(cell);
        cavity.stamp.push(0);
        Ok(cavity)
    }

    fn vertex(&self, vertices: &[usize], replace: Option<(usize, usize)>, k: usize) -> &Point<f64, D> {
        match replace {
            Some((slot, v)) if slot == k => &self.points[v],
            _ => &self.points[vertices[k]],
        }
    }

    /// Orientation determinant of a cell, optionally with vertex `slot`
    /// replaced by point `v`. Positive for positively oriented cells.
    fn orientation(&self, vertices: &[usize], replace: Option<(usize, usize)>) -> f64 {
        let corners: Vec<&Point<f64, D>> = (0..=D).map(|k| self.vertex(vertices, replace, k)).collect();
        edge_matrix(&corners, 1.0).determinant()
    }

    fn make_cell(&self, vertices: Vec<usize>) -> Cell<D> {
        let coords: Vec<Point<f64, D>> = vertices.iter().map(|&v| self.points[v]).collect();
        let (center, radius2) = circumsphere(&coords).unwrap_or((Point::origin(), f64::INFINITY));
        Cell {
            neighbors: vec![None; vertices.len()],
            vertices,
            center,
            radius2,
            alive: true,
        }
    }

    fn conflicts(&self, cell: usize, p: &Point<f64, D>) -> bool {
        let cell = &self.cells[cell];
        if !cell.radius2.is_finite() {
            return true;
        }
        (p - cell.center).norm_squared() < cell.radius2 * (1.0 - IN_SPHERE_SLACK)
    }

    /// Find a cell containing point `pi`, falling back to any conflicting cell.
    fn locate(&self, pi: usize) -> Result<usize, TriangulationError> {
        let mut current = self.last;
        for _ in 0..self.cells.len() {
            let cell = &self.cells[current];
            let mut exit = None;
            let mut most_negative = 0.0;
            for k in 0..=D {
                let o = self.orientation(&cell.vertices, Some((k, pi)));
                if o < most_negative {
                    most_negative = o;
                    exit = Some(k);
                }
            }
            match exit {
                None => return Ok(current),
                Some(k) => match cell.neighbors[k] {
                    Some(next) => current = next,
                    None => {
                        return Err(TriangulationError::Degenerate(format!(
                            "point {pi} lies outside the super-simplex"
                        )))
                    }
                },
            }
        }

        let p = self.points[pi];
        self.cells
            .iter()
            .enumerate()
            .position(|(i, c)| c.alive && self.conflicts(i, &p))
            .ok_or_else(|| {
                TriangulationError::Degenerate(format!("could not locate point {pi}"))
            })
    }

    fn insert(&mut self, pi: usize) -> Result<(), TriangulationError> {
        let p = self.points[pi];
        let start = self.locate(pi)?;

        for &v in &self.cells[start].vertices {
            if v < self.num_input && (self.points[v] - p).norm_squared() <= self.duplicate_tol2 {
                return Err(TriangulationError::DuplicatePoint { index: pi, other: v });
            }
        }

        self.generation += 1;
        let generation = self.generation;
        self.stamp[start] = generation;
        let mut cavity = vec![start];
        let mut stack = vec![start];
        while let Some(c) = stack.pop() {
            for k in 0..=D {
                if let Some(nb) = self.cells[c].neighbors[k] {
                    if self.stamp[nb] != generation && self.conflicts(nb, &p) {
                        self.stamp[nb] = generation;
                        cavity.push(nb);
                        stack.push(nb);
                    }
                }
            }
        }

        let facets = loop {
            let mut facets = Vec::new();
            let mut grow = None;
            'scan: for &c in &cavity {
                for k in 0..=D {
                    let nb = self.cells[c].neighbors[k];
                    if nb.is_some_and(|x| self.stamp[x] == generation) {
                        continue;
                    }
                    if self.orientation(&self.cells[c].vertices, Some((k, pi))) <= 0.0 {
                        match nb {
                            Some(x) => {
                                grow = Some(x);
                                break 'scan;
                            }
                            None => {
                                return Err(TriangulationError::Degenerate(format!(
                                    "cavity of point {pi} is not star-shaped"
                                )))
                            }
                        }
                    }
                    facets.push((c, k));
                }
            }
            match grow {
                Some(x) => {
                    self.stamp[x] = generation;
                    cavity.push(x);
                }
                None => break facets,
            }
        };

        let mut created = Vec::with_capacity(facets.len());
        for &(c, k) in &facets {
            let mut vertices = self.cells[c].vertices.clone();
            vertices[k] = pi;
            let outer = self.cells[c].neighbors[k];
            let id = self.cells.len();
            let mut cell = self.make_cell(vertices);
            cell.neighbors[k] = outer;
            self.cells.push(cell);
            self.stamp.push(0);
            if let Some(x) = outer {
                for slot in self.cells[x].neighbors.iter_mut() {
                    if *slot == Some(c) {
                        *slot = Some(id);
                    }
                }
            }
            created.push(id);
        }

        // Glue the new cells to each other across the facets through `pi`.
        let mut open: HashMap<Vec<usize>, (usize, usize)> = HashMap::with_capacity(created.len() * D);
        for &id in &created {
            for j in 0..=D {
                if self.cells[id].vertices[j] == pi {
                    continue;
                }
                let mut key: Vec<usize> = self.cells[id]
                    .vertices
                    .iter()
                    .enumerate()
                    .filter(|&(m, _)| m != j)
                    .map(|(_, &v)| v)
                    .collect();
                key.sort_unstable();
                match open.remove(&key) {
                    Some((other, slot)) => {
                        self.cells[id].neighbors[j] = Some(other);
                        self.cells[other].neighbors[slot] = Some(id);
                    }
                    None => {
                        open.insert(key, (id, j));
                    }
                }
            }
        }

        for &c in &cavity {
            self.cells[c].alive = false;
        }
        if let Some(&last) = created.last() {
            self.last = last;
        }
        Ok(())
    }

    fn finish(self) -> Result<SimplexSet, TriangulationError> {
        let mut simplices = SimplexSet::new(D + 1);
        for cell in self.cells.iter().filter(|c| c.alive) {
            if cell.vertices.iter().all(|&v| v < self.num_input) {
                simplices.push(&cell.vertices);
            }
        }
        if simplices.is_empty() {
            return Err(TriangulationError::Degenerate(format!(
                "points do not span {} dimensions",
                D
            )));
        }
        Ok(simplices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_volume;
    use nalgebra::{Point2, Point3};

    fn grid(n: usize) -> Vec<Point2<f64>> {
        let mut pts = Vec::new();
        for j in 0..n {
            for i in 0..n {
                pts.push(Point2::new(i as f64, j as f64));
            }
        }
        pts
    }

    fn total_volume<const D: usize>(points: &[Point<f64, D>], simplices: &SimplexSet) -> f64 {
        simplices
            .iter()
            .map(|s| {
                let coords: Vec<_> = s.iter().map(|&v| points[v]).collect();
                signed_volume(&coords)
            })
            .sum()
    }

    #[test]
    fn test_single_triangle() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let tri = BowyerWatson::new().triangulate(&pts).unwrap();
        assert_eq!(tri.len(), 1);
        assert!(total_volume(&pts, &tri) > 0.0);
    }

    #[test]
    fn test_grid_covers_hull() {
        // A square grid is maximally co-circular.
        let pts = grid(6);
        let tri = BowyerWatson::new().triangulate(&pts).unwrap();
        assert_eq!(tri.len(), 2 * 5 * 5);
        assert!((total_volume(&pts, &tri) - 25.0).abs() < 1e-9);
        for s in tri.iter() {
            let coords: Vec<_> = s.iter().map(|&v| pts[v]).collect();
            assert!(signed_volume(&coords) > 0.0);
        }
    }

    #[test]
    fn test_hull_sliver_needs_larger_super_simplex() {
        // The last point sits 1e-4 above the bottom edge, so the hull
        // triangle on that edge has a circumradius of about 1250.
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.5, 1e-4),
        ];
        let sliver = 0.5 * 1e-4;

        let tri = BowyerWatson::new().triangulate(&pts).unwrap();
        assert!((total_volume(&pts, &tri) - (1.0 - sliver)).abs() < 1e-9);

        let tri = BowyerWatson::new().with_super_scale(1e4).triangulate(&pts).unwrap();
        assert!((total_volume(&pts, &tri) - 1.0).abs() < 1e-9);
        for s in tri.iter() {
            let coords: Vec<_> = s.iter().map(|&v| pts[v]).collect();
            assert!(signed_volume(&coords) > 0.0);
        }
    }

    #[test]
    fn test_empty_circumcircle() {
        let pts: Vec<Point2<f64>> = (0..40)
            .map(|k| {
                let t = k as f64 * 0.7;
                Point2::new((t * 1.3).sin() * (1.0 + 0.01 * k as f64), (t * 0.9).cos())
            })
            .collect();
        let tri = BowyerWatson::new().triangulate(&pts).unwrap();
        for s in tri.iter() {
            let coords: Vec<_> = s.iter().map(|&v| pts[v]).collect();
            let (c, r2) = circumsphere(&coords).unwrap();
            for (i, p) in pts.iter().enumerate() {
                if s.contains(&i) {
                    continue;
                }
                assert!((p - c).norm_squared() >= r2 * (1.0 - 1e-9));
            }
        }
    }

    #[test]
    fn test_cube_lattice_3d() {
        let mut pts = Vec::new();
        for k in 0..3 {
            for j in 0..3 {
                for i in 0..3 {
                    pts.push(Point3::new(i as f64, j as f64, k as f64));
                }
            }
        }
        let tri = BowyerWatson::new().triangulate(&pts).unwrap();
        assert_eq!(tri.vertices_per_simplex(), 4);
        assert!((total_volume(&pts, &tri) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_too_few_points() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert_eq!(
            BowyerWatson::new().triangulate(&pts),
            Err(TriangulationError::TooFewPoints {
                required: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_collinear_is_degenerate() {
        let pts: Vec<_> = (0..5).map(|i| Point2::new(i as f64, 2.0 * i as f64)).collect();
        assert!(matches!(
            BowyerWatson::new().triangulate(&pts),
            Err(TriangulationError::Degenerate(_))
        ));
    }

    #[test]
    fn test_duplicate_point() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        assert_eq!(
            BowyerWatson::new().triangulate(&pts),
            Err(TriangulationError::DuplicatePoint { index: 3, other: 1 })
        );
    }
}

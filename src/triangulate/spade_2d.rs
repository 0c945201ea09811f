//! Planar Delaunay triangulation backed by `spade`.

use nalgebra::Point2;
use spade::{DelaunayTriangulation, Point2 as SpadePoint, Triangulation};

use super::Triangulator;
use crate::error::TriangulationError;
use crate::mesh::SimplexSet;

/// 2D Delaunay triangulator using the `spade` crate's exact predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpadeTriangulator;

impl Triangulator<2> for SpadeTriangulator {
    fn triangulate(&self, points: &[Point2<f64>]) -> Result<SimplexSet, TriangulationError> {
        if points.len() < 3 {
            return Err(TriangulationError::TooFewPoints {
                required: 3,
                actual: points.len(),
            });
        }

        let mut dt = DelaunayTriangulation::<SpadePoint<f64>>::new();
        // spade hands out vertex handles in insertion order; a handle that
        // was already issued means the point coincides with an earlier one.
        let mut handle_to_input: Vec<usize> = Vec::with_capacity(points.len());
        for (index, p) in points.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(TriangulationError::NonFinitePoint { index });
            }
            let handle = dt
                .insert(SpadePoint::new(p.x, p.y))
                .map_err(|e| TriangulationError::Degenerate(format!("{e:?}")))?;
            let slot = handle.index();
            if slot < handle_to_input.len() {
                return Err(TriangulationError::DuplicatePoint {
                    index,
                    other: handle_to_input[slot],
                });
            }
            handle_to_input.push(index);
        }

        let mut simplices = SimplexSet::with_capacity(3, dt.num_inner_faces());
        for face in dt.inner_faces() {
            let [a, b, c] = face.vertices();
            simplices.push(&[
                handle_to_input[a.fix().index()],
                handle_to_input[b.fix().index()],
                handle_to_input[c.fix().index()],
            ]);
        }

        if simplices.is_empty() {
            return Err(TriangulationError::Degenerate(
                "points are collinear".to_string(),
            ));
        }
        Ok(simplices)
    }
}

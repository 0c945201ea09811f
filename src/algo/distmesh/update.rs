//! Force integration and boundary projection.

use nalgebra::{Point, SVector};
use rayon::prelude::*;

use crate::geometry::project_exterior;
use crate::shape::DistanceField;

/// Outcome of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveStep {
    /// Largest `|deltat · F| / h0` over strictly interior nodes.
    pub max_move: f64,
    /// Whether `max_move` dropped below the tolerance.
    pub converged: bool,
}

/// Advance every node by `deltat · force`, then pull exterior nodes back
/// onto the boundary.
///
/// Convergence is judged on nodes with `fd < -geps` after the move. With no
/// such node the step counts as converged.
#[allow(clippy::too_many_arguments)]
pub fn move_points<const D: usize, Fd>(
    points: &mut [Point<f64, D>],
    forces: &[SVector<f64, D>],
    fd: &Fd,
    deltat: f64,
    h0: f64,
    geps: f64,
    dptol: f64,
    parallel: bool,
) -> MoveStep
where
    Fd: DistanceField<D> + ?Sized,
{
    debug_assert_eq!(points.len(), forces.len());
    if parallel {
        points
            .par_iter_mut()
            .zip(forces.par_iter())
            .for_each(|(p, f)| *p += f * deltat);
    } else {
        for (p, f) in points.iter_mut().zip(forces) {
            *p += f * deltat;
        }
    }

    let distances = fd.distances(points, parallel);
    project_exterior(fd, points, &distances, h0, parallel);

    let max_move = forces
        .iter()
        .zip(&distances)
        .filter(|(_, d)| **d < -geps)
        .map(|(f, _)| (f * deltat).norm() / h0)
        .fold(0.0, f64::max);

    MoveStep {
        max_move,
        converged: max_move < dptol,
    }
}

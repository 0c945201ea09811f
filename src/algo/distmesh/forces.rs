//! Spring model on the bar set.
//!
//! Each bar is a spring whose rest length follows the sizing field. Springs
//! only repel: a bar shorter than its target pushes its endpoints apart, a
//! longer one exerts no force.

use nalgebra::{Point, SVector};
use rayon::prelude::*;

use super::topology::midpoints;
use crate::error::{MeshError, Result};
use crate::geometry;
use crate::mesh::Bar;
use crate::shape::SizingField;

/// Per-bar geometry for one iteration.
#[derive(Debug, Clone, Default)]
pub struct BarLengths<const D: usize> {
    /// `p[a] - p[b]` for every bar `[a, b]`.
    pub vectors: Vec<SVector<f64, D>>,
    /// Actual lengths `L`.
    pub lengths: Vec<f64>,
    /// Desired lengths `L0`.
    pub targets: Vec<f64>,
}

impl<const D: usize> BarLengths<D> {
    /// Number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    /// Whether there are no bars.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Indices of bars shorter than half their target.
    pub fn overcrowded(&self) -> impl Iterator<Item = usize> + '_ {
        self.lengths
            .iter()
            .zip(&self.targets)
            .enumerate()
            .filter(|(_, (l, l0))| **l0 > 2.0 * **l)
            .map(|(i, _)| i)
    }

    /// Mean of `L0 / L` over all bars.
    pub fn mean_stretch(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .lengths
            .iter()
            .zip(&self.targets)
            .map(|(l, l0)| l0 / l)
            .sum();
        sum / self.len() as f64
    }
}

/// Compute bar vectors, lengths and desired lengths.
///
/// The sizing field is evaluated at bar midpoints and rescaled so that
/// `Σ L0² = fscale² · Σ L²`.
pub fn bar_lengths<const D: usize, Fh>(
    points: &[Point<f64, D>],
    bars: &[Bar],
    fh: &Fh,
    fscale: f64,
    parallel: bool,
) -> Result<BarLengths<D>>
where
    Fh: SizingField<D> + ?Sized,
{
    if bars.is_empty() {
        return Ok(BarLengths::default());
    }

    let vector = |&[a, b]: &Bar| points[a] - points[b];
    let vectors: Vec<SVector<f64, D>> = if parallel {
        bars.par_iter().map(vector).collect()
    } else {
        bars.iter().map(vector).collect()
    };
    let lengths = geometry::lengths(&vectors);

    let hbars = fh.sizes(&midpoints(points, bars, parallel), parallel);
    if let Some(index) = hbars.iter().position(|h| !(*h > 0.0 && h.is_finite())) {
        return Err(MeshError::InvalidDensity {
            index,
            value: hbars[index],
        });
    }

    let sum_l2: f64 = lengths.iter().map(|l| l * l).sum();
    let sum_h2: f64 = hbars.iter().map(|h| h * h).sum();
    let scale = fscale * (sum_l2 / sum_h2).sqrt();
    let targets = hbars.into_iter().map(|h| h * scale).collect();

    Ok(BarLengths {
        vectors,
        lengths,
        targets,
    })
}

/// Accumulate spring forces onto nodes.
///
/// Bar `[a, b]` with length `L < L0` adds `(L0 - L) · (p[a] - p[b]) / L` to
/// node `a` and subtracts it from node `b`. Rows `[0, nfix)` are zero. The
/// scatter runs in bar order, so the sums do not depend on thread count.
pub fn bar_forces<const D: usize>(
    num_points: usize,
    bars: &[Bar],
    geometry: &BarLengths<D>,
    nfix: usize,
    parallel: bool,
) -> Vec<SVector<f64, D>> {
    let per_bar = |i: usize| {
        let (l, l0) = (geometry.lengths[i], geometry.targets[i]);
        let f = (l0 - l).max(0.0);
        if f > 0.0 && l > 0.0 {
            geometry.vectors[i] * (f / l)
        } else {
            SVector::zeros()
        }
    };
    let bar_force: Vec<SVector<f64, D>> = if parallel {
        (0..bars.len()).into_par_iter().map(per_bar).collect()
    } else {
        (0..bars.len()).map(per_bar).collect()
    };

    let mut forces = vec![SVector::<f64, D>::zeros(); num_points];
    for (&[a, b], f) in bars.iter().zip(&bar_force) {
        forces[a] += f;
        forces[b] -= f;
    }
    for f in forces.iter_mut().take(nfix) {
        *f = SVector::zeros();
    }
    forces
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};

    fn uniform(_: &Point2<f64>) -> f64 {
        1.0
    }

    #[test]
    fn test_targets_are_rescaled() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 2.0)];
        let bars = vec![[0, 1], [0, 2]];
        let g = bar_lengths(&pts, &bars, &uniform, 1.2, false).unwrap();
        assert_eq!(g.lengths, vec![1.0, 2.0]);
        let expected = 1.2 * (5.0_f64 / 2.0).sqrt();
        for t in &g.targets {
            assert!((t - expected).abs() < 1e-12);
        }
        let sum_l0: f64 = g.targets.iter().map(|t| t * t).sum();
        assert!((sum_l0 - 1.44 * 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_repulsive() {
        // Bar 0-1 is short, bar 0-2 is long; only the short one pushes.
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 2.0)];
        let bars = vec![[0, 1], [0, 2]];
        let g = bar_lengths(&pts, &bars, &uniform, 1.2, false).unwrap();
        let forces = bar_forces(3, &bars, &g, 0, false);
        let push = g.targets[0] - 1.0;
        assert!((forces[0].x + push).abs() < 1e-12, "{:?}", forces[0]);
        assert!((forces[1].x - push).abs() < 1e-12);
        assert_eq!(forces[2], Vector2::zeros());
    }

    #[test]
    fn test_fixed_rows_are_zero() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(0.1, 0.0), Point2::new(0.0, 0.1)];
        let bars = vec![[0, 1], [0, 2], [1, 2]];
        let g = bar_lengths(&pts, &bars, &uniform, 1.2, true).unwrap();
        let forces = bar_forces(3, &bars, &g, 1, true);
        assert_eq!(forces[0], Vector2::zeros());
        assert!(forces[1].norm() > 0.0);
    }

    #[test]
    fn test_forces_sum_to_zero_without_fixed_points() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.3, 0.1),
            Point2::new(0.1, 0.4),
            Point2::new(0.5, 0.5),
        ];
        let bars = vec![[0, 1], [0, 2], [1, 2], [1, 3], [2, 3]];
        let g = bar_lengths(&pts, &bars, &uniform, 1.2, false).unwrap();
        let parallel = bar_forces(4, &bars, &g, 0, true);
        let sequential = bar_forces(4, &bars, &g, 0, false);
        assert_eq!(parallel, sequential);
        let total: SVector<f64, 2> = sequential.iter().sum();
        assert!(total.norm() < 1e-12);
    }

    #[test]
    fn test_fscale_increases_stretch() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 2.0)];
        let bars = vec![[0, 1], [0, 2], [1, 2]];
        let a = bar_lengths(&pts, &bars, &uniform, 1.2, false).unwrap();
        let b = bar_lengths(&pts, &bars, &uniform, 2.4, false).unwrap();
        assert!(b.mean_stretch() > a.mean_stretch());
        assert!((b.mean_stretch() / a.mean_stretch() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_density_at_midpoint() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let fh = |p: &Point2<f64>| p.x - 0.5;
        assert!(matches!(
            bar_lengths(&pts, &[[0, 1]], &fh, 1.2, false),
            Err(MeshError::InvalidDensity { index: 0, .. })
        ));
    }
}

//! Initial point distribution.
//!
//! Points start on a regular lattice over the bounding box, are clipped to
//! the domain, thinned by rejection against the sizing field, and finally
//! merged with the fixed points.

use nalgebra::Point;
use rand::Rng;

use super::options::BoundingBox;
use crate::error::{MeshError, Result};
use crate::shape::{DistanceField, SizingField};

/// Relative slack so that `ceil` does not add a lattice line for an extent
/// that is an exact multiple of the step up to rounding.
const LATTICE_SLACK: f64 = 1e-10;

fn lattice_count(extent: f64, step: f64) -> usize {
    let n = (extent / step - LATTICE_SLACK).ceil();
    if n < 1.0 {
        1
    } else {
        n as usize
    }
}

/// Regular lattice of spacing `h0` covering `bbox`, upper bounds excluded.
///
/// In 2D rows are `h0·√3/2` apart and every odd row is shifted by `h0/2`,
/// giving equilateral triangles. Other dimensions use a cubic lattice. The
/// first axis varies fastest.
pub fn lattice<const D: usize>(bbox: &BoundingBox<D>, h0: f64) -> Vec<Point<f64, D>> {
    let hexagonal = D == 2;
    let mut steps = [h0; D];
    if hexagonal {
        steps[D - 1] = h0 * 3.0_f64.sqrt() / 2.0;
    }
    let mut counts = [0usize; D];
    for axis in 0..D {
        counts[axis] = lattice_count(bbox.extent(axis), steps[axis]);
    }

    let total: usize = counts.iter().product();
    let mut points = Vec::with_capacity(total);
    let mut index = [0usize; D];
    for _ in 0..total {
        let mut p = bbox.min;
        for axis in 0..D {
            p[axis] += index[axis] as f64 * steps[axis];
        }
        if hexagonal && index[D - 1] % 2 == 1 {
            p[0] += h0 / 2.0;
        }
        points.push(p);

        for axis in 0..D {
            index[axis] += 1;
            if index[axis] < counts[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    points
}

/// Drop every point closer than `geps` to one of `fixed`.
pub fn remove_duplicate_nodes<const D: usize>(
    points: Vec<Point<f64, D>>,
    fixed: &[Point<f64, D>],
    geps: f64,
) -> Vec<Point<f64, D>> {
    if fixed.is_empty() {
        return points;
    }
    points
        .into_iter()
        .filter(|p| fixed.iter().all(|f| (p - f).norm() > geps))
        .collect()
}

/// Generate the starting point set.
///
/// The returned vector holds the fixed points first, in caller order,
/// followed by the sampled free points.
pub fn sample<const D: usize, Fd, Fh, R>(
    fd: &Fd,
    fh: &Fh,
    bbox: &BoundingBox<D>,
    h0: f64,
    fixed: &[Point<f64, D>],
    rng: &mut R,
    parallel: bool,
) -> Result<Vec<Point<f64, D>>>
where
    Fd: DistanceField<D> + ?Sized,
    Fh: SizingField<D> + ?Sized,
    R: Rng + ?Sized,
{
    let geps = 0.001 * h0;

    let candidates = lattice(bbox, h0);
    let distances = fd.distances(&candidates, parallel);
    let inside: Vec<Point<f64, D>> = candidates
        .into_iter()
        .zip(distances)
        .filter(|(_, d)| *d < geps)
        .map(|(p, _)| p)
        .collect();

    let mut sampled = Vec::with_capacity(inside.len());
    if !inside.is_empty() {
        let sizes = fh.sizes(&inside, parallel);
        let mut weights = Vec::with_capacity(sizes.len());
        for (index, &h) in sizes.iter().enumerate() {
            if !(h > 0.0 && h.is_finite()) {
                return Err(MeshError::InvalidDensity { index, value: h });
            }
            weights.push(1.0 / (h * h));
        }
        let max_weight = weights.iter().copied().fold(0.0, f64::max);

        // One draw per candidate, in lattice order, so a seed fixes the result.
        for (p, w) in inside.into_iter().zip(weights) {
            if rng.gen::<f64>() < w / max_weight {
                sampled.push(p);
            }
        }
    }

    let sampled = remove_duplicate_nodes(sampled, fixed, geps);
    let mut points = Vec::with_capacity(fixed.len() + sampled.len());
    points.extend_from_slice(fixed);
    points.extend(sampled);

    log::debug!(
        "sampled {} points ({} fixed) with h0 = {}",
        points.len(),
        fixed.len(),
        h0
    );
    Ok(points)
}

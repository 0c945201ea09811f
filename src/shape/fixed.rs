//! Helpers that place fixed points on a domain boundary.
//!
//! Fixed points typically mark electrode or sensor positions that the mesh
//! must contain as nodes.

use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};

use super::DistanceField;
use crate::error::{MeshError, Result};

/// `n` points evenly spaced on a circle, starting on the positive x axis.
pub fn fix_points_circle(center: Point2<f64>, r: f64, n: usize) -> Vec<Point2<f64>> {
    (0..n)
        .map(|k| {
            let theta = 2.0 * PI * k as f64 / n as f64;
            center + Vector2::new(theta.cos(), theta.sin()) * r
        })
        .collect()
}

/// `n` boundary points of `fd`, one per evenly spaced ray cast from `center`.
///
/// Each ray is marched outward until it leaves the domain and the crossing
/// is then refined by bisection. `center` must lie strictly inside the
/// domain, and every ray must leave the domain within a distance of
/// `2^20` units.
pub fn fix_points_fd<F>(fd: &F, n: usize, center: Point2<f64>) -> Result<Vec<Point2<f64>>>
where
    F: DistanceField<2> + ?Sized,
{
    if fd.distance(&center) >= 0.0 {
        return Err(MeshError::invalid_param(
            "center",
            center,
            "must lie strictly inside the domain",
        ));
    }

    (0..n)
        .map(|k| {
            let theta = 2.0 * PI * k as f64 / n as f64;
            let dir = Vector2::new(theta.cos(), theta.sin());
            ray_crossing(fd, &center, &dir).ok_or_else(|| {
                MeshError::DegenerateGeometry(format!(
                    "ray at angle {theta:.4} never leaves the domain"
                ))
            })
        })
        .collect()
}

fn ray_crossing<F>(fd: &F, origin: &Point2<f64>, dir: &Vector2<f64>) -> Option<Point2<f64>>
where
    F: DistanceField<2> + ?Sized,
{
    const MAX_DOUBLINGS: usize = 40;
    const BISECTIONS: usize = 60;

    let mut inside = 0.0;
    let mut outside = 1e-6_f64;
    let mut found = false;
    for _ in 0..MAX_DOUBLINGS {
        if fd.distance(&(origin + dir * outside)) >= 0.0 {
            found = true;
            break;
        }
        inside = outside;
        outside *= 2.0;
    }
    if !found {
        return None;
    }

    for _ in 0..BISECTIONS {
        let mid = 0.5 * (inside + outside);
        if fd.distance(&(origin + dir * mid)) < 0.0 {
            inside = mid;
        } else {
            outside = mid;
        }
    }
    Some(origin + dir * (0.5 * (inside + outside)))
}

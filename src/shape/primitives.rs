//! Analytic distance and sizing functions for common shapes.
//!
//! Each constructor returns a closure that can be passed straight to
//! [`build`](crate::algo::distmesh::build). Shapes are dimension-generic
//! where the formula allows it.

use nalgebra::{Point, Point2, SVector, Vector2};

/// Signed distance to a ball of radius `r` centered at `center`.
///
/// In 2D this is a disk, see [`circle`].
pub fn ball<const D: usize>(
    center: Point<f64, D>,
    r: f64,
) -> impl Fn(&Point<f64, D>) -> f64 + Send + Sync + Clone {
    move |p: &Point<f64, D>| (p - center).norm() - r
}

/// Signed distance to a disk of radius `r` centered at `center`.
pub fn circle(center: Point2<f64>, r: f64) -> impl Fn(&Point2<f64>) -> f64 + Send + Sync + Clone {
    ball(center, r)
}

/// Level-set function of an axis-aligned ellipsoid with semi-axes `axes`.
///
/// This is `Σ ((x - c) / a)² - 1`, which has the right sign everywhere but
/// is only a true distance on a sphere of radius 1. Boundary projection
/// still converges because it divides by the squared gradient.
pub fn ellipsoid<const D: usize>(
    center: Point<f64, D>,
    axes: SVector<f64, D>,
) -> impl Fn(&Point<f64, D>) -> f64 + Send + Sync + Clone {
    move |p: &Point<f64, D>| (p - center).component_div(&axes).norm_squared() - 1.0
}

/// 2D ellipse with semi-axes `ab = (a, b)`, see [`ellipsoid`].
pub fn ellipse(center: Point2<f64>, ab: Vector2<f64>) -> impl Fn(&Point2<f64>) -> f64 + Send + Sync + Clone {
    ellipsoid(center, ab)
}

/// Distance-like function of the axis-aligned box with corners `p1` and `p2`.
///
/// Returns `max_i max(p1_i - x_i, x_i - p2_i)`: exact inside the box and
/// along the faces, an underestimate near the outer corners.
pub fn rectangle<const D: usize>(
    p1: Point<f64, D>,
    p2: Point<f64, D>,
) -> impl Fn(&Point<f64, D>) -> f64 + Send + Sync + Clone {
    let lo = p1.inf(&p2);
    let hi = p1.sup(&p2);
    move |p: &Point<f64, D>| {
        (0..D)
            .map(|k| (lo[k] - p[k]).max(p[k] - hi[k]))
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Uniform sizing field.
pub fn area_uniform<const D: usize>(_p: &Point<f64, D>) -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_circle_signs() {
        let fd = circle(Point2::new(1.0, 0.0), 0.5);
        assert!((fd(&Point2::new(1.0, 0.0)) + 0.5).abs() < 1e-12);
        assert!(fd(&Point2::new(1.5, 0.0)).abs() < 1e-12);
        assert!(fd(&Point2::new(3.0, 0.0)) > 0.0);
    }

    #[test]
    fn test_ball_3d() {
        let fd = ball(Point3::origin(), 2.0);
        assert!((fd(&Point3::new(0.0, 0.0, 3.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ellipse_boundary() {
        let fd = ellipse(Point2::origin(), Vector2::new(2.0, 1.0));
        assert!(fd(&Point2::new(2.0, 0.0)).abs() < 1e-12);
        assert!(fd(&Point2::new(0.0, 1.0)).abs() < 1e-12);
        assert!(fd(&Point2::new(1.9, 0.0)) < 0.0);
        assert!(fd(&Point2::new(0.0, 1.1)) > 0.0);
    }

    #[test]
    fn test_rectangle_distances() {
        let fd = rectangle(Point2::new(1.0, 1.0), Point2::new(-1.0, -1.0));
        assert!((fd(&Point2::origin()) + 1.0).abs() < 1e-12);
        assert!((fd(&Point2::new(0.5, 0.9)) + 0.1).abs() < 1e-12);
        assert!((fd(&Point2::new(1.5, 0.0)) - 0.5).abs() < 1e-12);
        assert!(fd(&Point2::new(1.0, 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_area_uniform() {
        assert_eq!(area_uniform(&Point3::new(4.0, 5.0, 6.0)), 1.0);
    }
}

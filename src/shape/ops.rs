//! Boolean combination of distance fields.
//!
//! The value-level helpers (`dist_*`) combine two already evaluated
//! distances; the field-level helpers wrap two fields into a new one.

use nalgebra::Point;

use super::DistanceField;

/// Union of two domains: `min(a, b)`.
#[inline]
pub fn dist_union(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// Intersection of two domains: `max(a, b)`.
#[inline]
pub fn dist_intersect(a: f64, b: f64) -> f64 {
    a.max(b)
}

/// Domain `a` with domain `b` removed: `max(a, -b)`.
#[inline]
pub fn dist_diff(a: f64, b: f64) -> f64 {
    a.max(-b)
}

/// Field of the union of two domains.
pub fn union<const D: usize, A, B>(a: A, b: B) -> impl Fn(&Point<f64, D>) -> f64 + Sync
where
    A: DistanceField<D>,
    B: DistanceField<D>,
{
    move |p: &Point<f64, D>| dist_union(a.distance(p), b.distance(p))
}

/// Field of the intersection of two domains.
pub fn intersection<const D: usize, A, B>(a: A, b: B) -> impl Fn(&Point<f64, D>) -> f64 + Sync
where
    A: DistanceField<D>,
    B: DistanceField<D>,
{
    move |p: &Point<f64, D>| dist_intersect(a.distance(p), b.distance(p))
}

/// Field of domain `a` minus domain `b`.
pub fn difference<const D: usize, A, B>(a: A, b: B) -> impl Fn(&Point<f64, D>) -> f64 + Sync
where
    A: DistanceField<D>,
    B: DistanceField<D>,
{
    move |p: &Point<f64, D>| dist_diff(a.distance(p), b.distance(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{circle, rectangle};
    use nalgebra::Point2;

    #[test]
    fn test_value_ops() {
        assert_eq!(dist_union(-1.0, 2.0), -1.0);
        assert_eq!(dist_intersect(-1.0, 2.0), 2.0);
        assert_eq!(dist_diff(-1.0, -0.5), 0.5);
    }

    #[test]
    fn test_l_shape() {
        let fd = difference(
            rectangle(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0)),
            rectangle(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)),
        );
        assert!(fd.distance(&Point2::new(-0.5, -0.5)) < 0.0);
        assert!(fd.distance(&Point2::new(0.5, 0.5)) > 0.0);
        assert!(fd.distance(&Point2::new(0.5, -0.5)) < 0.0);
    }

    #[test]
    fn test_union_and_intersection() {
        let a = circle(Point2::new(-0.5, 0.0), 0.6);
        let b = circle(Point2::new(0.5, 0.0), 0.6);
        let both = intersection(a.clone(), b.clone());
        let either = union(a, b);
        let origin = Point2::origin();
        let left = Point2::new(-0.9, 0.0);
        assert!(both.distance(&origin) < 0.0);
        assert!(both.distance(&left) > 0.0);
        assert!(either.distance(&left) < 0.0);
    }
}

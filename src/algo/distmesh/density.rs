//! Removal of nodes in over-crowded regions.

use nalgebra::Point;

use super::forces::BarLengths;
use crate::mesh::Bar;

/// Free nodes touched by a bar shorter than half its target.
///
/// Returns a mask over `num_points`; fixed nodes are never flagged.
pub fn overcrowded_nodes<const D: usize>(
    num_points: usize,
    bars: &[Bar],
    geometry: &BarLengths<D>,
    nfix: usize,
) -> Vec<bool> {
    let mut flagged = vec![false; num_points];
    for i in geometry.overcrowded() {
        for v in bars[i] {
            if v >= nfix {
                flagged[v] = true;
            }
        }
    }
    flagged
}

/// Delete every flagged node, keeping the order of the survivors.
///
/// Fixed nodes stay at `[0, nfix)`. Returns the number of nodes removed.
pub fn remove_overcrowded<const D: usize>(
    points: &mut Vec<Point<f64, D>>,
    bars: &[Bar],
    geometry: &BarLengths<D>,
    nfix: usize,
) -> usize {
    let flagged = overcrowded_nodes(points.len(), bars, geometry, nfix);
    let before = points.len();
    let mut flags = flagged.into_iter();
    points.retain(|_| !flags.next().unwrap_or(false));
    before - points.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};

    fn geometry(lengths: Vec<f64>, targets: Vec<f64>) -> BarLengths<2> {
        BarLengths {
            vectors: vec![Vector2::zeros(); lengths.len()],
            lengths,
            targets,
        }
    }

    #[test]
    fn test_removes_free_endpoints() {
        let mut pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.01, 0.0),
            Point2::new(2.0, 0.0),
        ];
        let bars = vec![[0, 1], [1, 2], [2, 3]];
        let g = geometry(vec![1.0, 0.01, 0.99], vec![1.0, 1.0, 1.0]);
        let removed = remove_overcrowded(&mut pts, &bars, &g, 1);
        assert_eq!(removed, 2);
        assert_eq!(pts, vec![Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)]);
    }

    #[test]
    fn test_fixed_endpoint_survives() {
        let mut pts = vec![Point2::new(0.0, 0.0), Point2::new(0.01, 0.0), Point2::new(1.0, 0.0)];
        let bars = vec![[0, 1], [1, 2]];
        let g = geometry(vec![0.01, 0.99], vec![1.0, 1.0]);
        let removed = remove_overcrowded(&mut pts, &bars, &g, 1);
        assert_eq!(removed, 1);
        assert_eq!(pts[0], Point2::new(0.0, 0.0));
        assert_eq!(pts.len(), 2);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut pts = vec![Point2::new(0.0, 0.0), Point2::new(0.5, 0.0)];
        let g = geometry(vec![0.5], vec![1.0]);
        assert_eq!(remove_overcrowded(&mut pts, &[[0, 1]], &g, 0), 0);
        assert_eq!(pts.len(), 2);
    }
}

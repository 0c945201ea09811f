//! Configuration of a meshing run.

use nalgebra::Point;

use crate::error::{MeshError, Result};

/// Axis-aligned region the initial points are sampled from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox<const D: usize> {
    /// Lower corner.
    pub min: Point<f64, D>,
    /// Upper corner.
    pub max: Point<f64, D>,
}

impl<const D: usize> BoundingBox<D> {
    /// Create a bounding box from its corners.
    pub fn new(min: Point<f64, D>, max: Point<f64, D>) -> Self {
        Self { min, max }
    }

    /// The box `[-1, 1]^D`.
    pub fn unit() -> Self {
        Self {
            min: Point::from([-1.0; D]),
            max: Point::from([1.0; D]),
        }
    }

    /// Extent along `axis`.
    #[inline]
    pub fn extent(&self, axis: usize) -> f64 {
        self.max[axis] - self.min[axis]
    }

    /// Check that every axis is finite and non-empty.
    pub fn validate(&self) -> Result<()> {
        for axis in 0..D {
            let (min, max) = (self.min[axis], self.max[axis]);
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(MeshError::InvalidBoundingBox { axis, min, max });
            }
        }
        Ok(())
    }
}

impl<const D: usize> Default for BoundingBox<D> {
    fn default() -> Self {
        Self::unit()
    }
}

/// Options for distance-function mesh generation.
///
/// Field names follow the usual distmesh vocabulary: `h0` is the nominal
/// edge length, `fscale` the spring overshoot, `deltat` the integration
/// step.
#[derive(Debug, Clone)]
pub struct DistMeshOptions<const D: usize> {
    /// Nominal spacing of the initial lattice. The final edge length for a
    /// uniform sizing field is usually a little larger.
    pub h0: f64,

    /// Points that are kept as nodes and never move.
    pub fixed_points: Vec<Point<f64, D>>,

    /// Region the initial lattice covers.
    pub bbox: BoundingBox<D>,

    /// Run density control every this many iterations.
    pub density_ctrl_freq: usize,

    /// Stop once the largest interior move is below `dptol · h0`.
    pub dptol: f64,

    /// Retriangulate once some node drifted more than `ttol · h0`.
    pub ttol: f64,

    /// Ratio of desired to actual total bar length. Values above 1 keep
    /// the springs in compression so they push nodes toward the boundary.
    pub fscale: f64,

    /// Time step mapping forces to displacements.
    pub deltat: f64,

    /// Upper bound on relaxation iterations.
    pub max_iter: usize,

    /// Seed for the rejection sampler's random source.
    pub seed: u64,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl<const D: usize> Default for DistMeshOptions<D> {
    fn default() -> Self {
        Self {
            h0: 0.1,
            fixed_points: Vec::new(),
            bbox: BoundingBox::unit(),
            density_ctrl_freq: 30,
            dptol: 0.001,
            ttol: 0.1,
            fscale: 1.2,
            deltat: 0.2,
            max_iter: 500,
            seed: 20240601,
            parallel: true,
        }
    }
}

impl<const D: usize> DistMeshOptions<D> {
    /// Create options with the specified nominal edge length.
    pub fn with_h0(mut self, h0: f64) -> Self {
        self.h0 = h0;
        self
    }

    /// Set the fixed points.
    pub fn with_fixed_points(mut self, fixed_points: Vec<Point<f64, D>>) -> Self {
        self.fixed_points = fixed_points;
        self
    }

    /// Set the sampling region.
    pub fn with_bbox(mut self, bbox: BoundingBox<D>) -> Self {
        self.bbox = bbox;
        self
    }

    /// Set the density control cadence.
    pub fn with_density_ctrl_freq(mut self, freq: usize) -> Self {
        self.density_ctrl_freq = freq;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_dptol(mut self, dptol: f64) -> Self {
        self.dptol = dptol;
        self
    }

    /// Set the retriangulation tolerance.
    pub fn with_ttol(mut self, ttol: f64) -> Self {
        self.ttol = ttol;
        self
    }

    /// Set the force scale.
    pub fn with_fscale(mut self, fscale: f64) -> Self {
        self.fscale = fscale;
        self
    }

    /// Set the integration time step.
    pub fn with_deltat(mut self, deltat: f64) -> Self {
        self.deltat = deltat;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Gap below which points count as on the boundary or coincident.
    #[inline]
    pub fn geps(&self) -> f64 {
        0.001 * self.h0
    }

    /// Check every option, failing on the first invalid one.
    pub fn validate(&self) -> Result<()> {
        if !(self.h0 > 0.0 && self.h0.is_finite()) {
            return Err(MeshError::invalid_param("h0", self.h0, "must be positive and finite"));
        }
        if self.density_ctrl_freq == 0 {
            return Err(MeshError::invalid_param(
                "density_ctrl_freq",
                self.density_ctrl_freq,
                "must be at least 1",
            ));
        }
        positive("dptol", self.dptol)?;
        positive("ttol", self.ttol)?;
        positive("fscale", self.fscale)?;
        positive("deltat", self.deltat)?;
        self.bbox.validate()?;
        if let Some(index) = self
            .fixed_points
            .iter()
            .position(|p| !p.coords.iter().all(|x| x.is_finite()))
        {
            return Err(MeshError::InvalidFixedPoint { index });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(MeshError::invalid_param(name, value, "must be positive and finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    #[test]
    fn test_defaults() {
        let options = DistMeshOptions::<2>::default();
        assert_eq!(options.h0, 0.1);
        assert_eq!(options.density_ctrl_freq, 30);
        assert_eq!(options.dptol, 0.001);
        assert_eq!(options.ttol, 0.1);
        assert_eq!(options.fscale, 1.2);
        assert_eq!(options.deltat, 0.2);
        assert_eq!(options.max_iter, 500);
        assert_eq!(options.bbox, BoundingBox::new(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0)));
        assert!((options.geps() - 1e-4).abs() < 1e-18);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_h0() {
        let options = DistMeshOptions::<2>::default().with_h0(0.0);
        assert!(matches!(
            options.validate(),
            Err(MeshError::InvalidParameter { name: "h0", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_bbox() {
        let bbox = BoundingBox::new(Point2::new(0.0, 1.0), Point2::new(1.0, -1.0));
        let options = DistMeshOptions::default().with_bbox(bbox);
        assert!(matches!(
            options.validate(),
            Err(MeshError::InvalidBoundingBox { axis: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_nan_fixed_point() {
        let options = DistMeshOptions::default()
            .with_fixed_points(vec![Point2::new(0.0, 0.0), Point2::new(f64::NAN, 0.0)]);
        assert!(matches!(
            options.validate(),
            Err(MeshError::InvalidFixedPoint { index: 1 })
        ));
    }

    #[test]
    fn test_rejects_zero_density_freq() {
        let options = DistMeshOptions::<3>::default().with_density_ctrl_freq(0);
        assert!(options.validate().is_err());
    }
}

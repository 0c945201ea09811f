//! Distance-function mesh generation (Persson–Strang).
//!
//! The domain is given implicitly by a signed distance field `fd`
//! (negative inside) and the desired local edge length by a sizing field
//! `fh`. Starting from a lattice clipped to the domain, the mesher treats
//! every edge as a repulsive spring and iterates:
//!
//! 1. Retriangulate once some node drifted more than `ttol · h0` since the
//!    last triangulation.
//! 2. Compute bar lengths `L` and desired lengths `L0`.
//! 3. Every `density_ctrl_freq` iterations, delete free nodes of bars with
//!    `L0 > 2L` and start over.
//! 4. Otherwise move nodes by `deltat · F`, project exterior nodes back onto
//!    the boundary and test for convergence.
//!
//! A final retriangulation makes the returned simplices consistent with the
//! returned points.
//!
//! # Example
//!
//! ```
//! use distmesh::algo::distmesh::{build, DistMeshOptions};
//! use distmesh::shape::{area_uniform, circle};
//! use nalgebra::Point2;
//!
//! let fd = circle(Point2::origin(), 1.0);
//! let options = DistMeshOptions::default().with_h0(0.25).with_max_iter(100);
//! let mesh = build(fd, area_uniform, &options).unwrap();
//!
//! assert!(mesh.num_simplices() > 0);
//! assert!(mesh.is_valid());
//! ```
//!
//! # Reference
//!
//! Persson, P.-O. & Strang, G. (2004). "A Simple Mesh Generator in MATLAB".
//! SIAM Review 46(2).

mod density;
mod forces;
mod options;
mod sampler;
mod topology;
mod update;

pub use forces::BarLengths;
pub use options::{BoundingBox, DistMeshOptions};
pub use sampler::{lattice, remove_duplicate_nodes};
pub use update::MoveStep;

use nalgebra::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::geometry::max_displacement;
use crate::mesh::{Bar, Mesh, SimplexSet};
use crate::shape::{DistanceField, SizingField};
use crate::triangulate::{BowyerWatson, Triangulator};

/// Counters collected over a meshing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Relaxation iterations performed, density-control passes included.
    pub iterations: usize,
    /// Whether the move tolerance was met before `max_iter`.
    pub converged: bool,
    /// Number of triangulations computed, the final one included.
    pub retriangulations: usize,
    /// Number of density-control passes.
    pub density_control_passes: usize,
    /// Free nodes deleted by density control.
    pub removed_points: usize,
}

/// What a single relaxation iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Iteration {
    /// Over-crowded nodes were deleted; nothing moved.
    DensityControl {
        /// Number of nodes deleted.
        removed: usize,
    },
    /// Nodes were moved by the spring forces.
    Moved(MoveStep),
}

/// A meshing session.
///
/// Owns the evolving point set, the current triangulation and its bars,
/// and the snapshot used to decide when to retriangulate. Fixed points
/// always occupy `points()[..nfix()]`.
///
/// Most callers use [`build`]; the session is exposed for callers that
/// want to drive or observe individual iterations.
pub struct DistMesh<const D: usize, Fd, Fh, T = BowyerWatson> {
    fd: Fd,
    fh: Fh,
    triangulator: T,
    options: DistMeshOptions<D>,
    geps: f64,
    points: Vec<Point<f64, D>>,
    pold: Option<Vec<Point<f64, D>>>,
    simplices: SimplexSet,
    bars: Vec<Bar>,
    nfix: usize,
    report: BuildReport,
}

impl<const D: usize, Fd, Fh> DistMesh<D, Fd, Fh>
where
    Fd: DistanceField<D>,
    Fh: SizingField<D>,
{
    /// Start a session with the default triangulator and a seeded random
    /// source.
    pub fn new(fd: Fd, fh: Fh, options: DistMeshOptions<D>) -> Result<Self> {
        Self::with_triangulator(fd, fh, BowyerWatson::default(), options)
    }
}

impl<const D: usize, Fd, Fh, T> DistMesh<D, Fd, Fh, T>
where
    Fd: DistanceField<D>,
    Fh: SizingField<D>,
    T: Triangulator<D>,
{
    /// Start a session with a custom triangulator.
    pub fn with_triangulator(fd: Fd, fh: Fh, triangulator: T, options: DistMeshOptions<D>) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(options.seed);
        Self::with_rng(fd, fh, triangulator, options, &mut rng)
    }

    /// Start a session drawing the rejection sampler's numbers from `rng`.
    pub fn with_rng<R>(fd: Fd, fh: Fh, triangulator: T, options: DistMeshOptions<D>, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        options.validate()?;
        let points = sampler::sample(
            &fd,
            &fh,
            &options.bbox,
            options.h0,
            &options.fixed_points,
            rng,
            options.parallel,
        )?;
        Ok(Self::assemble(fd, fh, triangulator, options, points))
    }

    /// Start a session from caller-supplied free nodes instead of sampling.
    ///
    /// Nodes within `geps` of a fixed point are dropped; the fixed points are
    /// prepended.
    pub fn from_points(
        fd: Fd,
        fh: Fh,
        triangulator: T,
        options: DistMeshOptions<D>,
        free_points: Vec<Point<f64, D>>,
    ) -> Result<Self> {
        options.validate()?;
        if let Some(index) = free_points
            .iter()
            .position(|p| !p.coords.iter().all(|x| x.is_finite()))
        {
            return Err(MeshError::invalid_param("free_points", index, "non-finite coordinate"));
        }
        let free = remove_duplicate_nodes(free_points, &options.fixed_points, options.geps());
        let mut points = options.fixed_points.clone();
        points.extend(free);
        Ok(Self::assemble(fd, fh, triangulator, options, points))
    }

    fn assemble(fd: Fd, fh: Fh, triangulator: T, options: DistMeshOptions<D>, points: Vec<Point<f64, D>>) -> Self {
        Self {
            fd,
            fh,
            triangulator,
            geps: options.geps(),
            nfix: options.fixed_points.len(),
            options,
            points,
            pold: None,
            simplices: SimplexSet::new(D + 1),
            bars: Vec::new(),
            report: BuildReport::default(),
        }
    }

    /// Current node positions, fixed points first.
    #[inline]
    pub fn points(&self) -> &[Point<f64, D>] {
        &self.points
    }

    /// Simplices of the last triangulation.
    #[inline]
    pub fn simplices(&self) -> &SimplexSet {
        &self.simplices
    }

    /// Unique edges of the last triangulation.
    #[inline]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of fixed points.
    #[inline]
    pub fn nfix(&self) -> usize {
        self.nfix
    }

    /// Options the session runs with.
    #[inline]
    pub fn options(&self) -> &DistMeshOptions<D> {
        &self.options
    }

    /// Counters so far.
    #[inline]
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Whether the triangulation is stale.
    ///
    /// True before the first triangulation, after density control, and once
    /// some node moved more than `ttol · h0` since the last one.
    pub fn needs_retriangulation(&self) -> bool {
        match &self.pold {
            None => true,
            Some(pold) => max_displacement(&self.points, pold) > self.options.h0 * self.options.ttol,
        }
    }

    /// Triangulate the current nodes and rebuild the bar set.
    pub fn retriangulate(&mut self) -> Result<()> {
        self.pold = Some(self.points.clone());
        let simplices = topology::triangulate(
            &self.points,
            &self.fd,
            &self.triangulator,
            self.geps,
            self.options.parallel,
        )?;
        if simplices.is_empty() {
            return Err(MeshError::DegenerateGeometry(format!(
                "no simplex over {} points has its centroid inside the domain",
                self.points.len()
            )));
        }
        self.bars = topology::bars(&simplices);
        self.simplices = simplices;
        self.report.retriangulations += 1;
        log::debug!(
            "retriangulated {} points: {} simplices, {} bars",
            self.points.len(),
            self.simplices.len(),
            self.bars.len()
        );
        Ok(())
    }

    /// Lengths and desired lengths of the current bars.
    pub fn bar_lengths(&self) -> Result<BarLengths<D>> {
        forces::bar_lengths(
            &self.points,
            &self.bars,
            &self.fh,
            self.options.fscale,
            self.options.parallel,
        )
    }

    /// Delete the free endpoints of every over-crowded bar.
    ///
    /// Invalidates the triangulation. Returns the number of nodes deleted.
    pub fn density_control(&mut self, geometry: &BarLengths<D>) -> usize {
        let removed = density::remove_overcrowded(&mut self.points, &self.bars, geometry, self.nfix);
        self.pold = None;
        self.report.density_control_passes += 1;
        self.report.removed_points += removed;
        log::debug!(
            "density control removed {} points, {} remain",
            removed,
            self.points.len()
        );
        removed
    }

    /// Apply spring forces for one time step and project onto the domain.
    ///
    /// Fixed points are neither moved nor projected.
    pub fn relax(&mut self, geometry: &BarLengths<D>) -> MoveStep {
        let nfix = self.nfix;
        let forces = forces::bar_forces(self.points.len(), &self.bars, geometry, nfix, self.options.parallel);
        update::move_points(
            &mut self.points[nfix..],
            &forces[nfix..],
            &self.fd,
            self.options.deltat,
            self.options.h0,
            self.geps,
            self.options.dptol,
            self.options.parallel,
        )
    }

    /// Run relaxation iteration number `iteration`.
    ///
    /// Density control only runs when `iteration` is a multiple of
    /// `density_ctrl_freq`.
    pub fn step(&mut self, iteration: usize) -> Result<Iteration> {
        if self.needs_retriangulation() {
            self.retriangulate()?;
        }
        let geometry = self.bar_lengths()?;

        if iteration % self.options.density_ctrl_freq == 0 && geometry.overcrowded().next().is_some() {
            let removed = self.density_control(&geometry);
            return Ok(Iteration::DensityControl { removed });
        }

        Ok(Iteration::Moved(self.relax(&geometry)))
    }

    /// Iterate until convergence or `max_iter`, then retriangulate.
    pub fn run(&mut self, progress: Option<&Progress>) -> Result<BuildReport> {
        let max_iter = self.options.max_iter;
        log::debug!(
            "meshing {} points ({} fixed) in {}D, h0 = {}, max_iter = {}",
            self.points.len(),
            self.nfix,
            D,
            self.options.h0,
            max_iter
        );

        for i in 0..max_iter {
            if let Some(p) = progress {
                p.report(i, max_iter, "Relaxing mesh");
            }

            let outcome = self.step(i)?;
            self.report.iterations = i + 1;
            if let Iteration::Moved(step) = outcome {
                log::trace!("iteration {}: max move {:.3e} h0", i, step.max_move);
                if step.converged {
                    self.report.converged = true;
                    break;
                }
            }
        }

        self.retriangulate()?;

        if self.report.converged {
            log::debug!(
                "converged after {} iterations: {} points, {} simplices",
                self.report.iterations,
                self.points.len(),
                self.simplices.len()
            );
        } else {
            log::warn!(
                "stopped after {} iterations without reaching dptol = {}",
                self.report.iterations,
                self.options.dptol
            );
        }

        if let Some(p) = progress {
            p.report(max_iter, max_iter, "Meshing complete");
        }
        Ok(self.report)
    }

    /// Consume the session, returning the current mesh.
    pub fn into_mesh(self) -> Mesh<D> {
        Mesh::new(self.points, self.simplices, self.nfix)
    }
}

/// Generate a mesh of the domain `fd < 0` with relative edge lengths `fh`.
///
/// Uses the default triangulator and a random source seeded from
/// `options.seed`. Stopping at `max_iter` without convergence is not an
/// error; the mesh reached so far is returned.
pub fn build<const D: usize, Fd, Fh>(fd: Fd, fh: Fh, options: &DistMeshOptions<D>) -> Result<Mesh<D>>
where
    Fd: DistanceField<D>,
    Fh: SizingField<D>,
{
    build_internal(DistMesh::new(fd, fh, options.clone())?, None)
}

/// Generate a mesh with progress reporting.
///
/// See [`build`] for details.
pub fn build_with_progress<const D: usize, Fd, Fh>(
    fd: Fd,
    fh: Fh,
    options: &DistMeshOptions<D>,
    progress: &Progress,
) -> Result<Mesh<D>>
where
    Fd: DistanceField<D>,
    Fh: SizingField<D>,
{
    build_internal(DistMesh::new(fd, fh, options.clone())?, Some(progress))
}

/// Generate a mesh using `triangulator` for every retriangulation.
pub fn build_with_triangulator<const D: usize, Fd, Fh, T>(
    fd: Fd,
    fh: Fh,
    triangulator: T,
    options: &DistMeshOptions<D>,
) -> Result<Mesh<D>>
where
    Fd: DistanceField<D>,
    Fh: SizingField<D>,
    T: Triangulator<D>,
{
    build_internal(
        DistMesh::with_triangulator(fd, fh, triangulator, options.clone())?,
        None,
    )
}

/// Generate a mesh drawing the sampler's random numbers from `rng`.
pub fn build_with_rng<const D: usize, Fd, Fh, T, R>(
    fd: Fd,
    fh: Fh,
    triangulator: T,
    options: &DistMeshOptions<D>,
    rng: &mut R,
) -> Result<Mesh<D>>
where
    Fd: DistanceField<D>,
    Fh: SizingField<D>,
    T: Triangulator<D>,
    R: Rng + ?Sized,
{
    build_internal(
        DistMesh::with_rng(fd, fh, triangulator, options.clone(), rng)?,
        None,
    )
}

fn build_internal<const D: usize, Fd, Fh, T>(
    mut session: DistMesh<D, Fd, Fh, T>,
    progress: Option<&Progress>,
) -> Result<Mesh<D>>
where
    Fd: DistanceField<D>,
    Fh: SizingField<D>,
    T: Triangulator<D>,
{
    session.run(progress)?;
    Ok(session.into_mesh())
}

//! Geometry kernel boundary.
//!
//! The classifier never builds geometry itself. It asks a [`GeometryKernel`]
//! for wires, planes, faces, edges and filling surfaces, and only decides
//! which of those requests to issue for each element.
//!
//! [`native::NativeKernel`] is a self-contained implementation on top of
//! nalgebra. Bindings to a full CAD kernel implement the same trait.

pub mod native;

use nalgebra::Point3;
use thiserror::Error;

use crate::error::{check_tolerance, Result};

pub use native::NativeKernel;

/// A kernel request that could not be completed.
///
/// These failures are recoverable: the classifier skips the element (or the
/// sub-request) that caused them and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// The kernel reported the construction as not done.
    #[error("{operation} not done: {reason}")]
    NotDone {
        /// The requested construction.
        operation: &'static str,
        /// Why it failed.
        reason: String,
    },
}

impl KernelError {
    /// Create a not-done error.
    pub fn not_done(operation: &'static str, reason: impl Into<String>) -> Self {
        KernelError::NotDone {
            operation,
            reason: reason.into(),
        }
    }
}

/// Result type for kernel requests.
pub type KernelResult<T> = std::result::Result<T, KernelError>;

/// Constraint tolerances for a filling surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillTolerances {
    /// Parametric-space tolerance.
    pub tol_2d: f64,
    /// Maximum 3D distance between the surface and its constraints.
    pub tol_3d: f64,
    /// Angular continuity tolerance, in radians.
    pub tol_angle: f64,
    /// Curvature tolerance.
    pub tol_curvature: f64,
}

impl Default for FillTolerances {
    fn default() -> Self {
        Self {
            tol_2d: 1e-4,
            tol_3d: 0.2,
            tol_angle: 0.1,
            tol_curvature: 1.0,
        }
    }
}

impl FillTolerances {
    /// Set the parametric-space tolerance.
    pub fn with_tol_2d(mut self, tol: f64) -> Self {
        self.tol_2d = tol;
        self
    }

    /// Set the 3D distance tolerance.
    pub fn with_tol_3d(mut self, tol: f64) -> Self {
        self.tol_3d = tol;
        self
    }

    /// Set the angular tolerance (radians).
    pub fn with_tol_angle(mut self, tol: f64) -> Self {
        self.tol_angle = tol;
        self
    }

    /// Set the curvature tolerance.
    pub fn with_tol_curvature(mut self, tol: f64) -> Self {
        self.tol_curvature = tol;
        self
    }

    /// Check that every tolerance is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        check_tolerance("tol_2d", self.tol_2d)?;
        check_tolerance("tol_3d", self.tol_3d)?;
        check_tolerance("tol_angle", self.tol_angle)?;
        check_tolerance("tol_curvature", self.tol_curvature)
    }
}

/// The geometric constructions the face-synthesis planner can request.
pub trait GeometryKernel {
    /// A closed polygonal wire.
    type Wire;
    /// A plane found through a wire.
    type Plane;
    /// A face (planar or filled).
    type Face;
    /// A straight edge.
    type Edge;

    /// Build a closed polygon through `points` in order.
    fn make_wire(&self, points: &[Point3<f64>]) -> KernelResult<Self::Wire>;

    /// Find the plane containing `wire`, if there is one within the kernel's
    /// tolerance.
    fn find_plane(&self, wire: &Self::Wire) -> Option<Self::Plane>;

    /// Build a face bounded by `wire`. With `only_plane`, only a planar face
    /// is acceptable.
    fn make_face(&self, wire: &Self::Wire, only_plane: bool) -> KernelResult<Self::Face>;

    /// Build an edge from `p1` to `p2`.
    fn make_edge(&self, p1: &Point3<f64>, p2: &Point3<f64>) -> KernelResult<Self::Edge>;

    /// Fit a surface bounded by four edges, constrained by `tolerances`.
    fn make_filling_surface(
        &self,
        edges: &[Self::Edge; 4],
        tolerances: &FillTolerances,
    ) -> KernelResult<Self::Face>;
}

//! A nalgebra implementation of [`GeometryKernel`].
//!
//! Faces are planar polygons; filling surfaces are bilinear Coons patches
//! spanned by the four corners of the boundary loop.
//!
//! Plane fitting uses the Newell normal of the loop. For a self-intersecting
//! loop such as a planar bow-tie quadrangle that normal cancels out, so the
//! widest corner cross product is used instead. Such a loop still gets its
//! plane and a planar face, but [`Face::area`] reports its signed-area sum,
//! which is zero for a symmetric bow-tie.

use std::f64::consts::PI;

use nalgebra::{Point3, Unit, Vector3};

use super::{FillTolerances, GeometryKernel, KernelError, KernelResult};
use crate::error::{check_tolerance, Result};

/// Self-contained geometry kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeKernel {
    /// Points closer than this are coincident.
    pub linear_tolerance: f64,
    /// Maximum distance of a wire vertex from its plane.
    pub plane_tolerance: f64,
}

impl Default for NativeKernel {
    fn default() -> Self {
        Self {
            linear_tolerance: 1e-7,
            plane_tolerance: 1e-6,
        }
    }
}

impl NativeKernel {
    /// Create a kernel with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the coincidence tolerance.
    pub fn with_linear_tolerance(mut self, tol: f64) -> Self {
        self.linear_tolerance = tol;
        self
    }

    /// Set the planarity tolerance.
    pub fn with_plane_tolerance(mut self, tol: f64) -> Self {
        self.plane_tolerance = tol;
        self
    }

    /// Check that both tolerances are finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        check_tolerance("linear_tolerance", self.linear_tolerance)?;
        check_tolerance("plane_tolerance", self.plane_tolerance)
    }
}

/// A closed polygon. The closing segment from the last point back to the
/// first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    points: Vec<Point3<f64>>,
}

impl Wire {
    /// Vertices in order.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Total length including the closing segment.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| (self.points[(i + 1) % n] - self.points[i]).norm())
            .sum()
    }
}

/// A plane through a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3<f64>,
    /// Unit normal.
    pub normal: Unit<Vector3<f64>>,
}

impl Plane {
    /// Signed distance from `p` to the plane.
    pub fn signed_distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&(p - self.origin))
    }
}

/// A straight edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Start point.
    pub start: Point3<f64>,
    /// End point.
    pub end: Point3<f64>,
}

impl Edge {
    /// Edge length.
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// A bilinear Coons patch over four corners.
///
/// Corners are in loop order, so `corners[0]` is `(u, v) = (0, 0)`,
/// `corners[1]` is `(1, 0)`, `corners[2]` is `(1, 1)` and `corners[3]` is
/// `(0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoonsPatch {
    /// Patch corners in loop order.
    pub corners: [Point3<f64>; 4],
    /// Tolerances the patch was built with.
    pub tolerances: FillTolerances,
}

impl CoonsPatch {
    /// Point at parameters `(u, v)` in `[0, 1]²`.
    pub fn evaluate(&self, u: f64, v: f64) -> Point3<f64> {
        let [p0, p1, p2, p3] = self.corners;
        Point3::from(
            p0.coords * ((1.0 - u) * (1.0 - v))
                + p1.coords * (u * (1.0 - v))
                + p2.coords * (u * v)
                + p3.coords * ((1.0 - u) * v),
        )
    }

    /// Partial derivatives `(∂S/∂u, ∂S/∂v)` at `(u, v)`.
    pub fn derivatives(&self, u: f64, v: f64) -> (Vector3<f64>, Vector3<f64>) {
        let [p0, p1, p2, p3] = self.corners;
        let su = (p1 - p0) * (1.0 - v) + (p2 - p3) * v;
        let sv = (p3 - p0) * (1.0 - u) + (p2 - p1) * u;
        (su, sv)
    }

    /// Unit surface normal at `(u, v)`, or `None` where the patch is
    /// degenerate.
    pub fn normal(&self, u: f64, v: f64) -> Option<Unit<Vector3<f64>>> {
        let (su, sv) = self.derivatives(u, v);
        Unit::try_new(su.cross(&sv), f64::EPSILON)
    }

    /// Surface area by midpoint quadrature on an 8×8 grid.
    pub fn area(&self) -> f64 {
        const N: usize = 8;
        let h = 1.0 / N as f64;
        let mut area = 0.0;
        for i in 0..N {
            for j in 0..N {
                let (su, sv) = self.derivatives((i as f64 + 0.5) * h, (j as f64 + 0.5) * h);
                area += su.cross(&sv).norm() * h * h;
            }
        }
        area
    }
}

/// A face built by the native kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum Face {
    /// A planar polygon.
    Planar {
        /// Supporting plane.
        plane: Plane,
        /// Boundary vertices in order.
        boundary: Vec<Point3<f64>>,
    },
    /// A fitted patch for a non-planar loop.
    Filled(CoonsPatch),
}

impl Face {
    /// Face area.
    pub fn area(&self) -> f64 {
        match self {
            Face::Planar { boundary, .. } => newell_normal(boundary).norm() * 0.5,
            Face::Filled(patch) => patch.area(),
        }
    }

    /// Whether this is a planar face.
    pub fn is_planar(&self) -> bool {
        matches!(self, Face::Planar { .. })
    }
}

/// Area-weighted polygon normal (Newell's method). Its length is twice the
/// polygon area.
fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    let mut normal = Vector3::zeros();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    normal
}

/// The longest cross product spanned by three consecutive loop points.
fn widest_corner_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            (points[(i + 1) % n] - a).cross(&(points[(i + 2) % n] - a))
        })
        .fold(Vector3::zeros(), |best, c| {
            if c.norm_squared() > best.norm_squared() {
                c
            } else {
                best
            }
        })
}

impl GeometryKernel for NativeKernel {
    type Wire = Wire;
    type Plane = Plane;
    type Face = Face;
    type Edge = Edge;

    fn make_wire(&self, points: &[Point3<f64>]) -> KernelResult<Wire> {
        if points.len() < 3 {
            return Err(KernelError::not_done(
                "make_wire",
                format!("a closed polygon needs 3 points, got {}", points.len()),
            ));
        }
        let n = points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            if (points[j] - points[i]).norm() <= self.linear_tolerance {
                return Err(KernelError::not_done(
                    "make_wire",
                    format!("points {} and {} coincide", i, j),
                ));
            }
        }
        Ok(Wire {
            points: points.to_vec(),
        })
    }

    fn find_plane(&self, wire: &Wire) -> Option<Plane> {
        let normal = Unit::try_new(newell_normal(&wire.points), f64::EPSILON)
            .or_else(|| Unit::try_new(widest_corner_normal(&wire.points), f64::EPSILON))?;
        let centroid = wire
            .points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / wire.points.len() as f64;
        let plane = Plane {
            origin: Point3::from(centroid),
            normal,
        };
        wire.points
            .iter()
            .all(|p| plane.signed_distance(p).abs() <= self.plane_tolerance)
            .then_some(plane)
    }

    fn make_face(&self, wire: &Wire, only_plane: bool) -> KernelResult<Face> {
        match self.find_plane(wire) {
            Some(plane) => Ok(Face::Planar {
                plane,
                boundary: wire.points.clone(),
            }),
            None if only_plane => Err(KernelError::not_done("make_face", "wire is not planar")),
            None => Err(KernelError::not_done(
                "make_face",
                "non-planar faces need a filling surface",
            )),
        }
    }

    fn make_edge(&self, p1: &Point3<f64>, p2: &Point3<f64>) -> KernelResult<Edge> {
        if (p2 - p1).norm() <= self.linear_tolerance {
            return Err(KernelError::not_done("make_edge", "end points coincide"));
        }
        Ok(Edge { start: *p1, end: *p2 })
    }

    fn make_filling_surface(&self, edges: &[Edge; 4], tolerances: &FillTolerances) -> KernelResult<Face> {
        const OP: &str = "make_filling_surface";

        for (i, edge) in edges.iter().enumerate() {
            if edge.length() <= tolerances.tol_2d {
                return Err(KernelError::not_done(OP, format!("edge {} is degenerate", i)));
            }
            let next = &edges[(i + 1) % 4];
            let gap = (next.start - edge.end).norm();
            if gap > tolerances.tol_3d {
                return Err(KernelError::not_done(
                    OP,
                    format!("edges {} and {} are {:.3e} apart", i, (i + 1) % 4, gap),
                ));
            }
        }

        let corners = [edges[0].start, edges[1].start, edges[2].start, edges[3].start];
        for i in 0..4 {
            let prev = corners[(i + 3) % 4] - corners[i];
            let next = corners[(i + 1) % 4] - corners[i];
            let angle = prev.angle(&next);
            if angle < tolerances.tol_angle || angle > PI - tolerances.tol_angle {
                return Err(KernelError::not_done(
                    OP,
                    format!("corner {} is degenerate ({:.3} rad)", i, angle),
                ));
            }
        }

        let patch = CoonsPatch {
            corners,
            tolerances: *tolerances,
        };
        let corner_normals = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(u, v)| patch.normal(u, v))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| KernelError::not_done(OP, "patch has a degenerate corner"))?;
        let mean = corner_normals
            .iter()
            .fold(Vector3::zeros(), |acc, n| acc + n.into_inner());
        if corner_normals.iter().any(|n| n.dot(&mean) <= 0.0) {
            return Err(KernelError::not_done(OP, "patch folds over itself"));
        }

        Ok(Face::Filled(patch))
    }
}

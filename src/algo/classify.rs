//! Element classification and face-synthesis planning.
//!
//! Every resolved element becomes one or more geometry kernel requests:
//!
//! | Points | Requests |
//! |--------|----------|
//! | 4, planar | one planar face from the quad's wire |
//! | 4, non-planar | the configured [`QuadFallback`] |
//! | 3 | one planar face, never tested for planarity |
//! | 2 | one edge |
//! | other | nothing |
//!
//! Kernel failures never abort the run: the element (or the one triangle of a
//! split that failed) is skipped with a warning.
//!
//! # Example
//!
//! ```
//! use mailmesh::algo::classify::{synthesize, ClassifyOptions, Classification};
//! use mailmesh::kernel::NativeKernel;
//! use mailmesh::mesh::Element;
//! use nalgebra::Point3;
//!
//! let square = Element::Quad([
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//! let result = synthesize(&NativeKernel::new(), &[square], &ClassifyOptions::default()).unwrap();
//! assert_eq!(result.faces.len(), 1);
//! assert_eq!(result.non_planar, 0);
//! assert_eq!(result.outcomes, vec![Classification::PlanarFace]);
//! ```

use std::fmt;

use log::{info, warn};
use nalgebra::Point3;

use super::Progress;
use crate::error::{MeshError, Result};
use crate::kernel::{FillTolerances, GeometryKernel, KernelResult};
use crate::mesh::Element;

/// What to do with a quad whose corners are not coplanar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuadFallback {
    /// Emit triangles {0, 1, 2} and {0, 2, 3}.
    #[default]
    SplitDiagonal,
    /// Fit one surface through the four boundary edges; drop the element if
    /// the fit fails.
    Fill,
}

/// Options for face synthesis.
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    /// Policy for non-planar quads.
    pub fallback: QuadFallback,
    /// Constraint tolerances passed to filling-surface requests.
    pub tolerances: FillTolerances,
}

impl ClassifyOptions {
    /// Set the non-planar quad policy.
    pub fn with_fallback(mut self, fallback: QuadFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the filling tolerances.
    pub fn with_tolerances(mut self, tolerances: FillTolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Fill non-planar quads instead of splitting them.
    pub fn fill(mut self) -> Self {
        self.fallback = QuadFallback::Fill;
        self
    }
}

/// How one element was turned into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A planar quad or a triangle became one planar face.
    PlanarFace,
    /// A non-planar quad became two triangular faces (or one, if the other
    /// could not be built).
    SplitTriangles,
    /// A non-planar quad became one filled surface.
    FilledSurface,
    /// A beam became one edge.
    EdgeSegment,
    /// Nothing was produced.
    Rejected,
}

impl Classification {
    /// All outcomes, in reporting order.
    pub const ALL: [Classification; 5] = [
        Classification::PlanarFace,
        Classification::SplitTriangles,
        Classification::FilledSurface,
        Classification::EdgeSegment,
        Classification::Rejected,
    ];

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            Classification::PlanarFace => "planar face",
            Classification::SplitTriangles => "split triangles",
            Classification::FilledSurface => "filled surface",
            Classification::EdgeSegment => "edge segment",
            Classification::Rejected => "rejected",
        }
    }
}

/// Geometry produced for a whole element list.
pub struct FaceSynthesis<K: GeometryKernel> {
    /// Faces from quads and triangles.
    pub faces: Vec<K::Face>,
    /// Edges from beams, kept apart from the faces.
    pub edges: Vec<K::Edge>,
    /// One outcome per classified element, in input order.
    pub outcomes: Vec<Classification>,
    /// Quads that took the non-planar path.
    pub non_planar: usize,
}

impl<K: GeometryKernel> FaceSynthesis<K> {
    fn new() -> Self {
        Self {
            faces: Vec::new(),
            edges: Vec::new(),
            outcomes: Vec::new(),
            non_planar: 0,
        }
    }

    /// Number of elements with the given outcome.
    pub fn count(&self, outcome: Classification) -> usize {
        self.outcomes.iter().filter(|&&o| o == outcome).count()
    }
}

impl<K: GeometryKernel> fmt::Debug for FaceSynthesis<K>
where
    K::Face: fmt::Debug,
    K::Edge: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceSynthesis")
            .field("faces", &self.faces)
            .field("edges", &self.edges)
            .field("outcomes", &self.outcomes)
            .field("non_planar", &self.non_planar)
            .finish()
    }
}

/// Per-element classifier.
///
/// Holds no state across elements other than the produced geometry and the
/// non-planar tally.
pub struct ElementClassifier<'k, K: GeometryKernel> {
    kernel: &'k K,
    fallback: QuadFallback,
    tolerances: FillTolerances,
    output: FaceSynthesis<K>,
}

impl<'k, K: GeometryKernel> ElementClassifier<'k, K> {
    /// Create a classifier issuing requests to `kernel`.
    pub fn new(kernel: &'k K, options: &ClassifyOptions) -> Self {
        Self {
            kernel,
            fallback: options.fallback,
            tolerances: options.tolerances,
            output: FaceSynthesis::new(),
        }
    }

    /// Quads that have taken the non-planar path so far.
    pub fn non_planar(&self) -> usize {
        self.output.non_planar
    }

    /// Classify one element given as its ordered corner points.
    pub fn classify(&mut self, points: &[Point3<f64>]) -> Classification {
        let index = self.output.outcomes.len();
        let outcome = match points {
            [_, _, _, _] => self.classify_quad(index, points),
            [_, _, _] => match self.planar_face(points) {
                Ok(face) => {
                    self.output.faces.push(face);
                    Classification::PlanarFace
                }
                Err(e) => {
                    warn!("element {}: skipping triangle: {}", index, e);
                    Classification::Rejected
                }
            },
            [a, b] => match self.kernel.make_edge(a, b) {
                Ok(edge) => {
                    self.output.edges.push(edge);
                    Classification::EdgeSegment
                }
                Err(e) => {
                    warn!("element {}: skipping beam: {}", index, e);
                    Classification::Rejected
                }
            },
            _ => {
                warn!("element {}: unsupported point count {}", index, points.len());
                Classification::Rejected
            }
        };
        self.output.outcomes.push(outcome);
        outcome
    }

    /// Classify a resolved mesh element.
    pub fn classify_element(&mut self, element: &Element) -> Classification {
        self.classify(element.points())
    }

    /// Consume the classifier and return everything it produced.
    pub fn finish(self) -> FaceSynthesis<K> {
        self.output
    }

    fn classify_quad(&mut self, index: usize, points: &[Point3<f64>]) -> Classification {
        let wire = match self.kernel.make_wire(points) {
            Ok(wire) => wire,
            Err(e) => {
                warn!("element {}: skipping quad: {}", index, e);
                return Classification::Rejected;
            }
        };

        if self.kernel.find_plane(&wire).is_some() {
            return match self.kernel.make_face(&wire, true) {
                Ok(face) => {
                    self.output.faces.push(face);
                    Classification::PlanarFace
                }
                Err(e) => {
                    warn!("element {}: skipping planar quad: {}", index, e);
                    Classification::Rejected
                }
            };
        }

        self.output.non_planar += 1;
        match self.fallback {
            QuadFallback::SplitDiagonal => self.split_quad(index, points),
            QuadFallback::Fill => self.fill_quad(index, points),
        }
    }

    fn split_quad(&mut self, index: usize, p: &[Point3<f64>]) -> Classification {
        let mut built = 0;
        for triangle in [[p[0], p[1], p[2]], [p[0], p[2], p[3]]] {
            match self.planar_face(&triangle) {
                Ok(face) => {
                    self.output.faces.push(face);
                    built += 1;
                }
                Err(e) => warn!("element {}: skipping split triangle: {}", index, e),
            }
        }
        if built > 0 {
            Classification::SplitTriangles
        } else {
            Classification::Rejected
        }
    }

    fn fill_quad(&mut self, index: usize, p: &[Point3<f64>]) -> Classification {
        let result = self
            .boundary_edges(p)
            .and_then(|edges| self.kernel.make_filling_surface(&edges, &self.tolerances));
        match result {
            Ok(face) => {
                self.output.faces.push(face);
                Classification::FilledSurface
            }
            Err(e) => {
                warn!("element {}: skipping non-planar quad: {}", index, e);
                Classification::Rejected
            }
        }
    }

    fn boundary_edges(&self, p: &[Point3<f64>]) -> KernelResult<[K::Edge; 4]> {
        Ok([
            self.kernel.make_edge(&p[0], &p[1])?,
            self.kernel.make_edge(&p[1], &p[2])?,
            self.kernel.make_edge(&p[2], &p[3])?,
            self.kernel.make_edge(&p[3], &p[0])?,
        ])
    }

    fn planar_face(&self, points: &[Point3<f64>]) -> KernelResult<K::Face> {
        let wire = self.kernel.make_wire(points)?;
        self.kernel.make_face(&wire, true)
    }
}

/// Classify every element of a combined element list.
///
/// Fails with [`MeshError::Usage`] when `elements` is empty, which means the
/// mesh was never built or holds nothing to display.
pub fn synthesize<K: GeometryKernel>(
    kernel: &K,
    elements: &[Element],
    options: &ClassifyOptions,
) -> Result<FaceSynthesis<K>> {
    synthesize_with_progress(kernel, elements, options, &Progress::none())
}

/// [`synthesize`] with progress reporting.
pub fn synthesize_with_progress<K: GeometryKernel>(
    kernel: &K,
    elements: &[Element],
    options: &ClassifyOptions,
    progress: &Progress,
) -> Result<FaceSynthesis<K>> {
    options.tolerances.validate()?;
    if elements.is_empty() {
        return Err(MeshError::usage("no elements to classify; build the mesh first"));
    }

    const REPORT_EVERY: usize = 1024;
    let total = elements.len();
    let mut classifier = ElementClassifier::new(kernel, options);
    for (i, element) in elements.iter().enumerate() {
        if i % REPORT_EVERY == 0 {
            progress.report(i, total, "Classifying elements");
        }
        classifier.classify_element(element);
    }
    progress.report(total, total, "Classifying elements");

    let output = classifier.finish();
    info!(
        "classified {} elements: {} faces, {} edges, {} non-planar quads",
        total,
        output.faces.len(),
        output.edges.len(),
        output.non_planar
    );
    Ok(output)
}

//! # mailmesh
//!
//! Ingestion of Code_Aster `.mail` meshes and face synthesis for display.
//!
//! mailmesh reads the node coordinates, element connectivity and named groups
//! of a `.mail` file into an immutable [`MeshSnapshot`](mesh::MeshSnapshot),
//! then decides for every element which geometry to request from a
//! [`GeometryKernel`](kernel::GeometryKernel): one planar face, two triangles
//! or a filled surface for quadrangles, one face for triangles and one edge
//! for segments.
//!
//! ## Features
//!
//! - **Streaming keyword scanner**: sections are re-scanned from the source on
//!   every extraction, nothing is buffered between passes
//! - **Label-based resolution**: element node references resolve through the
//!   node labels, not through line positions
//! - **Pluggable geometry**: the classifier only issues requests; a native
//!   nalgebra kernel is included
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailmesh::prelude::*;
//!
//! let mesh = mailmesh::io::load("plate.mail").unwrap();
//! println!("Nodes: {}", mesh.num_nodes());
//! println!("Elements: {}", mesh.num_elements());
//!
//! let synthesis = synthesize(&NativeKernel::new(), mesh.elements(), &ClassifyOptions::default()).unwrap();
//! println!("Non-planar quadrangles: {}", synthesis.non_planar);
//! ```
//!
//! ## Ingesting Text
//!
//! ```
//! use mailmesh::prelude::*;
//!
//! let text = "\
//! COOR_3D
//!     N1  0.0 0.0 0.0
//!     N2  1.0 0.0 0.0
//!     N3  1.0 1.0 0.0
//!     N4  0.0 1.0 0.0
//! FINSF
//! QUAD4
//!     M1  N1 N2 N3 N4
//! FINSF
//! GROUP_MA NOM=PLATE
//!     M1
//! FINSF
//! ";
//!
//! let mesh = MeshBuilder::from_text(text).ingest().unwrap();
//! assert_eq!(mesh.quads().len(), 1);
//! assert_eq!(mesh.group_members("PLATE"), Some(&[1][..]));
//!
//! let synthesis = synthesize(&NativeKernel::new(), mesh.elements(), &ClassifyOptions::default()).unwrap();
//! assert_eq!(synthesis.count(Classification::PlanarFace), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod kernel;
pub mod mesh;
pub mod pipeline;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use mailmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{synthesize, Classification, ClassifyOptions, FaceSynthesis, QuadFallback};
    pub use crate::error::{MeshError, Result};
    pub use crate::kernel::{FillTolerances, GeometryKernel, NativeKernel};
    pub use crate::mesh::{BuildOptions, Element, ElementKind, Group, MeshBuilder, MeshSnapshot};
    pub use crate::pipeline::{MeshSummary, PipelineOptions};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_mixed_strip() {
        let text = "\
COOR_3D
N1 0 0 0
N2 1 0 0
N3 2 0 0
N4 2 1 0
N5 1 1 0
N6 0 1 0
FINSF
QUAD4
M1 N1 N2 N5 N6
FINSF
TRIA3
M2 N2 N3 N4
M3 N2 N4 N5
FINSF
SEG2
M4 N1 N3
FINSF
";
        let mesh = MeshBuilder::from_text(text).ingest().unwrap();

        assert_eq!(mesh.num_nodes(), 6);
        assert_eq!(
            mesh.num_elements(),
            mesh.quads().len() + mesh.triangles().len() + mesh.beams().len()
        );
        let kinds: Vec<_> = mesh.elements().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Quad, ElementKind::Triangle, ElementKind::Triangle, ElementKind::Beam]
        );
        assert_eq!(mesh.beams()[0], [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]);

        let synthesis = synthesize(&NativeKernel::new(), mesh.elements(), &ClassifyOptions::default()).unwrap();
        assert_eq!(synthesis.faces.len(), 3);
        assert_eq!(synthesis.edges.len(), 1);
        assert_eq!(synthesis.non_planar, 0);
    }
}

//! Mesh file input.
//!
//! This module reads Code_Aster `.mail` meshes. The format is a sequence of
//! keyword-delimited blocks:
//!
//! ```text
//! COOR_3D
//!     N1   0.0  0.0  0.0
//!     N2   1.0  0.0  0.0
//! FINSF
//! QUAD4
//!     M1   N1  N2  N3  N4
//! FINSF
//! GROUP_MA NOM=TOP
//!     M1
//! FINSF
//! ```
//!
//! | Block | Start marker | Records |
//! |-------|--------------|---------|
//! | Coordinates | `COOR_3D` | `label x y z` |
//! | Quadrangles | `QUAD4` | `label n1 n2 n3 n4` |
//! | Triangles | `TRIA3` | `label n1 n2 n3` |
//! | Segments | `SEG2` | `label n1 n2` |
//! | Groups | `GROUP_MA` / `GROUP_NO` | one member per line |
//!
//! Every block ends at a line containing `FINSF`.
//!
//! # Usage
//!
//! ```no_run
//! use mailmesh::io::load;
//!
//! let mesh = load("plate.mail").unwrap();
//! println!("{} nodes, {} elements", mesh.num_nodes(), mesh.num_elements());
//! ```
//!
//! The lower layers are public too: [`keyword`] scans sections, [`record`]
//! decodes single lines and [`source`] abstracts over files and in-memory
//! text.

pub mod aster;
pub mod keyword;
pub mod record;
pub mod source;

use std::path::Path;

pub use aster::{GroupKind, Keywords};
pub use keyword::SectionMode;
pub use source::{FileSource, LineSource, TextSource};

use crate::error::Result;
use crate::mesh::{BuildOptions, MeshBuilder, MeshSnapshot};

/// Load a mesh file with the default Code_Aster keywords.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MeshSnapshot> {
    load_with(path, &BuildOptions::default())
}

/// Load a mesh file with explicit build options.
pub fn load_with<P: AsRef<Path>>(path: P, options: &BuildOptions) -> Result<MeshSnapshot> {
    MeshBuilder::open(path)?.with_options(options.clone()).ingest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(dir.path().join("nope.mail")),
            Err(MeshError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.mail");
        std::fs::write(
            &path,
            "COOR_3D\nN1 0 0 0\nN2 1 0 0\nN3 1 1 0\nN4 0 1 0\nFINSF\nQUAD4\nM1 N1 N2 N3 N4\nFINSF\n",
        )
        .unwrap();

        let mesh = load(&path).unwrap();
        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.quads().len(), 1);
        assert!(mesh.groups().is_empty());
    }
}

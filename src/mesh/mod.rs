//! Core mesh data structures.
//!
//! This module provides the resolved mesh model produced by ingesting a
//! `.mail` file.
//!
//! # Overview
//!
//! The primary type is [`MeshSnapshot`], an immutable aggregate of:
//! - the node table ([`NodeTable`]), in parse order
//! - per-kind element lists (quads, triangles, beams)
//! - the combined element list, kind-major
//! - named [`Group`]s of raw member numbers
//!
//! Elements ([`Element`]) own copies of their corner points. Nothing in a
//! snapshot refers back into the node table by index.
//!
//! # Construction
//!
//! Snapshots are produced by [`MeshBuilder`], either in one call or step by
//! step:
//!
//! ```
//! use mailmesh::mesh::{ElementKind, MeshBuilder};
//!
//! let text = "COOR_3D\nN1 0 0 0\nN2 1 0 0\nFINSF\nSEG2\nM1 N1 N2\nFINSF\n";
//! let mut builder = MeshBuilder::from_text(text);
//! builder.extract_nodes().unwrap();
//! for kind in ElementKind::ALL {
//!     builder.extract_elements_of_kind(kind).unwrap();
//! }
//! builder.combine_elements().unwrap();
//! builder.extract_groups().unwrap();
//! let mesh = builder.build().unwrap();
//! assert_eq!(mesh.beams().len(), 1);
//! ```

mod builder;
mod element;
mod nodes;
mod snapshot;

pub use builder::{BuildOptions, MeshBuilder};
pub use element::{Element, ElementKind};
pub use nodes::NodeTable;
pub use snapshot::{Group, MeshSnapshot};

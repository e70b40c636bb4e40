//! The immutable result of one ingestion.

use nalgebra::Point3;

use super::element::{Element, ElementKind};
use super::nodes::NodeTable;
use crate::io::aster::GroupKind;

/// A named group of raw member numbers.
///
/// Members are taken verbatim from the file and are not checked against the
/// element or node lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// Group name (`TOP` for a `GROUP_MA NOM=TOP` header).
    pub name: String,
    /// The header line the group was read from.
    pub header: String,
    /// Whether members are elements or nodes.
    pub kind: GroupKind,
    /// Member numbers in file order.
    pub members: Vec<u64>,
}

/// Fully resolved mesh contents.
///
/// The combined element list is always `[quads.., triangles.., beams..]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSnapshot {
    pub(crate) nodes: NodeTable,
    pub(crate) quads: Vec<[Point3<f64>; 4]>,
    pub(crate) triangles: Vec<[Point3<f64>; 3]>,
    pub(crate) beams: Vec<[Point3<f64>; 2]>,
    pub(crate) elements: Vec<Element>,
    pub(crate) groups: Vec<Group>,
}

impl MeshSnapshot {
    /// The node table.
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Resolved quadrangles.
    pub fn quads(&self) -> &[[Point3<f64>; 4]] {
        &self.quads
    }

    /// Resolved triangles.
    pub fn triangles(&self) -> &[[Point3<f64>; 3]] {
        &self.triangles
    }

    /// Resolved segments.
    pub fn beams(&self) -> &[[Point3<f64>; 2]] {
        &self.beams
    }

    /// Number of elements of one kind.
    pub fn num_of_kind(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Quad => self.quads.len(),
            ElementKind::Triangle => self.triangles.len(),
            ElementKind::Beam => self.beams.len(),
        }
    }

    /// All elements, quads first, then triangles, then beams.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Total number of elements.
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Groups in the order their headers appear in the file.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Look a group up by name or by its full header line.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .or_else(|| self.groups.iter().find(|g| g.header == name))
    }

    /// Members of a group, looked up as in [`MeshSnapshot::group`].
    pub fn group_members(&self, name: &str) -> Option<&[u64]> {
        self.group(name).map(|g| g.members.as_slice())
    }
}

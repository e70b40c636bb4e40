//! Code_Aster `.mail` keywords.

use crate::mesh::ElementKind;

/// Section start marker for 3D node coordinates.
pub const COOR_3D: &str = "COOR_3D";
/// Section start marker for 4-node quadrangles.
pub const QUAD4: &str = "QUAD4";
/// Section start marker for 3-node triangles.
pub const TRIA3: &str = "TRIA3";
/// Section start marker for 2-node segments.
pub const SEG2: &str = "SEG2";
/// End marker shared by every section.
pub const FINSF: &str = "FINSF";
/// Marker of element group headers.
pub const GROUP_MA: &str = "GROUP_MA";
/// Marker of node group headers.
pub const GROUP_NO: &str = "GROUP_NO";

/// Whether a group lists elements or nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Members are element numbers (`GROUP_MA`).
    Element,
    /// Members are node numbers (`GROUP_NO`).
    Node,
}

/// The markers used to locate every section of a mesh file.
///
/// Matching is by exact, case-sensitive substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    /// Start of the coordinate section.
    pub coordinates: String,
    /// Start of the quadrangle section.
    pub quad: String,
    /// Start of the triangle section.
    pub triangle: String,
    /// Start of the segment section.
    pub beam: String,
    /// End of every section.
    pub end: String,
    /// Group header markers and the kind of group each introduces.
    pub groups: Vec<(String, GroupKind)>,
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            coordinates: COOR_3D.to_string(),
            quad: QUAD4.to_string(),
            triangle: TRIA3.to_string(),
            beam: SEG2.to_string(),
            end: FINSF.to_string(),
            groups: vec![
                (GROUP_MA.to_string(), GroupKind::Element),
                (GROUP_NO.to_string(), GroupKind::Node),
            ],
        }
    }
}

impl Keywords {
    /// Start marker of the section holding elements of `kind`.
    pub fn section(&self, kind: ElementKind) -> &str {
        match kind {
            ElementKind::Quad => &self.quad,
            ElementKind::Triangle => &self.triangle,
            ElementKind::Beam => &self.beam,
        }
    }

    /// Only scan element groups, the way the original viewer did.
    pub fn element_groups_only(mut self) -> Self {
        self.groups.retain(|(_, kind)| *kind == GroupKind::Element);
        self
    }

    /// Replace the group markers.
    pub fn with_group_marker(mut self, marker: impl Into<String>, kind: GroupKind) -> Self {
        self.groups = vec![(marker.into(), kind)];
        self
    }
}

/// Extract the group name from a header line.
///
/// `GROUP_MA NOM=TOP` and `GROUP_MA NOM = TOP` both give `TOP`. A header with
/// nothing after the marker keeps the whole header as its name.
pub fn group_name(header: &str, marker: &str) -> String {
    let rest = match header.find(marker) {
        Some(pos) => &header[pos + marker.len()..],
        None => header,
    };
    let rest = rest.trim_start();
    let rest = match rest.strip_prefix("NOM") {
        Some(after) if after.trim_start().starts_with('=') => after,
        _ => rest,
    };
    let name = rest.trim_start().trim_start_matches('=').trim();
    if name.is_empty() {
        header.trim().to_string()
    } else {
        name.to_string()
    }
}

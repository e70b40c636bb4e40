//! Mesh construction from a `.mail` source.
//!
//! [`MeshBuilder`] runs the extraction steps in a fixed order: nodes, each
//! element kind, combination of the element lists, then groups. Each step
//! re-opens the source and scans it for its own section.
//!
//! # Example
//!
//! ```
//! use mailmesh::mesh::MeshBuilder;
//!
//! let text = "\
//! COOR_3D
//!   N1 0.0 0.0 0.0
//!   N2 1.0 0.0 0.0
//!   N3 1.0 1.0 0.0
//! FINSF
//! TRIA3
//!   M1 N1 N2 N3
//! FINSF
//! ";
//! let mesh = MeshBuilder::from_text(text).ingest().unwrap();
//! assert_eq!(mesh.num_nodes(), 3);
//! assert_eq!(mesh.num_elements(), 1);
//! ```

use std::path::Path;

use log::debug;
use nalgebra::Point3;

use super::element::{Element, ElementKind};
use super::nodes::NodeTable;
use super::snapshot::{Group, MeshSnapshot};
use crate::error::{MeshError, Result};
use crate::io::aster::{group_name, Keywords};
use crate::io::keyword::{extract_between, marked_lines, SectionMode};
use crate::io::record::{parse_connectivity, parse_coordinates, parse_group_member, parse_reference};
use crate::io::source::{FileSource, LineSource, TextSource};

/// Options controlling how sections are located.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Section markers.
    pub keywords: Keywords,
    /// Whether each scan stops after the first section or captures them all.
    pub mode: SectionMode,
}

impl BuildOptions {
    /// Use the given section markers.
    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
        self
    }

    /// Set the section mode.
    pub fn with_mode(mut self, mode: SectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Capture every section of a kind rather than only the first.
    pub fn every_section(mut self) -> Self {
        self.mode = SectionMode::EverySection;
        self
    }
}

/// Incremental builder for a [`MeshSnapshot`].
#[derive(Debug)]
pub struct MeshBuilder<S: LineSource = FileSource> {
    source: S,
    options: BuildOptions,
    nodes: NodeTable,
    quads: Vec<[Point3<f64>; 4]>,
    triangles: Vec<[Point3<f64>; 3]>,
    beams: Vec<[Point3<f64>; 2]>,
    elements: Option<Vec<Element>>,
    groups: Vec<Group>,
    nodes_extracted: bool,
    kinds_extracted: [bool; 3],
}

impl MeshBuilder<FileSource> {
    /// Create a builder for a mesh file.
    ///
    /// Fails with [`MeshError::FileNotFound`] before anything is read if the
    /// path does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(FileSource::new(path)?))
    }
}

impl MeshBuilder<TextSource> {
    /// Create a builder over in-memory mesh text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(TextSource::new(text))
    }
}

impl<S: LineSource> MeshBuilder<S> {
    /// Create a builder over any line source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            options: BuildOptions::default(),
            nodes: NodeTable::new(),
            quads: Vec::new(),
            triangles: Vec::new(),
            beams: Vec::new(),
            elements: None,
            groups: Vec::new(),
            nodes_extracted: false,
            kinds_extracted: [false; 3],
        }
    }

    /// Replace the build options.
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Nodes parsed so far.
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// Run every extraction step and return the snapshot.
    pub fn ingest(mut self) -> Result<MeshSnapshot> {
        debug!("ingesting {}", self.source.describe());
        self.extract_nodes()?;
        for kind in ElementKind::ALL {
            self.extract_elements_of_kind(kind)?;
        }
        self.combine_elements()?;
        self.extract_groups()?;
        self.build()
    }

    /// Parse the coordinate section into the node table.
    pub fn extract_nodes(&mut self) -> Result<()> {
        if self.elements.is_some() {
            return Err(MeshError::usage("elements have already been combined"));
        }
        if self.nodes_extracted {
            return Err(MeshError::usage("nodes have already been extracted"));
        }

        let keywords = &self.options.keywords;
        let lines = extract_between(&self.source, &keywords.coordinates, &keywords.end, self.options.mode)?;
        for line in lines {
            let line = line?;
            if !is_record(&line.text) {
                continue;
            }
            let record = parse_coordinates(&line.text).map_err(|m| MeshError::format(line.number, m))?;

            let number = match &record.label {
                Some(label) => parse_reference(label).ok_or_else(|| {
                    MeshError::format(line.number, format!("node label '{}' has no number", label))
                })?,
                None => self.nodes.len() as u64,
            };
            if !self.nodes.push(number, record.point) {
                return Err(MeshError::format(
                    line.number,
                    format!("node number {} is defined twice", number),
                ));
            }
        }

        self.nodes_extracted = true;
        debug!("extracted {} nodes", self.nodes.len());
        Ok(())
    }

    /// Parse the section of one element kind, resolving node references
    /// against the nodes already extracted.
    pub fn extract_elements_of_kind(&mut self, kind: ElementKind) -> Result<()> {
        let slot = kind_slot(kind);
        if self.elements.is_some() {
            return Err(MeshError::usage("elements have already been combined"));
        }
        if !self.nodes_extracted {
            return Err(MeshError::usage("nodes must be extracted before elements"));
        }
        if self.kinds_extracted[slot] {
            return Err(MeshError::usage(format!(
                "{} elements have already been extracted",
                kind.name()
            )));
        }

        let keywords = &self.options.keywords;
        let lines = extract_between(&self.source, keywords.section(kind), &keywords.end, self.options.mode)?;
        for line in lines {
            let line = line?;
            if !is_record(&line.text) {
                continue;
            }
            let record = parse_connectivity(&line.text, kind.arity())
                .map_err(|m| MeshError::format(line.number, m))?;

            let refs = &record.nodes;
            match kind {
                ElementKind::Quad => self.quads.push(resolve(&self.nodes, line.number, refs)?),
                ElementKind::Triangle => self.triangles.push(resolve(&self.nodes, line.number, refs)?),
                ElementKind::Beam => self.beams.push(resolve(&self.nodes, line.number, refs)?),
            }
        }

        self.kinds_extracted[slot] = true;
        debug!("extracted {} {} elements", self.count_of(kind), kind.name());
        Ok(())
    }

    /// Concatenate quads, triangles and beams into the combined list.
    pub fn combine_elements(&mut self) -> Result<()> {
        if let Some(kind) = ElementKind::ALL
            .into_iter()
            .find(|&k| !self.kinds_extracted[kind_slot(k)])
        {
            return Err(MeshError::usage(format!(
                "{} elements must be extracted before combining",
                kind.name()
            )));
        }

        let mut elements = Vec::with_capacity(self.quads.len() + self.triangles.len() + self.beams.len());
        elements.extend(self.quads.iter().map(|&q| Element::Quad(q)));
        elements.extend(self.triangles.iter().map(|&t| Element::Triangle(t)));
        elements.extend(self.beams.iter().map(|&b| Element::Beam(b)));
        debug!("combined {} elements", elements.len());
        self.elements = Some(elements);
        Ok(())
    }

    /// Read every group section.
    ///
    /// Each line containing a group marker becomes the start marker of its
    /// own scan. Groups are kept in the order their headers appear in the
    /// file, whatever their kind. Fails if the combined element list is
    /// missing or empty.
    pub fn extract_groups(&mut self) -> Result<()> {
        if self.elements.as_ref().map_or(true, |e| e.is_empty()) {
            return Err(MeshError::usage(
                "no combined elements; extract and combine elements before grouping",
            ));
        }

        let keywords = &self.options.keywords;
        let markers: Vec<&str> = keywords.groups.iter().map(|(marker, _)| marker.as_str()).collect();
        for (index, header) in marked_lines(&self.source, &markers[..])? {
            let (marker, kind) = &keywords.groups[index];
            let mut members = Vec::new();
            for line in extract_between(&self.source, &header, &keywords.end, self.options.mode)? {
                let line = line?;
                if !is_record(&line.text) {
                    continue;
                }
                members.push(parse_group_member(&line.text).map_err(|m| MeshError::format(line.number, m))?);
            }

            let group = Group {
                name: group_name(&header, marker),
                header,
                kind: *kind,
                members,
            };
            match self.groups.iter_mut().find(|g| g.header == group.header) {
                Some(existing) => *existing = group,
                None => self.groups.push(group),
            }
        }

        debug!("extracted {} groups", self.groups.len());
        Ok(())
    }

    /// Finish building. Elements must have been combined.
    pub fn build(self) -> Result<MeshSnapshot> {
        let elements = self
            .elements
            .ok_or_else(|| MeshError::usage("elements have not been combined"))?;
        Ok(MeshSnapshot {
            nodes: self.nodes,
            quads: self.quads,
            triangles: self.triangles,
            beams: self.beams,
            elements,
            groups: self.groups,
        })
    }

    fn count_of(&self, kind: ElementKind) -> usize {
        match kind {
            ElementKind::Quad => self.quads.len(),
            ElementKind::Triangle => self.triangles.len(),
            ElementKind::Beam => self.beams.len(),
        }
    }
}

fn kind_slot(kind: ElementKind) -> usize {
    match kind {
        ElementKind::Quad => 0,
        ElementKind::Triangle => 1,
        ElementKind::Beam => 2,
    }
}

/// Blank lines and `%` comments carry no record.
fn is_record(text: &str) -> bool {
    !text.is_empty() && !text.starts_with('%')
}

fn resolve<const N: usize>(nodes: &NodeTable, line: usize, refs: &[u64]) -> Result<[Point3<f64>; N]> {
    let mut points = [Point3::origin(); N];
    for (slot, &number) in points.iter_mut().zip(refs) {
        *slot = nodes.resolve(number).ok_or(MeshError::IndexOutOfRange {
            line,
            reference: number,
            nodes: nodes.len(),
        })?;
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::aster::GroupKind;
    use std::io::Write;

    const PLATE: &str = "\
TITRE
 plate with a warped corner
FINSF
%
COOR_3D
    N1   0.0  0.0  0.0
    N2   1.0  0.0  0.0
    N3   1.0  1.0  0.0
    N4   0.0  1.0  0.0
    N5   2.0  0.0  0.0
    N6   2.0  1.0  0.5
FINSF
%
SEG2
    M7   N1  N5
FINSF
QUAD4
    M1   N1  N2  N3  N4
    M2   N2  N5  N6  N3
FINSF
TRIA3
    M3   N1  N2  N4
FINSF
GROUP_MA NOM=SHELL
    M1
    M2
FINSF
GROUP_NO NOM=CLAMPED
    N3
    N7
    N12
FINSF
FIN
";

    #[test]
    fn test_ingest_counts() {
        let mesh = MeshBuilder::from_text(PLATE).ingest().unwrap();
        assert_eq!(mesh.num_nodes(), 6);
        assert_eq!(mesh.quads().len(), 2);
        assert_eq!(mesh.triangles().len(), 1);
        assert_eq!(mesh.beams().len(), 1);
        assert_eq!(mesh.num_elements(), 4);
        assert_eq!(mesh.groups().len(), 2);
    }

    #[test]
    fn test_combined_order_is_kind_major() {
        let mesh = MeshBuilder::from_text(PLATE).ingest().unwrap();
        let kinds: Vec<ElementKind> = mesh.elements().iter().map(Element::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::Quad,
                ElementKind::Quad,
                ElementKind::Triangle,
                ElementKind::Beam
            ]
        );
        assert_eq!(mesh.elements()[0], Element::Quad(mesh.quads()[0]));
        assert_eq!(mesh.elements()[1], Element::Quad(mesh.quads()[1]));
        assert_eq!(mesh.elements()[2], Element::Triangle(mesh.triangles()[0]));
        assert_eq!(mesh.elements()[3], Element::Beam(mesh.beams()[0]));
    }

    #[test]
    fn test_references_land_on_labelled_nodes() {
        let mesh = MeshBuilder::from_text(PLATE).ingest().unwrap();
        let nodes = mesh.nodes();
        let quad = mesh.quads()[1];
        for (point, number) in quad.iter().zip([2, 5, 6, 3]) {
            let offset = nodes.offset_of(number).unwrap();
            assert_eq!(*point, nodes.points()[offset]);
        }
        assert_eq!(quad[0], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.beams()[0], [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_unlabelled_references_are_offsets() {
        let text = "COOR_3D\n0 0 0\n1 0 0\n1 1 0\nFINSF\nTRIA3\n0 1 2\nFINSF\n";
        let mesh = MeshBuilder::from_text(text).ingest().unwrap();
        assert_eq!(
            mesh.triangles()[0],
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_groups() {
        let mesh = MeshBuilder::from_text(PLATE).ingest().unwrap();

        let shell = mesh.group("SHELL").unwrap();
        assert_eq!(shell.kind, GroupKind::Element);
        assert_eq!(shell.header, "GROUP_MA NOM=SHELL");
        assert_eq!(shell.members, vec![1, 2]);

        // Members are not checked against the node list.
        assert_eq!(mesh.group_members("CLAMPED").unwrap(), &[3, 7, 12]);
        assert_eq!(mesh.group_members("GROUP_NO NOM=CLAMPED").unwrap(), &[3, 7, 12]);
        assert!(mesh.group("MISSING").is_none());
    }

    #[test]
    fn test_groups_follow_file_order() {
        let text = "COOR_3D\nN1 0 0 0\nN2 1 0 0\nFINSF\nSEG2\nM1 N1 N2\nFINSF\n\
GROUP_NO NOM=FIRST\nN1\nFINSF\nGROUP_MA NOM=SECOND\nM1\nFINSF\n";
        let mesh = MeshBuilder::from_text(text).ingest().unwrap();
        let names: Vec<&str> = mesh.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["FIRST", "SECOND"]);
        assert_eq!(mesh.groups()[0].kind, GroupKind::Node);
        assert_eq!(mesh.groups()[1].kind, GroupKind::Element);
    }

    #[test]
    fn test_element_groups_only() {
        let options = BuildOptions::default().with_keywords(Keywords::default().element_groups_only());
        let mesh = MeshBuilder::from_text(PLATE).with_options(options).ingest().unwrap();
        assert_eq!(mesh.groups().len(), 1);
        assert_eq!(mesh.groups()[0].name, "SHELL");
    }

    #[test]
    fn test_reference_out_of_range() {
        let text = "COOR_3D\nN1 0 0 0\nN2 1 0 0\nFINSF\nSEG2\nM1 N1 N2\nM2 N2 N9\nFINSF\n";
        let err = MeshBuilder::from_text(text).ingest().unwrap_err();
        match err {
            MeshError::IndexOutOfRange { line, reference, nodes } => {
                assert_eq!(line, 7);
                assert_eq!(reference, 9);
                assert_eq!(nodes, 2);
            }
            other => panic!("expected IndexOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_format_error_names_line() {
        let text = "COOR_3D\nN1 0 0 0\nN2 1.0 zero 0\nFINSF\n";
        let err = MeshBuilder::from_text(text).ingest().unwrap_err();
        assert!(matches!(err, MeshError::Format { line: 3, .. }), "{:?}", err);
    }

    #[test]
    fn test_truncated_element_record() {
        let text = "COOR_3D\nN1 0 0 0\nN2 1 0 0\nN3 1 1 0\nN4 0 1 0\nFINSF\nQUAD4\nM4 N1 N2 N3\nFINSF\n";
        let err = MeshBuilder::from_text(text).ingest().unwrap_err();
        assert!(matches!(err, MeshError::Format { line: 8, .. }), "{:?}", err);

        let text = "COOR_3D\nN1 0 0 0\nN2 1 0 0\nN3 1 1 0\nFINSF\nTRIA3\nM2 N1 N3\nFINSF\n";
        let err = MeshBuilder::from_text(text).ingest().unwrap_err();
        assert!(matches!(err, MeshError::Format { line: 7, .. }), "{:?}", err);
    }

    #[test]
    fn test_duplicate_node_number() {
        let text = "COOR_3D\nN1 0 0 0\nN1 1 0 0\nFINSF\n";
        let err = MeshBuilder::from_text(text).ingest().unwrap_err();
        assert!(matches!(err, MeshError::Format { line: 3, .. }));
    }

    #[test]
    fn test_groups_before_combine_is_usage_error() {
        let mut builder = MeshBuilder::from_text(PLATE);
        builder.extract_nodes().unwrap();
        assert!(matches!(builder.extract_groups(), Err(MeshError::Usage(_))));
    }

    #[test]
    fn test_groups_with_no_elements_is_usage_error() {
        let text = "COOR_3D\nN1 0 0 0\nFINSF\nGROUP_NO NOM=ALL\nN1\nFINSF\n";
        let err = MeshBuilder::from_text(text).ingest().unwrap_err();
        assert!(matches!(err, MeshError::Usage(_)));
    }

    #[test]
    fn test_combine_requires_all_kinds() {
        let mut builder = MeshBuilder::from_text(PLATE);
        builder.extract_nodes().unwrap();
        builder.extract_elements_of_kind(ElementKind::Quad).unwrap();
        assert!(matches!(builder.combine_elements(), Err(MeshError::Usage(_))));
    }

    #[test]
    fn test_repeated_extraction_is_usage_error() {
        let mut builder = MeshBuilder::from_text(PLATE);
        builder.extract_nodes().unwrap();
        assert!(matches!(builder.extract_nodes(), Err(MeshError::Usage(_))));
        assert_eq!(builder.nodes().len(), 6);

        builder.extract_elements_of_kind(ElementKind::Beam).unwrap();
        assert!(builder.extract_elements_of_kind(ElementKind::Beam).is_err());
    }

    #[test]
    fn test_elements_before_nodes_is_usage_error() {
        let mut builder = MeshBuilder::from_text(PLATE);
        assert!(matches!(
            builder.extract_elements_of_kind(ElementKind::Beam),
            Err(MeshError::Usage(_))
        ));

        // The failed attempt does not count as an extraction.
        builder.extract_nodes().unwrap();
        builder.extract_elements_of_kind(ElementKind::Beam).unwrap();
    }

    #[test]
    fn test_nodes_after_combine_is_usage_error() {
        let mut builder = MeshBuilder::from_text(PLATE);
        builder.extract_nodes().unwrap();
        for kind in ElementKind::ALL {
            builder.extract_elements_of_kind(kind).unwrap();
        }
        builder.combine_elements().unwrap();
        assert!(matches!(builder.extract_nodes(), Err(MeshError::Usage(_))));
        assert_eq!(builder.nodes().len(), 6);
    }

    #[test]
    fn test_every_section_mode() {
        let text = "COOR_3D\nN1 0 0 0\nN2 1 0 0\nN3 0 1 0\nFINSF\n\
                    SEG2\nM1 N1 N2\nFINSF\nSEG2\nM2 N2 N3\nFINSF\n";
        let first = MeshBuilder::from_text(text).ingest().unwrap();
        assert_eq!(first.beams().len(), 1);

        let every = MeshBuilder::from_text(text)
            .with_options(BuildOptions::default().every_section())
            .ingest()
            .unwrap();
        assert_eq!(every.beams().len(), 2);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MeshBuilder::open(dir.path().join("missing.mail")).unwrap_err();
        assert!(matches!(err, MeshError::FileNotFound { .. }));
    }

    #[test]
    fn test_ingest_file_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plate.mail");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(PLATE.as_bytes())
            .unwrap();

        let a = MeshBuilder::open(&path).unwrap().ingest().unwrap();
        let b = MeshBuilder::open(&path).unwrap().ingest().unwrap();
        assert_eq!(a.num_nodes(), b.num_nodes());
        assert_eq!(a.num_elements(), b.num_elements());
        assert_eq!(a.groups(), b.groups());
        assert_eq!(a, b);
    }
}

//! End-to-end ingestion and classification.
//!
//! [`run`] is a pure function of its inputs: it reads the file, builds a fresh
//! snapshot, classifies every element and returns both. Nothing is cached
//! between calls.

use std::fmt;
use std::path::Path;

use log::info;

use crate::algo::{synthesize_with_progress, Classification, ClassifyOptions, FaceSynthesis, Progress};
use crate::error::Result;
use crate::kernel::GeometryKernel;
use crate::mesh::{BuildOptions, ElementKind, MeshBuilder, MeshSnapshot};

/// Options for a full pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Ingestion options.
    pub build: BuildOptions,
    /// Classification options.
    pub classify: ClassifyOptions,
}

impl PipelineOptions {
    /// Set the ingestion options.
    pub fn with_build(mut self, build: BuildOptions) -> Self {
        self.build = build;
        self
    }

    /// Set the classification options.
    pub fn with_classify(mut self, classify: ClassifyOptions) -> Self {
        self.classify = classify;
        self
    }
}

/// Ingest `path` and classify every element with `kernel`.
pub fn run<P, K>(path: P, kernel: &K, options: &PipelineOptions) -> Result<(MeshSnapshot, FaceSynthesis<K>)>
where
    P: AsRef<Path>,
    K: GeometryKernel,
{
    run_with_progress(path, kernel, options, &Progress::none())
}

/// [`run`] with progress reporting for the classification pass.
pub fn run_with_progress<P, K>(
    path: P,
    kernel: &K,
    options: &PipelineOptions,
    progress: &Progress,
) -> Result<(MeshSnapshot, FaceSynthesis<K>)>
where
    P: AsRef<Path>,
    K: GeometryKernel,
{
    let path = path.as_ref();
    let snapshot = MeshBuilder::open(path)?
        .with_options(options.build.clone())
        .ingest()?;
    info!(
        "ingested {}: {} nodes, {} elements, {} groups",
        path.display(),
        snapshot.num_nodes(),
        snapshot.num_elements(),
        snapshot.groups().len()
    );

    let synthesis = synthesize_with_progress(kernel, snapshot.elements(), &options.classify, progress)?;
    Ok((snapshot, synthesis))
}

/// Counts reported after ingestion, and after classification when one ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshSummary {
    /// Parsed nodes.
    pub nodes: usize,
    /// Quadrangles.
    pub quads: usize,
    /// Triangles.
    pub triangles: usize,
    /// Segments.
    pub beams: usize,
    /// Length of the combined element list.
    pub elements: usize,
    /// Named groups.
    pub groups: usize,
    /// Quads that took the non-planar path.
    pub non_planar: usize,
    /// Classification totals, absent before classification.
    pub synthesis: Option<SynthesisSummary>,
}

/// Classification totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisSummary {
    /// Faces produced.
    pub faces: usize,
    /// Edges produced.
    pub edges: usize,
    /// Element count per outcome, in [`Classification::ALL`] order.
    pub outcomes: Vec<(Classification, usize)>,
}

impl MeshSummary {
    /// Counts for an ingested snapshot.
    pub fn from_snapshot(mesh: &MeshSnapshot) -> Self {
        Self {
            nodes: mesh.num_nodes(),
            quads: mesh.num_of_kind(ElementKind::Quad),
            triangles: mesh.num_of_kind(ElementKind::Triangle),
            beams: mesh.num_of_kind(ElementKind::Beam),
            elements: mesh.num_elements(),
            groups: mesh.groups().len(),
            non_planar: 0,
            synthesis: None,
        }
    }

    /// Add classification totals.
    pub fn with_synthesis<K: GeometryKernel>(mut self, synthesis: &FaceSynthesis<K>) -> Self {
        self.non_planar = synthesis.non_planar;
        self.synthesis = Some(SynthesisSummary {
            faces: synthesis.faces.len(),
            edges: synthesis.edges.len(),
            outcomes: Classification::ALL
                .iter()
                .map(|&outcome| (outcome, synthesis.count(outcome)))
                .collect(),
        });
        self
    }
}

impl fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes: {}", self.nodes)?;
        writeln!(f, "Quadrangles: {}", self.quads)?;
        writeln!(f, "Triangles: {}", self.triangles)?;
        writeln!(f, "Segments: {}", self.beams)?;
        writeln!(f, "Elements: {}", self.elements)?;
        writeln!(f, "Groups: {}", self.groups)?;
        write!(f, "Non-planar quadrangles: {}", self.non_planar)?;
        if let Some(synthesis) = &self.synthesis {
            writeln!(f)?;
            writeln!(f, "Faces: {}", synthesis.faces)?;
            write!(f, "Edges: {}", synthesis.edges)?;
            for (outcome, count) in &synthesis.outcomes {
                write!(f, "\n  {}: {}", outcome.name(), count)?;
            }
        }
        Ok(())
    }
}

//! Mesh processing passes.
//!
//! - **Classification**: per-element planarity decision and face-synthesis
//!   requests against a [`GeometryKernel`](crate::kernel::GeometryKernel)
//! - **Progress**: callbacks for long-running passes

pub mod classify;
pub mod progress;

pub use classify::{
    synthesize, synthesize_with_progress, Classification, ClassifyOptions, ElementClassifier,
    FaceSynthesis, QuadFallback,
};
pub use progress::Progress;

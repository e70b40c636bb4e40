//! Error types for mailmesh.
//!
//! This module defines the fatal error types raised while ingesting a mesh.
//! Geometry kernel failures are not part of this taxonomy: they are absorbed
//! per element by the classifier (see [`crate::kernel::KernelError`]).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while ingesting or classifying a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh source does not exist.
    #[error("mesh file not found: {}", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A captured line could not be decoded into the expected record.
    #[error("line {line}: {message}")]
    Format {
        /// 1-based line number in the source.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// A connectivity record references a node that was never parsed.
    #[error("line {line}: node reference {reference} does not resolve ({nodes} nodes parsed)")]
    IndexOutOfRange {
        /// 1-based line number in the source.
        line: usize,
        /// The node number as written in the file.
        reference: u64,
        /// Number of nodes parsed when the reference was resolved.
        nodes: usize,
    },

    /// An operation was requested in the wrong order or on an unbuilt mesh.
    #[error("usage error: {0}")]
    Usage(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a format error for the given source line.
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        MeshError::Format {
            line,
            message: message.into(),
        }
    }

    /// Create a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        MeshError::Usage(message.into())
    }
}

/// Check that a tolerance is finite and non-negative.
pub(crate) fn check_tolerance(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(MeshError::invalid_param(
            name,
            value,
            "must be finite and non-negative",
        ));
    }
    Ok(())
}

//! Error types for flowdag operations.
//!
//! Graph construction raises [`Error::InvalidArgument`] and
//! [`Error::Reference`] from the store operations; the build pipeline wraps
//! either one in [`Error::BuildFailed`] so callers see a single failure
//! signal. Rejected self-loops and duplicate edges are not errors, see
//! [`crate::domain::StructuralWarning`].

use std::io;
use thiserror::Error;

/// The error type for flowdag operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input shape or an empty node ID.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An edge endpoint or traversal start that is not a known node.
    #[error("Reference error: {0}")]
    Reference(String),

    /// Graph population failed; the graph may be partially populated.
    #[error("Graph build failed: {0}")]
    BuildFailed(#[source] Box<Error>),

    /// An operation that requires an acyclic graph found a cycle.
    #[error("Graph contains a cycle")]
    CycleDetected,

    /// The source provider has no document with this ID.
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// No stored graph exists for this document version.
    #[error("No graph stored for document '{document}' at version '{version}'")]
    GraphNotFound {
        /// Document ID
        document: String,
        /// Document version
        version: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSONL graph store failed.
    #[error("Store error: {0}")]
    Jsonl(#[from] flowdag_jsonl::Error),
}

impl Error {
    /// The error a failed build wraps, or `self` for any other error.
    #[must_use]
    pub fn root(&self) -> &Error {
        match self {
            Self::BuildFailed(inner) => inner.root(),
            other => other,
        }
    }
}

/// A specialized Result type for flowdag operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Persistence for built graphs.
//!
//! Graphs are keyed by `(document ID, version)`. A stored graph is the
//! serialized node and edge lists; loading re-runs the build pipeline over
//! them to get a live [`Graph`] back, which is a no-op for the cycle pass
//! since only acyclic graphs are ever saved.
//!
//! Two backends:
//!
//! - [`JsonlGraphStore`]: one JSONL file per key under a root directory
//! - [`InMemoryGraphStore`]: a shared map, for tests and throwaway runs
//!
//! Concurrent builds of the same key are last-writer-wins. File writes are
//! atomic, so a reader never sees a half-written graph.

use crate::domain::NodeId;
use crate::error::{Error, Result};
use crate::graph::Graph;
use async_trait::async_trait;
use std::fmt;

pub mod jsonl;
pub mod memory;

pub use jsonl::JsonlGraphStore;
pub use memory::InMemoryGraphStore;

/// Storage backend for built graphs.
///
/// Implementations must be `Send + Sync` so an `Arc<dyn GraphStore>` can be
/// shared across tasks.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Load the graph stored under `(document_id, version)`.
    ///
    /// Returns `Ok(None)` if nothing is stored under that key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unusable key and a backend
    /// error if the stored data cannot be read.
    async fn load(&self, document_id: &str, version: &str) -> Result<Option<StoredGraph>>;

    /// Store `graph` under `(document_id, version)`, replacing any previous
    /// graph with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unusable key and a backend
    /// error if the write fails.
    async fn save(&self, document_id: &str, version: &str, graph: &Graph) -> Result<()>;
}

/// A graph loaded from a store.
#[derive(Debug, Clone)]
pub struct StoredGraph {
    /// The rebuilt graph
    pub graph: Graph,

    /// Version the graph was stored under
    pub version: String,

    /// Problems skipped over while loading
    pub warnings: Vec<LoadWarning>,
}

/// Non-fatal problems found while loading a stored graph.
///
/// The affected record is skipped and the rest of the graph is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A line that did not decode as a graph record
    MalformedRecord {
        /// 1-based line number
        line_number: usize,
        /// Decode error
        error: String,
    },

    /// An edge whose endpoint node is missing from the stored data
    ///
    /// Usually the result of the node's own line being malformed.
    OrphanedEdge {
        /// Source node ID
        source: NodeId,
        /// Target node ID
        target: NodeId,
    },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRecord { line_number, error } => {
                write!(f, "line {line_number}: malformed record: {error}")
            }
            Self::OrphanedEdge { source, target } => {
                write!(f, "edge '{source}' -> '{target}' references a missing node")
            }
        }
    }
}

/// Check that a document ID or version can be used as part of a store key.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `value` is empty or contains a path
/// separator or `..`.
pub fn validate_key_part(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidArgument(format!("{what} is required")));
    }
    if value.contains(['/', '\\']) || value.contains("..") {
        return Err(Error::InvalidArgument(format!(
            "{what} '{value}' must not contain path separators"
        )));
    }
    Ok(())
}

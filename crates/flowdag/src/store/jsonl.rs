//! File-backed graph store.
//!
//! Layout under the root directory:
//!
//! ```text
//! graphs/{document_id}-{version}.jsonl
//! ```
//!
//! Each line is one [`GraphRecord`]: all nodes first, then all edges, both
//! in graph order.
//!
//! ```text
//! {"kind":"node","id":"1:2","data":{"label":"Home","type":"FRAME"}}
//! {"kind":"edge","sourceId":"1:2","targetId":"1:3","data":{"triggerType":"ON_CLICK"}}
//! ```

use super::{GraphStore, LoadWarning, StoredGraph, validate_key_part};
use crate::domain::{Edge, GraphSnapshot, Node, NodeId};
use crate::error::Result;
use crate::graph::Graph;
use async_trait::async_trait;
use flowdag_jsonl::{
    Warning as JsonlWarning, read_jsonl_resilient_numbered, write_jsonl_atomic_iter,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directory under the store root holding the graph files.
pub const GRAPHS_DIR: &str = "graphs";

/// One line of a stored graph file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GraphRecord {
    /// A node
    Node(Node),
    /// An edge
    Edge(Edge),
}

/// Graph store writing one JSONL file per `(document, version)`.
#[derive(Debug, Clone)]
pub struct JsonlGraphStore {
    root: PathBuf,
}

impl JsonlGraphStore {
    /// Store rooted at `root`. Directories are created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The store root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file for `(document_id, version)`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] for an unusable key.
    pub fn graph_path(&self, document_id: &str, version: &str) -> Result<PathBuf> {
        validate_key_part("document ID", document_id)?;
        validate_key_part("version", version)?;
        Ok(self
            .root
            .join(GRAPHS_DIR)
            .join(format!("{document_id}-{version}.jsonl")))
    }
}

/// Split loaded records into a snapshot.
///
/// Nodes with an empty ID are skipped as malformed, and edges whose
/// endpoints did not load are dropped, so the snapshot always rebuilds.
fn assemble(
    records: Vec<(usize, GraphRecord)>,
    warnings: &mut Vec<LoadWarning>,
) -> GraphSnapshot {
    let mut snapshot = GraphSnapshot::default();
    let mut edges = Vec::new();
    for (line_number, record) in records {
        match record {
            GraphRecord::Node(node) if node.id.is_empty() => {
                warnings.push(LoadWarning::MalformedRecord {
                    line_number,
                    error: "node ID is empty".to_string(),
                });
            }
            GraphRecord::Node(node) => snapshot.nodes.push(node),
            GraphRecord::Edge(edge) => edges.push(edge),
        }
    }

    let known: HashSet<&NodeId> = snapshot.nodes.iter().map(|n| &n.id).collect();
    let (kept, orphaned): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .partition(|e| known.contains(&e.source_id) && known.contains(&e.target_id));

    warnings.extend(orphaned.into_iter().map(|e| LoadWarning::OrphanedEdge {
        source: e.source_id,
        target: e.target_id,
    }));
    snapshot.edges = kept;
    snapshot
}

#[async_trait]
impl GraphStore for JsonlGraphStore {
    async fn load(&self, document_id: &str, version: &str) -> Result<Option<StoredGraph>> {
        let path = self.graph_path(document_id, version)?;
        if !tokio::fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "no stored graph");
            return Ok(None);
        }

        let (records, jsonl_warnings) =
            read_jsonl_resilient_numbered::<GraphRecord, _>(&path).await?;

        let mut warnings: Vec<LoadWarning> = jsonl_warnings
            .into_iter()
            .map(|warning| match warning {
                JsonlWarning::MalformedJson { line_number, error } => {
                    LoadWarning::MalformedRecord { line_number, error }
                }
                JsonlWarning::SkippedLine {
                    line_number,
                    reason,
                } => LoadWarning::MalformedRecord {
                    line_number,
                    error: reason,
                },
            })
            .collect();

        let snapshot = assemble(records, &mut warnings);
        for warning in &warnings {
            tracing::warn!(path = %path.display(), "{warning}");
        }

        let (graph, _) = Graph::from_snapshot(snapshot, false)?;
        tracing::info!(
            document = document_id,
            version,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "loaded stored graph"
        );

        Ok(Some(StoredGraph {
            graph,
            version: version.to_string(),
            warnings,
        }))
    }

    async fn save(&self, document_id: &str, version: &str, graph: &Graph) -> Result<()> {
        let path = self.graph_path(document_id, version)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let GraphSnapshot { nodes, edges } = graph.snapshot();
        let records = nodes
            .into_iter()
            .map(GraphRecord::Node)
            .chain(edges.into_iter().map(GraphRecord::Edge));

        write_jsonl_atomic_iter(&path, records).await?;
        tracing::info!(
            document = document_id,
            version,
            path = %path.display(),
            "saved graph"
        );
        Ok(())
    }
}

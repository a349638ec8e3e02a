//! The ingestion pipeline.
//!
//! populate nodes -> populate edges -> detect cycles -> remove back edges
//! -> optionally build the adjacency matrix.

use super::Graph;
use crate::domain::{Edge, EdgeRecord, GraphSnapshot, NodeRecord, StructuralWarning};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a successful [`Graph::build_graph`] run did to its input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Whether the populated graph contained a cycle
    pub cycles_detected: bool,

    /// Back edges deleted to make the graph acyclic, in removal order
    pub removed_edges: Vec<Edge>,

    /// Edges rejected during population
    pub warnings: Vec<StructuralWarning>,
}

impl BuildReport {
    /// `true` if the build changed nothing about the input.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.cycles_detected && self.warnings.is_empty()
    }
}

impl Graph {
    /// Populate the graph from ingestion records and make it acyclic.
    ///
    /// Only the recognised payload fields of each record are stored. If
    /// `want_matrix` is set the adjacency matrix is built last, so it
    /// reflects the post-removal edge set.
    ///
    /// On success [`has_cycle`](Self::has_cycle) is `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BuildFailed`] wrapping the first population error
    /// (an empty node ID or an edge with a missing endpoint). The graph is
    /// left partially populated in that case; call [`clear`](Self::clear)
    /// before reusing it.
    pub fn build_graph(
        &mut self,
        nodes: &[NodeRecord],
        edges: &[EdgeRecord],
        want_matrix: bool,
    ) -> Result<BuildReport> {
        let warnings_before = self.warnings.len();

        self.populate(nodes, edges).map_err(build_failed)?;

        tracing::debug!(
            nodes = self.node_count(),
            edges = self.edge_count(),
            "graph populated"
        );

        let cycles_detected = self.has_cycle();
        let removed_edges = if cycles_detected {
            let removed = self.make_acyclic();
            tracing::warn!(
                removed = removed.len(),
                "graph contained cycles, removed back edges"
            );
            removed
        } else {
            Vec::new()
        };

        if want_matrix {
            self.build_adjacency_matrix();
        }

        Ok(BuildReport {
            cycles_detected,
            removed_edges,
            warnings: self.warnings[warnings_before..].to_vec(),
        })
    }

    fn populate(&mut self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Result<()> {
        for record in nodes {
            self.add_node(record.id.clone(), record.data())?;
        }
        for record in edges {
            self.add_edge(record.source_id.clone(), record.target_id.clone(), record.data())?;
        }
        Ok(())
    }

    /// Like [`build_graph`](Self::build_graph), for untyped input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BuildFailed`] wrapping [`Error::InvalidArgument`] if
    /// either value is not an array or holds a record that does not decode,
    /// and otherwise fails like [`build_graph`](Self::build_graph).
    pub fn build_graph_from_json(
        &mut self,
        nodes: &Value,
        edges: &Value,
        want_matrix: bool,
    ) -> Result<BuildReport> {
        let nodes: Vec<NodeRecord> = decode_records(nodes, "nodes").map_err(build_failed)?;
        let edges: Vec<EdgeRecord> = decode_records(edges, "edges").map_err(build_failed)?;
        self.build_graph(&nodes, &edges, want_matrix)
    }

    /// Rebuild a graph from a persisted snapshot by re-running the pipeline.
    ///
    /// # Errors
    ///
    /// Fails like [`build_graph`](Self::build_graph) if the snapshot is
    /// inconsistent.
    pub fn from_snapshot(snapshot: GraphSnapshot, want_matrix: bool) -> Result<(Self, BuildReport)> {
        let (nodes, edges) = snapshot.into_records();
        let mut graph = Self::new();
        let report = graph.build_graph(&nodes, &edges, want_matrix)?;
        Ok((graph, report))
    }
}

fn build_failed(e: Error) -> Error {
    tracing::error!(error = %e, "graph build failed");
    Error::BuildFailed(Box::new(e))
}

fn decode_records<T: serde::de::DeserializeOwned>(value: &Value, what: &str) -> Result<Vec<T>> {
    let Value::Array(items) = value else {
        return Err(Error::InvalidArgument(format!("{what} must be an array")));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            T::deserialize(item).map_err(|e: serde_json::Error| {
                Error::InvalidArgument(format!("{what}[{i}] is malformed: {e}"))
            })
        })
        .collect()
}

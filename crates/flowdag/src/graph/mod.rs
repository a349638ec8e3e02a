//! Directed graph engine.
//!
//! A [`Graph`] owns its nodes (unique by ID, kept in insertion order) and an
//! ordered edge sequence. Insertion enforces the structural rules:
//!
//! - both edge endpoints must already be nodes ([`Error::Reference`]),
//! - self-loops are dropped with a [`StructuralWarning`],
//! - a second edge with the same `(source, target)` pair is dropped with a
//!   [`StructuralWarning`]; the first one wins.
//!
//! Node re-insertion is a no-op, so the first payload for an ID wins.
//!
//! The algorithms live in submodules:
//!
//! - [`cycles`]: exact cycle detection and DFS back-edge removal
//! - [`traversal`]: depth-first walk, topological order, petgraph view
//! - [`matrix`]: dense 0/1 adjacency matrix
//! - [`build`]: the ingestion pipeline tying them together
//!
//! Every DFS runs on an explicit stack over an out-edge index rebuilt from
//! the edge sequence, so visitation order is node insertion order then edge
//! sequence order, and deep chains cannot overflow the call stack.
//!
//! The matrix and its index map are caches. They reflect the edge set at the
//! time [`Graph::build_adjacency_matrix`] ran and are only reset by
//! [`Graph::clear`].

pub mod build;
pub mod cycles;
pub mod matrix;
pub mod traversal;

pub use build::BuildReport;

use crate::domain::{Edge, EdgeData, GraphSnapshot, Node, NodeData, NodeId, StructuralWarning};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};

/// An in-memory directed graph with structural invariants.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Nodes in insertion order
    nodes: Vec<Node>,

    /// Node ID -> position in `nodes`
    node_map: HashMap<NodeId, usize>,

    /// Accepted edges in sequence order
    edges: Vec<Edge>,

    /// `(source, target)` pairs present in `edges`
    edge_keys: HashSet<(NodeId, NodeId)>,

    /// Matrix index map, filled by `build_adjacency_matrix`
    node_index: HashMap<NodeId, usize>,

    /// Dense adjacency matrix, `None` until `build_adjacency_matrix` runs
    adjacency: Option<Vec<Vec<u8>>>,

    /// Rejected edges since the last `clear`
    warnings: Vec<StructuralWarning>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node unless one with the same ID exists.
    ///
    /// Returns `true` if the node was inserted. An existing node keeps its
    /// original payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `id` is empty.
    pub fn add_node(&mut self, id: impl Into<NodeId>, data: NodeData) -> Result<bool> {
        let id = id.into();
        if id.is_empty() {
            return Err(Error::InvalidArgument("Node ID is required".to_string()));
        }
        if self.node_map.contains_key(&id) {
            return Ok(false);
        }

        self.node_map.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node { id, data });
        Ok(true)
    }

    /// Append an edge to the edge sequence.
    ///
    /// Returns `true` if the edge was stored. Self-loops and duplicate
    /// `(source, target)` pairs are dropped, logged, recorded in
    /// [`warnings`](Self::warnings) and reported as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reference`] if either endpoint is not a node. Nothing
    /// is stored in that case.
    pub fn add_edge(
        &mut self,
        source_id: impl Into<NodeId>,
        target_id: impl Into<NodeId>,
        data: EdgeData,
    ) -> Result<bool> {
        let source_id = source_id.into();
        let target_id = target_id.into();

        if !self.node_map.contains_key(&source_id) {
            return Err(Error::Reference(format!(
                "Source node with ID '{source_id}' does not exist."
            )));
        }
        if !self.node_map.contains_key(&target_id) {
            return Err(Error::Reference(format!(
                "Target node with ID '{target_id}' does not exist."
            )));
        }

        if source_id == target_id {
            self.reject(StructuralWarning::SelfLoop { node: source_id });
            return Ok(false);
        }

        let key = (source_id, target_id);
        if self.edge_keys.contains(&key) {
            let (source, target) = key;
            self.reject(StructuralWarning::DuplicateEdge { source, target });
            return Ok(false);
        }

        let (source_id, target_id) = key.clone();
        self.edge_keys.insert(key);
        self.edges.push(Edge {
            source_id,
            target_id,
            data,
        });
        Ok(true)
    }

    fn reject(&mut self, warning: StructuralWarning) {
        tracing::warn!(kind = warning.kind(), "{warning}");
        self.warnings.push(warning);
    }

    /// Nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in sequence order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by ID.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_map.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Whether a node with this ID exists.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Whether the edge `source -> target` is stored.
    #[must_use]
    pub fn has_edge(&self, source: &NodeId, target: &NodeId) -> bool {
        self.edge_keys.contains(&(source.clone(), target.clone()))
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges rejected since the graph was created or last cleared.
    #[must_use]
    pub fn warnings(&self) -> &[StructuralWarning] {
        &self.warnings
    }

    /// Copy the nodes and edges into a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Reset nodes, edges, matrix, index map and warnings.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.node_map.clear();
        self.edges.clear();
        self.edge_keys.clear();
        self.node_index.clear();
        self.adjacency = None;
        self.warnings.clear();
    }

    /// For every node position, its outgoing `(edge position, target position)`
    /// pairs in edge sequence order.
    fn out_edges(&self) -> Vec<Vec<(usize, usize)>> {
        let mut out = vec![Vec::new(); self.nodes.len()];
        for (edge_pos, edge) in self.edges.iter().enumerate() {
            let source = self.node_map[&edge.source_id];
            let target = self.node_map[&edge.target_id];
            out[source].push((edge_pos, target));
        }
        out
    }

    /// Position of `id` in insertion order.
    fn position(&self, id: &NodeId) -> Option<usize> {
        self.node_map.get(id).copied()
    }
}

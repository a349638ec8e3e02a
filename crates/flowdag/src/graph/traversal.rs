//! Read-only walks over the graph.

use super::Graph;
use crate::domain::NodeId;
use crate::error::{Error, Result};
use petgraph::algo;
use petgraph::graph::DiGraph;

impl Graph {
    /// Depth-first pre-order from `start`, following edge direction.
    ///
    /// Uses an explicit stack. Successors are pushed in reverse edge order
    /// so they are popped, and therefore explored, in edge sequence order.
    /// Nodes not reachable from `start` are not returned; each reachable
    /// node appears exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reference`] if `start` is not a node.
    pub fn depth_first_from(&self, start: &NodeId) -> Result<Vec<NodeId>> {
        let start = self
            .position(start)
            .ok_or_else(|| Error::Reference(format!("Node with ID '{start}' does not exist.")))?;

        let out_edges = self.out_edges();
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            order.push(self.nodes[node].id.clone());

            for &(_, target) in out_edges[node].iter().rev() {
                if !visited[target] {
                    stack.push(target);
                }
            }
        }

        Ok(order)
    }

    /// A petgraph view of the graph.
    ///
    /// Node indices follow insertion order and edges are added in sequence
    /// order. Payloads are not carried over.
    #[must_use]
    pub fn to_petgraph(&self) -> DiGraph<NodeId, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: Vec<_> = self
            .nodes
            .iter()
            .map(|node| graph.add_node(node.id.clone()))
            .collect();
        for edge in &self.edges {
            let source = indices[self.node_map[&edge.source_id]];
            let target = indices[self.node_map[&edge.target_id]];
            graph.add_edge(source, target, ());
        }
        graph
    }

    /// Node IDs ordered so every edge points forward.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the graph is not acyclic.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let graph = self.to_petgraph();
        let order = algo::toposort(&graph, None).map_err(|cycle| {
            tracing::debug!(node = %graph[cycle.node_id()], "topological sort hit a cycle");
            Error::CycleDetected
        })?;
        Ok(order.into_iter().map(|idx| graph[idx].clone()).collect())
    }
}

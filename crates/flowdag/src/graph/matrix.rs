//! Dense adjacency matrix.

use super::Graph;
use crate::domain::NodeId;

impl Graph {
    /// Build the N x N 0/1 matrix from the current edge set.
    ///
    /// Row and column `i` belong to the `i`-th node in insertion order. The
    /// matrix is a snapshot: later edge changes are not reflected until this
    /// is called again.
    pub fn build_adjacency_matrix(&mut self) {
        let size = self.nodes.len();

        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
        let mut matrix = vec![vec![0; size]; size];
        for edge in &self.edges {
            let source = self.node_index[&edge.source_id];
            let target = self.node_index[&edge.target_id];
            matrix[source][target] = 1;
        }
        self.adjacency = Some(matrix);

        tracing::debug!(size, edges = self.edges.len(), "built adjacency matrix");
    }

    /// Matrix rows, empty until [`build_adjacency_matrix`](Self::build_adjacency_matrix) runs.
    #[must_use]
    pub fn adjacency_matrix(&self) -> &[Vec<u8>] {
        self.adjacency.as_deref().unwrap_or_default()
    }

    /// Whether a matrix has been built since the last clear.
    #[must_use]
    pub fn has_adjacency_matrix(&self) -> bool {
        self.adjacency.is_some()
    }

    /// Row/column index of `id` in the built matrix.
    #[must_use]
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.node_index.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{EdgeData, NodeData};
    use crate::graph::Graph;

    fn chain() -> Graph {
        let mut graph = Graph::new();
        for id in ["1", "2", "3"] {
            graph.add_node(id, NodeData::default()).unwrap();
        }
        graph.add_edge("1", "2", EdgeData::default()).unwrap();
        graph.add_edge("2", "3", EdgeData::default()).unwrap();
        graph
    }

    #[test]
    fn chain_matrix() {
        let mut graph = chain();
        graph.build_adjacency_matrix();
        assert_eq!(
            graph.adjacency_matrix(),
            &[vec![0u8, 1, 0], vec![0, 0, 1], vec![0, 0, 0]]
        );
        assert_eq!(graph.index_of(&"3".into()), Some(2));
    }

    #[test]
    fn matrix_is_not_kept_in_sync() {
        let mut graph = chain();
        graph.build_adjacency_matrix();
        graph.add_edge("1", "3", EdgeData::default()).unwrap();
        assert_eq!(graph.adjacency_matrix()[0][2], 0);

        graph.build_adjacency_matrix();
        assert_eq!(graph.adjacency_matrix()[0][2], 1);
    }

    #[test]
    fn no_matrix_until_built() {
        let graph = chain();
        assert!(!graph.has_adjacency_matrix());
        assert!(graph.adjacency_matrix().is_empty());
        assert_eq!(graph.index_of(&"1".into()), None);
    }

    #[test]
    fn empty_graph_has_an_empty_matrix_once_built() {
        let mut graph = Graph::new();
        graph.build_adjacency_matrix();
        assert!(graph.has_adjacency_matrix());
        assert!(graph.adjacency_matrix().is_empty());

        graph.clear();
        assert!(!graph.has_adjacency_matrix());
    }
}

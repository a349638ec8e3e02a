//! Cycle detection and removal.
//!
//! Both passes run a multi-source DFS in node insertion order with two
//! per-run sets:
//!
//! - `visited`: nodes whose exploration has started. Shared across all
//!   sources and never reset, so each node is expanded at most once.
//! - `on_stack`: nodes on the active DFS path.
//!
//! An edge into an `on_stack` node is a back edge. Every directed cycle
//! contains at least one back edge relative to any DFS forest covering it,
//! so finding none proves the graph acyclic, and deleting all of them leaves
//! it acyclic. Which edge of a cycle gets cut depends only on node insertion
//! order and edge sequence order: deterministic for a fixed input, but not a
//! minimum cut.

use super::Graph;
use crate::domain::Edge;

/// One DFS stack entry: a node and the next out-edge to look at.
struct Frame {
    node: usize,
    cursor: usize,
}

/// Walk the graph depth-first and hand every back edge to `on_back_edge`.
///
/// `on_back_edge` returns `true` to stop the walk early. Returns whether the
/// walk was stopped.
fn walk_back_edges(
    out_edges: &[Vec<(usize, usize)>],
    mut on_back_edge: impl FnMut(usize) -> bool,
) -> bool {
    let node_count = out_edges.len();
    let mut visited = vec![false; node_count];
    let mut on_stack = vec![false; node_count];
    let mut frames: Vec<Frame> = Vec::new();

    for root in 0..node_count {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        on_stack[root] = true;
        frames.push(Frame {
            node: root,
            cursor: 0,
        });

        while let Some(frame) = frames.last_mut() {
            let Some(&(edge, target)) = out_edges[frame.node].get(frame.cursor) else {
                on_stack[frame.node] = false;
                frames.pop();
                continue;
            };
            frame.cursor += 1;

            if on_stack[target] {
                if on_back_edge(edge) {
                    return true;
                }
            } else if !visited[target] {
                visited[target] = true;
                on_stack[target] = true;
                frames.push(Frame {
                    node: target,
                    cursor: 0,
                });
            }
        }
    }

    false
}

impl Graph {
    /// Returns `true` if the graph contains any directed cycle.
    ///
    /// Exact for the whole graph, not only for what is reachable from the
    /// first node. Stops at the first back edge.
    #[must_use]
    pub fn has_cycle(&self) -> bool {
        walk_back_edges(&self.out_edges(), |_| true)
    }

    /// Delete every DFS back edge so the graph becomes acyclic.
    ///
    /// Nodes are never touched. Returns the removed edges in the order they
    /// were found. Afterwards [`has_cycle`](Self::has_cycle) is `false`.
    pub fn make_acyclic(&mut self) -> Vec<Edge> {
        let mut back_edges = Vec::new();
        walk_back_edges(&self.out_edges(), |edge| {
            back_edges.push(edge);
            false
        });

        if back_edges.is_empty() {
            return Vec::new();
        }

        let mut slots: Vec<Option<Edge>> = std::mem::take(&mut self.edges)
            .into_iter()
            .map(Some)
            .collect();
        let removed: Vec<Edge> = back_edges
            .iter()
            .filter_map(|&pos| slots[pos].take())
            .collect();
        self.edges = slots.into_iter().flatten().collect();

        for edge in &removed {
            self.edge_keys
                .remove(&(edge.source_id.clone(), edge.target_id.clone()));
            tracing::debug!(
                source = %edge.source_id,
                target = %edge.target_id,
                "removed back edge"
            );
        }

        debug_assert!(!self.has_cycle(), "back-edge removal left a cycle");
        removed
    }
}

//! Shared helpers for flowdag integration tests.

#![allow(dead_code)]

use flowdag::domain::{EdgeRecord, NodeRecord};
use flowdag::graph::Graph;
use std::collections::{BTreeSet, HashMap};

/// Node records with the given IDs and no payload.
pub fn nodes(ids: &[&str]) -> Vec<NodeRecord> {
    ids.iter().map(|id| NodeRecord::new(*id)).collect()
}

/// Edge records for the given pairs and no payload.
pub fn edges(pairs: &[(&str, &str)]) -> Vec<EdgeRecord> {
    pairs.iter().map(|(s, t)| EdgeRecord::new(*s, *t)).collect()
}

/// `(source, target)` pairs of the stored edges, in order.
pub fn edge_pairs(graph: &Graph) -> Vec<(String, String)> {
    graph
        .edges()
        .iter()
        .map(|e| (e.source_id.to_string(), e.target_id.to_string()))
        .collect()
}

/// Nodes reachable from `start` (inclusive), computed with a plain BFS over
/// the stored edges.
pub fn reachable(graph: &Graph, start: &str) -> BTreeSet<String> {
    let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in graph.edges() {
        successors
            .entry(edge.source_id.as_str())
            .or_default()
            .push(edge.target_id.as_str());
    }

    let mut seen = BTreeSet::from([start.to_string()]);
    let mut queue = std::collections::VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for next in successors.get(node).into_iter().flatten() {
            if seen.insert((*next).to_string()) {
                queue.push_back(next);
            }
        }
    }
    seen
}

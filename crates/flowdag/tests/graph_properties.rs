//! Property tests for the graph engine invariants.

use flowdag::Error;
use flowdag::domain::{EdgeData, EdgeRecord, NodeData, NodeRecord};
use flowdag::graph::Graph;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

mod common;
use common::reachable;

/// A node count and edge list over node indices `0..n`. Self-loops and
/// duplicates are generated on purpose.
fn arb_graph_input() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..16).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..60)))
}

fn records(n: usize, pairs: &[(usize, usize)]) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let nodes = (0..n).map(|i| NodeRecord::new(format!("n{i}"))).collect();
    let edges = pairs
        .iter()
        .map(|(s, t)| EdgeRecord::new(format!("n{s}"), format!("n{t}")))
        .collect();
    (nodes, edges)
}

fn built(n: usize, pairs: &[(usize, usize)], want_matrix: bool) -> Graph {
    let (nodes, edges) = records(n, pairs);
    let mut graph = Graph::new();
    graph
        .build_graph(&nodes, &edges, want_matrix)
        .expect("generated input is always consistent");
    graph
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn built_graph_is_acyclic((n, pairs) in arb_graph_input()) {
        let graph = built(n, &pairs, false);
        prop_assert!(!graph.has_cycle());
        prop_assert!(!petgraph::algo::is_cyclic_directed(&graph.to_petgraph()));
    }

    #[test]
    fn has_cycle_agrees_with_petgraph((n, pairs) in arb_graph_input()) {
        let mut graph = Graph::new();
        for i in 0..n {
            graph.add_node(format!("n{i}"), NodeData::default()).unwrap();
        }
        for (s, t) in &pairs {
            graph.add_edge(format!("n{s}"), format!("n{t}"), EdgeData::default()).unwrap();
        }
        prop_assert_eq!(
            graph.has_cycle(),
            petgraph::algo::is_cyclic_directed(&graph.to_petgraph())
        );
    }

    #[test]
    fn only_removed_edges_are_missing((n, pairs) in arb_graph_input()) {
        let mut populated = Graph::new();
        for i in 0..n {
            populated.add_node(format!("n{i}"), NodeData::default()).unwrap();
        }
        for (s, t) in &pairs {
            populated.add_edge(format!("n{s}"), format!("n{t}"), EdgeData::default()).unwrap();
        }
        let before = populated.edge_count();

        let mut graph = populated.clone();
        let removed = graph.make_acyclic();

        prop_assert_eq!(graph.edge_count() + removed.len(), before);
        prop_assert_eq!(graph.node_count(), n);
        for edge in &removed {
            prop_assert!(!graph.has_edge(&edge.source_id, &edge.target_id));
        }
    }

    #[test]
    fn no_self_loops_or_duplicates((n, pairs) in arb_graph_input()) {
        let graph = built(n, &pairs, false);
        let mut seen = HashSet::new();
        for edge in graph.edges() {
            prop_assert_ne!(&edge.source_id, &edge.target_id);
            prop_assert!(seen.insert(edge.endpoints()));
        }
    }

    #[test]
    fn matrix_matches_edges((n, pairs) in arb_graph_input()) {
        let graph = built(n, &pairs, true);
        let matrix = graph.adjacency_matrix();
        prop_assert_eq!(matrix.len(), n);

        for a in graph.nodes() {
            for b in graph.nodes() {
                let i = graph.index_of(&a.id).unwrap();
                let j = graph.index_of(&b.id).unwrap();
                let expected = u8::from(graph.has_edge(&a.id, &b.id));
                prop_assert_eq!(matrix[i][j], expected);
            }
        }
    }

    #[test]
    fn dfs_returns_reachable_set_once((n, pairs) in arb_graph_input(), start in 0usize..16) {
        let graph = built(n, &pairs, false);
        let start = format!("n{}", start % n);

        let order = graph.depth_first_from(&start.as_str().into()).unwrap();
        let visited: BTreeSet<String> = order.iter().map(ToString::to_string).collect();

        prop_assert_eq!(visited.len(), order.len());
        prop_assert_eq!(order[0].as_str(), start.as_str());
        prop_assert_eq!(visited, reachable(&graph, &start));
    }

    #[test]
    fn readding_a_node_changes_nothing((n, pairs) in arb_graph_input(), pick in 0usize..16) {
        let mut graph = built(n, &pairs, false);
        let id = format!("n{}", pick % n);
        let before = graph.snapshot();

        let replacement = NodeData { label: Some("replacement".into()), ..NodeData::default() };
        prop_assert!(!graph.add_node(id, replacement).unwrap());
        prop_assert_eq!(graph.snapshot(), before);
    }

    #[test]
    fn dangling_edge_adds_nothing((n, pairs) in arb_graph_input()) {
        let mut graph = built(n, &pairs, false);
        let before = graph.snapshot();
        let warnings = graph.warnings().len();

        let err = graph.add_edge("n0", "missing", EdgeData::default()).unwrap_err();
        prop_assert!(matches!(err, Error::Reference(_)));
        prop_assert_eq!(graph.snapshot(), before);
        prop_assert_eq!(graph.warnings().len(), warnings);
    }
}

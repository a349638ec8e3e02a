//! Integration tests for the file-backed graph store.

use flowdag::Error;
use flowdag::domain::{EdgeData, NodeData, NodeId};
use flowdag::graph::Graph;
use flowdag::store::{GraphStore, JsonlGraphStore, LoadWarning};
use tempfile::TempDir;

mod common;
use common::{edge_pairs, edges, nodes};

fn flow() -> Graph {
    let mut graph = Graph::new();
    graph
        .add_node(
            "1:1",
            NodeData {
                label: Some("Home".into()),
                node_type: Some("FRAME".into()),
                image: None,
            },
        )
        .unwrap();
    graph.add_node("1:2", NodeData::default()).unwrap();
    graph.add_node("1:3", NodeData::default()).unwrap();
    graph
        .add_edge(
            "1:1",
            "1:2",
            EdgeData {
                trigger_type: Some("ON_CLICK".into()),
                label: Some("Click on Login".into()),
                ..EdgeData::default()
            },
        )
        .unwrap();
    graph.add_edge("1:2", "1:3", EdgeData::default()).unwrap();
    graph
}

#[tokio::test]
async fn save_then_load_preserves_order_and_payloads() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());
    let graph = flow();

    store.save("checkout", "v1", &graph).await.unwrap();
    let stored = store.load("checkout", "v1").await.unwrap().unwrap();

    assert_eq!(stored.version, "v1");
    assert!(stored.warnings.is_empty());
    assert_eq!(stored.graph.snapshot(), graph.snapshot());
}

#[tokio::test]
async fn file_lists_nodes_before_edges() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());
    store.save("checkout", "v1", &flow()).await.unwrap();

    let path = store.graph_path("checkout", "v1").unwrap();
    assert!(path.starts_with(dir.path().join("graphs")));
    let content = std::fs::read_to_string(path).unwrap();
    let kinds: Vec<&str> = content
        .lines()
        .map(|line| {
            if line.starts_with(r#"{"kind":"node""#) {
                "node"
            } else {
                "edge"
            }
        })
        .collect();
    assert_eq!(kinds, ["node", "node", "node", "edge", "edge"]);
}

#[tokio::test]
async fn missing_version_loads_as_none() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());
    store.save("checkout", "v1", &flow()).await.unwrap();

    assert!(store.load("checkout", "v2").await.unwrap().is_none());
    assert!(store.load("other", "v1").await.unwrap().is_none());
}

#[tokio::test]
async fn saving_again_replaces_the_file() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());
    store.save("doc", "v1", &flow()).await.unwrap();

    let mut smaller = Graph::new();
    smaller
        .build_graph(&nodes(&["x", "y"]), &edges(&[("x", "y")]), false)
        .unwrap();
    store.save("doc", "v1", &smaller).await.unwrap();

    let stored = store.load("doc", "v1").await.unwrap().unwrap();
    assert_eq!(stored.graph.node_count(), 2);
    assert_eq!(edge_pairs(&stored.graph), vec![("x".to_string(), "y".to_string())]);
}

#[tokio::test]
async fn corrupt_lines_are_skipped_with_warnings() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());
    store.save("doc", "v1", &flow()).await.unwrap();

    let path = store.graph_path("doc", "v1").unwrap();
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("{not json\n");
    content.push_str(r#"{"kind":"widget","id":"w"}"#);
    content.push('\n');
    std::fs::write(&path, content).unwrap();

    let stored = store.load("doc", "v1").await.unwrap().unwrap();
    assert_eq!(stored.graph.snapshot(), flow().snapshot());

    let lines: Vec<usize> = stored
        .warnings
        .iter()
        .map(|w| match w {
            LoadWarning::MalformedRecord { line_number, .. } => *line_number,
            other => panic!("unexpected warning {other:?}"),
        })
        .collect();
    assert_eq!(lines, [6, 7]);
}

#[tokio::test]
async fn edges_of_a_lost_node_are_dropped() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());
    store.save("doc", "v1", &flow()).await.unwrap();

    // corrupt the "1:3" node line so only its edge remains
    let path = store.graph_path("doc", "v1").unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let damaged: Vec<&str> = content
        .lines()
        .map(|line| {
            if line.contains(r#""id":"1:3""#) {
                "{\"kind\":\"node\""
            } else {
                line
            }
        })
        .collect();
    std::fs::write(&path, damaged.join("\n")).unwrap();

    let stored = store.load("doc", "v1").await.unwrap().unwrap();
    assert_eq!(stored.graph.node_count(), 2);
    assert_eq!(edge_pairs(&stored.graph), vec![("1:1".to_string(), "1:2".to_string())]);
    assert!(stored.warnings.contains(&LoadWarning::OrphanedEdge {
        source: NodeId::new("1:2"),
        target: NodeId::new("1:3"),
    }));
    assert_eq!(stored.warnings.len(), 2);
}

#[tokio::test]
async fn node_with_empty_id_is_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());
    let path = store.graph_path("doc", "v1").unwrap();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        concat!(
            r#"{"kind":"node","id":"a"}"#, "\n",
            r#"{"kind":"node","id":""}"#, "\n",
            r#"{"kind":"node","id":"b"}"#, "\n",
            r#"{"kind":"edge","sourceId":"a","targetId":"b"}"#, "\n",
        ),
    )
    .unwrap();

    let stored = store.load("doc", "v1").await.unwrap().unwrap();
    assert_eq!(stored.graph.node_count(), 2);
    assert_eq!(edge_pairs(&stored.graph), vec![("a".to_string(), "b".to_string())]);
    assert_eq!(
        stored.warnings,
        vec![LoadWarning::MalformedRecord {
            line_number: 2,
            error: "node ID is empty".to_string(),
        }]
    );
}

#[tokio::test]
async fn path_like_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let store = JsonlGraphStore::new(dir.path());

    for (doc, version) in [("../escape", "v1"), ("doc", "a/b"), ("", "v1")] {
        let err = store.save(doc, version, &flow()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)), "{doc:?} {version:?}");
        let err = store.load(doc, version).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}

//! HTML visualization of a built graph.
//!
//! Produces a standalone page that loads Cytoscape from a CDN, draws the
//! graph on a grid layout and shows the details of the clicked node or edge
//! in a sidebar. Only the finalized nodes and edges are read.

use crate::graph::Graph;
use serde::Serialize;

const CYTOSCAPE_CDN: &str = "https://unpkg.com/cytoscape/dist/cytoscape.min.js";

/// Nodes per grid row.
const GRID_COLUMNS: usize = 4;

#[derive(Serialize)]
struct Element<T> {
    data: T,
}

#[derive(Serialize)]
struct NodeElement<'a> {
    id: &'a str,
    label: &'a str,
    image: &'a str,
}

#[derive(Serialize)]
struct EdgeElement<'a> {
    source: &'a str,
    target: &'a str,
    label: &'a str,
    action: &'a str,
    image: &'a str,
}

/// Render `graph` as a self-contained HTML page.
#[must_use]
pub fn render_html(graph: &Graph) -> String {
    let nodes: Vec<_> = graph
        .nodes()
        .iter()
        .map(|node| Element {
            data: NodeElement {
                id: node.id.as_str(),
                label: node.data.label.as_deref().unwrap_or(node.id.as_str()),
                image: node.data.image.as_deref().unwrap_or_default(),
            },
        })
        .collect();

    let edges: Vec<_> = graph
        .edges()
        .iter()
        .map(|edge| Element {
            data: EdgeElement {
                source: edge.source_id.as_str(),
                target: edge.target_id.as_str(),
                label: edge.data.label.as_deref().unwrap_or_default(),
                action: edge.data.trigger_type.as_deref().unwrap_or_default(),
                image: edge.data.image.as_deref().unwrap_or_default(),
            },
        })
        .collect();

    let rows = nodes.len().div_ceil(GRID_COLUMNS).max(1);
    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "rendering graph");

    fill_template(PAGE_TEMPLATE, |key| match key {
        "CYTOSCAPE" => Some(CYTOSCAPE_CDN.to_string()),
        "ROWS" => Some(rows.to_string()),
        "NODES" => Some(script_json(&nodes)),
        "EDGES" => Some(script_json(&edges)),
        _ => None,
    })
}

/// Substitute `{{KEY}}` placeholders in a single pass, so substituted text is
/// never scanned again. Unknown keys are left as they are.
fn fill_template(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}").and_then(|end| Some((end, lookup(&after[..end])?))) {
            Some((end, value)) => {
                out.push_str(&value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// JSON safe to embed inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> String {
    // Serializing borrowed strings into a Vec cannot fail.
    serde_json::to_string(value)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Graph Visualization</title>
  <script src="{{CYTOSCAPE}}"></script>
  <style>
    body { margin: 0; padding: 0; font-family: sans-serif; display: flex; }
    #cy { flex-grow: 1; height: 100vh; background-color: #f5f5f5; }
    .sidebar { width: 300px; background: #fafafa; padding: 20px; box-shadow: -2px 0 5px rgba(0, 0, 0, 0.1); overflow-y: auto; }
    .sidebar h2 { margin-top: 0; }
  </style>
</head>
<body>
  <div id="cy"></div>
  <div class="sidebar">
    <h2>Node/Edge Information</h2>
    <div id="details">Click on a node or edge to see details</div>
  </div>
  <script>
    const colors = ["#3498db", "#e74c3c", "#2ecc71", "#9b59b6", "#f39c12", "#1abc9c", "#e67e22", "#d35400"];

    function truncateLabel(label, maxLength = 10) {
      return label.length > maxLength ? label.slice(0, maxLength) + '...' : label;
    }

    function escapeHtml(text) {
      const div = document.createElement('div');
      div.textContent = text == null ? '' : String(text);
      return div.innerHTML;
    }

    const nodes = {{NODES}}.map((node, i) => ({
      data: { ...node.data, fullLabel: node.data.label, label: truncateLabel(node.data.label), color: colors[i % colors.length] }
    }));

    const cy = cytoscape({
      container: document.getElementById('cy'),
      elements: { nodes: nodes, edges: {{EDGES}} },
      style: [
        { selector: 'node', style: {
            'background-color': 'data(color)', 'shape': 'ellipse', 'width': '60px', 'height': '60px',
            'label': 'data(label)', 'color': '#fff', 'text-valign': 'center', 'text-halign': 'center', 'font-size': '14px' } },
        { selector: 'edge', style: {
            'label': 'data(label)', 'line-color': '#ccc', 'target-arrow-color': '#ccc',
            'target-arrow-shape': 'triangle', 'curve-style': 'bezier', 'font-size': '10px' } }
      ],
      layout: { name: 'grid', rows: {{ROWS}} }
    });

    function image(src, alt) {
      return src ? `<p><img src="${escapeHtml(src)}" alt="${alt}" /></p>` : '';
    }

    cy.on('tap', 'node', function (event) {
      const node = event.target;
      document.getElementById('details').innerHTML = `
        <h3>Node Information</h3>
        <p><strong>ID:</strong> ${escapeHtml(node.id())}</p>
        <p><strong>Label:</strong> ${escapeHtml(node.data('fullLabel'))}</p>
        ${image(node.data('image'), 'Node Image')}`;
    });

    cy.on('tap', 'edge', function (event) {
      const edge = event.target;
      document.getElementById('details').innerHTML = `
        <h3>Edge Information</h3>
        <p><strong>Source:</strong> ${escapeHtml(edge.data('source'))}</p>
        <p><strong>Target:</strong> ${escapeHtml(edge.data('target'))}</p>
        <p><strong>Label:</strong> ${escapeHtml(edge.data('label'))}</p>
        <p><strong>Action:</strong> ${escapeHtml(edge.data('action'))}</p>
        ${image(edge.data('image'), 'Edge Image')}`;
    });
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EdgeData, NodeData};

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph
            .add_node(
                "1:1",
                NodeData {
                    label: Some("Home".into()),
                    ..NodeData::default()
                },
            )
            .unwrap();
        graph.add_node("1:2", NodeData::default()).unwrap();
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
        graph
    }

    #[test]
    fn embeds_elements() {
        let html = render_html(&sample());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(CYTOSCAPE_CDN));
        assert!(html.contains(r#"{"data":{"id":"1:1","label":"Home","image":""}}"#));
        // unlabeled nodes fall back to their ID
        assert!(html.contains(r#"{"data":{"id":"1:2","label":"1:2","image":""}}"#));
        assert!(html.contains(
            r#"{"data":{"source":"1:1","target":"1:2","label":"Click on Login","action":"ON_CLICK","image":""}}"#
        ));
        assert!(html.contains("rows: 1"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn payload_cannot_close_the_script() {
        let mut graph = Graph::new();
        graph
            .add_node(
                "x",
                NodeData {
                    label: Some("</script><script>alert(1)</script>".into()),
                    ..NodeData::default()
                },
            )
            .unwrap();
        let html = render_html(&graph);
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn placeholders_in_payload_are_not_expanded() {
        let mut graph = Graph::new();
        graph.add_node("{{EDGES}}", NodeData::default()).unwrap();
        let html = render_html(&graph);
        assert!(html.contains(r#""id":"{{EDGES}}""#));
    }

    #[test]
    fn fill_leaves_unknown_keys() {
        let out = fill_template("a {{X}} b {{Y}} c {{", |k| (k == "X").then(|| "1".to_string()));
        assert_eq!(out, "a 1 b {{Y}} c {{");
    }

    #[test]
    fn empty_graph_still_renders() {
        let html = render_html(&Graph::new());
        assert!(html.contains("nodes: nodes, edges: []"));
        assert!(html.contains("const nodes = [].map"));
    }
}

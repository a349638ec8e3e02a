//! Extraction of screens and interactions from a design-tool document.
//!
//! The document is a tree of typed nodes. Frame-like nodes become graph
//! nodes. Prototype interactions on a frame or any of its descendants become
//! edges from the nearest enclosing frame to the interaction's destination.
//!
//! ```json
//! {"document": {"id": "0:0", "type": "DOCUMENT", "children": [
//!   {"id": "1:1", "name": "Home", "type": "FRAME", "children": [
//!     {"id": "1:5", "name": "Login", "type": "RECTANGLE",
//!      "interactions": [{"trigger": {"type": "ON_CLICK"},
//!                        "actions": [{"destinationId": "1:2"}]}]}
//!   ]},
//!   {"id": "1:2", "name": "Login Screen", "type": "FRAME"}
//! ]}}
//! ```
//!
//! yields nodes `1:1`, `1:2` and the edge `1:1 -> 1:2` labelled
//! `Click on Login`.

use super::SourceDocument;
use crate::domain::{EdgeRecord, NodeId, NodeRecord};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;

/// Node types that become graph nodes.
pub const INTERACTIVE_NODE_TYPES: &[&str] = &["FRAME", "COMPONENT", "COMPONENT_SET", "INSTANCE"];

/// Trigger types that become edges.
pub const INTERACTION_TYPES: &[&str] = &[
    "ON_CLICK",
    "ON_HOVER",
    "ON_PRESS",
    "ON_DRAG",
    "DRAG",
    "ON_KEY_DOWN",
    "ON_KEY_PRESS",
    "ON_SCROLL",
];

/// Tree node of a design document. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DesignNode {
    /// Node ID
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Node type, e.g. `FRAME` or `TEXT`
    #[serde(rename = "type", default)]
    pub node_type: String,

    /// Prototype interactions attached to this node
    #[serde(default)]
    pub interactions: Vec<Option<Interaction>>,

    /// Child nodes
    #[serde(default)]
    pub children: Vec<DesignNode>,
}

/// A prototype interaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Interaction {
    /// What starts the interaction
    pub trigger: Option<Trigger>,

    /// What happens
    #[serde(default)]
    pub actions: Vec<Option<Action>>,
}

/// Interaction trigger.
#[derive(Debug, Clone, Deserialize)]
pub struct Trigger {
    /// Trigger type, e.g. `ON_CLICK`
    #[serde(rename = "type")]
    pub trigger_type: String,
}

/// Interaction action. Only navigating actions carry a destination.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Action type, e.g. `NODE`
    #[serde(rename = "type")]
    pub action_type: Option<String>,

    /// Node the action navigates to
    pub destination_id: Option<String>,
}

/// Whether nodes of this type become graph nodes.
#[must_use]
pub fn is_interactive(node_type: &str) -> bool {
    INTERACTIVE_NODE_TYPES.contains(&node_type)
}

/// Human-readable verb for a trigger type.
#[must_use]
pub fn action_name(trigger_type: &str) -> &'static str {
    match trigger_type {
        "ON_CLICK" => "Click",
        "ON_HOVER" => "Hover",
        "DRAG" => "Drag",
        "ON_KEY_PRESS" => "Keypress",
        "ON_SCROLL" => "Scroll",
        _ => "Action",
    }
}

/// Parse the `document` tree of a design file and extract it.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the tree does not decode.
pub fn extract_from_value(document: &serde_json::Value) -> Result<SourceDocument> {
    let root = DesignNode::deserialize(document)
        .map_err(|e| Error::InvalidArgument(format!("malformed design document: {e}")))?;
    Ok(extract(&root))
}

/// Extract graph records from a design tree.
///
/// Nodes come out in document pre-order. An edge is only emitted when its
/// destination is itself an extracted node; interactions outside any frame
/// are ignored.
#[must_use]
pub fn extract(root: &DesignNode) -> SourceDocument {
    let mut nodes = Vec::new();
    let mut candidates = Vec::new();
    let mut stack: Vec<(&DesignNode, Option<&str>)> = vec![(root, None)];

    while let Some((node, parent_frame)) = stack.pop() {
        let frame = if is_interactive(&node.node_type) {
            nodes.push(NodeRecord {
                id: NodeId::new(node.id.as_str()),
                label: Some(node.name.clone()),
                node_type: Some(node.node_type.clone()),
                image: Some(String::new()),
            });
            Some(node.id.as_str())
        } else {
            parent_frame
        };

        if let Some(frame) = frame {
            candidates.extend(interaction_edges(frame, node));
        }

        for child in node.children.iter().rev() {
            stack.push((child, frame));
        }
    }

    let extracted: HashSet<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
    let (edges, dangling): (Vec<EdgeRecord>, Vec<EdgeRecord>) = candidates
        .into_iter()
        .partition(|e| extracted.contains(&e.target_id));

    for edge in &dangling {
        tracing::debug!(
            source = %edge.source_id,
            target = %edge.target_id,
            "interaction targets a non-frame node, skipped"
        );
    }
    tracing::debug!(nodes = nodes.len(), edges = edges.len(), "extracted design document");

    SourceDocument { nodes, edges }
}

fn interaction_edges<'a>(
    frame: &'a str,
    node: &'a DesignNode,
) -> impl Iterator<Item = EdgeRecord> + 'a {
    node.interactions
        .iter()
        .flatten()
        .filter_map(|interaction| {
            let trigger = interaction.trigger.as_ref()?;
            INTERACTION_TYPES
                .contains(&trigger.trigger_type.as_str())
                .then_some((interaction, trigger.trigger_type.as_str()))
        })
        .flat_map(move |(interaction, trigger_type)| {
            interaction.actions.iter().flatten().filter_map(move |action| {
                let destination = action.destination_id.as_deref()?;
                Some(EdgeRecord {
                    source_id: NodeId::new(frame),
                    target_id: NodeId::new(destination),
                    trigger_type: Some(trigger_type.to_string()),
                    action_type: action.action_type.clone(),
                    label: Some(format!("{} on {}", action_name(trigger_type), node.name)),
                    image: Some(String::new()),
                })
            })
        })
}

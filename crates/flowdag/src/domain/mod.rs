//! Domain types for flow graphs.
//!
//! Ingestion uses the flat [`NodeRecord`] / [`EdgeRecord`] shapes produced by
//! source providers. The engine stores them as [`Node`] / [`Edge`] with the
//! recognised payload fields split out into [`NodeData`] / [`EdgeData`];
//! that stored shape is also what gets persisted and rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a node (a screen or frame in the source document).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the ID as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty ID, which the graph rejects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Payload carried by a node. Opaque to the graph engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Source node type (e.g. `FRAME`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    /// Preview image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Payload carried by an edge. Opaque to the graph engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// Interaction trigger (e.g. `ON_CLICK`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,

    /// Action performed by the interaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Preview image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A node as stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node ID
    pub id: NodeId,

    /// Opaque payload
    #[serde(default)]
    pub data: NodeData,
}

/// A directed edge as stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Node the edge leaves
    pub source_id: NodeId,

    /// Node the edge enters
    pub target_id: NodeId,

    /// Opaque payload
    #[serde(default)]
    pub data: EdgeData,
}

impl Edge {
    /// The `(source, target)` pair identifying this edge.
    #[must_use]
    pub fn endpoints(&self) -> (&NodeId, &NodeId) {
        (&self.source_id, &self.target_id)
    }
}

/// Flat node record as supplied by a source provider.
///
/// Only `label`, `type` and `image` are carried into the graph; any other
/// fields in the input are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node ID (must be non-empty)
    pub id: NodeId,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Source node type
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,

    /// Preview image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl NodeRecord {
    /// Record with only an ID.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            node_type: None,
            image: None,
        }
    }

    /// The payload this record contributes to its node.
    #[must_use]
    pub fn data(&self) -> NodeData {
        NodeData {
            label: self.label.clone(),
            node_type: self.node_type.clone(),
            image: self.image.clone(),
        }
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        Self {
            id: node.id,
            label: node.data.label,
            node_type: node.data.node_type,
            image: node.data.image,
        }
    }
}

/// Flat edge record as supplied by a source provider.
///
/// Only `triggerType`, `actionType`, `label` and `image` are carried into
/// the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    /// Source node ID
    pub source_id: NodeId,

    /// Target node ID
    pub target_id: NodeId,

    /// Interaction trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,

    /// Action performed by the interaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Preview image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl EdgeRecord {
    /// Record with only endpoints.
    pub fn new(source_id: impl Into<NodeId>, target_id: impl Into<NodeId>) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            trigger_type: None,
            action_type: None,
            label: None,
            image: None,
        }
    }

    /// The payload this record contributes to its edge.
    #[must_use]
    pub fn data(&self) -> EdgeData {
        EdgeData {
            trigger_type: self.trigger_type.clone(),
            action_type: self.action_type.clone(),
            label: self.label.clone(),
            image: self.image.clone(),
        }
    }
}

impl From<Edge> for EdgeRecord {
    fn from(edge: Edge) -> Self {
        Self {
            source_id: edge.source_id,
            target_id: edge.target_id,
            trigger_type: edge.data.trigger_type,
            action_type: edge.data.action_type,
            label: edge.data.label,
            image: edge.data.image,
        }
    }
}

/// Serializable view of a built graph: `{ nodes: [...], edges: [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Nodes in insertion order
    pub nodes: Vec<Node>,

    /// Edges in sequence order
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    /// Flatten into ingestion records, preserving order.
    #[must_use]
    pub fn into_records(self) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
        (
            self.nodes.into_iter().map(NodeRecord::from).collect(),
            self.edges.into_iter().map(EdgeRecord::from).collect(),
        )
    }
}

/// Non-fatal diagnostic for an edge the graph refused to store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StructuralWarning {
    /// Edge from a node to itself
    SelfLoop {
        /// The node on both ends
        node: NodeId,
    },

    /// Second edge with an already stored `(source, target)` pair
    DuplicateEdge {
        /// Source node ID
        source: NodeId,
        /// Target node ID
        target: NodeId,
    },
}

impl StructuralWarning {
    /// Stable identifier for the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SelfLoop { .. } => "self_loop",
            Self::DuplicateEdge { .. } => "duplicate_edge",
        }
    }
}

impl fmt::Display for StructuralWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop { node } => {
                write!(f, "edge from '{node}' to '{node}' is a self-loop and was ignored")
            }
            Self::DuplicateEdge { source, target } => {
                write!(f, "edge from '{source}' to '{target}' already exists")
            }
        }
    }
}

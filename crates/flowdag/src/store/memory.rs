//! In-memory graph store.

use super::{GraphStore, StoredGraph, validate_key_part};
use crate::domain::GraphSnapshot;
use crate::error::Result;
use crate::graph::Graph;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

type Key = (String, String);

/// Graph store backed by a shared map. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    graphs: Arc<Mutex<HashMap<Key, GraphSnapshot>>>,
}

impl InMemoryGraphStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored graphs.
    pub async fn len(&self) -> usize {
        self.graphs.lock().await.len()
    }

    /// `true` if nothing has been saved.
    pub async fn is_empty(&self) -> bool {
        self.graphs.lock().await.is_empty()
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn load(&self, document_id: &str, version: &str) -> Result<Option<StoredGraph>> {
        validate_key_part("document ID", document_id)?;
        validate_key_part("version", version)?;

        let snapshot = {
            let graphs = self.graphs.lock().await;
            graphs
                .get(&(document_id.to_string(), version.to_string()))
                .cloned()
        };

        let Some(snapshot) = snapshot else {
            return Ok(None);
        };
        let (graph, _) = Graph::from_snapshot(snapshot, false)?;
        Ok(Some(StoredGraph {
            graph,
            version: version.to_string(),
            warnings: Vec::new(),
        }))
    }

    async fn save(&self, document_id: &str, version: &str, graph: &Graph) -> Result<()> {
        validate_key_part("document ID", document_id)?;
        validate_key_part("version", version)?;

        self.graphs.lock().await.insert(
            (document_id.to_string(), version.to_string()),
            graph.snapshot(),
        );
        tracing::debug!(document = document_id, version, "saved graph in memory");
        Ok(())
    }
}

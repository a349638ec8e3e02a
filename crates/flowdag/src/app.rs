//! Application service tying a source provider, a graph store and the
//! build pipeline together.
//!
//! # Example
//!
//! ```no_run
//! use flowdag::app::App;
//! use flowdag::config::Config;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_config(&Config::default());
//!     let outcome = app.build_dag("checkout-flow", false).await?;
//!     println!("{} ({})", outcome.message(), outcome.version);
//!     Ok(())
//! }
//! ```

use crate::config::Config;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::render::render_html;
use crate::source::{FileSourceProvider, SourceProvider, VersionedDocument};
use crate::store::{GraphStore, JsonlGraphStore};
use serde::Serialize;
use std::sync::Arc;

/// Whether a build produced a new graph or found a stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DagStatus {
    /// Built from the source and saved
    Created,
    /// Already stored for the current version
    Existing,
}

/// Result of [`App::build_dag`].
#[derive(Debug, Clone)]
pub struct DagOutcome {
    /// Created or found
    pub status: DagStatus,

    /// Source version the graph belongs to
    pub version: String,

    /// The acyclic graph
    pub graph: Graph,
}

impl DagOutcome {
    /// Human-readable status line.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self.status {
            DagStatus::Created => "DAG created successfully",
            DagStatus::Existing => "DAG already exists",
        }
    }
}

/// Builds, stores and renders graphs for source documents.
pub struct App {
    source: Arc<dyn SourceProvider>,
    store: Arc<dyn GraphStore>,
    config: Config,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("source", &"<dyn SourceProvider>")
            .field("store", &"<dyn GraphStore>")
            .field("config", &self.config)
            .finish()
    }
}

impl App {
    /// App over any provider and store.
    pub fn new(source: Arc<dyn SourceProvider>, store: Arc<dyn GraphStore>, config: Config) -> Self {
        Self {
            source,
            store,
            config,
        }
    }

    /// App reading documents from `config.source_dir` and storing graphs
    /// under `config.store_dir`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(FileSourceProvider::new(&config.source_dir)),
            Arc::new(JsonlGraphStore::new(&config.store_dir)),
            config.clone(),
        )
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the graph for the current version of `document_id`, building
    /// and saving it if the store does not have it yet.
    ///
    /// The adjacency matrix is built when `want_matrix` is set or the
    /// configuration asks for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`] for an unknown document,
    /// [`Error::BuildFailed`] if the source records are inconsistent, and
    /// store errors otherwise. Nothing is saved when the build fails.
    pub async fn build_dag(&self, document_id: &str, want_matrix: bool) -> Result<DagOutcome> {
        let want_matrix = want_matrix || self.config.build_adjacency_matrix;
        let version = self.source.version(document_id).await?;

        if let Some(stored) = self.store.load(document_id, &version).await? {
            tracing::info!(document = document_id, %version, "graph already stored");
            let mut graph = stored.graph;
            if want_matrix {
                graph.build_adjacency_matrix();
            }
            return Ok(DagOutcome {
                status: DagStatus::Existing,
                version: stored.version,
                graph,
            });
        }

        let fetched = self.source.fetch(document_id).await?;
        if fetched.version != version {
            tracing::debug!(
                document = document_id,
                checked = %version,
                fetched = %fetched.version,
                "document changed since version check"
            );
        }
        let VersionedDocument { version, document } = fetched;
        let mut graph = Graph::new();
        let report = graph.build_graph(&document.nodes, &document.edges, want_matrix)?;
        tracing::info!(
            document = document_id,
            %version,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            removed = report.removed_edges.len(),
            rejected = report.warnings.len(),
            "built graph"
        );

        self.store.save(document_id, &version, &graph).await?;
        Ok(DagOutcome {
            status: DagStatus::Created,
            version,
            graph,
        })
    }

    /// Load the stored graph for the current version of `document_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphNotFound`] if it has not been built yet.
    pub async fn stored_graph(&self, document_id: &str) -> Result<Graph> {
        let version = self.source.version(document_id).await?;
        match self.store.load(document_id, &version).await? {
            Some(stored) => Ok(stored.graph),
            None => Err(Error::GraphNotFound {
                document: document_id.to_string(),
                version,
            }),
        }
    }

    /// Render the stored graph for the current version of `document_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphNotFound`] if it has not been built yet.
    pub async fn render(&self, document_id: &str) -> Result<String> {
        let graph = self.stored_graph(document_id).await?;
        Ok(render_html(&graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EdgeRecord, NodeRecord};
    use crate::source::SourceDocument;
    use crate::store::{GraphStore, InMemoryGraphStore};
    use async_trait::async_trait;

    struct FixedSource {
        version: String,
        document: SourceDocument,
    }

    #[async_trait]
    impl SourceProvider for FixedSource {
        async fn version(&self, _document_id: &str) -> Result<String> {
            Ok(self.version.clone())
        }

        async fn fetch(&self, _document_id: &str) -> Result<VersionedDocument> {
            Ok(VersionedDocument {
                version: self.version.clone(),
                document: self.document.clone(),
            })
        }
    }

    /// Reports `checked` from `version` but has moved on to `current` by the
    /// time the content is fetched.
    struct EditedSource {
        checked: String,
        current: String,
        document: SourceDocument,
    }

    #[async_trait]
    impl SourceProvider for EditedSource {
        async fn version(&self, _document_id: &str) -> Result<String> {
            Ok(self.checked.clone())
        }

        async fn fetch(&self, _document_id: &str) -> Result<VersionedDocument> {
            Ok(VersionedDocument {
                version: self.current.clone(),
                document: self.document.clone(),
            })
        }
    }

    fn app(document: SourceDocument) -> (App, InMemoryGraphStore) {
        let store = InMemoryGraphStore::new();
        let source = FixedSource {
            version: "v1".into(),
            document,
        };
        let app = App::new(Arc::new(source), Arc::new(store.clone()), Config::default());
        (app, store)
    }

    fn cyclic() -> SourceDocument {
        SourceDocument {
            nodes: vec![NodeRecord::new("a"), NodeRecord::new("b")],
            edges: vec![EdgeRecord::new("a", "b"), EdgeRecord::new("b", "a")],
        }
    }

    #[tokio::test]
    async fn second_build_finds_existing_graph() {
        let (app, store) = app(cyclic());

        let first = app.build_dag("doc", false).await.unwrap();
        assert_eq!(first.status, DagStatus::Created);
        assert_eq!(first.message(), "DAG created successfully");
        assert_eq!(first.graph.edge_count(), 1);

        let second = app.build_dag("doc", true).await.unwrap();
        assert_eq!(second.status, DagStatus::Existing);
        assert_eq!(second.message(), "DAG already exists");
        assert_eq!(second.version, "v1");
        assert_eq!(second.graph.snapshot(), first.graph.snapshot());
        assert!(second.graph.has_adjacency_matrix());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn failed_build_saves_nothing() {
        let (app, store) = app(SourceDocument {
            nodes: vec![NodeRecord::new("a")],
            edges: vec![EdgeRecord::new("a", "missing")],
        });

        let err = app.build_dag("doc", false).await.unwrap_err();
        assert!(matches!(err, Error::BuildFailed(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn render_requires_a_stored_graph() {
        let (app, _) = app(cyclic());
        let err = app.render("doc").await.unwrap_err();
        assert!(matches!(err, Error::GraphNotFound { ref version, .. } if version == "v1"));

        app.build_dag("doc", false).await.unwrap();
        let html = app.render("doc").await.unwrap();
        assert!(html.contains(r#""source":"a","target":"b""#));
    }

    #[tokio::test]
    async fn graph_is_saved_under_the_fetched_version() {
        let store = InMemoryGraphStore::new();
        let source = EditedSource {
            checked: "old".into(),
            current: "new".into(),
            document: cyclic(),
        };
        let app = App::new(Arc::new(source), Arc::new(store.clone()), Config::default());

        let outcome = app.build_dag("doc", false).await.unwrap();
        assert_eq!(outcome.status, DagStatus::Created);
        assert_eq!(outcome.version, "new");
        assert!(store.load("doc", "new").await.unwrap().is_some());
        assert!(store.load("doc", "old").await.unwrap().is_none());
    }
}

//! Source-data providers.
//!
//! A provider turns a document ID into the flat node and edge records the
//! graph is built from, plus a version token that changes whenever the
//! document does. The version is what the store keys graphs by.

use crate::domain::{EdgeRecord, NodeRecord};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod design;
pub mod file;

pub use file::FileSourceProvider;

/// Records extracted from one source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Node records in document order
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,

    /// Edge records in document order
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// A source document and the version token of the exact content it was
/// extracted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedDocument {
    /// Version of the content below
    pub version: String,

    /// Extracted records
    pub document: SourceDocument,
}

/// Supplies source documents to the build pipeline.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Current version token of `document_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DocumentNotFound`] if the document does not
    /// exist.
    async fn version(&self, document_id: &str) -> Result<String>;

    /// Node and edge records of the current version of `document_id`,
    /// with that version. Both come from one read, so a concurrent edit
    /// cannot pair new records with an old version.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DocumentNotFound`] if the document does not
    /// exist and [`crate::Error::InvalidArgument`] if it cannot be read as a
    /// graph source.
    async fn fetch(&self, document_id: &str) -> Result<VersionedDocument>;
}

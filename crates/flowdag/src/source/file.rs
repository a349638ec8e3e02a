//! Source documents read from a local directory.

use super::{SourceDocument, SourceProvider, VersionedDocument, design};
use crate::error::{Error, Result};
use crate::store::validate_key_part;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

/// Reads `{root}/{document_id}.json`.
///
/// The file may be a flat `{"nodes": [...], "edges": [...]}` document or a
/// design-tool export with a top-level `document` tree. The version token is
/// the hex SHA-256 of the file contents.
#[derive(Debug, Clone)]
pub struct FileSourceProvider {
    root: PathBuf,
}

impl FileSourceProvider {
    /// Provider reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The source directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `document_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unusable document ID.
    pub fn document_path(&self, document_id: &str) -> Result<PathBuf> {
        validate_key_part("document ID", document_id)?;
        Ok(self.root.join(format!("{document_id}.json")))
    }

    async fn read(&self, document_id: &str) -> Result<Vec<u8>> {
        let path = self.document_path(document_id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::DocumentNotFound(document_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn content_version(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

/// Interpret a parsed source file.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the value is neither a design
/// document nor a flat node/edge document.
pub fn parse_source(value: &Value) -> Result<SourceDocument> {
    if let Some(document) = value.get("document") {
        return design::extract_from_value(document);
    }
    if value.get("nodes").is_some() || value.get("edges").is_some() {
        return SourceDocument::deserialize(value)
            .map_err(|e| Error::InvalidArgument(format!("malformed source document: {e}")));
    }
    Err(Error::InvalidArgument(
        "source document has neither a document tree nor nodes/edges".to_string(),
    ))
}

#[async_trait]
impl SourceProvider for FileSourceProvider {
    async fn version(&self, document_id: &str) -> Result<String> {
        let bytes = self.read(document_id).await?;
        Ok(content_version(&bytes))
    }

    async fn fetch(&self, document_id: &str) -> Result<VersionedDocument> {
        let bytes = self.read(document_id).await?;
        let version = content_version(&bytes);
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| Error::InvalidArgument(format!("{document_id}.json is not JSON: {e}")))?;
        let document = parse_source(&value)?;
        tracing::debug!(
            document = document_id,
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            %version,
            "fetched source document"
        );
        Ok(VersionedDocument { version, document })
    }
}

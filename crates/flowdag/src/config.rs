//! Configuration file handling.
//!
//! ```yaml
//! source-dir: designs
//! store-dir: .flowdag
//! build-adjacency-matrix: false
//! ```
//!
//! Every key is optional. Relative directories are resolved against the
//! directory containing the config file.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default name of the configuration file
pub const CONFIG_FILE_NAME: &str = "flowdag.yaml";

/// Default directory holding source documents
pub const DEFAULT_SOURCE_DIR: &str = "designs";

/// Default directory holding built graphs
pub const DEFAULT_STORE_DIR: &str = ".flowdag";

/// flowdag configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Directory the file source provider reads `{document}.json` from
    pub source_dir: PathBuf,

    /// Root directory of the JSONL graph store
    pub store_dir: PathBuf,

    /// Build the adjacency matrix for every graph unless a caller asks
    pub build_adjacency_matrix: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            store_dir: PathBuf::from(DEFAULT_STORE_DIR),
            build_adjacency_matrix: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid configuration.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        Ok(match path.parent() {
            Some(base) => config.relative_to(base),
            None => config,
        })
    }

    /// Load `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Fails like [`load`](Self::load) when the file exists.
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if fs::try_exists(path).await? {
            Self::load(path).await
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse YAML configuration. An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on invalid YAML or unknown keys.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Write a new configuration file at `path` and create the source
    /// directory it names.
    ///
    /// Returns the configuration with its directories resolved against the
    /// file's directory, as [`load`](Self::load) would.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `path` already exists and [`Error::Io`]
    /// if a directory or the file cannot be created.
    pub async fn init(&self, path: &Path) -> Result<Self> {
        if fs::try_exists(path).await? {
            return Err(Error::Config(format!("{} already exists", path.display())));
        }

        let base = path.parent().unwrap_or(Path::new(""));
        if !base.as_os_str().is_empty() {
            fs::create_dir_all(base).await?;
        }
        self.save(path).await?;

        let resolved = self.clone().relative_to(base);
        fs::create_dir_all(&resolved.source_dir).await?;
        tracing::info!(path = %path.display(), "wrote configuration");
        Ok(resolved)
    }

    /// Resolve relative directories against `base`.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.source_dir.is_relative() {
            self.source_dir = base.join(&self.source_dir);
        }
        if self.store_dir.is_relative() {
            self.store_dir = base.join(&self.store_dir);
        }
        self
    }
}

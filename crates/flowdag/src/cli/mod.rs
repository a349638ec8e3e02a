//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `init`: write a configuration file and create the source directory
//! - `build`: build (or find) the graph for the current document version
//! - `render`: write the stored graph as an HTML page
//! - `dfs`: depth-first order from a node of the stored graph
//! - `topo`: topological order of the stored graph
//!
//! # Global Flags
//!
//! - `--config <PATH>`: configuration file (default `flowdag.yaml`)
//! - `--json`: output in JSON format
//!
//! # Example
//!
//! ```bash
//! flowdag init
//! flowdag build checkout --matrix
//! flowdag render checkout -o checkout.html
//! flowdag --json dfs checkout --from 1:2
//! ```

mod args;
mod execute;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{BuildArgs, DfsArgs, InitArgs, RenderArgs, TopoArgs, validate_document_id};

/// flowdag - turn prototype flows into acyclic graphs
///
/// Reads source documents, builds a directed graph of their screens and
/// interactions, removes cycles, and stores the result per document version.
#[derive(Parser, Debug)]
#[command(name = "flowdag")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = crate::config::CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default configuration file
    ///
    /// Creates the file named by `--config` and the source directory it
    /// points at. Fails if the file already exists.
    Init(InitArgs),

    /// Build the graph for a document
    ///
    /// Reuses the stored graph when the document has not changed since the
    /// last build.
    Build(BuildArgs),

    /// Render the stored graph as HTML
    Render(RenderArgs),

    /// Depth-first order from a node
    Dfs(DfsArgs),

    /// Topological order of the stored graph
    Topo(TopoArgs),
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Execute the CLI command
    pub async fn execute(&self) -> Result<()> {
        use crate::output::OutputMode;

        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        match &self.command {
            Commands::Init(args) => execute::execute_init(&self.config, args, output_mode).await,
            Commands::Build(args) => {
                execute::execute_build(&self.app().await?, args, output_mode).await
            }
            Commands::Render(args) => {
                execute::execute_render(&self.app().await?, args, output_mode).await
            }
            Commands::Dfs(args) => execute::execute_dfs(&self.app().await?, args, output_mode).await,
            Commands::Topo(args) => {
                execute::execute_topo(&self.app().await?, args, output_mode).await
            }
        }
    }

    /// App wired from the configuration file, or defaults if it is absent.
    async fn app(&self) -> Result<crate::app::App> {
        let config = crate::config::Config::load_or_default(&self.config).await?;
        tracing::debug!(?config, "loaded configuration");
        Ok(crate::app::App::from_config(&config))
    }
}

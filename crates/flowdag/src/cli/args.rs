//! CLI argument structs for all commands.

use clap::Parser;
use std::path::PathBuf;

/// Validate a document ID at parse time.
///
/// Delegates to the store key check so the CLI and the stores agree.
pub fn validate_document_id(s: &str) -> Result<String, String> {
    let trimmed = s.trim();
    crate::store::validate_key_part("document ID", trimmed).map_err(|e| e.to_string())?;
    Ok(trimmed.to_string())
}

/// Arguments for the `init` command
#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Build the adjacency matrix for every graph by default
    #[arg(short, long)]
    pub matrix: bool,
}

/// Arguments for the `build` command
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Document to build, read from `<source-dir>/<DOCUMENT>.json`
    #[arg(value_parser = validate_document_id)]
    pub document: String,

    /// Also build the adjacency matrix
    #[arg(short, long)]
    pub matrix: bool,
}

/// Arguments for the `render` command
#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// Document whose stored graph to render
    #[arg(value_parser = validate_document_id)]
    pub document: String,

    /// Write the HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `dfs` command
#[derive(Parser, Debug, Clone)]
pub struct DfsArgs {
    /// Document whose stored graph to walk
    #[arg(value_parser = validate_document_id)]
    pub document: String,

    /// Node to start from
    #[arg(long)]
    pub from: String,
}

/// Arguments for the `topo` command
#[derive(Parser, Debug, Clone)]
pub struct TopoArgs {
    /// Document whose stored graph to order
    #[arg(value_parser = validate_document_id)]
    pub document: String,
}

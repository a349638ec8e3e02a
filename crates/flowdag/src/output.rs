//! Output formatting for CLI commands.
//!
//! Every command prints either human-readable text or JSON. Text writers
//! take any `io::Write` so they can be tested against a buffer.

use crate::app::DagOutcome;
use crate::domain::NodeId;
use colored::Colorize;
use serde::Serialize;
use serde_json::{Value, json};
use std::env;
use std::io::{self, Write};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Settings for text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Read from the environment.
    ///
    /// `NO_COLOR` (any value) or `FLOWDAG_COLOR=0|false` disables colors.
    pub fn from_env() -> Self {
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("FLOWDAG_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);
        Self { use_colors }
    }

    /// Plain output, for tests and pipes.
    #[must_use]
    pub fn plain() -> Self {
        Self { use_colors: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Green text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Yellow text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Cyan text, used for node IDs and versions.
pub fn info(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(handle, "{json}")
}

/// JSON body for a build: `{message, graph: {nodes, edges}, version}`, plus
/// `adjacencyMatrix` and `nodeIndex` when the matrix was built.
#[must_use]
pub fn build_response(outcome: &DagOutcome) -> Value {
    let mut body = json!({
        "message": outcome.message(),
        "graph": outcome.graph.snapshot(),
        "version": outcome.version,
    });
    if outcome.graph.has_adjacency_matrix() {
        let order: Vec<&NodeId> = outcome.graph.nodes().iter().map(|n| &n.id).collect();
        body["nodeIndex"] = json!(order);
        body["adjacencyMatrix"] = json!(outcome.graph.adjacency_matrix());
    }
    body
}

/// Text summary of a build.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_build_summary<W: Write>(
    w: &mut W,
    outcome: &DagOutcome,
    config: &OutputConfig,
) -> io::Result<()> {
    use crate::app::DagStatus;

    let message = match outcome.status {
        DagStatus::Created => success(outcome.message(), config),
        DagStatus::Existing => warning(outcome.message(), config),
    };
    writeln!(w, "{message}")?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Version:", config),
        info(&outcome.version, config)
    )?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Nodes:  ", config),
        outcome.graph.node_count()
    )?;
    writeln!(
        w,
        "  {} {}",
        dimmed("Edges:  ", config),
        outcome.graph.edge_count()
    )?;

    if outcome.graph.has_adjacency_matrix() {
        writeln!(w)?;
        writeln!(w, "{}", bold("Adjacency matrix", config))?;
        for (node, row) in outcome.graph.nodes().iter().zip(outcome.graph.adjacency_matrix()) {
            let cells: Vec<String> = row.iter().map(u8::to_string).collect();
            writeln!(w, "  {} {}", cells.join(" "), dimmed(node.id.as_str(), config))?;
        }
    }
    Ok(())
}

/// Numbered list of node IDs under a bold title.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_node_order<W: Write>(
    w: &mut W,
    title: &str,
    order: &[NodeId],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{} ({})", bold(title, config), order.len())?;
    let width = order.len().to_string().len();
    for (i, id) in order.iter().enumerate() {
        writeln!(w, "  {:>width$}. {}", i + 1, info(id.as_str(), config))?;
    }
    Ok(())
}

//! Command execution logic.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;

use super::args::{BuildArgs, DfsArgs, InitArgs, RenderArgs, TopoArgs};
use crate::app::App;
use crate::config::Config;
use crate::domain::NodeId;
use crate::output::{self, OutputConfig, OutputMode};

/// Execute the init command
pub async fn execute_init(path: &Path, args: &InitArgs, output_mode: OutputMode) -> Result<()> {
    let config = Config {
        build_adjacency_matrix: args.matrix,
        ..Config::default()
    };
    let resolved = config
        .init(path)
        .await
        .with_context(|| format!("failed to initialize {}", path.display()))?;

    match output_mode {
        OutputMode::Json => output::print_json(&serde_json::json!({
            "config": path.display().to_string(),
            "sourceDir": resolved.source_dir.display().to_string(),
            "storeDir": resolved.store_dir.display().to_string(),
        }))?,
        OutputMode::Text => {
            let colors = OutputConfig::from_env();
            println!(
                "{} {}",
                output::success("Initialized", &colors),
                output::info(&path.display().to_string(), &colors)
            );
            println!("  Sources: {}", resolved.source_dir.display());
            println!("  Store:   {}", resolved.store_dir.display());
        }
    }
    Ok(())
}

/// Execute the build command
pub async fn execute_build(app: &App, args: &BuildArgs, output_mode: OutputMode) -> Result<()> {
    let outcome = app
        .build_dag(&args.document, args.matrix)
        .await
        .with_context(|| format!("failed to build graph for '{}'", args.document))?;

    match output_mode {
        OutputMode::Json => output::print_json(&output::build_response(&outcome))?,
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            output::write_build_summary(&mut handle, &outcome, &OutputConfig::from_env())?;
        }
    }
    Ok(())
}

/// Execute the render command
pub async fn execute_render(app: &App, args: &RenderArgs, output_mode: OutputMode) -> Result<()> {
    let html = app.render(&args.document).await?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &html)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            match output_mode {
                OutputMode::Json => output::print_json(&serde_json::json!({
                    "document": args.document,
                    "output": path.display().to_string(),
                    "bytes": html.len(),
                }))?,
                OutputMode::Text => {
                    let config = OutputConfig::from_env();
                    println!(
                        "{} {}",
                        output::success("Wrote", &config),
                        output::info(&path.display().to_string(), &config)
                    );
                }
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(html.as_bytes())?;
        }
    }
    Ok(())
}

/// Execute the dfs command
pub async fn execute_dfs(app: &App, args: &DfsArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.stored_graph(&args.document).await?;
    let order = graph.depth_first_from(&NodeId::new(args.from.as_str()))?;
    print_order("Depth-first order", &order, output_mode)
}

/// Execute the topo command
pub async fn execute_topo(app: &App, args: &TopoArgs, output_mode: OutputMode) -> Result<()> {
    let graph = app.stored_graph(&args.document).await?;
    let order = graph.topological_order()?;
    print_order("Topological order", &order, output_mode)
}

fn print_order(title: &str, order: &[NodeId], output_mode: OutputMode) -> Result<()> {
    match output_mode {
        OutputMode::Json => output::print_json(&order)?,
        OutputMode::Text => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            output::write_node_order(&mut handle, title, order, &OutputConfig::from_env())?;
        }
    }
    Ok(())
}

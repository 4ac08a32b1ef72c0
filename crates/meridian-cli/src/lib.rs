//! Meridian CLI library
//!
//! This module contains the core CLI logic for the Meridian layout tool.

pub mod error_adapter;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;

use std::fs;

use log::{debug, info};
use serde::Deserialize;

use meridian::{
    Edge, Node, apply_layout, auto_options,
    config::{AppConfig, LayoutConfig, LayoutKind},
    recommend_layout,
};

/// Graph file layout: `{"nodes": [...], "edges": [...]}`.
#[derive(Debug, Default, Deserialize)]
struct GraphFile {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

/// Run the Meridian CLI application
///
/// This function reads the input graph, picks a layout configuration and
/// writes the resulting nodes and metadata as JSON to the output file. With
/// `--recommend` it only prints the recommended algorithm.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Malformed graph files (JSON errors)
/// - Configuration loading errors
/// - Incomplete layout configurations
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let graph: GraphFile = serde_json::from_str(&source)?;
    debug!(node_count = graph.nodes.len(), edge_count = graph.edges.len(); "Graph loaded");

    if args.recommend {
        let kind = recommend_layout(&graph.nodes, &graph.edges);
        println!("{kind}");
        return Ok(());
    }

    let layout = select_layout(args.layout, &app_config, &graph);
    let result = apply_layout(&graph.nodes, &graph.edges, &layout)?;

    let json = serde_json::to_string_pretty(&result)?;
    fs::write(&args.output, json)?;

    info!(
        output_file = args.output,
        algorithm:% = result.metadata().algorithm();
        "Layout exported successfully"
    );

    Ok(())
}

/// Resolves the layout to run.
///
/// A kind given on the command line wins; it keeps the configured options
/// when the configuration is for the same kind and is auto-tuned otherwise.
/// Without either, the graph's recommended kind is used.
fn select_layout(
    requested: Option<LayoutKind>,
    app_config: &AppConfig,
    graph: &GraphFile,
) -> LayoutConfig {
    match (requested, app_config.layout()) {
        (Some(kind), Some(configured)) if configured.kind() == kind => configured.clone(),
        (Some(kind), _) => auto_options(kind, &graph.nodes, &graph.edges),
        (None, Some(configured)) => configured.clone(),
        (None, None) => {
            let kind = recommend_layout(&graph.nodes, &graph.edges);
            info!(algorithm:% = kind; "No layout configured, using recommendation");
            if app_config.auto_tune() {
                auto_options(kind, &graph.nodes, &graph.edges)
            } else {
                LayoutConfig::default_for(kind)
            }
        }
    }
}

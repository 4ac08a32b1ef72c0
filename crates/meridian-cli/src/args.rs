//! Command-line argument definitions for the Meridian CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, algorithm selection, and logging verbosity.

use clap::Parser;

use meridian::config::LayoutKind;

/// Command-line arguments for the Meridian layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph (JSON with `nodes` and `edges`)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout algorithm; overrides the configured one
    #[arg(long)]
    pub layout: Option<LayoutKind>,

    /// Print the recommended algorithm instead of running a layout
    #[arg(long)]
    pub recommend: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

//! Command-line argument definitions for the archsketch CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the response source, the report path,
//! configuration overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the archsketch tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Free-text description of the system to design
    #[arg(help = "Architecture requirements")]
    pub requirements: String,

    /// Path to the output Markdown report
    #[arg(short, long, default_value = "out.md")]
    pub output: String,

    /// Replay a recorded model response instead of running the generator command
    #[arg(long)]
    pub replay: Option<String>,

    /// Model identifier passed to the generator
    #[arg(short, long)]
    pub model: Option<String>,

    /// Diagram height in pixels (200-800)
    #[arg(long)]
    pub height: Option<u32>,

    /// Hide diagram pan and zoom controls
    #[arg(long)]
    pub hide_controls: bool,

    /// Include the raw model response in the report
    #[arg(long)]
    pub show_raw: bool,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

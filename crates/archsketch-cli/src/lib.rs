//! CLI logic for the archsketch tool.
//!
//! This module wires configuration, a text generator, and the Markdown
//! renderer around [`archsketch::Studio`].

pub mod config;
pub mod error_adapter;
pub mod generator;
pub mod report;

mod args;

pub use args::Args;

use std::fs;

use log::{info, warn};

use archsketch::{ArchsketchError, Generator, Outcome, Session, Studio, config::AppConfig};

use generator::{CommandGenerator, ReplayGenerator};
use report::MarkdownRenderer;

/// Run the archsketch CLI application
///
/// This function generates a response for the requirements, recovers the
/// diagram and explanation, and writes a Markdown report to the output file.
/// A response without a diagram is not an error: the report then carries a
/// warning and the explanation.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `ArchsketchError` for:
/// - Empty requirements
/// - Configuration loading errors
/// - Generation errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), ArchsketchError> {
    info!(output_path = args.output; "Generating architecture");

    // Load configuration
    let cli_config = config::load_config(args.config.as_ref())?;
    let app_config = apply_overrides(cli_config.app().clone(), args);

    let mut generator: Box<dyn Generator> = match &args.replay {
        Some(path) => Box::new(ReplayGenerator::new(path)),
        None => Box::new(CommandGenerator::from_config(cli_config.generator())?),
    };

    let studio = Studio::new(app_config);
    let mut session = Session::new();
    let mut renderer = MarkdownRenderer::new();

    let outcome = studio.generate(
        &mut session,
        &args.requirements,
        generator.as_mut(),
        &mut renderer,
    )?;

    match &outcome {
        Outcome::Rendered { .. } => info!(count = session.count(); "Diagram rendered"),
        Outcome::RenderFallback { error, .. } => {
            warn!(error:% = error; "Error rendering diagram, writing it as plain code");
        }
        Outcome::NoDiagram { .. } => {
            warn!("Could not extract a valid diagram from the response");
        }
    }

    let report = report::compose(&outcome, &renderer, &session, studio.config().display());
    fs::write(&args.output, report)?;

    info!(output_file = args.output; "Report written successfully");

    Ok(())
}

/// Apply command-line overrides on top of the loaded configuration.
fn apply_overrides(config: AppConfig, args: &Args) -> AppConfig {
    let mut display = config.display().clone();
    if let Some(height) = args.height {
        display = display.with_height(height);
    }
    if args.hide_controls {
        display = display.with_controls(false);
    }
    if args.show_raw {
        display = display.with_raw_response(true);
    }

    let model = match &args.model {
        Some(id) => config.model().clone().with_id(id.as_str()),
        None => config.model().clone(),
    };

    config.with_model(model).with_display(display)
}

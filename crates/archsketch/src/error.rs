//! Error types for archsketch operations.
//!
//! This module provides the main error type [`ArchsketchError`]. Missing
//! diagrams and rejected renders are not errors; they are reported through
//! [`Outcome`](crate::Outcome).

use std::io;

use thiserror::Error;

use crate::generate::GenerationError;

/// The main error type for archsketch operations.
#[derive(Debug, Error)]
pub enum ArchsketchError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Please enter architecture requirements first")]
    EmptyRequirements,

    #[error("Error generating architecture: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

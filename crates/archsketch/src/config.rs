//! Configuration types for diagram generation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources; every field has a default, so partial files are valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`ModelConfig`] - Which provider and model the generator should use.
//! - [`DisplayOptions`] - Options handed to the renderer.
//! - [`RepairConfig`] - Thresholds for the diagram repair heuristics.
//!
//! # Example
//!
//! ```
//! # use archsketch::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.display().height(), 400);
//! assert_eq!(config.repair().policy().repair_at_most(), 2);
//! ```

use serde::Deserialize;

use archsketch_parser::{REPAIR_AT_MOST_LINES, RepairPolicy, WELL_FORMED_AFTER_LINES};

pub use crate::render::DisplayOptions;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Model selection section.
    #[serde(default)]
    model: ModelConfig,

    /// Display section.
    #[serde(default)]
    display: DisplayOptions,

    /// Repair threshold section.
    #[serde(default)]
    repair: RepairConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `model` - Provider and model identifiers.
    /// * `display` - Renderer display options.
    /// * `repair` - Repair heuristic thresholds.
    pub fn new(model: ModelConfig, display: DisplayOptions, repair: RepairConfig) -> Self {
        Self {
            model,
            display,
            repair,
        }
    }

    /// Returns the model configuration.
    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    /// Returns the display options.
    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }

    /// Returns the repair configuration.
    pub fn repair(&self) -> &RepairConfig {
        &self.repair
    }

    /// Replaces the model section.
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Replaces the display section.
    pub fn with_display(mut self, display: DisplayOptions) -> Self {
        self.display = display;
        self
    }
}

/// Provider and model identifiers passed to the text generator.
///
/// The values are opaque to this crate; generators interpret them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    provider: String,
    id: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            id: "llama-3.3-70b-versatile".to_string(),
        }
    }
}

impl ModelConfig {
    /// Creates a new [`ModelConfig`].
    pub fn new(provider: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            id: id.into(),
        }
    }

    /// Returns the provider name.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Returns the model identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a copy using a different model identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Repair thresholds, see [`RepairPolicy`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Bodies with more lines than this only get the arrow-label fix.
    well_formed_after: usize,

    /// Bodies with at most this many lines are repaired.
    repair_at_most: usize,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            well_formed_after: WELL_FORMED_AFTER_LINES,
            repair_at_most: REPAIR_AT_MOST_LINES,
        }
    }
}

impl RepairConfig {
    /// The [`RepairPolicy`] described by this section.
    pub fn policy(&self) -> RepairPolicy {
        RepairPolicy::new(self.well_formed_after, self.repair_at_most)
    }
}

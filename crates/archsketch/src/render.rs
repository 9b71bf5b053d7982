//! The rendering capability.
//!
//! Rendering a Mermaid diagram is delegated to a collaborator implementing
//! [`Renderer`]. A rejected diagram is not fatal: the caller shows the diagram
//! text as plain code instead.

use std::io;

use serde::Deserialize;
use thiserror::Error;

/// Smallest diagram height a renderer is asked for, in pixels.
pub const MIN_HEIGHT: u32 = 200;

/// Largest diagram height a renderer is asked for, in pixels.
pub const MAX_HEIGHT: u32 = 800;

const DEFAULT_HEIGHT: u32 = 400;

/// Errors reported by a [`Renderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Diagram rejected: {0}")]
    Rejected(String),

    #[error("I/O error while rendering: {0}")]
    Io(#[from] io::Error),
}

/// Options passed to the renderer with every diagram.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Diagram height in pixels; clamped by [`DisplayOptions::height`].
    height: u32,

    /// Whether pan and zoom controls are shown.
    show_controls: bool,

    /// Whether the raw model response is shown for debugging.
    show_raw_response: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            show_controls: true,
            show_raw_response: false,
        }
    }
}

impl DisplayOptions {
    /// Creates display options; `height` is clamped to the supported range.
    pub fn new(height: u32, show_controls: bool, show_raw_response: bool) -> Self {
        Self {
            height: height.clamp(MIN_HEIGHT, MAX_HEIGHT),
            show_controls,
            show_raw_response,
        }
    }

    /// Diagram height in pixels, within [`MIN_HEIGHT`]..=[`MAX_HEIGHT`].
    pub fn height(&self) -> u32 {
        self.height.clamp(MIN_HEIGHT, MAX_HEIGHT)
    }

    /// Whether pan and zoom controls are shown.
    pub fn show_controls(&self) -> bool {
        self.show_controls
    }

    /// Whether the raw model response is shown.
    pub fn show_raw_response(&self) -> bool {
        self.show_raw_response
    }

    /// Returns a copy with a different height, clamped.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height.clamp(MIN_HEIGHT, MAX_HEIGHT);
        self
    }

    /// Returns a copy with controls shown or hidden.
    pub fn with_controls(mut self, show_controls: bool) -> Self {
        self.show_controls = show_controls;
        self
    }

    /// Returns a copy with the raw response shown or hidden.
    pub fn with_raw_response(mut self, show_raw_response: bool) -> Self {
        self.show_raw_response = show_raw_response;
        self
    }
}

/// A collaborator that displays diagram text.
pub trait Renderer {
    /// Render `diagram`.
    ///
    /// `key` identifies the render slot: it is unique per displayed diagram
    /// within a session and stable for re-displays of the current diagram.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the diagram cannot be displayed.
    fn render(
        &mut self,
        diagram: &str,
        key: &str,
        options: &DisplayOptions,
    ) -> Result<(), RenderError>;
}

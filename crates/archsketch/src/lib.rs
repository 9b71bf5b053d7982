//! Archsketch - architecture diagrams from free-text requirements.
//!
//! A language model is asked for a Mermaid diagram plus an explanation. This
//! crate streams its answer into a caller-owned [`Session`], recovers a
//! displayable diagram with [`archsketch_parser`], and hands it to a
//! [`Renderer`]. Text generation and rendering are injected capabilities.

pub mod config;
pub mod generate;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod stream;

mod error;

pub use archsketch_parser as parser;

pub use error::ArchsketchError;
pub use generate::{FragmentStream, GenerationError, GenerationRequest, Generator};
pub use render::{DisplayOptions, RenderError, Renderer};
pub use session::Session;

use log::{debug, info, trace, warn};

use config::AppConfig;
use session::Role;
use stream::Accumulator;

/// Longest prefix of the requirements written to the log.
const REQUIREMENTS_LOG_PREVIEW: usize = 100;

/// Result of a completed generation.
#[derive(Debug)]
pub enum Outcome {
    /// The diagram was rendered.
    Rendered { diagram: String, explanation: String },

    /// The renderer rejected the diagram; show it as plain code instead.
    RenderFallback {
        diagram: String,
        explanation: String,
        error: RenderError,
    },

    /// The response held no diagram; warn the user.
    NoDiagram { explanation: String },
}

impl Outcome {
    /// The diagram body, if one was found.
    pub fn diagram(&self) -> Option<&str> {
        match self {
            Outcome::Rendered { diagram, .. } | Outcome::RenderFallback { diagram, .. } => {
                Some(diagram)
            }
            Outcome::NoDiagram { .. } => None,
        }
    }

    /// The explanation text; may be empty.
    pub fn explanation(&self) -> &str {
        match self {
            Outcome::Rendered { explanation, .. }
            | Outcome::RenderFallback { explanation, .. }
            | Outcome::NoDiagram { explanation } => explanation,
        }
    }
}

/// Runs generations against a configuration.
///
/// # Examples
///
/// ```
/// use archsketch::{
///     DisplayOptions, Outcome, RenderError, Renderer, Session, Studio,
///     generate::ScriptedGenerator,
/// };
///
/// struct Collect(Vec<String>);
///
/// impl Renderer for Collect {
///     fn render(&mut self, diagram: &str, _: &str, _: &DisplayOptions) -> Result<(), RenderError> {
///         self.0.push(diagram.to_string());
///         Ok(())
///     }
/// }
///
/// let studio = Studio::default();
/// let mut session = Session::new();
/// let mut generator = ScriptedGenerator::new(["```mermaid\n", "A-->B```", "\nDone."]);
/// let mut renderer = Collect(Vec::new());
///
/// let outcome = studio
///     .generate(&mut session, "two services", &mut generator, &mut renderer)
///     .expect("generation succeeds");
///
/// assert!(matches!(outcome, Outcome::Rendered { .. }));
/// assert_eq!(session.count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Studio {
    config: AppConfig,
}

impl Studio {
    /// Create a studio with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Generate, extract and render a diagram for `requirements`.
    ///
    /// The session is reset before generation starts, so state from earlier
    /// requests never leaks into this one. When a diagram is found, a
    /// non-empty explanation is stored on the session and recorded as the
    /// assistant message. If the stream fails midway, the
    /// session keeps the partial raw response for debugging and nothing else.
    ///
    /// # Arguments
    ///
    /// * `session` - Caller-owned session state
    /// * `requirements` - Free-text system requirements
    /// * `generator` - Text-generation capability
    /// * `renderer` - Rendering capability
    ///
    /// # Errors
    ///
    /// Returns `ArchsketchError` for:
    /// - Blank requirements (the session is left untouched)
    /// - Generation failures, at start or mid-stream
    pub fn generate<G, R>(
        &self,
        session: &mut Session,
        requirements: &str,
        generator: &mut G,
        renderer: &mut R,
    ) -> Result<Outcome, ArchsketchError>
    where
        G: Generator + ?Sized,
        R: Renderer + ?Sized,
    {
        if requirements.trim().is_empty() {
            warn!("Empty requirements, nothing to generate");
            return Err(ArchsketchError::EmptyRequirements);
        }

        let preview: String = requirements
            .chars()
            .take(REQUIREMENTS_LOG_PREVIEW)
            .collect();
        info!(requirements = preview.as_str(), model = self.config.model().id(); "Processing user request");

        session.reset();
        session.push_message(Role::User, requirements);

        let model = self.config.model();
        let request =
            GenerationRequest::new(requirements, model.id()).with_provider(model.provider());
        let mut accumulator = Accumulator::new();
        for fragment in generator.generate(&request)? {
            if accumulator.push(&fragment?) {
                session.set_raw_response(accumulator.text());
            }
        }
        debug!(
            fragments = accumulator.fragment_count(),
            bytes = accumulator.text().len();
            "Response stream complete"
        );

        let text = accumulator.into_text();

        let policy = self.config.repair().policy();
        let (diagram, explanation) = pipeline::process_response(&text, &policy).into_parts();
        trace!(diagram:?, explanation:?; "Processed response");

        let Some(diagram) = diagram else {
            warn!("Could not extract a valid diagram from the response");
            return Ok(Outcome::NoDiagram { explanation });
        };

        if !explanation.is_empty() {
            session.set_explanation(explanation.clone());
            session.push_message(Role::Assistant, explanation.as_str());
        }

        let key = session.record_diagram(diagram.clone());
        info!(key = key.as_str(); "Rendering diagram");

        match renderer.render(&diagram, &key, self.config.display()) {
            Ok(()) => Ok(Outcome::Rendered {
                diagram,
                explanation,
            }),
            Err(error) => {
                warn!(error:% = error; "Renderer rejected diagram, falling back to code");
                Ok(Outcome::RenderFallback {
                    diagram,
                    explanation,
                    error,
                })
            }
        }
    }

    /// Re-render the session's current diagram.
    ///
    /// Returns `None` when the session has no diagram.
    pub fn redisplay<R>(&self, session: &Session, renderer: &mut R) -> Option<Result<(), RenderError>>
    where
        R: Renderer + ?Sized,
    {
        let diagram = session.current_diagram()?;
        let key = session.current_render_key();
        debug!(key = key.as_str(); "Re-displaying current diagram");

        Some(renderer.render(diagram, &key, self.config.display()))
    }
}

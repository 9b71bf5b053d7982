//! The text-generation capability.
//!
//! A [`Generator`] turns a [`GenerationRequest`] into a finite, ordered stream
//! of text fragments. The stream ends when the iterator is exhausted; there is
//! no end marker.

use std::io;

use thiserror::Error;

/// Errors raised by a [`Generator`], either when starting or mid-stream.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to start generation: {0}")]
    Start(String),

    #[error("generation stream failed: {0}")]
    Stream(String),

    #[error("I/O error during generation: {0}")]
    Io(#[from] io::Error),
}

/// A stream of response fragments.
pub type FragmentStream<'a> = Box<dyn Iterator<Item = Result<String, GenerationError>> + 'a>;

/// What the generator is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    requirements: String,
    provider: String,
    model: String,
}

impl GenerationRequest {
    /// Creates a request for `requirements` using the model `model`.
    ///
    /// The provider is left empty; see [`GenerationRequest::with_provider`].
    pub fn new(requirements: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            requirements: requirements.into(),
            provider: String::new(),
            model: model.into(),
        }
    }

    /// Returns a copy naming the provider serving the model.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// The user's free-text requirements.
    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    /// The provider name, e.g. `groq`; empty when unspecified.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// The model identifier the generator should use.
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// A collaborator producing model output for a request.
pub trait Generator {
    /// Start generating a response for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if the generation cannot be started.
    /// Failures after the stream has started are yielded as stream items.
    fn generate(&mut self, request: &GenerationRequest)
    -> Result<FragmentStream<'_>, GenerationError>;
}

/// A generator replaying a fixed list of fragments, whatever the request.
///
/// Useful for recorded transcripts and tests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerator {
    fragments: Vec<String>,
}

impl ScriptedGenerator {
    /// Creates a generator yielding `fragments` in order.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
        }
    }
}

impl Generator for ScriptedGenerator {
    fn generate(
        &mut self,
        _request: &GenerationRequest,
    ) -> Result<FragmentStream<'_>, GenerationError> {
        Ok(Box::new(self.fragments.iter().cloned().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_generator_replays_in_order() {
        let mut generator = ScriptedGenerator::new(["a", "", "b"]);
        let request = GenerationRequest::new("a web shop", "model");

        let fragments: Vec<String> = generator
            .generate(&request)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(fragments, vec!["a", "", "b"]);
    }

    #[test]
    fn test_request_provider() {
        let request = GenerationRequest::new("r", "m");
        assert_eq!(request.provider(), "");

        let request = request.with_provider("groq");
        assert_eq!(request.provider(), "groq");
        assert_eq!(request.model(), "m");
    }

    #[test]
    fn test_scripted_generator_is_repeatable() {
        let mut generator = ScriptedGenerator::new(["x"]);
        let request = GenerationRequest::new("r", "m");

        assert_eq!(generator.generate(&request).unwrap().count(), 1);
        assert_eq!(generator.generate(&request).unwrap().count(), 1);
    }
}

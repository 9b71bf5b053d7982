//! Locating the Mermaid fence in raw model output.
//!
//! Two strategies are tried in order:
//!
//! 1. [`ExtractStrategy::Fenced`]: a structured scan for an opening
//!    `` ```mermaid `` line followed by a body and a closing `` ``` ``.
//! 2. [`ExtractStrategy::Positional`]: plain substring positions, used when
//!    the opening marker does not end its line (models sometimes emit
//!    `` ```mermaid graph LR ... ``` `` on a single line).
//!
//! Only the first opening marker in the text is considered by either strategy.

use std::fmt;

use log::{debug, info, warn};
use winnow::{
    Parser as _,
    ascii::{line_ending, space0},
    combinator::terminated,
    error::ModalResult,
    token::{literal, take_until},
};

/// Opening fence marker the model is prompted to wrap diagrams in.
pub const DIAGRAM_MARKER: &str = "```mermaid";

/// Generic closing fence.
pub const FENCE: &str = "```";

/// Which extraction strategy produced a diagram block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractStrategy {
    /// The opening marker ended its line and a closing fence followed.
    Fenced,
    /// The block was recovered from raw marker and fence positions.
    Positional,
}

impl fmt::Display for ExtractStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractStrategy::Fenced => write!(f, "fenced"),
            ExtractStrategy::Positional => write!(f, "positional"),
        }
    }
}

/// A diagram block recovered from model output.
///
/// The body is trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    body: String,
    strategy: ExtractStrategy,
}

impl Extracted {
    /// The trimmed diagram body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The strategy that located the block.
    pub fn strategy(&self) -> ExtractStrategy {
        self.strategy
    }

    /// Consume the extraction, returning the body.
    pub fn into_body(self) -> String {
        self.body
    }
}

/// Extract the diagram body from raw model output.
///
/// Returns `None` when no non-empty fenced block can be found. A miss is an
/// expected outcome, callers should warn the user rather than fail.
///
/// # Examples
///
/// ```
/// # use archsketch_parser::extract;
/// let text = "Intro\n```mermaid\ngraph LR\nA-->B\n```\nOutro";
/// assert_eq!(extract(text).as_deref(), Some("graph LR\nA-->B"));
/// assert_eq!(extract("no diagram here"), None);
/// ```
pub fn extract(text: &str) -> Option<String> {
    extract_with_strategy(text).map(Extracted::into_body)
}

/// Extract the diagram body together with the strategy that found it.
pub fn extract_with_strategy(text: &str) -> Option<Extracted> {
    if let Some(body) = fenced_body(text) {
        info!(strategy = "fenced", lines = body.lines().count(); "Extracted diagram block");
        return Some(Extracted {
            body: body.to_string(),
            strategy: ExtractStrategy::Fenced,
        });
    }

    debug!("Fenced scan failed, falling back to marker positions");

    if let Some(body) = positional_body(text) {
        info!(strategy = "positional", lines = body.lines().count(); "Extracted diagram block");
        return Some(Extracted {
            body: body.to_string(),
            strategy: ExtractStrategy::Positional,
        });
    }

    warn!(text_len = text.len(); "No diagram block found in response");
    None
}

/// Structured scan: marker, end of line, body, closing fence.
fn fenced_body(text: &str) -> Option<&str> {
    let mut input = text;
    fenced_block(&mut input)
        .ok()
        .map(str::trim)
        .filter(|body| !body.is_empty())
}

fn opening_fence(input: &mut &str) -> ModalResult<()> {
    (
        take_until(0.., DIAGRAM_MARKER),
        literal(DIAGRAM_MARKER),
        space0,
        line_ending,
    )
        .void()
        .parse_next(input)
}

fn fenced_block<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    opening_fence(input)?;
    terminated(take_until(0.., FENCE), literal(FENCE)).parse_next(input)
}

/// Raw position scan: first marker, then the next fence after it.
fn positional_body(text: &str) -> Option<&str> {
    let start = text.find(DIAGRAM_MARKER)? + DIAGRAM_MARKER.len();
    let end = start + text[start..].find(FENCE)?;

    Some(text[start..end].trim()).filter(|body| !body.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_standard_block() {
        let text = "Some text\n```mermaid\nflowchart LR\nA-->B\nB-->C\n```\nThis shows A to C.";
        let extracted = extract_with_strategy(text).unwrap();

        assert_eq!(extracted.body(), "flowchart LR\nA-->B\nB-->C");
        assert_eq!(extracted.strategy(), ExtractStrategy::Fenced);
    }

    #[test]
    fn test_extract_crlf_fence() {
        let text = "```mermaid\r\ngraph TD\r\nA-->B\r\n```";
        assert_eq!(extract(text).as_deref(), Some("graph TD\r\nA-->B"));
    }

    #[test]
    fn test_extract_trailing_spaces_after_marker() {
        let text = "```mermaid   \ngraph TD\nA-->B\n```";
        let extracted = extract_with_strategy(text).unwrap();

        assert_eq!(extracted.strategy(), ExtractStrategy::Fenced);
        assert_eq!(extracted.body(), "graph TD\nA-->B");
    }

    #[test]
    fn test_extract_closing_fence_on_same_line() {
        let extracted = extract_with_strategy("```mermaid\nA-->B```").unwrap();

        assert_eq!(extracted.body(), "A-->B");
        assert_eq!(extracted.strategy(), ExtractStrategy::Fenced);
    }

    #[test]
    fn test_extract_single_line_block_uses_positional_fallback() {
        let extracted = extract_with_strategy("Here: ```mermaid graph LR A-->B```").unwrap();

        assert_eq!(extracted.body(), "graph LR A-->B");
        assert_eq!(extracted.strategy(), ExtractStrategy::Positional);
    }

    #[test]
    fn test_extract_marker_at_start_uses_positional_fallback() {
        let extracted = extract_with_strategy("```mermaid A-->B```").unwrap();

        assert_eq!(extracted.body(), "A-->B");
        assert_eq!(extracted.strategy(), ExtractStrategy::Positional);
    }

    #[test]
    fn test_extract_only_first_block() {
        let text = "```mermaid\ngraph LR\nA-->B\n```\ntext\n```mermaid\npie\n```";
        assert_eq!(extract(text).as_deref(), Some("graph LR\nA-->B"));
    }

    #[test]
    fn test_extract_missing_marker() {
        assert_eq!(extract("```\ngraph LR\nA-->B\n```"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_extract_unclosed_block() {
        assert_eq!(extract("```mermaid\ngraph LR\nA-->B\n"), None);
    }

    #[test]
    fn test_extract_empty_block_is_absent() {
        assert_eq!(extract("```mermaid\n```"), None);
        assert_eq!(extract("```mermaid\n   \n\n```"), None);
        assert_eq!(extract("```mermaid```"), None);
    }

    #[test]
    fn test_positional_body_adjacent_fence_is_absent() {
        assert_eq!(positional_body("```mermaid```"), None);
        assert_eq!(positional_body("x ```mermaid  ``` y"), None);
        assert_eq!(positional_body("```mermaid A```"), Some("A"));
    }

    #[test]
    fn test_extract_other_language_fence_before_diagram() {
        let text = "```json\n{}\n```\n```mermaid\ngraph LR\nA-->B\n```";
        assert_eq!(extract(text).as_deref(), Some("graph LR\nA-->B"));
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(ExtractStrategy::Fenced.to_string(), "fenced");
        assert_eq!(ExtractStrategy::Positional.to_string(), "positional");
    }
}

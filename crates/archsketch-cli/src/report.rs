//! Markdown output for generated architectures.
//!
//! [`MarkdownRenderer`] plays the rendering capability: it accepts diagrams
//! that declare a known Mermaid diagram type and turns them into `mermaid`
//! code blocks. [`compose`] assembles the final report from a generation
//! [`Outcome`].

use std::fmt::Write as _;

use log::debug;

use archsketch::{
    DisplayOptions, Outcome, RenderError, Renderer, Session, parser::DiagramKind,
};

/// Renders accepted diagrams as Markdown `mermaid` blocks.
#[derive(Debug, Default)]
pub struct MarkdownRenderer {
    rendered: Vec<String>,
}

impl MarkdownRenderer {
    /// Creates a renderer with no output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Markdown blocks produced so far, one per accepted diagram.
    pub fn rendered(&self) -> &[String] {
        &self.rendered
    }
}

impl Renderer for MarkdownRenderer {
    fn render(
        &mut self,
        diagram: &str,
        key: &str,
        options: &DisplayOptions,
    ) -> Result<(), RenderError> {
        let Some(kind) = DiagramKind::detect(diagram) else {
            return Err(RenderError::Rejected(
                "diagram does not start with a known diagram type".to_string(),
            ));
        };
        debug!(key, kind:% = kind; "Rendering diagram block");

        let fence = fence_for(diagram);
        self.rendered.push(format!(
            "<!-- {key} height={} controls={} -->\n{fence}mermaid\n{diagram}\n{fence}\n",
            options.height(),
            options.show_controls(),
        ));
        Ok(())
    }
}

/// A backtick fence longer than any backtick run inside `text`.
fn fence_for(text: &str) -> String {
    let longest_run = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}

fn code_block(out: &mut String, language: &str, text: &str) {
    let fence = fence_for(text);
    writeln!(out, "{fence}{language}\n{text}\n{fence}\n")
        .expect("Writing to String buffer is infallible");
}

/// Build the Markdown report for one generation.
///
/// # Arguments
///
/// * `outcome` - Result of the generation
/// * `renderer` - The renderer used for the generation
/// * `session` - Session holding the raw response
/// * `options` - Display options; controls the debug section
pub fn compose(
    outcome: &Outcome,
    renderer: &MarkdownRenderer,
    session: &Session,
    options: &DisplayOptions,
) -> String {
    let mut out = String::from("# Architecture Design\n\n");

    match outcome {
        Outcome::Rendered { .. } => {
            out.push_str("## Generated Architecture\n\n");
            if let Some(block) = renderer.rendered().last() {
                out.push_str(block);
                out.push('\n');
            }
        }
        Outcome::RenderFallback { diagram, error, .. } => {
            out.push_str("## Generated Architecture\n\n");
            writeln!(out, "> **Error rendering diagram:** {error}\n")
                .expect("Writing to String buffer is infallible");
            code_block(&mut out, "text", diagram);
        }
        Outcome::NoDiagram { .. } => {
            out.push_str("> **Warning:** Could not extract a valid diagram from the response.\n\n");
        }
    }

    let explanation = outcome.explanation();
    if !explanation.is_empty() {
        out.push_str("## Architecture Explanation\n\n");
        out.push_str(explanation);
        out.push_str("\n\n");
    }

    if options.show_raw_response() && !session.raw_response().is_empty() {
        out.push_str("## Raw Model Response (Debug)\n\n");
        code_block(&mut out, "text", session.raw_response());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_accepts_declared_diagram() {
        let mut renderer = MarkdownRenderer::new();
        renderer
            .render("graph LR\nA-->B", "mermaid_x_1", &DisplayOptions::default())
            .unwrap();

        assert_eq!(
            renderer.rendered(),
            ["<!-- mermaid_x_1 height=400 controls=true -->\n```mermaid\ngraph LR\nA-->B\n```\n"
                .to_string()]
        );
    }

    #[test]
    fn test_renderer_rejects_undeclared_diagram() {
        let mut renderer = MarkdownRenderer::new();
        let err = renderer
            .render("A-->B\nB-->C", "k", &DisplayOptions::default())
            .unwrap_err();

        assert!(matches!(err, RenderError::Rejected(_)));
        assert!(renderer.rendered().is_empty());
    }

    #[test]
    fn test_fence_for() {
        assert_eq!(fence_for("plain"), "```");
        assert_eq!(fence_for("has ``` inside"), "````");
        assert_eq!(fence_for("`````"), "``````");
    }

    #[test]
    fn test_compose_no_diagram() {
        let outcome = Outcome::NoDiagram {
            explanation: "Only words.".to_string(),
        };
        let report = compose(
            &outcome,
            &MarkdownRenderer::new(),
            &Session::new(),
            &DisplayOptions::default(),
        );

        assert!(report.contains("Could not extract a valid diagram"));
        assert!(report.contains("## Architecture Explanation\n\nOnly words."));
        assert!(!report.contains("## Generated Architecture"));
    }

    #[test]
    fn test_compose_fallback_shows_plain_code() {
        let outcome = Outcome::RenderFallback {
            diagram: "A-->B\nB-->C\nC-->D\nD-->E".to_string(),
            explanation: String::new(),
            error: RenderError::Rejected("no header".to_string()),
        };
        let report = compose(
            &outcome,
            &MarkdownRenderer::new(),
            &Session::new(),
            &DisplayOptions::default(),
        );

        assert!(report.contains("> **Error rendering diagram:** Diagram rejected: no header"));
        assert!(report.contains("```text\nA-->B\nB-->C\nC-->D\nD-->E\n```"));
        assert!(!report.contains("```mermaid"));
        assert!(!report.contains("## Architecture Explanation"));
    }
}

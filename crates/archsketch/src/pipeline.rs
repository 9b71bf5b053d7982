//! The extraction pipeline run once per completed response.

use log::info;

use archsketch_parser::{RepairPolicy, extract, split_explanation};

/// A response split into its diagram and its explanation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedResponse {
    diagram: Option<String>,
    explanation: String,
}

impl ProcessedResponse {
    /// The diagram body, repaired if it was collapsed. `None` if the response
    /// contained no diagram.
    pub fn diagram(&self) -> Option<&str> {
        self.diagram.as_deref()
    }

    /// The response text without the diagram block; may be empty.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Consume the response, returning `(diagram, explanation)`.
    pub fn into_parts(self) -> (Option<String>, String) {
        (self.diagram, self.explanation)
    }
}

/// Extract, repair when needed, and split a complete response.
///
/// The body is repaired only when it has at most
/// [`RepairPolicy::repair_at_most`] lines.
///
/// # Examples
///
/// ```
/// # use archsketch::pipeline::process_response;
/// # use archsketch_parser::RepairPolicy;
/// let response = process_response("```mermaid\nA-->B```", &RepairPolicy::default());
/// assert!(response.diagram().unwrap().starts_with("graph LR"));
/// ```
pub fn process_response(text: &str, policy: &RepairPolicy) -> ProcessedResponse {
    let diagram = extract(text).map(|body| {
        if !policy.needs_repair(&body) {
            return body;
        }

        info!(lines = body.lines().count(); "Extracted diagram is collapsed, repairing");
        policy.repair(Some(&body)).unwrap_or(body)
    });

    ProcessedResponse {
        diagram,
        explanation: split_explanation(text),
    }
}

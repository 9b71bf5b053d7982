//! Separating the prose explanation from the diagram block.

use std::sync::LazyLock;

use regex::Regex;

static DIAGRAM_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```mermaid\n.*?\n```").expect("valid fence pattern"));

/// Remove the first diagram block from `full_text` and trim the rest.
///
/// The block must have its marker and closing fence on their own lines. When
/// no such block exists, the trimmed input is returned unchanged.
///
/// # Examples
///
/// ```
/// # use archsketch_parser::split_explanation;
/// let text = "Intro\n```mermaid\ngraph LR\nA-->B\n```\nOutro";
/// assert_eq!(split_explanation(text), "Intro\n\nOutro");
/// ```
pub fn split_explanation(full_text: &str) -> String {
    DIAGRAM_BLOCK
        .replacen(full_text, 1, "")
        .trim()
        .to_string()
}

//! Recovering Mermaid diagrams from language model output.
//!
//! Models prompted to answer with a fenced Mermaid block do not always comply
//! cleanly. This crate provides the pure text functions that turn a complete
//! response into a displayable diagram:
//!
//! - [`extract`]: find the `` ```mermaid `` block and return its body
//! - [`repair`]: re-insert line breaks and a missing header in collapsed bodies
//! - [`split_explanation`]: the response with the diagram block removed
//! - [`DiagramKind`]: detection of the diagram type declaration
//!
//! None of these functions fail; absence is reported with `None`.
//!
//! # Example
//!
//! ```
//! use archsketch_parser::{RepairPolicy, extract, split_explanation};
//!
//! let response = "Here you go:\n```mermaid\nA-->B```\nA calls B.";
//! let policy = RepairPolicy::default();
//!
//! let body = extract(response).expect("diagram present");
//! let body = if policy.needs_repair(&body) {
//!     policy.repair(Some(&body)).expect("non-empty body")
//! } else {
//!     body
//! };
//!
//! assert!(body.starts_with("graph LR"));
//! assert_eq!(split_explanation(response), response.trim());
//! ```

mod explanation;
mod extract;
mod kind;
mod repair;

pub use explanation::split_explanation;
pub use extract::{DIAGRAM_MARKER, ExtractStrategy, Extracted, FENCE, extract, extract_with_strategy};
pub use kind::DiagramKind;
pub use repair::{REPAIR_AT_MOST_LINES, RepairPolicy, WELL_FORMED_AFTER_LINES, repair};

//! Mermaid diagram type declarations.
//!
//! A Mermaid document starts with a keyword naming its diagram type
//! (`graph LR`, `sequenceDiagram`, ...). [`DiagramKind`] models the subset of
//! declarations this crate recognizes.

use std::fmt;

/// Diagram types recognized at the start of a diagram body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    /// `graph` or `flowchart`.
    Flowchart,
    /// `sequenceDiagram`.
    Sequence,
    /// `classDiagram`.
    Class,
    /// `gantt`.
    Gantt,
    /// `pie`.
    Pie,
}

/// Declaration keywords paired with the kind they introduce.
///
/// Matching is by prefix, so `graph` also accepts `graph TD` and `graphTD`.
const DECLARATIONS: &[(&str, DiagramKind)] = &[
    ("graph", DiagramKind::Flowchart),
    ("sequenceDiagram", DiagramKind::Sequence),
    ("classDiagram", DiagramKind::Class),
    ("gantt", DiagramKind::Gantt),
    ("pie", DiagramKind::Pie),
    ("flowchart", DiagramKind::Flowchart),
];

impl DiagramKind {
    /// Detect the diagram kind declared at the start of `body`.
    ///
    /// Leading whitespace, including blank lines, is ignored. Returns `None`
    /// when the body does not open with a recognized declaration keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// # use archsketch_parser::DiagramKind;
    /// assert_eq!(DiagramKind::detect("graph LR\nA-->B"), Some(DiagramKind::Flowchart));
    /// assert_eq!(DiagramKind::detect("\n\nsequenceDiagram"), Some(DiagramKind::Sequence));
    /// assert_eq!(DiagramKind::detect("A-->B"), None);
    /// ```
    pub fn detect(body: &str) -> Option<Self> {
        let body = body.trim_start();
        DECLARATIONS
            .iter()
            .find(|(keyword, _)| body.starts_with(keyword))
            .map(|(_, kind)| *kind)
    }

    /// The header line injected for this kind when a body has none.
    pub fn default_header(&self) -> &'static str {
        match self {
            DiagramKind::Flowchart => "graph LR",
            DiagramKind::Sequence => "sequenceDiagram",
            DiagramKind::Class => "classDiagram",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Pie => "pie",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Sequence => "sequence",
            DiagramKind::Class => "class",
            DiagramKind::Gantt => "gantt",
            DiagramKind::Pie => "pie",
        };
        write!(f, "{name}")
    }
}

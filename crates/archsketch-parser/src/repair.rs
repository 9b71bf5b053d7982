//! Heuristic repair of malformed diagram bodies.
//!
//! Models regularly collapse a whole diagram onto one or two lines, or emit an
//! edge label with a stray `>` (`A-->|yes|>B`). The rewrites here are
//! deterministic text substitutions; they are not a Mermaid parser and do not
//! guarantee valid output, only better odds at render time.

use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;

use crate::DiagramKind;

/// Bodies with more lines than this take the fast path and keep their line
/// structure.
pub const WELL_FORMED_AFTER_LINES: usize = 3;

/// Bodies with at most this many lines are sent through repair by the
/// pipeline.
pub const REPAIR_AT_MOST_LINES: usize = 2;

/// A newline-inserting rewrite for a collapsed body.
struct LineBreakRule {
    name: &'static str,
    pattern: LazyLock<Regex>,
    replacement: &'static str,
}

macro_rules! rule {
    ($name:literal, $pattern:literal, $replacement:literal) => {
        LineBreakRule {
            name: $name,
            pattern: LazyLock::new(|| Regex::new($pattern).expect("valid rewrite pattern")),
            replacement: $replacement,
        }
    };
}

/// Rewrites applied in order, each to the output of the previous one.
static LINE_BREAK_RULES: [LineBreakRule; 5] = [
    rule!("edge", r"(\w+)-->", "\n${1}-->"),
    rule!("dotted_edge", r"(\w+)-\.->(\w+)", "\n${1}-.-> ${2}"),
    rule!("participant", r"(participant\s+\w+)", "\n${1}"),
    rule!("message", r"(\w+)->>", "\n${1}->>"),
    rule!("node_label", r"(\w+)\[", "\n${1}["),
];

static STRAY_LABEL_ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-->(\|[^|]+\|)>").expect("valid label pattern"));

/// Thresholds deciding when a body counts as collapsed.
///
/// Both values are empirically tuned rather than derived; they are kept
/// configurable so deployments can adjust them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairPolicy {
    well_formed_after: usize,
    repair_at_most: usize,
}

impl Default for RepairPolicy {
    fn default() -> Self {
        Self {
            well_formed_after: WELL_FORMED_AFTER_LINES,
            repair_at_most: REPAIR_AT_MOST_LINES,
        }
    }
}

impl RepairPolicy {
    /// Creates a policy with explicit thresholds.
    ///
    /// # Arguments
    ///
    /// * `well_formed_after` - Line count above which only the label fix runs.
    /// * `repair_at_most` - Line count at or below which a body needs repair.
    pub fn new(well_formed_after: usize, repair_at_most: usize) -> Self {
        Self {
            well_formed_after,
            repair_at_most,
        }
    }

    /// Line count above which a body keeps its line structure.
    pub fn well_formed_after(&self) -> usize {
        self.well_formed_after
    }

    /// Line count at or below which the pipeline repairs a body.
    pub fn repair_at_most(&self) -> usize {
        self.repair_at_most
    }

    /// Returns `true` if `body` is short enough to be sent through repair.
    pub fn needs_repair(&self, body: &str) -> bool {
        body.lines().count() <= self.repair_at_most
    }

    /// Repair a diagram body under this policy.
    ///
    /// Returns `None` for absent or empty input.
    pub fn repair(&self, block: Option<&str>) -> Option<String> {
        let code = block.filter(|code| !code.is_empty())?;
        let line_count = code.lines().count();

        if line_count > self.well_formed_after {
            debug!(lines = line_count; "Diagram is well formed, fixing labels only");
            return Some(fix_stray_label_arrows(code));
        }

        info!(lines = line_count; "Repairing collapsed diagram");

        let mut repaired = code.to_string();
        for rule in &LINE_BREAK_RULES {
            let rewritten = rule.pattern.replace_all(&repaired, rule.replacement);
            if rewritten != repaired {
                debug!(rule = rule.name; "Inserted line breaks");
            }
            repaired = rewritten.into_owned();
        }

        let repaired = fix_stray_label_arrows(&repaired);

        Some(with_header(repaired))
    }
}

/// Repair a diagram body using the default [`RepairPolicy`].
///
/// # Examples
///
/// ```
/// # use archsketch_parser::repair;
/// let repaired = repair(Some("A-->B")).unwrap();
/// assert!(repaired.starts_with("graph LR\n"));
/// assert_eq!(repair(None), None);
/// ```
pub fn repair(block: Option<&str>) -> Option<String> {
    RepairPolicy::default().repair(block)
}

/// `-->|label|>` becomes `-->|label|`.
fn fix_stray_label_arrows(code: &str) -> String {
    STRAY_LABEL_ARROW.replace_all(code, "-->${1}").into_owned()
}

/// Prepend a declaration line when the body has none.
fn with_header(code: String) -> String {
    if DiagramKind::detect(&code).is_some() {
        return code;
    }

    let kind = if code.contains("participant") {
        DiagramKind::Sequence
    } else {
        DiagramKind::Flowchart
    };
    debug!(kind:% = kind; "Injecting diagram header");

    format!("{}\n{code}", kind.default_header())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_absent() {
        assert_eq!(repair(None), None);
        assert_eq!(repair(Some("")), None);
    }

    #[test]
    fn test_header_injection_keeps_edge_on_one_line() {
        let repaired = repair(Some("A-->B")).unwrap();

        assert_eq!(repaired.lines().next(), Some("graph LR"));
        let source = repaired.find('A').unwrap();
        assert_eq!(&repaired[source - 1..source], "\n");
        assert_eq!(repaired.lines().last(), Some("A-->B"));
        assert_eq!(repaired, "graph LR\n\nA-->B");
    }

    #[test]
    fn test_repair_collapsed_flowchart() {
        let repaired = repair(Some("graph TD A[Client]-->B[Server] B-->C[DB]")).unwrap();

        assert!(repaired.starts_with("graph TD"));
        let lines: Vec<_> = repaired.lines().map(str::trim).collect();
        assert!(lines.contains(&"A[Client]-->"));
        assert!(lines.contains(&"B[Server]"));
        assert!(lines.contains(&"B-->"));
        assert!(lines.contains(&"C[DB]"));
    }

    #[test]
    fn test_repair_sequence_header() {
        let repaired = repair(Some("participant A\nA->>B: hi")).unwrap();

        assert!(repaired.starts_with("sequenceDiagram\n"));
        assert!(repaired.contains("\nparticipant A"));
        assert!(repaired.contains("\nA->>B: hi"));
    }

    #[test]
    fn test_repair_keeps_existing_header() {
        let repaired = repair(Some("sequenceDiagram participant A participant B")).unwrap();

        assert!(repaired.starts_with("sequenceDiagram \nparticipant A"));
        assert_eq!(repaired.matches("sequenceDiagram").count(), 1);
    }

    #[test]
    fn test_repair_dotted_edge() {
        let repaired = repair(Some("A-.->B")).unwrap();

        assert!(repaired.contains("\nA-.-> B"));
    }

    #[test]
    fn test_repair_stray_label_collapsed() {
        let repaired = repair(Some("A-->|yes|>B")).unwrap();

        assert!(!repaired.contains("|>"));
        assert!(repaired.contains("A-->|yes|B"));
    }

    #[test]
    fn test_repair_stray_label_well_formed() {
        let block = "graph LR\nA-->|yes|>B\nA-->|no|>C\nB-->D";
        let repaired = repair(Some(block)).unwrap();

        assert_eq!(repaired, "graph LR\nA-->|yes|B\nA-->|no|C\nB-->D");
    }

    #[test]
    fn test_repair_well_formed_unchanged() {
        let block = "graph LR\nA-->B\nB-->C\nC-->D";
        assert_eq!(repair(Some(block)).as_deref(), Some(block));
    }

    #[test]
    fn test_repair_well_formed_without_header_is_not_injected() {
        let block = "A-->B\nB-->C\nC-->D\nD-->E";
        assert_eq!(repair(Some(block)).as_deref(), Some(block));
    }

    #[test]
    fn test_repair_is_deterministic() {
        let block = "graph LR A[Web]-->B[API] B-.->C participant X";
        assert_eq!(repair(Some(block)), repair(Some(block)));
    }

    #[test]
    fn test_policy_thresholds() {
        let policy = RepairPolicy::default();

        assert_eq!(policy.well_formed_after(), 3);
        assert_eq!(policy.repair_at_most(), 2);
        assert!(policy.needs_repair("A-->B"));
        assert!(policy.needs_repair("graph LR\nA-->B"));
        assert!(!policy.needs_repair("graph LR\nA-->B\nB-->C"));
    }

    #[test]
    fn test_custom_policy_fast_path() {
        let policy = RepairPolicy::new(1, 1);
        let repaired = policy.repair(Some("A-->B\nB-->C")).unwrap();

        assert_eq!(repaired, "A-->B\nB-->C");
    }
}

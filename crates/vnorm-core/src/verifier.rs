//! Normalized-list verifier — checks what the reconciler relies on
//!
//! The reconciler assumes each sibling group it receives is flat, has its
//! text runs merged, and can be told apart by key. The verifier walks a
//! node list (and the children of every node in it) and accumulates all
//! diagnostics rather than stopping at the first.
//!
//! Normalization only rewrites the top-level group. A node's own `children`
//! were normalized when that node was built and pass through untouched, so
//! a merge error below the top level means the input broke that assumption.
//!
//! # Checks
//!
//! 1. **Merge** — no two adjacent siblings are both text nodes (error)
//! 2. **Identity** — no key appears twice among siblings (warning)
//! 3. **Text** — text nodes carry non-empty text (warning)

use std::collections::BTreeMap;

use crate::child::number_to_text;
use crate::vnode::{Key, VNode};

// ── Verification Result Types ─────────────────────────────

/// Result of verifying a node list — accumulates all diagnostics
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl VerificationResult {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Returns true if no errors were found (warnings are OK)
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Returns only error-level diagnostics
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    /// Returns only warning-level diagnostics
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    fn add_error(&mut self, kind: DiagnosticKind, message: String, location: &[usize]) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            kind,
            message,
            location: location.to_vec(),
        });
    }

    fn add_warning(&mut self, kind: DiagnosticKind, message: String, location: &[usize]) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            kind,
            message,
            location: location.to_vec(),
        });
    }
}

impl Default for VerificationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// A single verification diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Index of the offending node within each enclosing sibling group
    pub location: Vec<usize>,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let location: Vec<String> = self.location.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{} [{}] at {}: {}",
            prefix,
            self.kind,
            location.join("."),
            self.message
        )
    }
}

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Category of verification issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    AdjacentText,
    DuplicateKey,
    EmptyText,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DiagnosticKind::AdjacentText => write!(f, "merge"),
            DiagnosticKind::DuplicateKey => write!(f, "identity"),
            DiagnosticKind::EmptyText => write!(f, "text"),
        }
    }
}

// ── Public API ────────────────────────────────────────────

/// Verify a normalized node list and the children of every node in it
pub fn verify(nodes: &[VNode]) -> VerificationResult {
    let mut result = VerificationResult::new();
    let mut location = Vec::new();
    verify_siblings(nodes, &mut location, &mut result);
    result
}

// ── Sibling group checks ──────────────────────────────────

fn verify_siblings(nodes: &[VNode], location: &mut Vec<usize>, result: &mut VerificationResult) {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();

    for (i, node) in nodes.iter().enumerate() {
        location.push(i);

        if i > 0 && node.is_text() && nodes[i - 1].is_text() {
            result.add_error(
                DiagnosticKind::AdjacentText,
                format!("text node follows text node at index {}", i - 1),
                location,
            );
        }

        if node.is_text() && node.text.as_deref() == Some("") {
            result.add_warning(
                DiagnosticKind::EmptyText,
                "text node has empty text".to_string(),
                location,
            );
        }

        if let Some(key) = &node.key {
            let ident = key_ident(key);
            if let Some(first) = seen.get(&ident) {
                result.add_warning(
                    DiagnosticKind::DuplicateKey,
                    format!("duplicate key '{}' (first seen at index {})", key, first),
                    location,
                );
            } else {
                seen.insert(ident, i);
            }
        }

        if let Some(children) = &node.children {
            verify_siblings(children, location, result);
        }

        location.pop();
    }
}

// Keys compare by type as well as value: `1` and `"1"` are different keys.
fn key_ident(key: &Key) -> String {
    match key {
        Key::Num(n) => format!("n:{}", number_to_text(*n)),
        Key::Str(s) => format!("s:{}", s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::child::{Child, ChildList};
    use crate::normalizer::deep_normalize;
    use crate::vnode::{create_empty_vnode, create_text_vnode};

    fn text(t: &str) -> VNode {
        create_text_vnode(t)
    }

    // ── Valid lists ────────────────────────────────────

    #[test]
    fn test_empty_list_is_valid() {
        let result = verify(&[]);
        assert!(result.is_valid());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_normalized_output_is_valid() {
        let input = Child::List(ChildList::new(vec![
            Child::from("a"),
            Child::List(ChildList::new(vec![Child::from("b"), Child::from(1)])),
            Child::Node(VNode::element("p")),
            Child::List(ChildList::new(vec![Child::List(ChildList::list_origin(
                vec![
                    Child::Node(VNode::element("li")),
                    Child::Node(VNode::element("li")),
                ],
            ))])),
            Child::from("c"),
        ]));
        let nodes = deep_normalize(input).unwrap();
        let result = verify(&nodes);
        assert!(result.is_valid(), "errors: {:?}", result.errors());
        assert!(result.warnings().is_empty(), "warnings: {:?}", result.warnings());
    }

    #[test]
    fn test_text_next_to_comment_is_valid() {
        let result = verify(&[text("a"), create_empty_vnode("c"), text("b")]);
        assert!(result.is_valid());
    }

    // ── Merge check ────────────────────────────────────

    #[test]
    fn test_adjacent_text_is_error() {
        let result = verify(&[text("a"), text("b")]);
        assert!(!result.is_valid());
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DiagnosticKind::AdjacentText);
        assert_eq!(errors[0].location, vec![1]);
    }

    #[test]
    fn test_adjacent_text_in_nested_children() {
        let parent = VNode::element("p").with_children(vec![
            VNode::element("b"),
            text("x"),
            text("y"),
        ]);
        let result = verify(&[VNode::element("hr"), parent]);
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].location, vec![1, 2]);
        assert_eq!(
            errors[0].to_string(),
            "error [merge] at 1.2: text node follows text node at index 1"
        );
    }

    #[test]
    fn test_nested_children_are_verified_as_given() {
        let paragraph = VNode::element("p").with_children(vec![text("a"), text("b")]);
        let nodes = deep_normalize(Child::List(ChildList::new(vec![
            Child::from("x"),
            Child::Node(paragraph.clone()),
        ])))
        .unwrap();
        assert_eq!(nodes[1], paragraph, "nested children pass through");

        let errors = verify(&nodes).errors().into_iter().cloned().collect::<Vec<_>>();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DiagnosticKind::AdjacentText);
        assert_eq!(errors[0].location, vec![1, 1]);
    }

    // ── Identity check ─────────────────────────────────

    #[test]
    fn test_duplicate_key_is_warning() {
        let result = verify(&[
            VNode::element("li").with_key("a"),
            VNode::element("li").with_key("b"),
            VNode::element("li").with_key("a"),
        ]);
        assert!(result.is_valid());
        let warnings = result.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, DiagnosticKind::DuplicateKey);
        assert_eq!(warnings[0].location, vec![2]);
        assert!(warnings[0].message.contains("first seen at index 0"));
    }

    #[test]
    fn test_numeric_and_string_keys_differ() {
        let result = verify(&[
            VNode::element("li").with_key(1),
            VNode::element("li").with_key("1"),
        ]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_fractional_keys_compare_by_value() {
        let result = verify(&[
            VNode::element("li").with_key(1.5),
            VNode::element("li").with_key(2.5),
            VNode::element("li").with_key(1.5),
        ]);
        assert_eq!(result.warnings().len(), 1);
        assert!(result.warnings()[0].message.contains("'1.5'"));
    }

    #[test]
    fn test_same_key_in_different_sibling_groups() {
        let a = VNode::element("ul").with_children(vec![VNode::element("li").with_key("k")]);
        let b = VNode::element("ul").with_children(vec![VNode::element("li").with_key("k")]);
        let result = verify(&[a, b]);
        assert!(result.diagnostics.is_empty());
    }

    // ── Text check ─────────────────────────────────────

    #[test]
    fn test_empty_text_is_warning() {
        let result = verify(&[text("")]);
        assert!(result.is_valid());
        assert_eq!(result.warnings()[0].kind, DiagnosticKind::EmptyText);
    }

    #[test]
    fn test_empty_comment_is_not_flagged() {
        let result = verify(&[create_empty_vnode("")]);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_accumulates_all_diagnostics() {
        let result = verify(&[
            text(""),
            text("x"),
            VNode::element("a").with_key(1),
            VNode::element("a").with_key(1),
        ]);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.warnings().len(), 2);
    }
}

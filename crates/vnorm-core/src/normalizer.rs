//! Children normalizer — flattens render output into a node list for diffing
//!
//! Render functions hand back children in whatever shape was convenient:
//! primitives, single nodes, lists, lists of lists. The reconciler only
//! understands a flat `Vec<VNode>`, so everything passes through here first.
//!
//! # Strategies
//!
//! - [`shallow_flatten`] — one level of list spreading, for children that can
//!   only contain nodes and flat node lists (e.g. component output that was
//!   already normalized by the component itself).
//! - [`deep_normalize`] — full normalization: arbitrary nesting, primitives,
//!   absent and boolean values, adjacent text merging, and synthetic keys
//!   for unkeyed elements produced by repetition constructs.
//!
//! Which strategy applies is decided by whoever generated the render
//! function; [`normalize_children`] only dispatches on that decision.
//!
//! # Guarantees
//!
//! - **Order preserving**: output is the depth-first, left-to-right flattening
//!   of the input
//! - **Merged**: no two adjacent output nodes are both text nodes
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: synthetic keys depend only on nesting path and index

use sha2::{Digest, Sha256};

use crate::child::{number_to_text, Child, ChildList};
use crate::vnode::{create_text_vnode, VNode};

/// How a call site wants its children normalized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NormalizationMode {
    /// Children are already a flat node list
    #[default]
    None,
    /// Children hold nodes and flat node lists only
    Simple,
    /// Children may hold anything
    Always,
}

// ── Public API ─────────────────────────────────────────────

/// Spread one level of nested lists into the parent
///
/// Every list element is replaced in place by its items; everything else is
/// kept as-is. When nothing is a list the input is returned untouched, so the
/// common case costs a single scan and no allocation.
///
/// Deeper nesting is not inspected: callers only use this when the shape is
/// known to be at most one level deep.
pub fn shallow_flatten(children: Vec<Child>) -> Vec<Child> {
    if !children.iter().any(Child::is_list) {
        return children;
    }

    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Child::List(list) => out.extend(list.items),
            other => out.push(other),
        }
    }
    out
}

/// Fully normalize an arbitrary child value into a flat node list
///
/// - strings and numbers become a single text node (`""` becomes no nodes)
/// - lists are flattened, merged and keyed
/// - absent values, booleans and bare nodes yield `None`; a bare node is
///   the caller's to pass through
pub fn deep_normalize(children: Child) -> Option<Vec<VNode>> {
    match children {
        Child::Str(s) if s.is_empty() => Some(Vec::new()),
        Child::Str(s) => Some(vec![create_text_vnode(s)]),
        Child::Number(n) => Some(vec![create_text_vnode(number_to_text(n))]),
        Child::List(list) => {
            let input_len = list.len();
            let nodes = normalize_array_children(list, &[]);
            tracing::debug!(
                input_len,
                output_len = nodes.len(),
                "normalized children"
            );
            Some(nodes)
        }
        Child::Absent | Child::Bool(_) | Child::Node(_) => None,
    }
}

/// Normalize children according to a caller-selected mode
///
/// `None` returns the input, `Simple` applies [`shallow_flatten`], `Always`
/// applies [`deep_normalize`] and wraps the resulting nodes back up as
/// children (no result becomes an empty list).
pub fn normalize_children(mode: NormalizationMode, children: Vec<Child>) -> Vec<Child> {
    match mode {
        NormalizationMode::None => children,
        NormalizationMode::Simple => shallow_flatten(children),
        NormalizationMode::Always => deep_normalize(Child::List(ChildList::new(children)))
            .unwrap_or_default()
            .into_iter()
            .map(Child::Node)
            .collect(),
    }
}

/// Synthetic key for an unkeyed element at `index` under `path`
///
/// `path` holds the index of each enclosing list below the root, outermost
/// first: `list_key(&[2, 0], 1) == "__vlist_2_0_1__"`.
pub fn list_key(path: &[usize], index: usize) -> String {
    let mut key = String::from("__vlist");
    for segment in path {
        key.push('_');
        key.push_str(&segment.to_string());
    }
    key.push('_');
    key.push_str(&index.to_string());
    key.push_str("__");
    key
}

/// SHA-256 over the canonical JSON of a normalized list
///
/// Two renders with identical normalized children (synthetic keys included)
/// share a fingerprint.
pub fn fingerprint(nodes: &[VNode]) -> String {
    let canonical = crate::codec::encode_nodes(nodes).to_string();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ── Recursive flatten + merge ──────────────────────────────

/// Flatten `children` depth-first, merging adjacent text and assigning
/// synthetic keys. `path` is empty at the root.
fn normalize_array_children(children: ChildList, path: &[usize]) -> Vec<VNode> {
    let list_origin = children.is_list_origin();
    let mut res: Vec<VNode> = Vec::with_capacity(children.len());

    for (i, child) in children.into_iter().enumerate() {
        match child {
            Child::Absent | Child::Bool(_) => {}
            Child::List(nested) => {
                if nested.is_empty() {
                    continue;
                }
                let mut nested_path = Vec::with_capacity(path.len() + 1);
                nested_path.extend_from_slice(path);
                nested_path.push(i);

                let mut flattened = normalize_array_children(nested, &nested_path).into_iter();
                if let Some(first) = flattened.next() {
                    if first.is_text() && last_is_text(&res) {
                        merge_into_last(&mut res, first.text.as_deref().unwrap_or(""));
                    } else {
                        res.push(first);
                    }
                }
                res.extend(flattened);
            }
            Child::Str(s) => push_primitive(&mut res, s),
            Child::Number(n) => push_primitive(&mut res, number_to_text(n)),
            Child::Node(mut node) => {
                if node.is_text() && last_is_text(&res) {
                    merge_into_last(&mut res, node.text.as_deref().unwrap_or(""));
                    continue;
                }
                if list_origin && node.tag.is_some() && node.key.is_none() && !path.is_empty() {
                    let key = list_key(path, i);
                    tracing::trace!(?path, index = i, key = %key, "assigned synthetic key");
                    node.key = Some(key.into());
                }
                res.push(node);
            }
        }
    }

    res
}

fn push_primitive(res: &mut Vec<VNode>, text: String) {
    if last_is_text(res) {
        merge_into_last(res, &text);
    } else if !text.is_empty() {
        res.push(create_text_vnode(text));
    }
}

fn last_is_text(res: &[VNode]) -> bool {
    res.last().is_some_and(VNode::is_text)
}

// Swaps in a fresh text node; caller-built nodes are never edited in place.
fn merge_into_last(res: &mut [VNode], text: &str) {
    if let Some(last) = res.last_mut() {
        let mut merged = last.text.take().unwrap_or_default();
        merged.push_str(text);
        *last = create_text_vnode(merged);
    }
}

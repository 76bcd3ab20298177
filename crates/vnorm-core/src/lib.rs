//! vnorm core - children normalization for virtual-node renderers
//!
//! Render functions return children in arbitrary shapes: primitives, nodes,
//! lists, lists of lists. The reconciler needs a flat list of nodes with
//! adjacent text merged and an identity for every list-generated element.
//! This crate performs that conversion.
//!
//! # Architecture
//!
//! ```text
//! render output (JSON) → codec → Child → normalizer → Vec<VNode>
//!                                            ↓
//!                                         verifier → Diagnostics
//! ```
//!
//! # Guarantees
//!
//! - **Order preserving**: output follows depth-first input order
//! - **Merged**: adjacent text never survives normalization
//! - **Deterministic**: synthetic keys depend only on position
//! - **Total**: normalization never fails; odd shapes pass through

pub mod child;
pub mod codec;
pub mod error;
pub mod normalizer;
pub mod verifier;
pub mod vnode;

pub use child::{Child, ChildList};
pub use error::{Error, Result};
pub use normalizer::{deep_normalize, normalize_children, shallow_flatten, NormalizationMode};
pub use vnode::{create_empty_vnode, create_text_vnode, Key, VNode};

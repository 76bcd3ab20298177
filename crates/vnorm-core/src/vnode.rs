//! Virtual node type — the renderable unit the normalizer produces
//!
//! A `VNode` is an element, component placeholder, text, or comment node.
//! Only the fields the normalizer and verifier observe are modelled here:
//! tag, key, text content, the comment flag, and already-built children.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::child::number_to_text;

/// Identity hint used by the reconciler to track a node across renders
///
/// Numeric keys are any host number, so `1.5` is as valid as `1`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum Key {
    Num(f64),
    Str(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Num(n) => write!(f, "{}", number_to_text(*n)),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

// Integral keys serialize as JSON integers so `3` does not come back as `3.0`.
impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Key::Num(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(*n as i64)
            }
            Key::Num(n) => serializer.serialize_f64(*n),
            Key::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Key::Num(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Num(f64::from(n))
    }
}

/// A virtual node
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Key>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_comment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<VNode>>,
}

impl VNode {
    /// Element or component node with the given tag
    pub fn element(tag: impl Into<String>) -> Self {
        VNode {
            tag: Some(tag.into()),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_children(mut self, children: Vec<VNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// True for nodes with defined text that are not comments.
    ///
    /// Comment nodes carry their content in `text` too, so the comment flag
    /// is what keeps them out of text merging.
    pub fn is_text(&self) -> bool {
        self.text.is_some() && !self.is_comment
    }
}

/// Create a text node: text set, not a comment, no tag, no key
pub fn create_text_vnode(text: impl Into<String>) -> VNode {
    VNode {
        text: Some(text.into()),
        ..Default::default()
    }
}

/// Create a comment placeholder node
pub fn create_empty_vnode(text: impl Into<String>) -> VNode {
    VNode {
        text: Some(text.into()),
        is_comment: true,
        ..Default::default()
    }
}

impl fmt::Display for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_comment {
            return write!(f, "<!--{}-->", self.text.as_deref().unwrap_or(""));
        }
        if let Some(text) = self.text.as_deref().filter(|_| self.tag.is_none()) {
            return write!(f, "{:?}", text);
        }
        write!(f, "<{}", self.tag.as_deref().unwrap_or("?"))?;
        if let Some(key) = &self.key {
            write!(f, " key={:?}", key.to_string())?;
        }
        match &self.children {
            Some(children) if !children.is_empty() => {
                write!(f, ">")?;
                for child in children {
                    write!(f, "{}", child)?;
                }
                write!(f, "</{}>", self.tag.as_deref().unwrap_or("?"))
            }
            _ => write!(f, " />"),
        }
    }
}

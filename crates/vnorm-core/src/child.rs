//! Child values — everything a render function may hand back as a child
//!
//! `Child` is a closed variant over the shapes render output can take:
//! nothing, booleans (from `cond && node` style expressions), numbers,
//! strings, finished nodes, and nested lists. `ChildList` carries the
//! list-origin marker set by repetition constructs.

use crate::vnode::VNode;

/// A single render-function child value
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// `undefined` / `null`
    Absent,
    Bool(bool),
    Number(f64),
    Str(String),
    Node(VNode),
    List(ChildList),
}

impl Child {
    pub fn is_list(&self) -> bool {
        matches!(self, Child::List(_))
    }
}

impl From<VNode> for Child {
    fn from(node: VNode) -> Self {
        Child::Node(node)
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Str(s.to_string())
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Str(s)
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Number(n)
    }
}

impl From<i32> for Child {
    fn from(n: i32) -> Self {
        Child::Number(f64::from(n))
    }
}

impl From<bool> for Child {
    fn from(b: bool) -> Self {
        Child::Bool(b)
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        value.map_or(Child::Absent, Into::into)
    }
}

impl From<ChildList> for Child {
    fn from(list: ChildList) -> Self {
        Child::List(list)
    }
}

impl From<Vec<Child>> for Child {
    fn from(items: Vec<Child>) -> Self {
        Child::List(ChildList::new(items))
    }
}

/// An ordered list of child values plus its origin marker
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildList {
    pub items: Vec<Child>,
    list_origin: bool,
}

impl ChildList {
    /// Plain list (fragment, slot content, hand-written array)
    pub fn new(items: Vec<Child>) -> Self {
        ChildList {
            items,
            list_origin: false,
        }
    }

    /// List produced by a repetition construct
    pub fn list_origin(items: Vec<Child>) -> Self {
        ChildList {
            items,
            list_origin: true,
        }
    }

    pub fn is_list_origin(&self) -> bool {
        self.list_origin
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<VNode>> for ChildList {
    fn from(nodes: Vec<VNode>) -> Self {
        ChildList::new(nodes.into_iter().map(Child::Node).collect())
    }
}

impl FromIterator<Child> for ChildList {
    fn from_iter<I: IntoIterator<Item = Child>>(iter: I) -> Self {
        ChildList::new(iter.into_iter().collect())
    }
}

impl IntoIterator for ChildList {
    type Item = Child;
    type IntoIter = std::vec::IntoIter<Child>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Render a number the way a dynamic host stringifies it
///
/// Integral values print without a fraction, `-0` prints as `0`, and the
/// non-finite values use their host spellings. Magnitudes of `1e21` and up,
/// or below `1e-6`, switch to exponent form with an explicit sign: `1e+21`.
pub fn number_to_text(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    } else {
        format!("{}", n)
    }
}

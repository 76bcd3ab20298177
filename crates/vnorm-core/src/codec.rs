//! JSON codec for render output
//!
//! Maps JSON documents onto `Child` values so render output can be stored
//! as fixtures and fed through the CLI.
//!
//! | JSON                  | Child                          |
//! |-----------------------|--------------------------------|
//! | `null`                | `Absent`                       |
//! | `true` / `false`      | `Bool`                         |
//! | number                | `Number`                       |
//! | string                | `Str`                          |
//! | array                 | `List` (plain)                 |
//! | `{"vlist": [...]}`    | `List` (list-origin)           |
//! | any other object      | `Node` (`tag`, `key`, `text`, `isComment`, `children`) |

use serde_json::Value;

use crate::child::{number_to_text, Child, ChildList};
use crate::vnode::VNode;
use crate::{Error, Result};

/// Object field marking a list produced by a repetition construct
pub const LIST_ORIGIN_FIELD: &str = "vlist";

// ── Decoding ──────────────────────────────────────────────

/// Parse JSON text into a child value
pub fn parse_child(text: &str) -> Result<Child> {
    let value: Value = serde_json::from_str(text)?;
    decode_child(&value)
}

/// Decode a JSON value into a child value
pub fn decode_child(value: &Value) -> Result<Child> {
    decode_at(value, &mut String::from("$"))
}

fn decode_at(value: &Value, path: &mut String) -> Result<Child> {
    match value {
        Value::Null => Ok(Child::Absent),
        Value::Bool(b) => Ok(Child::Bool(*b)),
        Value::Number(n) => n.as_f64().map(Child::Number).ok_or_else(|| Error::Decode {
            path: path.clone(),
            message: format!("number {} is not representable", n),
        }),
        Value::String(s) => Ok(Child::Str(s.clone())),
        Value::Array(items) => Ok(Child::List(ChildList::new(decode_items(items, path)?))),
        Value::Object(map) => match map.get(LIST_ORIGIN_FIELD) {
            Some(Value::Array(items)) if map.len() == 1 => {
                path.push('.');
                path.push_str(LIST_ORIGIN_FIELD);
                let decoded = decode_items(items, path);
                path.truncate(path.len() - LIST_ORIGIN_FIELD.len() - 1);
                Ok(Child::List(ChildList::list_origin(decoded?)))
            }
            _ => serde_json::from_value::<VNode>(value.clone())
                .map(Child::Node)
                .map_err(|e| Error::Decode {
                    path: path.clone(),
                    message: e.to_string(),
                }),
        },
    }
}

fn decode_items(items: &[Value], path: &mut String) -> Result<Vec<Child>> {
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let len = path.len();
        path.push_str(&format!("[{}]", i));
        let child = decode_at(item, path);
        path.truncate(len);
        out.push(child?);
    }
    Ok(out)
}

// ── Encoding ──────────────────────────────────────────────

/// Encode a child value back into the JSON form accepted by `decode_child`
pub fn encode_child(child: &Child) -> Value {
    match child {
        Child::Absent => Value::Null,
        Child::Bool(b) => Value::Bool(*b),
        Child::Number(n) => encode_number(*n),
        Child::Str(s) => Value::String(s.clone()),
        Child::Node(node) => encode_node(node),
        Child::List(list) => {
            let items = Value::Array(list.items.iter().map(encode_child).collect());
            if list.is_list_origin() {
                let mut map = serde_json::Map::new();
                map.insert(LIST_ORIGIN_FIELD.to_string(), items);
                Value::Object(map)
            } else {
                items
            }
        }
    }
}

// Integral values go back out as JSON integers so fixtures round-trip.
fn encode_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        return Value::from(n as i64);
    }
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(number_to_text(n)))
}

/// Encode a node as its camelCase JSON object
pub fn encode_node(node: &VNode) -> Value {
    serde_json::to_value(node).unwrap_or(Value::Null)
}

/// Encode a normalized list as a JSON array of node objects
pub fn encode_nodes(nodes: &[VNode]) -> Value {
    Value::Array(nodes.iter().map(encode_node).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vnode::{create_text_vnode, Key};

    #[test]
    fn test_decode_primitives() {
        assert_eq!(parse_child("null").unwrap(), Child::Absent);
        assert_eq!(parse_child("false").unwrap(), Child::Bool(false));
        assert_eq!(parse_child("42").unwrap(), Child::Number(42.0));
        assert_eq!(parse_child("\"hi\"").unwrap(), Child::Str("hi".into()));
    }

    #[test]
    fn test_decode_plain_and_list_origin_arrays() {
        let child = parse_child(r#"[1, {"vlist": [{"tag": "li"}]}]"#).unwrap();
        let Child::List(outer) = child else {
            panic!("expected list");
        };
        assert!(!outer.is_list_origin());
        let Child::List(inner) = &outer.items[1] else {
            panic!("expected nested list");
        };
        assert!(inner.is_list_origin());
        assert_eq!(inner.items[0], Child::Node(VNode::element("li")));
    }

    #[test]
    fn test_decode_node_fields() {
        let child =
            parse_child(r#"{"tag": "p", "key": "k", "children": [{"text": "x"}]}"#).unwrap();
        assert_eq!(
            child,
            Child::Node(
                VNode::element("p")
                    .with_key("k")
                    .with_children(vec![create_text_vnode("x")])
            )
        );

        let child = parse_child(r#"{"text": "c", "isComment": true}"#).unwrap();
        let Child::Node(node) = child else {
            panic!("expected node");
        };
        assert!(node.is_comment);
        assert!(!node.is_text());
    }

    #[test]
    fn test_decode_numeric_key() {
        let Child::Node(node) = parse_child(r#"{"tag": "li", "key": 7}"#).unwrap() else {
            panic!("expected node");
        };
        assert_eq!(node.key, Some(Key::Num(7.0)));
    }

    #[test]
    fn test_decode_fractional_key() {
        let child = parse_child(r#"[{"vlist": [[{"tag": "li", "key": 1.5}]]}]"#).unwrap();
        let nodes = crate::deep_normalize(child).unwrap();
        assert_eq!(nodes[0].key, Some(Key::Num(1.5)));
        assert_eq!(encode_nodes(&nodes), serde_json::json!([{"tag": "li", "key": 1.5}]));
    }

    #[test]
    fn test_decode_unknown_object_passes_through_as_node() {
        let child = parse_child(r#"{"component": "Foo"}"#).unwrap();
        assert_eq!(child, Child::Node(VNode::default()));
    }

    #[test]
    fn test_vlist_with_extra_fields_is_a_node() {
        let child = parse_child(r#"{"vlist": [], "tag": "ul"}"#).unwrap();
        assert_eq!(child, Child::Node(VNode::element("ul")));
    }

    #[test]
    fn test_decode_error_reports_path() {
        let err = parse_child(r#"[null, {"vlist": [{"tag": 5}]}]"#).unwrap_err();
        match err {
            Error::Decode { path, .. } => assert_eq!(path, "$[1].vlist[0]"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(matches!(parse_child("[1,"), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_encode_preserves_list_origin() {
        let text = r#"[1,"a",null,true,{"vlist":[{"tag":"li","key":2}]}]"#;
        let child = parse_child(text).unwrap();
        let encoded = encode_child(&child);
        let expected: Value = serde_json::from_str(text).unwrap();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_encode_non_finite_number_as_text() {
        assert_eq!(
            encode_child(&Child::Number(f64::NAN)),
            Value::String("NaN".into())
        );
    }
}

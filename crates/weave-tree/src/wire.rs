//! Wire encoding of build-time trees.
//!
//! Elements become `["$r", identifier, key, props]` arrays, so component
//! identity crosses the boundary as a name only. Internal props are dropped.
//! A literal list that would be mistaken for a marker array is escaped as
//! `["$l", ...items]`.

use serde_json::{Map, Value};

use crate::node::{Element, Node};
use crate::{ELEMENT_MARKER, INTERNAL_PROPS, LIST_MARKER};

/// Encode a tree as a JSON value.
#[must_use]
pub fn to_wire(node: &Node) -> Value {
    match node {
        Node::Null => Value::Null,
        Node::Bool(b) => Value::Bool(*b),
        Node::Number(n) => Value::Number(n.clone()),
        Node::String(s) => Value::String(s.clone()),
        Node::List(items) => encode_list(items),
        Node::Map(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), to_wire(v)))
                .collect(),
        ),
        Node::Element(el) => encode_element(el),
    }
}

/// Encode a tree as a JSON string.
///
/// # Errors
///
/// Returns an error if JSON output fails, which does not happen for trees
/// built from this crate's types.
pub fn serialize(node: &Node) -> Result<String, serde_json::Error> {
    serde_json::to_string(&to_wire(node))
}

fn encode_list(items: &[Node]) -> Value {
    let encoded = items.iter().map(to_wire);
    let needs_escape = matches!(
        items.first(),
        Some(Node::String(s)) if s == ELEMENT_MARKER || s == LIST_MARKER
    );
    if needs_escape {
        Value::Array(
            std::iter::once(Value::String(LIST_MARKER.to_owned()))
                .chain(encoded)
                .collect(),
        )
    } else {
        Value::Array(encoded.collect())
    }
}

fn encode_element(el: &Element) -> Value {
    let props: Map<String, Value> = el
        .props
        .iter()
        .filter(|(name, _)| !INTERNAL_PROPS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), to_wire(value)))
        .collect();

    Value::Array(vec![
        Value::String(ELEMENT_MARKER.to_owned()),
        Value::String(el.element_type.identifier().to_owned()),
        el.key.clone().map_or(Value::Null, Value::String),
        Value::Object(props),
    ])
}

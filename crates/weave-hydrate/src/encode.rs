//! Live tree back to the wire format.
//!
//! The inverse of [`from_wire`](crate::from_wire) for resolvable trees:
//! fragments encode with the grouping identifier, components and built-in
//! tags by name. Re-encoding a decoded tree reproduces the original JSON.
//! An unresolved name was already reduced to a fragment, so it comes back as
//! a grouping.

use serde_json::{Map, Value};
use weave_tree::{ELEMENT_MARKER, GROUPING_IDENTIFIER, LIST_MARKER};

use crate::live::{ElementKind, LiveElement, LiveNode};

/// Encode a live tree as a JSON value.
#[must_use]
pub fn to_wire(node: &LiveNode) -> Value {
    match node {
        LiveNode::Null => Value::Null,
        LiveNode::Bool(b) => Value::Bool(*b),
        LiveNode::Number(n) => Value::Number(n.clone()),
        LiveNode::String(s) => Value::String(s.clone()),
        LiveNode::List(items) => encode_list(items),
        LiveNode::Map(map) => Value::Object(encode_map(map.iter())),
        LiveNode::Element(el) => encode_element(el),
    }
}

/// Encode a live tree as a JSON string.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub fn serialize(node: &LiveNode) -> Result<String, serde_json::Error> {
    serde_json::to_string(&to_wire(node))
}

fn encode_map<'a>(entries: impl Iterator<Item = (&'a String, &'a LiveNode)>) -> Map<String, Value> {
    entries.map(|(k, v)| (k.clone(), to_wire(v))).collect()
}

fn encode_list(items: &[LiveNode]) -> Value {
    let encoded = items.iter().map(to_wire);
    let needs_escape = matches!(
        items.first(),
        Some(LiveNode::String(s)) if s == ELEMENT_MARKER || s == LIST_MARKER
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

fn encode_element(el: &LiveElement) -> Value {
    let identifier: &str = match &el.kind {
        ElementKind::Fragment => GROUPING_IDENTIFIER,
        ElementKind::Intrinsic(tag) => tag,
        ElementKind::Component { name, .. } => name,
    };
    Value::Array(vec![
        Value::String(ELEMENT_MARKER.to_owned()),
        Value::String(identifier.to_owned()),
        el.key.clone().map_or(Value::Null, Value::String),
        Value::Object(encode_map(el.props.iter())),
    ])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use weave_tree::{Element, ElementType, Node, Props};

    use super::*;
    use crate::deserialize::{deserialize, from_wire};
    use crate::live::LiveProps;
    use crate::registry::Registry;

    fn registry() -> Registry {
        Registry::new()
            .with("Intro", |_: &LiveProps, c: &str| format!("<header>{c}</header>"))
            .with("Badge", |_: &LiveProps, _: &str| String::new())
    }

    fn build_tree() -> Node {
        let mut badge = Element::new(
            ElementType::Component("Badge".to_owned()),
            Some("b1".to_owned()),
            Props::from([
                ("count".to_owned(), Node::from(2_i64)),
                ("ratio".to_owned(), Node::Number(serde_json::Number::from_f64(0.5).unwrap())),
                ("debugType".to_owned(), Node::from("Badge")),
            ]),
        );
        badge.set_children(vec![Node::List(vec!["$l".into(), "x".into()])]);

        let mut heading = Element::new(
            ElementType::Tag("h2".to_owned()),
            None,
            Props::from([("id".to_owned(), Node::from("start"))]),
        );
        heading.set_children(vec![Node::from("Start "), Node::Element(badge)]);

        let mut intro = Element::new(
            ElementType::Component("Intro".to_owned()),
            Some("k".to_owned()),
            Props::from([
                ("meta".to_owned(), Node::Map(Props::from([("draft".to_owned(), Node::Bool(false))]))),
                ("missing".to_owned(), Node::Null),
                ("tags".to_owned(), Node::List(vec!["$r".into(), "a".into()])),
            ]),
        );
        intro.set_children(vec![Node::Element(heading)]);

        let mut root = Element::new(ElementType::Grouping, None, Props::new());
        root.set_children(vec![Node::Element(intro), Node::from("tail")]);
        Node::Element(root)
    }

    #[test]
    fn test_reencoding_reproduces_wire_json() {
        let json = weave_tree::serialize(&build_tree()).unwrap();

        let hydrated = deserialize(&json, &registry()).unwrap();
        assert!(hydrated.warnings.is_empty());

        assert_eq!(serialize(&hydrated.node).unwrap(), json);
    }

    #[test]
    fn test_literal_marker_lists_stay_escaped() {
        let wire = json!(["$l", "$r", "not an element"]);
        let hydrated = from_wire(wire.clone(), &registry()).unwrap();
        assert_eq!(to_wire(&hydrated.node), wire);
    }

    #[test]
    fn test_unresolved_component_reencodes_as_grouping() {
        let wire = json!(["$r", "Ghost", "g", {"tone": "warm", "children": "kept"}]);
        let hydrated = from_wire(wire, &registry()).unwrap();
        assert_eq!(
            to_wire(&hydrated.node),
            json!(["$r", "#group", "g", {"children": "kept"}])
        );
    }
}

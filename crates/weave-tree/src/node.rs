//! Build-time component tree.

use std::collections::BTreeMap;

use crate::{CHILDREN_PROP, GROUPING_IDENTIFIER};

/// Element properties, ordered by name.
pub type Props = BTreeMap<String, Node>;

/// A value in the build-time tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<Node>),
    Map(BTreeMap<String, Node>),
    Element(Element),
}

impl Node {
    /// Borrow the string payload.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the element payload.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Concatenated text of every string reachable through element children.
    ///
    /// Props other than `children` are not visited.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::String(s) => out.push_str(s),
            Self::Number(n) => out.push_str(&n.to_string()),
            Self::List(items) => items.iter().for_each(|n| n.collect_text(out)),
            Self::Element(el) => el.children().iter().for_each(|n| n.collect_text(out)),
            Self::Null | Self::Bool(_) | Self::Map(_) => {}
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::List(value)
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

/// What an element instantiates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Built-in markup tag such as `p` or `h2`.
    Tag(String),
    /// Named component resolved against a registry on the consumer side.
    Component(String),
    /// Transparent container contributing only its children.
    Grouping,
}

impl ElementType {
    /// Name used for this type on the wire.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Tag(name) | Self::Component(name) => name,
            Self::Grouping => GROUPING_IDENTIFIER,
        }
    }
}

/// A component instance in the build-time tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub element_type: ElementType,
    pub key: Option<String>,
    pub props: Props,
}

impl Element {
    #[must_use]
    pub fn new(element_type: ElementType, key: Option<String>, props: Props) -> Self {
        Self {
            element_type,
            key,
            props,
        }
    }

    /// Children of this element, however they are stored.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self.props.get(CHILDREN_PROP) {
            None => &[],
            Some(Node::List(items)) => items,
            Some(single) => std::slice::from_ref(single),
        }
    }

    /// Replace the children: none removes the prop, one is stored bare,
    /// several as a list.
    pub fn set_children(&mut self, mut children: Vec<Node>) {
        match children.len() {
            0 => {
                self.props.remove(CHILDREN_PROP);
            }
            1 => {
                let only = children.pop().unwrap_or_default();
                self.props.insert(CHILDREN_PROP.to_owned(), only);
            }
            _ => {
                self.props.insert(CHILDREN_PROP.to_owned(), Node::List(children));
            }
        }
    }

    /// String-valued prop.
    #[must_use]
    pub fn prop_str(&self, name: &str) -> Option<&str> {
        self.props.get(name).and_then(Node::as_str)
    }

    /// True for a built-in tag with the given name.
    #[must_use]
    pub fn is_tag(&self, name: &str) -> bool {
        matches!(&self.element_type, ElementType::Tag(t) if t == name)
    }
}

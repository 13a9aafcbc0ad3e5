//! Consumer-side component tree.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use weave_tree::CHILDREN_PROP;

use crate::registry::Component;

/// Props of a live element.
pub type LiveProps = BTreeMap<String, LiveNode>;

/// A value in the live tree.
///
/// Deserialized trees and trees built by hand with [`LiveElement::new`] are
/// the same type.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LiveNode {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<LiveNode>),
    Map(BTreeMap<String, LiveNode>),
    Element(LiveElement),
}

impl LiveNode {
    #[must_use]
    pub fn as_element(&self) -> Option<&LiveElement> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for LiveNode {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for LiveNode {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<LiveElement> for LiveNode {
    fn from(value: LiveElement) -> Self {
        Self::Element(value)
    }
}

/// How a live element renders.
#[derive(Clone)]
pub enum ElementKind {
    /// Contributes only its children.
    Fragment,
    /// Built-in markup tag.
    Intrinsic(String),
    /// Registry component.
    Component {
        name: String,
        implementation: Arc<dyn Component>,
    },
}

impl fmt::Debug for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fragment => f.write_str("Fragment"),
            Self::Intrinsic(tag) => f.debug_tuple("Intrinsic").field(tag).finish(),
            Self::Component { name, .. } => f.debug_struct("Component").field("name", name).finish_non_exhaustive(),
        }
    }
}

impl PartialEq for ElementKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fragment, Self::Fragment) => true,
            (Self::Intrinsic(a), Self::Intrinsic(b)) => a == b,
            (
                Self::Component {
                    name: a,
                    implementation: ia,
                },
                Self::Component {
                    name: b,
                    implementation: ib,
                },
            ) => a == b && Arc::ptr_eq(ia, ib),
            _ => false,
        }
    }
}

/// An element of the live tree.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveElement {
    pub kind: ElementKind,
    pub key: Option<String>,
    pub props: LiveProps,
}

impl LiveElement {
    #[must_use]
    pub fn new(kind: ElementKind, key: Option<String>, props: LiveProps) -> Self {
        Self { kind, key, props }
    }

    /// Children of this element, however they are stored.
    #[must_use]
    pub fn children(&self) -> &[LiveNode] {
        match self.props.get(CHILDREN_PROP) {
            None => &[],
            Some(LiveNode::List(items)) => items,
            Some(single) => std::slice::from_ref(single),
        }
    }

    /// Builder-style children setter using the same storage rules as the
    /// build-time tree.
    #[must_use]
    pub fn with_children(mut self, mut children: Vec<LiveNode>) -> Self {
        match children.len() {
            0 => {
                self.props.remove(CHILDREN_PROP);
            }
            1 => {
                let only = children.pop().unwrap_or_default();
                self.props.insert(CHILDREN_PROP.to_owned(), only);
            }
            _ => {
                self.props.insert(CHILDREN_PROP.to_owned(), LiveNode::List(children));
            }
        }
        self
    }

    /// Registry name for component elements.
    #[must_use]
    pub fn component_name(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Component { name, .. } => Some(name),
            _ => None,
        }
    }
}

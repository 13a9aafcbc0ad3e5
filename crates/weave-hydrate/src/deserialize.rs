//! Wire format to live tree.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use weave_tree::{CHILDREN_PROP, ELEMENT_MARKER, GROUPING_IDENTIFIER, LIST_MARKER};

use crate::live::{ElementKind, LiveElement, LiveNode, LiveProps};
use crate::registry::Registry;

/// A component name the registry could not resolve.
///
/// The element is kept as a fragment so its children still render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedComponent {
    pub name: String,
}

impl fmt::Display for UnresolvedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component {}: rendering its children only", self.name)
    }
}

/// Deserialization result.
#[derive(Clone, Debug, PartialEq)]
pub struct Hydrated {
    pub node: LiveNode,
    /// One entry per element whose name could not be resolved.
    pub warnings: Vec<UnresolvedComponent>,
}

/// Errors for input that is not a valid encoded tree.
#[derive(Debug, thiserror::Error)]
pub enum HydrateError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed element: {0}")]
    MalformedElement(&'static str),
}

/// Parse an encoded tree and resolve its component names against `registry`.
///
/// # Errors
///
/// Returns [`HydrateError`] for invalid JSON or malformed element arrays.
/// Unknown component names are not errors; see [`Hydrated::warnings`].
pub fn deserialize(json: &str, registry: &Registry) -> Result<Hydrated, HydrateError> {
    let value: Value = serde_json::from_str(json)?;
    from_wire(value, registry)
}

/// [`deserialize`] for an already parsed JSON value.
///
/// # Errors
///
/// Returns [`HydrateError::MalformedElement`] for malformed element arrays.
pub fn from_wire(value: Value, registry: &Registry) -> Result<Hydrated, HydrateError> {
    let mut reviver = Reviver {
        registry,
        warnings: Vec::new(),
    };
    let node = reviver.revive(value)?;
    Ok(Hydrated {
        node,
        warnings: reviver.warnings,
    })
}

struct Reviver<'a> {
    registry: &'a Registry,
    warnings: Vec<UnresolvedComponent>,
}

impl Reviver<'_> {
    fn revive(&mut self, value: Value) -> Result<LiveNode, HydrateError> {
        Ok(match value {
            Value::Null => LiveNode::Null,
            Value::Bool(b) => LiveNode::Bool(b),
            Value::Number(n) => LiveNode::Number(n),
            Value::String(s) => LiveNode::String(s),
            Value::Object(map) => LiveNode::Map(self.revive_map(map)?),
            Value::Array(items) => match items.first() {
                Some(Value::String(marker)) if marker == ELEMENT_MARKER => {
                    LiveNode::Element(self.revive_element(items)?)
                }
                Some(Value::String(marker)) if marker == LIST_MARKER => {
                    LiveNode::List(self.revive_list(items.into_iter().skip(1))?)
                }
                _ => LiveNode::List(self.revive_list(items.into_iter())?),
            },
        })
    }

    fn revive_list(
        &mut self,
        items: impl Iterator<Item = Value>,
    ) -> Result<Vec<LiveNode>, HydrateError> {
        items.map(|item| self.revive(item)).collect()
    }

    fn revive_map(&mut self, map: Map<String, Value>) -> Result<LiveProps, HydrateError> {
        map.into_iter()
            .map(|(k, v)| Ok((k, self.revive(v)?)))
            .collect()
    }

    fn revive_element(&mut self, items: Vec<Value>) -> Result<LiveElement, HydrateError> {
        let [_, identifier, key, props]: [Value; 4] = items
            .try_into()
            .map_err(|_| HydrateError::MalformedElement("expected 4 items"))?;

        let Value::String(identifier) = identifier else {
            return Err(HydrateError::MalformedElement("identifier must be a string"));
        };
        let key = match key {
            Value::Null => None,
            Value::String(key) => Some(key),
            _ => return Err(HydrateError::MalformedElement("key must be a string or null")),
        };
        let Value::Object(props) = props else {
            return Err(HydrateError::MalformedElement("props must be an object"));
        };

        if identifier == GROUPING_IDENTIFIER {
            let props = self.children_only(props)?;
            return Ok(LiveElement::new(ElementKind::Fragment, key, props));
        }

        if let Some(implementation) = self.registry.get(&identifier) {
            let kind = ElementKind::Component {
                name: identifier,
                implementation: Arc::clone(implementation),
            };
            return Ok(LiveElement::new(kind, key, self.revive_map(props)?));
        }

        if identifier.starts_with(|c: char| c.is_lowercase()) {
            let props = self.revive_map(props)?;
            return Ok(LiveElement::new(ElementKind::Intrinsic(identifier), key, props));
        }

        tracing::warn!(component = %identifier, "unknown component, rendering its children only");
        self.warnings.push(UnresolvedComponent { name: identifier });
        let props = self.children_only(props)?;
        Ok(LiveElement::new(ElementKind::Fragment, key, props))
    }

    fn children_only(&mut self, mut props: Map<String, Value>) -> Result<LiveProps, HydrateError> {
        let mut kept = LiveProps::new();
        if let Some(children) = props.remove(CHILDREN_PROP) {
            kept.insert(CHILDREN_PROP.to_owned(), self.revive(children)?);
        }
        Ok(kept)
    }
}

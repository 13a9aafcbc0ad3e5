//! Component tree model and wire serializer for docweave.
//!
//! The build side materializes documents into a [`Node`] tree whose elements
//! are built-in tags, named components, or the transparent grouping element.
//! [`serialize`] turns that tree into JSON in which every element is a
//! `["$r", identifier, key, props]` array; the consumer resolves identifiers
//! against its own registry.
//!
//! # Example
//!
//! ```
//! use weave_tree::{Element, ElementType, Node, Props, serialize};
//!
//! let mut el = Element::new(ElementType::Tag("p".to_owned()), None, Props::new());
//! el.set_children(vec![Node::from("Hello")]);
//!
//! let json = serialize(&Node::Element(el)).unwrap();
//! assert_eq!(json, r#"["$r","p",null,{"children":"Hello"}]"#);
//! ```

mod node;
mod wire;

pub use node::{Element, ElementType, Node, Props};
pub use wire::{serialize, to_wire};

/// Wire identifier of the grouping element. Never a valid component name.
pub const GROUPING_IDENTIFIER: &str = "#group";

/// First item of an encoded element.
pub const ELEMENT_MARKER: &str = "$r";

/// First item of an escaped literal list.
pub const LIST_MARKER: &str = "$l";

/// Prop holding an element's children.
pub const CHILDREN_PROP: &str = "children";

/// Build-time bookkeeping props that never cross the wire.
pub const INTERNAL_PROPS: [&str; 3] = ["debugType", "originalType", "parentName"];

/// True if `name` can be used as a component name.
///
/// Component names are ASCII identifiers (`[A-Za-z_][A-Za-z0-9_]*`); the
/// grouping identifier is never one.
#[must_use]
pub fn is_component_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(Node: Send, Sync);

    #[test]
    fn test_component_names() {
        for ok in ["Intro", "_private", "Note2", "a"] {
            assert!(is_component_name(ok), "{ok}");
        }
        for bad in ["", "2Fast", "Foo.Bar", "my-comp", GROUPING_IDENTIFIER, "Émoji"] {
            assert!(!is_component_name(bad), "{bad}");
        }
    }
}

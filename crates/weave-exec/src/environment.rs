//! Names a compiled unit may import, and the one capability it is given.

use std::collections::HashMap;

use weave_tree::{Element, ElementType, Node, Props};

/// Tree construction capability handed to a running unit.
///
/// This is the only way a unit affects the world: every element it produces
/// goes through [`create_element`](Self::create_element).
pub trait TreeBuilder {
    /// Build one element.
    fn create_element(
        &mut self,
        element_type: ElementType,
        key: Option<String>,
        props: Props,
        children: Vec<Node>,
    ) -> Node;
}

/// Default [`TreeBuilder`] producing plain [`Element`] nodes.
#[derive(Debug, Default)]
pub struct ElementFactory;

impl TreeBuilder for ElementFactory {
    fn create_element(
        &mut self,
        element_type: ElementType,
        key: Option<String>,
        props: Props,
        children: Vec<Node>,
    ) -> Node {
        let mut element = Element::new(element_type, key, props);
        element.set_children(children);
        Node::Element(element)
    }
}

/// Value a name is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub element_type: ElementType,
    /// Stand-ins resolve to their own name and are tagged with
    /// `originalType` so consumers can tell what was declared.
    pub stand_in: bool,
}

/// Names available for `import`.
#[derive(Clone, Debug, Default)]
pub struct BindingEnvironment {
    bindings: HashMap<String, Binding>,
}

impl BindingEnvironment {
    /// An environment with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind every name to a stand-in component of the same name.
    #[must_use]
    pub fn stand_ins(names: &[String]) -> Self {
        let mut env = Self::new();
        for name in names {
            env.bindings.insert(
                name.clone(),
                Binding {
                    element_type: ElementType::Component(name.clone()),
                    stand_in: true,
                },
            );
        }
        env
    }

    /// Bind `name` to an explicit element type.
    pub fn bind(&mut self, name: impl Into<String>, element_type: ElementType) {
        self.bindings.insert(
            name.into(),
            Binding {
                element_type,
                stand_in: false,
            },
        );
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stand_ins_resolve_to_own_name() {
        let env = BindingEnvironment::stand_ins(&["Intro".to_owned(), "Note".to_owned()]);
        assert_eq!(env.len(), 2);
        let binding = env.get("Note").unwrap();
        assert_eq!(binding.element_type, ElementType::Component("Note".to_owned()));
        assert!(binding.stand_in);
        assert!(env.get("Other").is_none());
    }

    #[test]
    fn test_explicit_binding() {
        let mut env = BindingEnvironment::new();
        env.bind("Aside", ElementType::Tag("aside".to_owned()));
        let binding = env.get("Aside").unwrap();
        assert_eq!(binding.element_type, ElementType::Tag("aside".to_owned()));
        assert!(!binding.stand_in);
    }

    #[test]
    fn test_factory_stores_children() {
        let node = ElementFactory.create_element(
            ElementType::Tag("p".to_owned()),
            None,
            Props::new(),
            vec![Node::from("hi")],
        );
        let el = node.as_element().unwrap();
        assert_eq!(el.children(), [Node::from("hi")]);
    }
}

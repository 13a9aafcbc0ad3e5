//! Document syntax tree produced by the front-end and rewritten by transforms.

use std::collections::BTreeMap;

use serde_json::Value;

/// A node of the document syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Element(AstElement),
    Text(String),
}

/// What an element refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AstKind {
    /// Built-in markup tag.
    Tag(String),
    /// Imported component binding.
    Component(String),
}

/// An element with literal attributes and child nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct AstElement {
    pub kind: AstKind,
    pub key: Option<String>,
    pub attrs: BTreeMap<String, Value>,
    pub children: Vec<AstNode>,
}

impl AstElement {
    /// Element for a built-in tag.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::new(AstKind::Tag(name.to_owned()))
    }

    /// Element for a component binding.
    #[must_use]
    pub fn component(name: &str) -> Self {
        Self::new(AstKind::Component(name.to_owned()))
    }

    fn new(kind: AstKind) -> Self {
        Self {
            kind,
            key: None,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_owned(), value.into());
        self
    }

    /// True for the built-in tag `name`.
    #[must_use]
    pub fn is_tag(&self, name: &str) -> bool {
        matches!(&self.kind, AstKind::Tag(t) if t == name)
    }

    /// Heading level for `h1`..`h6`.
    #[must_use]
    pub fn heading_level(&self) -> Option<u8> {
        let AstKind::Tag(name) = &self.kind else {
            return None;
        };
        match name.as_str() {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    /// String attribute value.
    #[must_use]
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    /// Concatenated text of all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Append a child, merging adjacent text.
    pub fn push(&mut self, node: AstNode) {
        push_node(&mut self.children, node);
    }
}

impl From<AstElement> for AstNode {
    fn from(el: AstElement) -> Self {
        Self::Element(el)
    }
}

/// Append `node` to `nodes`, merging it into a trailing text node.
pub(crate) fn push_node(nodes: &mut Vec<AstNode>, node: AstNode) {
    if let AstNode::Text(text) = &node
        && let Some(AstNode::Text(last)) = nodes.last_mut()
    {
        last.push_str(text);
        return;
    }
    nodes.push(node);
}

fn collect_text(nodes: &[AstNode], out: &mut String) {
    for node in nodes {
        match node {
            AstNode::Text(text) => out.push_str(text),
            AstNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Visit every element depth-first, parents before children.
pub fn walk_elements_mut(nodes: &mut [AstNode], f: &mut dyn FnMut(&mut AstElement)) {
    for node in nodes {
        if let AstNode::Element(el) = node {
            f(el);
            walk_elements_mut(&mut el.children, f);
        }
    }
}

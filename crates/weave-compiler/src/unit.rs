//! Compiled unit text and lowering from the syntax tree.
//!
//! A unit is line-oriented. The first line is [`UNIT_HEADER`]; each following
//! line is one instruction:
//!
//! | instruction          | meaning                                     |
//! |----------------------|---------------------------------------------|
//! | `import Name`        | bind `Name` from the environment            |
//! | `open tag`           | start a built-in element                    |
//! | `open @Name`         | start an element of an imported binding     |
//! | `key "k"`            | set the key of the open element             |
//! | `prop name <json>`   | set a prop of the open element              |
//! | `text "..."`         | append a text child                         |
//! | `close`              | finish the open element                     |
//!
//! String arguments and prop values are JSON literals.

use std::fmt;

use serde_json::Value;

use crate::ast::{AstElement, AstKind, AstNode};

/// Unit format version. Part of every fingerprint.
pub const UNIT_FORMAT_VERSION: u32 = 1;

/// First line of every compiled unit.
pub const UNIT_HEADER: &str = "#!weave-unit 1";

/// Executable output of the compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledUnit(String);

impl CompiledUnit {
    /// Wrap unit text, checking the header line.
    ///
    /// Returns `None` when the text is not a unit of the current format.
    #[must_use]
    pub fn from_text(text: String) -> Option<Self> {
        let first = text.lines().next()?;
        (first == UNIT_HEADER).then_some(Self(text))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CompiledUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Emit unit text for a bound syntax tree.
pub(crate) fn lower(bindings: &[String], nodes: &[AstNode]) -> CompiledUnit {
    let mut out = String::with_capacity(1024);
    out.push_str(UNIT_HEADER);
    out.push('\n');
    for name in bindings {
        out.push_str("import ");
        out.push_str(name);
        out.push('\n');
    }
    for node in nodes {
        lower_node(node, &mut out);
    }
    CompiledUnit(out)
}

fn lower_node(node: &AstNode, out: &mut String) {
    match node {
        AstNode::Text(text) => {
            out.push_str("text ");
            out.push_str(&json_string(text));
            out.push('\n');
        }
        AstNode::Element(el) => lower_element(el, out),
    }
}

fn lower_element(el: &AstElement, out: &mut String) {
    match &el.kind {
        AstKind::Tag(tag) => {
            out.push_str("open ");
            out.push_str(tag);
        }
        AstKind::Component(name) => {
            out.push_str("open @");
            out.push_str(name);
        }
    }
    out.push('\n');

    if let Some(key) = &el.key {
        out.push_str("key ");
        out.push_str(&json_string(key));
        out.push('\n');
    }
    for (name, value) in &el.attrs {
        out.push_str("prop ");
        out.push_str(name);
        out.push(' ');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    for child in &el.children {
        lower_node(child, out);
    }
    out.push_str("close\n");
}

fn json_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_lower_elements_and_text() {
        let mut p = AstElement::tag("p");
        p.push(AstNode::Text("Hello\n\"world\"".to_owned()));
        let mut intro = AstElement::component("Intro").with_attr("title", "Hi");
        intro.key = Some("k".to_owned());

        let unit = lower(&["Intro".to_owned()], &[p.into(), intro.into()]);
        assert_eq!(
            unit.as_str(),
            "#!weave-unit 1\n\
             import Intro\n\
             open p\n\
             text \"Hello\\n\\\"world\\\"\"\n\
             close\n\
             open @Intro\n\
             key \"k\"\n\
             prop title \"Hi\"\n\
             close\n"
        );
    }

    #[test]
    fn test_prop_values_are_json() {
        let el = AstElement::tag("ol")
            .with_attr("start", 3)
            .with_attr("data", serde_json::json!({"a": [1, true]}));
        let unit = lower(&[], &[el.into()]);
        assert!(unit.as_str().contains("prop data {\"a\":[1,true]}\n"));
        assert!(unit.as_str().contains("prop start 3\n"));
    }

    #[test]
    fn test_from_text_checks_header() {
        assert!(CompiledUnit::from_text("#!weave-unit 1\nclose\n".to_owned()).is_some());
        assert!(CompiledUnit::from_text("#!weave-unit 0\n".to_owned()).is_none());
        assert!(CompiledUnit::from_text(String::new()).is_none());
    }
}

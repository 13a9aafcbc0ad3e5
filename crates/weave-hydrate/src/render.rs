//! HTML rendering of live trees.

use std::fmt::Write;

use weave_tree::CHILDREN_PROP;

use crate::live::{ElementKind, LiveElement, LiveNode};

/// Tags rendered without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render a live tree to an HTML string.
///
/// Fragments render their children, intrinsic elements render as tags and
/// components render through their registry implementation. Maps, nulls and
/// booleans render nothing.
#[must_use]
pub fn render_to_string(node: &LiveNode) -> String {
    let mut out = String::new();
    render_node(node, &mut out);
    out
}

fn render_node(node: &LiveNode, out: &mut String) {
    match node {
        LiveNode::Null | LiveNode::Bool(_) | LiveNode::Map(_) => {}
        LiveNode::Number(n) => out.push_str(&n.to_string()),
        LiveNode::String(s) => out.push_str(&escape_html(s)),
        LiveNode::List(items) => items.iter().for_each(|item| render_node(item, out)),
        LiveNode::Element(el) => render_element(el, out),
    }
}

fn render_children(el: &LiveElement) -> String {
    let mut out = String::new();
    for child in el.children() {
        render_node(child, &mut out);
    }
    out
}

fn render_element(el: &LiveElement, out: &mut String) {
    match &el.kind {
        ElementKind::Fragment => out.push_str(&render_children(el)),
        ElementKind::Component { implementation, .. } => {
            let children = render_children(el);
            out.push_str(&implementation.render(&el.props, &children));
        }
        ElementKind::Intrinsic(tag) => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in &el.props {
                if name == CHILDREN_PROP {
                    continue;
                }
                write_attr(name, value, out);
            }
            out.push('>');
            if VOID_TAGS.contains(&tag.as_str()) {
                return;
            }
            out.push_str(&render_children(el));
            let _ = write!(out, "</{tag}>");
        }
    }
}

fn write_attr(name: &str, value: &LiveNode, out: &mut String) {
    let name = match name {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    };
    let value = match value {
        LiveNode::Null | LiveNode::Bool(false) => return,
        LiveNode::Bool(true) => {
            let _ = write!(out, " {name}");
            return;
        }
        LiveNode::String(s) => s.clone(),
        LiveNode::Number(n) => n.to_string(),
        LiveNode::Map(map) if name == "style" => map
            .iter()
            .filter_map(|(prop, v)| {
                let v = match v {
                    LiveNode::String(s) => s.clone(),
                    LiveNode::Number(n) => n.to_string(),
                    _ => return None,
                };
                Some(format!("{}:{v}", css_property(prop)))
            })
            .collect::<Vec<_>>()
            .join(";"),
        LiveNode::List(_) | LiveNode::Map(_) | LiveNode::Element(_) => return,
    };
    let _ = write!(out, " {name}=\"{}\"", escape_html(&value));
}

/// Convert a camel-case name to kebab case: `CodeGroup` becomes `code-group`.
#[must_use]
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// CSS property for a style key. A leading capital marks a vendor prefix:
/// `WebkitTransition` becomes `-webkit-transition`.
fn css_property(prop: &str) -> String {
    if prop.starts_with(|c: char| c.is_ascii_uppercase()) {
        format!("-{}", kebab_case(prop))
    } else {
        kebab_case(prop)
    }
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::deserialize::deserialize;
    use crate::live::LiveProps;
    use crate::registry::Registry;

    fn intrinsic(tag: &str, props: Vec<(&str, LiveNode)>, children: Vec<LiveNode>) -> LiveNode {
        let props: LiveProps = props.into_iter().map(|(k, v)| (k.to_owned(), v)).collect();
        LiveElement::new(ElementKind::Intrinsic(tag.to_owned()), None, props)
            .with_children(children)
            .into()
    }

    #[test]
    fn test_intrinsic_with_attributes() {
        let node = intrinsic(
            "a",
            vec![
                ("href", "/x?a=1&b=2".into()),
                ("className", "link".into()),
                ("hidden", LiveNode::Bool(false)),
            ],
            vec!["Go <now>".into()],
        );
        assert_eq!(
            render_to_string(&node),
            "<a class=\"link\" href=\"/x?a=1&amp;b=2\">Go &lt;now&gt;</a>"
        );
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let node = intrinsic(
            "input",
            vec![("type", "checkbox".into()), ("checked", LiveNode::Bool(true))],
            vec![],
        );
        assert_eq!(render_to_string(&node), "<input checked type=\"checkbox\">");
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("Note"), "note");
        assert_eq!(kebab_case("CodeGroup"), "code-group");
        assert_eq!(kebab_case("zIndex"), "z-index");
        assert_eq!(css_property("WebkitTransition"), "-webkit-transition");
        assert_eq!(css_property("fontSize"), "font-size");
    }

    #[test]
    fn test_style_map() {
        let style = LiveNode::Map(
            [
                ("textAlign".to_owned(), LiveNode::from("center")),
                ("zIndex".to_owned(), LiveNode::Number(2.into())),
            ]
            .into_iter()
            .collect(),
        );
        let node = intrinsic("td", vec![("style", style)], vec![]);
        assert_eq!(
            render_to_string(&node),
            "<td style=\"text-align:center;z-index:2\"></td>"
        );
    }

    #[test]
    fn test_components_and_fragments_from_wire() {
        let registry = Registry::new().with("Note", |props: &LiveProps, children: &str| {
            let tone = props.get("tone").and_then(LiveNode::as_str).unwrap_or("plain");
            format!("<aside class=\"note-{tone}\">{children}</aside>")
        });
        let json = r##"["$r","#group",null,{"children":[
            ["$r","h2",null,{"id":"intro","children":"Intro"}],
            ["$r","Note",null,{"tone":"warm","children":["$r","p",null,{"children":"Careful"}]}],
            ["$r","Unknown",null,{"children":"kept"}]
        ]}]"##;
        let hydrated = deserialize(json, &registry).unwrap();
        assert_eq!(hydrated.warnings.len(), 1);
        assert_eq!(
            render_to_string(&hydrated.node),
            "<h2 id=\"intro\">Intro</h2><aside class=\"note-warm\"><p>Careful</p></aside>kept"
        );
    }
}

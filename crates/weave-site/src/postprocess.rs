//! Table of contents extraction and child filtering.

use weave_storage::LogicalPath;
use weave_tree::{Element, ElementType, Node, Props};

/// Output of a [`Postprocessor`].
#[derive(Clone, Debug, PartialEq)]
pub struct Processed {
    /// Table of contents, serialized next to the content.
    pub toc: Node,
    /// Replaces the executor's root as the serialization input.
    pub children: Node,
}

/// Splits an executed tree into page content and table of contents.
pub trait Postprocessor: Send + Sync {
    fn process(&self, path: &LogicalPath, root: &Node) -> Processed;
}

/// One table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    /// Fragment link, e.g. `#install`.
    pub url: String,
    /// Heading level.
    pub depth: u8,
    /// Heading text.
    pub text: String,
}

impl TocEntry {
    fn overview() -> Self {
        Self {
            url: "#".to_owned(),
            depth: 2,
            text: "Overview".to_owned(),
        }
    }

    fn into_node(self) -> Node {
        Node::Map(
            [
                ("url".to_owned(), Node::from(self.url)),
                ("depth".to_owned(), Node::from(i64::from(self.depth))),
                ("text".to_owned(), Node::from(self.text)),
            ]
            .into_iter()
            .collect(),
        )
    }
}

/// Default postprocessor.
///
/// The toc lists `h2` and `h3` headings that carry an `id`, anywhere in the
/// tree, preceded by an "Overview" entry linking to the top of the page. The
/// site root never gets a toc. Whitespace-only strings are dropped from the
/// root's direct children.
#[derive(Debug, Default)]
pub struct TocPostprocessor;

impl TocPostprocessor {
    /// Headings for the toc, in document order.
    #[must_use]
    pub fn entries(root: &Node) -> Vec<TocEntry> {
        let mut entries = Vec::new();
        collect_headings(root, &mut entries);
        if !entries.is_empty() {
            entries.insert(0, TocEntry::overview());
        }
        entries
    }
}

impl Postprocessor for TocPostprocessor {
    fn process(&self, path: &LogicalPath, root: &Node) -> Processed {
        let toc = if path.is_root() {
            Vec::new()
        } else {
            Self::entries(root)
        };

        let (key, children) = match root {
            Node::Element(el) => (el.key.clone(), el.children().to_vec()),
            other => (None, vec![other.clone()]),
        };
        let children = children
            .into_iter()
            .filter(|child| !matches!(child, Node::String(s) if s.trim().is_empty()))
            .collect();

        let mut group = Element::new(ElementType::Grouping, key, Props::new());
        group.set_children(children);

        Processed {
            toc: Node::List(toc.into_iter().map(TocEntry::into_node).collect()),
            children: Node::Element(group),
        }
    }
}

fn collect_headings(node: &Node, out: &mut Vec<TocEntry>) {
    match node {
        Node::List(items) => items.iter().for_each(|item| collect_headings(item, out)),
        Node::Element(el) => {
            if let Some(depth) = heading_depth(el)
                && let Some(id) = el.prop_str("id")
            {
                out.push(TocEntry {
                    url: format!("#{id}"),
                    depth,
                    text: node.text_content().trim().to_owned(),
                });
                return;
            }
            el.children()
                .iter()
                .for_each(|child| collect_headings(child, out));
        }
        _ => {}
    }
}

fn heading_depth(el: &Element) -> Option<u8> {
    if el.is_tag("h2") {
        Some(2)
    } else if el.is_tag("h3") {
        Some(3)
    } else {
        None
    }
}

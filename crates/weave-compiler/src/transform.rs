//! Syntax-tree transforms run between parsing and lowering.

use std::collections::HashMap;

use crate::ast::{AstElement, AstNode, walk_elements_mut};

/// A plugin that rewrites the document tree before it is lowered.
///
/// Transforms run in the order they were added to the compiler. They must be
/// deterministic: the compiled unit is cached by a fingerprint that does not
/// include transform state.
pub trait Transform: Send + Sync {
    /// Name used in log output.
    fn name(&self) -> &'static str;

    /// Rewrite the tree in place.
    fn apply(&self, nodes: &mut Vec<AstNode>);
}

/// Assigns slug ids to headings that do not have one.
///
/// Ids are unique within a document: repeated slugs get `-1`, `-2`, ...
/// suffixes. Explicit ids are kept and reserved.
#[derive(Debug, Default)]
pub struct HeadingIds;

impl Transform for HeadingIds {
    fn name(&self) -> &'static str {
        "heading-ids"
    }

    fn apply(&self, nodes: &mut Vec<AstNode>) {
        let mut counts: HashMap<String, usize> = HashMap::new();
        walk_elements_mut(nodes, &mut |el| {
            if el.heading_level().is_some()
                && let Some(id) = el.attr_str("id")
            {
                counts.insert(id.to_owned(), 1);
            }
        });

        walk_elements_mut(nodes, &mut |el| {
            if el.heading_level().is_none() || el.attrs.contains_key("id") {
                return;
            }
            let base = slugify(&el.text_content());
            if base.is_empty() {
                return;
            }
            let count = counts.entry(base.clone()).or_default();
            let id = match *count {
                0 => base,
                n => format!("{base}-{n}"),
            };
            *count += 1;
            el.attrs.insert("id".to_owned(), id.into());
        });
    }
}

/// Opens absolute `http(s)` links in a new tab.
#[derive(Debug, Default)]
pub struct ExternalLinks;

impl Transform for ExternalLinks {
    fn name(&self) -> &'static str {
        "external-links"
    }

    fn apply(&self, nodes: &mut Vec<AstNode>) {
        walk_elements_mut(nodes, &mut mark_external);
    }
}

fn mark_external(el: &mut AstElement) {
    if !el.is_tag("a") {
        return;
    }
    let external = el
        .attr_str("href")
        .is_some_and(|href| href.starts_with("http://") || href.starts_with("https://"));
    if external {
        el.attrs
            .entry("target".to_owned())
            .or_insert_with(|| "_blank".into());
        el.attrs
            .entry("rel".to_owned())
            .or_insert_with(|| "nofollow noopener noreferrer".into());
    }
}

/// Convert text to a URL-safe slug.
///
/// Lowercases ASCII alphanumerics, turns runs of whitespace, dashes and
/// underscores into single dashes, and drops everything else.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    result
}

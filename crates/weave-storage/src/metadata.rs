//! Document metadata parsed from YAML frontmatter.
//!
//! Well-known keys get typed fields; every other key is preserved verbatim in
//! [`Metadata::extra`] so page templates can read it without this crate
//! knowing about it.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Document metadata.
///
/// All fields are optional. `author` and `redirect_from` accept either a
/// single string or a list in the source and are always lists here.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Page title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Sort position among siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    /// Previous page in reading order (a page id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,

    /// Next page in reading order (a page id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,

    /// Explicit public URL for the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,

    /// Page authors.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub author: Vec<String>,

    /// Old URLs that should redirect to this page.
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub redirect_from: Vec<String>,

    /// Any other frontmatter keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Metadata {
    /// Parse metadata from YAML content.
    ///
    /// Empty or whitespace-only content returns a default instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or is not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, MetadataError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(trimmed).map_err(|e| MetadataError::Parse(format!("Invalid YAML: {e}")))
    }

    /// Check if metadata has any non-default values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Error type for metadata operations.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// YAML parsing error.
    #[error("{0}")]
    Parse(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_empty_yaml() {
        let meta = Metadata::from_yaml("   \n\t  ").unwrap();
        assert!(meta.is_empty());
    }

    #[test]
    fn test_parse_typed_fields() {
        let yaml = r#"
title: "Hooks at a Glance"
order: 3
prev: hooks-intro
next: hooks-state
permalink: docs/hooks-overview.html
author: [gaearon, acdlite]
redirect_from: docs/hooks.html
"#;
        let meta = Metadata::from_yaml(yaml).unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hooks at a Glance"));
        assert_eq!(meta.order, Some(3));
        assert_eq!(meta.prev.as_deref(), Some("hooks-intro"));
        assert_eq!(meta.next.as_deref(), Some("hooks-state"));
        assert_eq!(meta.permalink.as_deref(), Some("docs/hooks-overview.html"));
        assert_eq!(meta.author, vec!["gaearon".to_owned(), "acdlite".to_owned()]);
        assert_eq!(meta.redirect_from, vec!["docs/hooks.html".to_owned()]);
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_unknown_keys_kept_in_extra() {
        let yaml = "title: T\nlayout: docs\ntags:\n  - a\n  - b\n";
        let meta = Metadata::from_yaml(yaml).unwrap();
        assert_eq!(meta.extra.get("layout"), Some(&serde_json::json!("docs")));
        assert_eq!(meta.extra.get("tags"), Some(&serde_json::json!(["a", "b"])));
    }

    #[test]
    fn test_serialize_skips_absent_fields() {
        let meta = Metadata {
            title: Some("Intro".to_owned()),
            author: vec!["sophie".to_owned()],
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json, serde_json::json!({"title": "Intro", "author": ["sophie"]}));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(Metadata::from_yaml("title: [invalid yaml").is_err());
    }

    #[test]
    fn test_parse_non_mapping_is_error() {
        assert!(Metadata::from_yaml("- just\n- a list\n").is_err());
    }
}

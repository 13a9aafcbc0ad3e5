//! Logical document paths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::storage::{StorageError, StorageErrorKind};

/// Segment name that maps to a directory's own document.
pub(crate) const INDEX_SEGMENT: &str = "index";

/// Backend-independent identifier of a document.
///
/// An ordered list of segments: `["guide", "setup"]` is displayed as
/// `guide/setup`, the empty path is the site root. Segments are validated so
/// a logical path can never address anything outside the content root.
///
/// Serialized as a JSON array of segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LogicalPath {
    segments: Vec<String>,
}

impl LogicalPath {
    /// The site root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from segments.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] if any segment is empty,
    /// `.`/`..`, or contains a path separator.
    pub fn new<I, S>(segments: I) -> Result<Self, StorageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if let Some(bad) = segments.iter().find(|s| !is_valid_segment(s)) {
            return Err(StorageError::new(StorageErrorKind::InvalidPath).with_path(bad.as_str()));
        }
        Ok(Self { segments })
    }

    /// Parse a `/`-separated path. Leading and trailing slashes are ignored,
    /// so both `""` and `"/"` address the root.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] for empty inner segments or
    /// traversal components.
    pub fn parse(path: &str) -> Result<Self, StorageError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        Self::new(trimmed.split('/')).map_err(|e| e.with_path(path))
    }

    /// Path segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// True for the site root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl TryFrom<Vec<String>> for LogicalPath {
    type Error = StorageError;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(segments)
    }
}

impl From<LogicalPath> for Vec<String> {
    fn from(path: LogicalPath) -> Self {
        path.segments
    }
}

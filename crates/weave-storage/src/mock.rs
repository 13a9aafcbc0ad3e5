//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::frontmatter::parse_document;
use crate::path::LogicalPath;
use crate::storage::{Document, Storage, StorageError};

const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Holds raw document text (frontmatter included) in memory, keyed by logical
/// path. Use the builder methods to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use weave_storage::{LogicalPath, MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_document("guide", "---\ntitle: Guide\n---\n# Guide");
///
/// let paths = storage.scan().unwrap();
/// let doc = storage.read(&LogicalPath::parse("guide").unwrap()).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    documents: RwLock<BTreeMap<LogicalPath, String>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under a `/`-separated logical path.
    ///
    /// # Panics
    ///
    /// Panics if the path is invalid or the internal lock is poisoned.
    #[must_use]
    pub fn with_document(self, path: &str, raw: impl Into<String>) -> Self {
        self.insert(path, raw);
        self
    }

    /// Add or replace a document after construction.
    ///
    /// # Panics
    ///
    /// Panics if the path is invalid or the internal lock is poisoned.
    pub fn insert(&self, path: &str, raw: impl Into<String>) {
        let path = LogicalPath::parse(path).expect("mock document path must be valid");
        self.documents.write().unwrap().insert(path, raw.into());
    }

    /// Remove a document.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove(&self, path: &LogicalPath) {
        self.documents.write().unwrap().remove(path);
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<LogicalPath>, StorageError> {
        Ok(self.documents.read().unwrap().keys().cloned().collect())
    }

    fn read(&self, path: &LogicalPath) -> Result<Document, StorageError> {
        let docs = self.documents.read().unwrap();
        let raw = docs
            .get(path)
            .ok_or_else(|| StorageError::not_found(path.to_string()).with_backend(BACKEND))?;
        parse_document(path, raw, BACKEND)
    }

    fn exists(&self, path: &LogicalPath) -> bool {
        self.documents.read().unwrap().contains_key(path)
    }
}

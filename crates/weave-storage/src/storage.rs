//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for reading and enumerating documents,
//! along with [`StorageError`] for unified error handling across backends.

use std::path::PathBuf;

use crate::metadata::Metadata;
use crate::path::LogicalPath;

/// A document read from the content store.
///
/// Immutable once read: the build pipeline consumes the body and carries the
/// metadata through to the page payload unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Logical path the document was requested under.
    pub path: LogicalPath,
    /// Parsed frontmatter (default when the document has none).
    pub metadata: Metadata,
    /// Marked-up body text with the frontmatter block removed.
    pub body: String,
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Document does not exist under any supported layout.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or identifier.
    InvalidPath,
    /// Frontmatter is present but malformed.
    InvalidMetadata,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }

    /// True when the document is missing under every supported layout.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidMetadata => "Invalid frontmatter",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for document reading and enumeration.
///
/// Implementations map [`LogicalPath`]s to their own layout. Both operations
/// are synchronous and safe to call from several build threads at once.
pub trait Storage: Send + Sync {
    /// Enumerate every document reachable from the content root.
    ///
    /// The result is sorted and contains each logical path exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the content root is missing or a directory
    /// cannot be listed.
    fn scan(&self) -> Result<Vec<LogicalPath>, StorageError>;

    /// Read a document and split its frontmatter from its body.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] if no layout holds the document
    /// and [`StorageErrorKind::InvalidMetadata`] for malformed frontmatter.
    fn read(&self, path: &LogicalPath) -> Result<Document, StorageError>;

    /// Check if a document exists at the given logical path.
    ///
    /// Returns `false` on errors.
    fn exists(&self, path: &LogicalPath) -> bool;
}

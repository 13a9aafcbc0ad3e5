//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading documents from a content directory and
//! enumerating every document in it.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::frontmatter::parse_document;
use crate::path::{INDEX_SEGMENT, LogicalPath};
use crate::storage::{Document, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a content directory.
///
/// A logical path `a/b` resolves to `a/b.md`, falling back to `a/b/index.md`.
/// The root path resolves to `index.md`. A path ending in an `index` segment
/// addresses nothing: `a/index/index.md` would shadow `a/index.md`, so it is
/// skipped when scanning.
pub struct FsStorage {
    source_dir: PathBuf,
    extension: String,
}

impl FsStorage {
    /// Create a storage reading `.md` documents under `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self::with_extension(source_dir, "md")
    }

    /// Create a storage reading documents with a custom file extension.
    #[must_use]
    pub fn with_extension(source_dir: PathBuf, extension: &str) -> Self {
        Self {
            source_dir,
            extension: extension.trim_start_matches('.').to_owned(),
        }
    }

    /// Content root directory.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Candidate files for a logical path, in resolution order.
    fn candidates(&self, path: &LogicalPath) -> Vec<PathBuf> {
        let index_file = format!("{INDEX_SEGMENT}.{}", self.extension);
        let Some((last, parents)) = path.segments().split_last() else {
            return vec![self.source_dir.join(index_file)];
        };
        if last == INDEX_SEGMENT {
            return Vec::new();
        }
        let dir = parents
            .iter()
            .fold(self.source_dir.clone(), |acc, seg| acc.join(seg));
        vec![
            dir.join(format!("{last}.{}", self.extension)),
            dir.join(last).join(index_file),
        ]
    }

    /// Derive the logical path for a document file relative to the root.
    fn logical_path(&self, rel: &Path) -> Option<LogicalPath> {
        let mut segments = Vec::new();
        for component in rel.components() {
            segments.push(component.as_os_str().to_str()?.to_owned());
        }
        let last = segments.pop()?;
        let stem = last.strip_suffix(&format!(".{}", self.extension))?;
        if stem != INDEX_SEGMENT {
            segments.push(stem.to_owned());
        }
        LogicalPath::new(segments).ok()
    }

    /// Walk `dir` and record every document file.
    fn scan_directory(
        &self,
        dir: &Path,
        found: &mut BTreeMap<LogicalPath, PathBuf>,
    ) -> Result<(), StorageError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| StorageError::io(e, Some(dir.to_path_buf())).with_backend(BACKEND))?;
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                self.scan_directory(&path, found)?;
                continue;
            }
            if path.extension().is_none_or(|e| *e != *self.extension) {
                continue;
            }

            let rel = path.strip_prefix(&self.source_dir).unwrap_or(&path);
            let Some(logical) = self.logical_path(rel) else {
                tracing::warn!(path = %path.display(), "skipping document with unusable file name");
                continue;
            };
            if logical.segments().last().is_some_and(|s| s == INDEX_SEGMENT) {
                tracing::warn!(
                    path = %path.display(),
                    "skipping document whose path ends in an index segment"
                );
                continue;
            }
            self.record(logical, path, found);
        }
        Ok(())
    }

    /// Insert a document, keeping `a/b.md` over `a/b/index.md` on collision.
    fn record(&self, logical: LogicalPath, file: PathBuf, found: &mut BTreeMap<LogicalPath, PathBuf>) {
        let index_name = format!("{INDEX_SEGMENT}.{}", self.extension);
        let is_index = |p: &Path| p.file_name().is_some_and(|n| *n == *index_name);

        match found.get(&logical) {
            None => {
                found.insert(logical, file);
            }
            Some(existing) => {
                tracing::warn!(
                    path = %logical,
                    first = %existing.display(),
                    second = %file.display(),
                    "two files map to the same document"
                );
                if is_index(existing) && !is_index(&file) {
                    found.insert(logical, file);
                }
            }
        }
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<LogicalPath>, StorageError> {
        if !self.source_dir.is_dir() {
            return Err(StorageError::not_found(self.source_dir.clone()).with_backend(BACKEND));
        }
        let mut found = BTreeMap::new();
        self.scan_directory(&self.source_dir, &mut found)?;
        tracing::debug!(count = found.len(), "scanned content directory");
        Ok(found.into_keys().collect())
    }

    fn read(&self, path: &LogicalPath) -> Result<Document, StorageError> {
        for candidate in self.candidates(path) {
            match fs::read_to_string(&candidate) {
                Ok(raw) => return parse_document(path, &raw, BACKEND),
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {}
                Err(e) if e.kind() == ErrorKind::IsADirectory => {}
                Err(e) => {
                    return Err(StorageError::io(e, Some(candidate)).with_backend(BACKEND));
                }
            }
        }
        Err(StorageError::not_found(path.to_string()).with_backend(BACKEND))
    }

    fn exists(&self, path: &LogicalPath) -> bool {
        self.candidates(path).iter().any(|p| p.is_file())
    }
}

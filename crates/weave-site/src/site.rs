//! Batch builds over every enumerated document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use weave_storage::{LogicalPath, StorageError};

use crate::page::{BuildError, PageBuilder, PagePayload};

/// Output file for the manifest, relative to the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// A successfully built page.
#[derive(Clone, Debug)]
pub struct BuiltPage {
    pub path: LogicalPath,
    pub payload: PagePayload,
}

/// A page that failed to build.
#[derive(Debug)]
pub struct BuildFailure {
    pub path: LogicalPath,
    pub error: BuildError,
}

/// Outcome of [`SiteBuilder::build_all`], sorted by path.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<BuiltPage>,
    pub failures: Vec<BuildFailure>,
}

#[derive(Serialize)]
struct Manifest<'a> {
    pages: Vec<ManifestEntry<'a>>,
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    path: String,
    segments: &'a [String],
    file: String,
}

/// Payload file for a path, relative to the output directory.
///
/// The root maps to `index.json`, `guide/setup` to `guide/setup.json`.
#[must_use]
pub fn payload_file(path: &LogicalPath) -> PathBuf {
    let Some((last, parents)) = path.segments().split_last() else {
        return PathBuf::from("index.json");
    };
    let mut file: PathBuf = parents.iter().collect();
    file.push(format!("{last}.json"));
    file
}

impl BuildReport {
    /// True when every page built.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Write every built page and the manifest under `dir`.
    ///
    /// Failed pages are skipped; the manifest lists built pages only.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a file cannot be written, or
    /// [`std::io::ErrorKind::InvalidInput`] when two pages map to the same
    /// file or a page's file would replace the manifest. Nothing is written
    /// in that case.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<()> {
        let mut entries = Vec::with_capacity(self.pages.len());
        let mut owners: HashMap<PathBuf, &LogicalPath> = HashMap::new();
        for page in &self.pages {
            let file = payload_file(&page.path);
            if file == Path::new(MANIFEST_FILENAME) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("page {} collides with {MANIFEST_FILENAME}", page.path),
                ));
            }
            if let Some(owner) = owners.insert(file.clone(), &page.path) {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "pages /{owner} and /{} both map to {}",
                        page.path,
                        file.display()
                    ),
                ));
            }
            entries.push(ManifestEntry {
                path: page.path.to_string(),
                segments: page.path.segments(),
                file: file.to_string_lossy().replace('\\', "/"),
            });
        }

        std::fs::create_dir_all(dir)?;
        for page in &self.pages {
            let target = dir.join(payload_file(&page.path));
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, serde_json::to_vec(&page.payload)?)?;
        }

        let manifest = serde_json::to_vec_pretty(&Manifest { pages: entries })?;
        std::fs::write(dir.join(MANIFEST_FILENAME), manifest)?;
        Ok(())
    }
}

/// Builds every document the content store enumerates.
pub struct SiteBuilder {
    pages: PageBuilder,
}

impl SiteBuilder {
    #[must_use]
    pub fn new(pages: PageBuilder) -> Self {
        Self { pages }
    }

    /// The underlying single-page builder.
    #[must_use]
    pub fn page_builder(&self) -> &PageBuilder {
        &self.pages
    }

    /// Enumerate build targets.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the content root cannot be scanned.
    pub fn targets(&self) -> Result<Vec<LogicalPath>, StorageError> {
        self.pages.storage().scan()
    }

    /// Build every enumerated page in parallel.
    ///
    /// A failing page is recorded in [`BuildReport::failures`] and does not
    /// stop the others.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] only if enumeration itself fails.
    pub fn build_all(&self) -> Result<BuildReport, StorageError> {
        let targets = self.targets()?;

        let results: Vec<(LogicalPath, Result<PagePayload, BuildError>)> = targets
            .into_par_iter()
            .map(|path| {
                let result = self.pages.build_page(&path);
                (path, result)
            })
            .collect();

        let mut report = BuildReport::default();
        for (path, result) in results {
            match result {
                Ok(payload) => report.pages.push(BuiltPage { path, payload }),
                Err(error) => {
                    tracing::warn!(path = %path, error = %error, "Page build failed");
                    report.failures.push(BuildFailure { path, error });
                }
            }
        }

        tracing::info!(
            built = report.pages.len(),
            failed = report.failures.len(),
            "Site build finished"
        );
        Ok(report)
    }
}

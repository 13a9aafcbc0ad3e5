//! Page build pipeline for docweave.
//!
//! This crate ties the pipeline together:
//! - [`PageBuilder`]: reads one document, compiles it (through the unit
//!   cache), executes the unit, postprocesses the tree and serializes the
//!   result into a [`PagePayload`]
//! - [`SiteBuilder`]: builds every enumerated document in parallel and
//!   collects a [`BuildReport`]
//! - [`Postprocessor`]: splits the executed tree into content and table of
//!   contents; [`TocPostprocessor`] is the default
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//! use weave_cache::FileCache;
//! use weave_compiler::{CachingCompiler, DocumentCompiler, UnitCache};
//! use weave_site::{PageBuilder, SiteBuilder};
//! use weave_storage::FsStorage;
//!
//! let cache = FileCache::new(PathBuf::from(".weave/cache"), "1");
//! let compiler = CachingCompiler::new(DocumentCompiler::default(), UnitCache::new(&cache), String::new());
//! let storage = Arc::new(FsStorage::new(PathBuf::from("content")));
//! let site = SiteBuilder::new(PageBuilder::new(storage, compiler, vec!["Note".to_owned()]));
//!
//! let report = site.build_all()?;
//! report.write_to(Path::new("dist"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod page;
mod postprocess;
mod site;

pub use page::{BuildError, PageBuilder, PagePayload};
pub use postprocess::{Postprocessor, Processed, TocEntry, TocPostprocessor};
pub use site::{BuildFailure, BuildReport, BuiltPage, MANIFEST_FILENAME, SiteBuilder, payload_file};

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::PageBuilder: Send, Sync);
    static_assertions::assert_impl_all!(super::SiteBuilder: Send, Sync);
    static_assertions::assert_impl_all!(super::BuildError: Send, Sync);
}

//! Content store access for docweave.
//!
//! This crate provides a [`Storage`] trait that separates the build pipeline
//! from where document text lives. It covers two jobs:
//!
//! - **Reading** a document for a [`LogicalPath`], splitting its YAML
//!   frontmatter into [`Metadata`] and keeping the remaining body text
//! - **Enumerating** every document reachable from the content root so the
//!   build knows which pages to produce
//!
//! # Path Convention
//!
//! A logical path is a sequence of segments. The filesystem backend maps it to
//! `a/b.md` first and falls back to `a/b/index.md`; the empty path is the site
//! root (`index.md`).
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use weave_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("content"));
//! for path in storage.scan()? {
//!     let doc = storage.read(&path)?;
//!     println!("{path}: {:?}", doc.metadata.title);
//! }
//! # Ok::<(), weave_storage::StorageError>(())
//! ```

mod frontmatter;
mod fs;
mod metadata;
#[cfg(feature = "mock")]
mod mock;
mod path;
mod storage;

pub use frontmatter::split_frontmatter;
pub use fs::FsStorage;
pub use metadata::{Metadata, MetadataError};
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use path::LogicalPath;
pub use storage::{Document, Storage, StorageError, StorageErrorKind};

//! Build cache for docweave.
//!
//! Compiled documents are expensive to produce and cheap to store, so the
//! build keeps them in a persistent cache between runs. This crate provides
//! the storage side of that cache:
//!
//! - [`Cache`]: Factory for named cache buckets
//! - [`CacheBucket`]: Key-value store with etag-based validation
//!
//! The cache is never load-bearing for correctness. Every read failure is a
//! miss and every write failure is logged and dropped, so callers can always
//! fall back to recomputing the value.
//!
//! # Implementations
//!
//! - [`NullCache`] / [`NullCacheBucket`]: No-op implementations (always miss)
//! - [`FileCache`]: File-based implementation with version validation
//!
//! # Example
//!
//! ```
//! use weave_cache::{Cache, NullCache};
//!
//! let cache = NullCache;
//! let bucket = cache.bucket("units");
//! bucket.set("3f/a2c1", "1", b"#!weave-unit 1\n");
//! assert_eq!(bucket.get("3f/a2c1", "1"), None); // NullCache always misses
//! ```

mod ext;
mod file;

pub use ext::CacheBucketExt;
pub use file::FileCache;

/// A named partition within a [`Cache`].
///
/// Each bucket stores key-value pairs where values are validated by an etag.
/// The etag is an opaque string chosen by the caller (e.g., a format version
/// or a content hash). A cache hit occurs only when both the key and etag
/// match.
///
/// Implementations must tolerate concurrent readers and concurrent writers of
/// the same key. Writers of the same key are expected to store identical
/// bytes, so last-writer-wins is acceptable.
pub trait CacheBucket: Send + Sync {
    /// Retrieve a cached value.
    ///
    /// Returns `Some(value)` if the key exists **and** was stored with the same
    /// `etag`. Returns `None` on cache miss, etag mismatch, or any I/O error.
    ///
    /// If `etag` is an empty string, etag validation is skipped and the cached
    /// data is returned regardless of the stored etag.
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>>;

    /// Store a value in the cache.
    ///
    /// Overwrites any existing entry for the same key, regardless of the
    /// previous etag. Failures are logged, never returned.
    fn set(&self, key: &str, etag: &str, value: &[u8]);
}

/// Factory for named cache [`CacheBucket`]s.
///
/// A `Cache` produces buckets that are logically isolated from each other.
/// A file-based cache stores each bucket in a separate subdirectory.
pub trait Cache: Send + Sync {
    /// Open or create a named bucket.
    ///
    /// Calling `bucket` multiple times with the same name may return
    /// independent handles that share the same underlying storage.
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket>;
}

/// No-op [`CacheBucket`] that never stores or retrieves data.
pub struct NullCacheBucket;

impl CacheBucket for NullCacheBucket {
    fn get(&self, _key: &str, _etag: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&self, _key: &str, _etag: &str, _value: &[u8]) {}
}

/// No-op [`Cache`] that always returns [`NullCacheBucket`]s.
///
/// Use when caching is disabled.
pub struct NullCache;

impl Cache for NullCache {
    fn bucket(&self, _name: &str) -> Box<dyn CacheBucket> {
        Box::new(NullCacheBucket)
    }
}

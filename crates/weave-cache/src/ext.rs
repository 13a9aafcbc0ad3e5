//! Extension trait for [`CacheBucket`] with string convenience methods.

use crate::CacheBucket;

/// String convenience methods for [`CacheBucket`].
///
/// [`CacheBucket`] stays object-safe and byte-oriented; callers get UTF-8
/// access through this blanket-implemented extension trait.
///
/// # Example
///
/// ```
/// use weave_cache::{Cache, CacheBucketExt, NullCache};
///
/// let cache = NullCache;
/// let bucket = cache.bucket("units");
///
/// bucket.set_string("ab/cd", "1", "#!weave-unit 1\n");
/// assert_eq!(bucket.get_string("ab/cd", "1"), None);
/// ```
pub trait CacheBucketExt: CacheBucket {
    /// Retrieve a cached UTF-8 string.
    ///
    /// Returns `None` on cache miss, etag mismatch, or invalid UTF-8.
    fn get_string(&self, key: &str, etag: &str) -> Option<String> {
        let bytes = self.get(key, etag)?;
        String::from_utf8(bytes).ok()
    }

    /// Store a string value in the cache.
    fn set_string(&self, key: &str, etag: &str, value: &str) {
        self.set(key, etag, value.as_bytes());
    }
}

impl<B: CacheBucket + ?Sized> CacheBucketExt for B {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cache, FileCache};

    #[test]
    fn test_string_round_trip_through_file_bucket() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("units");

        bucket.set_string("ab/cdef", "1", "#!weave-unit 1\nclose\n");
        assert_eq!(
            bucket.get_string("ab/cdef", "1").as_deref(),
            Some("#!weave-unit 1\nclose\n")
        );
        assert_eq!(bucket.get_string("ab/cdef", "2"), None);
    }

    #[test]
    fn test_get_string_invalid_utf8_is_miss() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cache = FileCache::new(tmp.path().join("cache"), "v1");
        let bucket = cache.bucket("units");

        bucket.set("k", "", &[0xFF, 0xFE]);
        assert_eq!(bucket.get_string("k", ""), None);
    }
}

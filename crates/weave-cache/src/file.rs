//! File-based cache implementation.
//!
//! [`FileCache`] stores cache entries as files on disk, organized into buckets
//! (subdirectories). Each entry is a single file with a binary header followed
//! by the data:
//!
//! ```text
//! [etag_len: u32 LE][etag bytes][data bytes]
//! ```
//!
//! On read, only the header is read first to validate the etag. The full data
//! is read only on cache hit, avoiding unnecessary I/O on mismatch.
//!
//! Entries are written to a uniquely named temporary file in the target
//! directory and renamed into place, so a reader never sees a half-written
//! entry and concurrent writers of one key simply replace each other.
//!
//! On construction, [`FileCache`] validates a `VERSION` file in the cache root.
//! If the version mismatches or is missing, the entire cache directory is wiped
//! and recreated.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Cache, CacheBucket};

/// Suffix counter for temporary entry files, unique within the process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-based [`Cache`] rooted at a directory on disk.
///
/// Directory layout:
/// ```text
/// {root}/
/// +-- VERSION            # contains the cache version string
/// +-- units/             # bucket "units"
///     +-- 3f/
///         +-- a2c1...    # cache entry
/// ```
pub struct FileCache {
    root: PathBuf,
}

impl FileCache {
    /// Open a file-based cache at `root`, validating the cache version.
    ///
    /// If the `VERSION` file inside `root` does not match `version`, the entire
    /// cache directory is removed and recreated with the new version. Errors
    /// during validation are logged but never fatal.
    #[must_use]
    pub fn new(root: PathBuf, version: &str) -> Self {
        validate_version(&root, version);
        Self { root }
    }

    /// Root directory of this cache.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Cache for FileCache {
    fn bucket(&self, name: &str) -> Box<dyn CacheBucket> {
        Box::new(FileCacheBucket {
            dir: self.root.join(name),
        })
    }
}

/// A single bucket backed by a directory on disk.
struct FileCacheBucket {
    dir: PathBuf,
}

impl FileCacheBucket {
    /// Resolve a key to a path inside the bucket.
    ///
    /// Keys may contain `/` separators but never escape the bucket directory.
    fn entry_path(&self, key: &str) -> Option<PathBuf> {
        let rel = Path::new(key);
        let is_plain = !key.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        is_plain.then(|| self.dir.join(rel))
    }
}

impl CacheBucket for FileCacheBucket {
    fn get(&self, key: &str, etag: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(key)?;
        let mut file = File::open(&path).ok()?;

        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf).ok()?;
        let etag_len = u32::from_le_bytes(len_buf) as usize;

        // A length larger than the file itself means a corrupt header.
        let file_len = file.metadata().ok()?.len();
        if etag_len as u64 > file_len.saturating_sub(4) {
            tracing::debug!(path = %path.display(), "corrupt cache entry header");
            return None;
        }

        let mut stored_etag = vec![0u8; etag_len];
        file.read_exact(&mut stored_etag).ok()?;

        if !etag.is_empty() && stored_etag != etag.as_bytes() {
            return None;
        }

        let mut data = Vec::new();
        file.read_to_end(&mut data).ok()?;
        Some(data)
    }

    fn set(&self, key: &str, etag: &str, value: &[u8]) {
        let Some(path) = self.entry_path(key) else {
            tracing::warn!(key, "refusing to write cache entry with invalid key");
            return;
        };
        let Some(parent) = path.parent() else {
            return;
        };
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(dir = %parent.display(), error = %e, "failed to create cache directory");
            return;
        }

        let etag_bytes = etag.as_bytes();
        let Ok(etag_len) = u32::try_from(etag_bytes.len()) else {
            tracing::warn!(key, "cache etag too long");
            return;
        };
        let mut buf = Vec::with_capacity(4 + etag_bytes.len() + value.len());
        buf.extend_from_slice(&etag_len.to_le_bytes());
        buf.extend_from_slice(etag_bytes);
        buf.extend_from_slice(value);

        let temp = parent.join(format!(
            ".tmp-{}-{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(e) = fs::write(&temp, &buf) {
            tracing::warn!(path = %temp.display(), error = %e, "failed to write cache entry");
            let _ = fs::remove_file(&temp);
            return;
        }
        if let Err(e) = fs::rename(&temp, &path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to commit cache entry");
            let _ = fs::remove_file(&temp);
        }
    }
}

/// Validate the cache version, wiping the directory on mismatch.
fn validate_version(root: &Path, version: &str) {
    let version_file = root.join("VERSION");

    match fs::read_to_string(&version_file) {
        Ok(stored) if stored == version => {
            tracing::debug!("cache version matches: {version}");
            return;
        }
        Ok(stored) => {
            tracing::info!(
                "cache version mismatch (stored={stored}, current={version}), wiping cache"
            );
        }
        Err(_) => {
            tracing::info!("no cache VERSION file found, initializing cache");
        }
    }

    if root.exists()
        && let Err(e) = fs::remove_dir_all(root)
    {
        tracing::warn!("failed to remove cache directory: {e}");
    }
    if let Err(e) = fs::create_dir_all(root) {
        tracing::warn!("failed to create cache directory: {e}");
        return;
    }
    if let Err(e) = fs::write(&version_file, version) {
        tracing::warn!("failed to write cache VERSION file: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tempfile::TempDir;

    fn open(tmp: &TempDir) -> FileCache {
        FileCache::new(tmp.path().join("cache"), "v1")
    }

    #[test]
    fn test_file_bucket_set_and_get() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp).bucket("units");

        bucket.set("ab/cdef", "1", b"#!weave-unit 1\n");
        assert_eq!(bucket.get("ab/cdef", "1"), Some(b"#!weave-unit 1\n".to_vec()));
    }

    #[test]
    fn test_file_bucket_etag_mismatch_misses() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp).bucket("units");

        bucket.set("key", "correct-etag", b"data");

        assert_eq!(bucket.get("key", "correct-etag"), Some(b"data".to_vec()));
        assert_eq!(bucket.get("key", "wrong-etag"), None);
    }

    #[test]
    fn test_file_bucket_empty_etag_skips_validation() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp).bucket("units");

        bucket.set("key", "some-etag", b"data");
        assert_eq!(bucket.get("key", ""), Some(b"data".to_vec()));
    }

    #[test]
    fn test_file_bucket_get_nonexistent_key() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp).bucket("units");

        assert_eq!(bucket.get("nonexistent", "etag"), None);
    }

    #[test]
    fn test_file_bucket_overwrite() {
        let tmp = TempDir::new().unwrap();
        let bucket = open(&tmp).bucket("units");

        bucket.set("key", "etag1", b"first");
        bucket.set("key", "etag2", b"second");

        assert_eq!(bucket.get("key", "etag1"), None);
        assert_eq!(bucket.get("key", "etag2"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_file_cache_buckets_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let cache = open(&tmp);

        let bucket_a = cache.bucket("alpha");
        let bucket_b = cache.bucket("beta");

        bucket_a.set("key", "etag", b"alpha-data");
        bucket_b.set("key", "etag", b"beta-data");

        assert_eq!(bucket_a.get("key", "etag"), Some(b"alpha-data".to_vec()));
        assert_eq!(bucket_b.get("key", "etag"), Some(b"beta-data".to_vec()));
    }

    #[test]
    fn test_truncated_entry_is_miss() {
        let tmp = TempDir::new().unwrap();
        let cache = open(&tmp);
        let dir = cache.root().join("units");
        fs::create_dir_all(&dir).unwrap();

        // Header claims a 100-byte etag but the file ends right after it.
        let mut bytes = 100u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"short");
        fs::write(dir.join("broken"), bytes).unwrap();
        fs::write(dir.join("tiny"), [1u8]).unwrap();

        let bucket = cache.bucket("units");
        assert_eq!(bucket.get("broken", ""), None);
        assert_eq!(bucket.get("tiny", ""), None);
    }

    #[test]
    fn test_keys_cannot_escape_bucket() {
        let tmp = TempDir::new().unwrap();
        let cache = open(&tmp);
        let bucket = cache.bucket("units");

        bucket.set("../escaped", "", b"data");
        assert!(!cache.root().join("escaped").exists());
        assert_eq!(bucket.get("../escaped", ""), None);
        assert_eq!(bucket.get("", ""), None);
    }

    #[test]
    fn test_set_into_unwritable_location_does_not_panic() {
        let tmp = TempDir::new().unwrap();
        let cache = open(&tmp);
        // A regular file where the bucket directory should be.
        fs::write(cache.root().join("units"), b"not a directory").unwrap();

        let bucket = cache.bucket("units");
        bucket.set("ab/cd", "", b"data");
        assert_eq!(bucket.get("ab/cd", ""), None);
    }

    #[test]
    fn test_concurrent_writers_same_key() {
        let tmp = TempDir::new().unwrap();
        let cache = Arc::new(open(&tmp));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    let bucket = cache.bucket("units");
                    for _ in 0..20 {
                        bucket.set("ab/same", "1", b"identical payload");
                        if let Some(data) = bucket.get("ab/same", "1") {
                            assert_eq!(data, b"identical payload");
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let bucket = cache.bucket("units");
        assert_eq!(bucket.get("ab/same", "1"), Some(b"identical payload".to_vec()));
        let leftovers = fs::read_dir(cache.root().join("units/ab"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp-"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_version_match_keeps_cache() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        let cache = FileCache::new(root.clone(), "v1");
        cache.bucket("units").set("key", "etag1", b"preserved");

        let cache2 = FileCache::new(root, "v1");
        assert_eq!(
            cache2.bucket("units").get("key", "etag1"),
            Some(b"preserved".to_vec())
        );
    }

    #[test]
    fn test_version_mismatch_wipes_cache() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        let cache = FileCache::new(root.clone(), "v1");
        cache.bucket("units").set("key", "etag1", b"will-be-wiped");

        let cache2 = FileCache::new(root.clone(), "v2");
        assert_eq!(cache2.bucket("units").get("key", "etag1"), None);

        let version = fs::read_to_string(root.join("VERSION")).unwrap();
        assert_eq!(version, "v2");
    }

    #[test]
    fn test_missing_version_file_wipes_cache() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("cache");

        fs::create_dir_all(root.join("units")).unwrap();
        fs::write(root.join("units/orphan"), b"stale data").unwrap();

        let cache = FileCache::new(root.clone(), "v1");
        assert_eq!(cache.bucket("units").get("orphan", ""), None);

        let version = fs::read_to_string(root.join("VERSION")).unwrap();
        assert_eq!(version, "v1");
    }

    #[test]
    fn test_nonexistent_root_creates_version() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("deeply/nested/cache");
        assert!(!root.exists());

        let _cache = FileCache::new(root.clone(), "v1");

        assert!(root.exists());
        let version = fs::read_to_string(root.join("VERSION")).unwrap();
        assert_eq!(version, "v1");
    }
}

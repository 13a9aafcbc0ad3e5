//! Fingerprint-keyed storage of compiled units.

use weave_cache::{Cache, CacheBucket, CacheBucketExt, NullCacheBucket};

use crate::fingerprint::Fingerprint;
use crate::unit::{CompiledUnit, UNIT_FORMAT_VERSION};

/// Bucket holding compiled units.
const BUCKET: &str = "units";

/// Compiled-unit cache over a [`CacheBucket`].
///
/// Lookups are exact: a unit is returned only for the fingerprint it was
/// stored under. Read failures are misses; write failures are logged by the
/// bucket and otherwise ignored.
pub struct UnitCache {
    bucket: Box<dyn CacheBucket>,
    etag: String,
}

impl UnitCache {
    /// Open the unit bucket of `cache`.
    #[must_use]
    pub fn new(cache: &dyn Cache) -> Self {
        Self::from_bucket(cache.bucket(BUCKET))
    }

    /// A cache that never hits.
    #[must_use]
    pub fn disabled() -> Self {
        Self::from_bucket(Box::new(NullCacheBucket))
    }

    fn from_bucket(bucket: Box<dyn CacheBucket>) -> Self {
        Self {
            bucket,
            etag: UNIT_FORMAT_VERSION.to_string(),
        }
    }

    /// Look up the unit stored for `fingerprint`.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CompiledUnit> {
        let text = self.bucket.get_string(&fingerprint.shard_key(), &self.etag)?;
        let unit = CompiledUnit::from_text(text);
        if unit.is_none() {
            tracing::debug!(%fingerprint, "ignoring cached entry without unit header");
        }
        unit
    }

    /// Store `unit` under `fingerprint`.
    pub fn set(&self, fingerprint: &Fingerprint, unit: &CompiledUnit) {
        self.bucket
            .set_string(&fingerprint.shard_key(), &self.etag, unit.as_str());
    }
}

#[cfg(test)]
mod tests {
    use weave_cache::{FileCache, NullCache};

    use super::*;

    fn unit(text: &str) -> CompiledUnit {
        CompiledUnit::from_text(format!("#!weave-unit 1\n{text}")).unwrap()
    }

    #[test]
    fn test_round_trip_through_file_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = UnitCache::new(&FileCache::new(tmp.path().to_path_buf(), "1"));
        let fp = Fingerprint::compute("body", &[], "", 1);

        assert_eq!(cache.get(&fp), None);
        cache.set(&fp, &unit("open p\nclose\n"));
        assert_eq!(cache.get(&fp), Some(unit("open p\nclose\n")));

        let other = Fingerprint::compute("body2", &[], "", 1);
        assert_eq!(cache.get(&other), None);
    }

    #[test]
    fn test_entries_are_sharded() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = UnitCache::new(&FileCache::new(tmp.path().to_path_buf(), "1"));
        let fp = Fingerprint::compute("body", &[], "", 1);
        cache.set(&fp, &unit(""));

        let expected = tmp
            .path()
            .join("units")
            .join(&fp.as_str()[..2])
            .join(&fp.as_str()[2..]);
        assert!(expected.is_file());
    }

    #[test]
    fn test_garbage_entry_is_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let file_cache = FileCache::new(tmp.path().to_path_buf(), "1");
        let fp = Fingerprint::compute("body", &[], "", 1);

        file_cache
            .bucket(BUCKET)
            .set(&fp.shard_key(), "1", b"not a unit");
        assert_eq!(UnitCache::new(&file_cache).get(&fp), None);

        file_cache
            .bucket(BUCKET)
            .set(&fp.shard_key(), "1", &[0xff, 0xfe, 0x00]);
        assert_eq!(UnitCache::new(&file_cache).get(&fp), None);
    }

    #[test]
    fn test_null_cache_always_misses() {
        let cache = UnitCache::new(&NullCache);
        let fp = Fingerprint::compute("body", &[], "", 1);
        cache.set(&fp, &unit(""));
        assert_eq!(cache.get(&fp), None);
        assert_eq!(UnitCache::disabled().get(&fp), None);
    }
}

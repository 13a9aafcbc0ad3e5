//! Content fingerprints for compiled units.

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest (lowercase hex) identifying one compile input.
///
/// Covers the document body, every declared component name in order, the
/// dependency lockfile snapshot and the unit format version. Each field is
/// length-prefixed so no two distinct inputs share a byte stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[must_use]
    pub fn compute(body: &str, names: &[String], lockfile: &str, format_version: u32) -> Self {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, body.as_bytes());
        hasher.update((names.len() as u64).to_le_bytes());
        for name in names {
            update_field(&mut hasher, name.as_bytes());
        }
        update_field(&mut hasher, lockfile.as_bytes());
        hasher.update(format_version.to_le_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cache key spreading entries over 256 directories (`ab/cdef...`).
    #[must_use]
    pub fn shard_key(&self) -> String {
        let (prefix, rest) = self.0.split_at(2);
        format!("{prefix}/{rest}")
    }
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

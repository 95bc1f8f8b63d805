//! Cache key derivation and freshness checks

use crate::types::CacheParams;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

pub const CACHE_FILE_EXTENSION: &str = "cache";

/// Number of hex characters of the digest kept in the file name
const HASH_PREFIX_LEN: usize = 16;

/// Derive the cache file for a `(source, params)` pair.
///
/// The file is named `{loader_name}_{hash}.cache`, where `hash` is the first
/// 16 hex characters of a SHA-256 over the source and the key-sorted
/// parameters. `loader_name` must be filesystem-safe.
pub fn derive_cache_path(
    cache_dir: &Path,
    loader_name: &str,
    source: &str,
    params: &CacheParams,
) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    // Fields are length-prefixed
    for (key, value) in params.iter() {
        hasher.update((key.len() as u64).to_le_bytes());
        hasher.update(key.as_bytes());
        hasher.update((value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }
    let digest = hex::encode(hasher.finalize());

    cache_dir.join(format!(
        "{}_{}.{}",
        loader_name,
        &digest[..HASH_PREFIX_LEN],
        CACHE_FILE_EXTENSION
    ))
}

/// Whether `path` is an existing file whose age is within `ttl_hours`.
///
/// A zero or negative TTL makes every entry stale.
pub fn is_fresh(path: &Path, ttl_hours: f64) -> bool {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => match meta.modified() {
            Ok(modified) => within_ttl(age_of(modified), ttl_hours),
            Err(_) => false,
        },
        _ => false,
    }
}

/// Whether a file name in the cache directory belongs to `loader_name`.
///
/// Only `{loader_name}_{16 hex}.cache` matches, so a loader never claims the
/// files of another loader whose name extends its own.
pub fn is_loader_entry(file_name: &str, loader_name: &str) -> bool {
    file_name
        .strip_prefix(loader_name)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(CACHE_FILE_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
        .is_some_and(|hash| {
            hash.len() == HASH_PREFIX_LEN && hash.bytes().all(|b| b.is_ascii_hexdigit())
        })
}

/// Time elapsed since `modified`; clock skew into the future counts as zero
pub(crate) fn age_of(modified: SystemTime) -> Duration {
    SystemTime::now()
        .duration_since(modified)
        .unwrap_or(Duration::ZERO)
}

pub(crate) fn within_ttl(age: Duration, ttl_hours: f64) -> bool {
    ttl_hours > 0.0 && age.as_secs_f64() / 3600.0 <= ttl_hours
}

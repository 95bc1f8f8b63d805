//! Cache types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Loader-specific parameters that take part in the cache key.
///
/// Backed by a sorted map, so the order in which parameters are added never
/// changes the derived key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheParams(BTreeMap<String, String>);

impl CacheParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, rendering the value with its `Display` impl
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for CacheParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

/// Outcome of a single `CachedLoader::load` call
#[derive(Debug, Clone)]
pub struct LoadResult<T> {
    pub payload: T,
    pub source: String,
    /// True iff the payload was read from the local cache
    pub was_cached: bool,
    /// Wall-clock duration of the whole load call
    pub elapsed: Duration,
    /// Location of the cache entry; `None` when caching is disabled
    pub cache_path: Option<PathBuf>,
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl<T> LoadResult<T> {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Transform the payload while keeping load provenance
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LoadResult<U> {
        LoadResult {
            payload: f(self.payload),
            source: self.source,
            was_cached: self.was_cached,
            elapsed: self.elapsed,
            cache_path: self.cache_path,
            metadata: self.metadata,
        }
    }
}

/// Details about one file in the cache directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFileInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: DateTime<Utc>,
    pub age_hours: f64,
    /// Whether the entry would count as a cache hit right now
    pub valid: bool,
}

/// Snapshot of a loader's cache directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheInfo {
    pub enabled: bool,
    pub directory: PathBuf,
    pub ttl_hours: f64,
    pub file_count: usize,
    pub total_size_bytes: u64,
    pub files: Vec<CacheFileInfo>,
}

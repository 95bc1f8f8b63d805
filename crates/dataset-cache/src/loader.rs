//! Fetch-or-reuse orchestration around a concrete dataset

use crate::config::LoaderConfig;
use crate::error::{CacheError, LoadError, Result};
use crate::keying::{age_of, derive_cache_path, is_fresh, is_loader_entry, within_ttl};
use crate::types::{CacheFileInfo, CacheInfo, CacheParams, LoadResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Capabilities a concrete dataset supplies to [`CachedLoader`]
pub trait Dataset {
    type Payload;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Loader type name, used as the cache file prefix. Must be filesystem-safe.
    const NAME: &'static str;

    /// Fetch fresh data from the authoritative source, bypassing any cache
    fn fetch(
        &self,
        source: &str,
        params: &CacheParams,
    ) -> std::result::Result<Self::Payload, Self::Error>;

    fn serialize(
        &self,
        payload: &Self::Payload,
        path: &Path,
    ) -> std::result::Result<(), CacheError>;

    fn deserialize(&self, path: &Path) -> std::result::Result<Self::Payload, CacheError>;
}

/// Loads a dataset, reusing a fresh on-disk copy when one exists
pub struct CachedLoader<D> {
    dataset: D,
    config: LoaderConfig,
}

impl<D: Dataset> CachedLoader<D> {
    pub fn new(dataset: D, config: LoaderConfig) -> Self {
        Self { dataset, config }
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Cache file for a `(source, params)` pair in this loader's directory
    pub fn cache_path(&self, source: &str, params: &CacheParams) -> PathBuf {
        derive_cache_path(&self.config.cache_dir, D::NAME, source, params)
    }

    /// Load the dataset for `source`.
    ///
    /// Returns the cached copy when caching is enabled and a fresh entry
    /// deserializes cleanly. Otherwise fetches from the source and stores the
    /// result on a best-effort basis. Only a failed fetch is an error.
    pub fn load(&self, source: &str, params: &CacheParams) -> Result<LoadResult<D::Payload>> {
        let started = Instant::now();
        let cache_path = self
            .config
            .cache_enabled
            .then(|| self.cache_path(source, params));

        if let Some(path) = &cache_path {
            if is_fresh(path, self.config.cache_ttl_hours) {
                match self.dataset.deserialize(path) {
                    Ok(payload) => {
                        debug!(loader = D::NAME, source, path = ?path, "Cache hit");
                        return Ok(self.finish(payload, source, true, started, cache_path));
                    }
                    Err(e) => {
                        self.report_cache_error("Failed to read cache entry", &e, path);
                        self.discard(path);
                    }
                }
            } else {
                debug!(loader = D::NAME, source, path = ?path, "Cache miss");
            }
        }

        debug!(loader = D::NAME, source, "Fetching dataset from source");
        let payload = self
            .dataset
            .fetch(source, params)
            .map_err(|e| LoadError::classify(source, e))?;

        if let Some(path) = &cache_path {
            if let Err(e) = self.store(&payload, path) {
                self.report_cache_error("Failed to write cache entry", &e, path);
                self.discard(path);
            }
        }

        Ok(self.finish(payload, source, false, started, cache_path))
    }

    /// Delete every cache file belonging to this loader, returning how many
    /// were removed
    pub fn clear_cache(&self) -> usize {
        if !self.config.cache_enabled {
            return 0;
        }
        let removed = self
            .entries()
            .iter()
            .filter(|path| self.discard(path))
            .count();
        info!(loader = D::NAME, removed, "Cleared cache");
        removed
    }

    /// Delete the cache file for one `(source, params)` pair (0 or 1)
    pub fn clear_entry(&self, source: &str, params: &CacheParams) -> usize {
        if !self.config.cache_enabled {
            return 0;
        }
        usize::from(self.discard(&self.cache_path(source, params)))
    }

    /// Describe this loader's cache directory without modifying it
    pub fn cache_info(&self) -> CacheInfo {
        let mut files = Vec::new();

        if self.config.cache_enabled {
            for path in self.entries() {
                let Ok(meta) = fs::metadata(&path) else {
                    continue;
                };
                let Ok(modified) = meta.modified() else {
                    continue;
                };
                let age = age_of(modified);
                files.push(CacheFileInfo {
                    path,
                    size_bytes: meta.len(),
                    modified: DateTime::<Utc>::from(modified),
                    age_hours: age.as_secs_f64() / 3600.0,
                    valid: within_ttl(age, self.config.cache_ttl_hours),
                });
            }
        }

        CacheInfo {
            enabled: self.config.cache_enabled,
            directory: self.config.cache_dir.clone(),
            ttl_hours: self.config.cache_ttl_hours,
            file_count: files.len(),
            total_size_bytes: files.iter().map(|f| f.size_bytes).sum(),
            files,
        }
    }

    fn finish(
        &self,
        payload: D::Payload,
        source: &str,
        was_cached: bool,
        started: Instant,
        cache_path: Option<PathBuf>,
    ) -> LoadResult<D::Payload> {
        let mut metadata = BTreeMap::new();
        metadata.insert(
            "cache_ttl_hours".to_string(),
            serde_json::Value::from(self.config.cache_ttl_hours),
        );
        metadata.insert("loader".to_string(), serde_json::Value::from(D::NAME));

        LoadResult {
            payload,
            source: source.to_string(),
            was_cached,
            elapsed: started.elapsed(),
            cache_path,
            metadata,
        }
    }

    fn store(&self, payload: &D::Payload, path: &Path) -> std::result::Result<(), CacheError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        self.dataset.serialize(payload, path)?;
        info!(loader = D::NAME, path = ?path, "Saved dataset to cache");
        Ok(())
    }

    /// Cache files in the directory that belong to this loader, sorted by path
    fn entries(&self) -> Vec<PathBuf> {
        let Ok(dir) = fs::read_dir(&self.config.cache_dir) else {
            return Vec::new();
        };

        let mut paths: Vec<PathBuf> = dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| is_loader_entry(name, D::NAME))
            })
            .map(|entry| entry.path())
            .collect();
        paths.sort();
        paths
    }

    /// Remove a cache file; failures are logged and swallowed
    fn discard(&self, path: &Path) -> bool {
        match fs::remove_file(path) {
            Ok(()) => {
                debug!(loader = D::NAME, path = ?path, "Removed cache entry");
                true
            }
            Err(e) if is_absent(&e) => false,
            Err(e) => {
                warn!(loader = D::NAME, path = ?path, error = %e, "Failed to remove cache entry");
                false
            }
        }
    }

    fn report_cache_error(&self, message: &str, err: &CacheError, path: &Path) {
        if self.config.debug {
            warn!(loader = D::NAME, path = ?path, error = %err, "{message}");
        } else {
            debug!(loader = D::NAME, path = ?path, error = %err, "{message}");
        }
    }
}

/// The path does not exist, possibly because a parent is a regular file
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

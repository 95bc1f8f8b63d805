//! Cached remote-dataset loader
//!
//! Fetches a dataset from a remote source and keeps a copy on local disk with
//! TTL-based expiration. Corrupted cache files are detected on read, removed,
//! and replaced by a fresh fetch. Every load reports where the data came from
//! and how long it took.
//!
//! Concrete datasets implement [`Dataset`]; the fetch-or-reuse orchestration
//! lives once in [`CachedLoader`].

mod config;
mod error;
mod keying;
mod loader;
mod types;

pub use config::{LoaderConfig, Settings};
pub use error::{CacheError, ConfigError, LoadError, Result};
pub use keying::{derive_cache_path, is_fresh, is_loader_entry, CACHE_FILE_EXTENSION};
pub use loader::{CachedLoader, Dataset};
pub use types::{CacheFileInfo, CacheInfo, CacheParams, LoadResult};

//! Process settings and per-loader configuration

use crate::error::ConfigError;
use std::path::PathBuf;

const ENV_PREFIX: &str = "COMPARE_REGIONS_";
const CACHE_DIR_NAME: &str = "compare-regions-jp";

const DEFAULT_CACHE_TTL_HOURS: i64 = 24;
const MAX_CACHE_TTL_HOURS: i64 = 168; // 1 week
const DEFAULT_HTTP_TIMEOUT_SECS: i64 = 30;
const MAX_HTTP_TIMEOUT_SECS: i64 = 300;

/// Process-wide settings, read once at startup and handed to loaders
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cache_enabled: bool,
    pub cache_dir: PathBuf,
    /// 1..=168
    pub cache_ttl_hours: u32,
    /// Gates warn-level cache diagnostics
    pub debug: bool,
    /// Transport timeout for dataset downloads, 1..=300
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_dir: default_cache_dir(),
            cache_ttl_hours: DEFAULT_CACHE_TTL_HOURS as u32,
            debug: false,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS as u64,
        }
    }
}

impl Settings {
    /// Read settings from `COMPARE_REGIONS_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Keys are the full variable names, e.g. `COMPARE_REGIONS_CACHE_DIR`.
    /// Missing keys fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        let cache_enabled = match get("CACHE_ENABLED") {
            Some((key, value)) => parse_bool(&key, &value)?,
            None => defaults.cache_enabled,
        };

        let cache_dir = get("CACHE_DIR")
            .map(|(_, value)| PathBuf::from(value))
            .unwrap_or(defaults.cache_dir);

        let cache_ttl_hours = match get("CACHE_TTL_HOURS") {
            Some((key, value)) => parse_ranged(&key, &value, 1, MAX_CACHE_TTL_HOURS)? as u32,
            None => defaults.cache_ttl_hours,
        };

        let debug = match get("DEBUG") {
            Some((key, value)) => parse_bool(&key, &value)?,
            None => defaults.debug,
        };

        let http_timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some((key, value)) => parse_ranged(&key, &value, 1, MAX_HTTP_TIMEOUT_SECS)? as u64,
            None => defaults.http_timeout_secs,
        };

        Ok(Self {
            cache_enabled,
            cache_dir,
            cache_ttl_hours,
            debug,
            http_timeout_secs,
        })
    }
}

/// Configuration for a single `CachedLoader` instance.
///
/// Built from [`Settings`] and optionally overridden per loader. The loader
/// never consults the environment after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub cache_enabled: bool,
    pub cache_ttl_hours: f64,
    pub cache_dir: PathBuf,
    pub debug: bool,
}

impl LoaderConfig {
    /// Disable caching for this loader. Passing `true` keeps the current
    /// value, so a loader cannot re-enable caching turned off in [`Settings`].
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = self.cache_enabled && enabled;
        self
    }

    pub fn with_ttl_hours(mut self, ttl_hours: f64) -> Self {
        self.cache_ttl_hours = ttl_hours;
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl From<&Settings> for LoaderConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            cache_enabled: settings.cache_enabled,
            cache_ttl_hours: f64::from(settings.cache_ttl_hours),
            cache_dir: settings.cache_dir.clone(),
            debug: settings.debug,
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(CACHE_DIR_NAME)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "a boolean",
        }),
    }
}

fn parse_ranged(key: &str, value: &str, min: i64, max: i64) -> Result<i64, ConfigError> {
    let parsed = value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "an integer",
        })?;

    if !(min..=max).contains(&parsed) {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value: parsed,
            min,
            max,
        });
    }
    Ok(parsed)
}

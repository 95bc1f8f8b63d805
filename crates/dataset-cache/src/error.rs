//! Error types for the dataset cache

use std::error::Error as StdError;
use std::fmt;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The dataset could not be obtained at all.
///
/// Fatal for the call that produced it: `CachedLoader::load` always
/// propagates it to the caller.
#[derive(Debug)]
pub struct LoadError {
    data_source: String,
    message: String,
    cause: Option<BoxError>,
}

impl LoadError {
    pub fn new(data_source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data_source: data_source.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        data_source: impl Into<String>,
        message: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        Self {
            data_source: data_source.into(),
            message: message.into(),
            cause: Some(cause.into()),
        }
    }

    /// Turn an arbitrary fetch failure into a `LoadError`.
    ///
    /// A failure that already is a `LoadError` passes through untouched;
    /// anything else is wrapped and kept as the cause.
    pub fn classify<E>(data_source: &str, err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let boxed: BoxError = Box::new(err);
        match boxed.downcast::<LoadError>() {
            Ok(load_err) => *load_err,
            Err(other) => Self {
                data_source: data_source.to_string(),
                message: other.to_string(),
                cause: Some(other),
            },
        }
    }

    /// The source (usually a URL) that could not be loaded
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying failure, if one was captured
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to load dataset from {}: {}",
            self.data_source, self.message
        )
    }
}

impl StdError for LoadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// A cache-local operation failed.
///
/// Never escapes `CachedLoader::load`: a failed read falls through to a
/// fresh fetch and a failed write is logged and dropped.
#[derive(Debug)]
pub enum CacheError {
    Io(Box<std::io::Error>),
    Encode(String),
    Decode(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Io(err) => write!(f, "Cache IO error: {}", err),
            CacheError::Encode(msg) => write!(f, "Cache encode error: {}", msg),
            CacheError::Decode(msg) => write!(f, "Cache decode error: {}", msg),
        }
    }
}

impl StdError for CacheError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CacheError::Io(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CacheError {
    fn from(err: std::io::Error) -> Self {
        CacheError::Io(Box::new(err))
    }
}

/// Invalid process settings
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
    OutOfRange {
        key: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "Invalid value for {key}: {value:?} (expected {expected})"),
            ConfigError::OutOfRange {
                key,
                value,
                min,
                max,
            } => write!(f, "{key} must be between {min} and {max}, got {value}"),
        }
    }
}

impl StdError for ConfigError {}

pub type Result<T> = std::result::Result<T, LoadError>;

//! Error types for the railway dataset

use std::fmt;

#[derive(Debug)]
pub enum RailwayError {
    Http(Box<reqwest::Error>),
    Status(u16),
    Json(serde_json::Error),
    InvalidGeoJson(String),
    InvalidUrl(String),
    InvalidBbox(String),
}

impl fmt::Display for RailwayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RailwayError::Http(err) => write!(f, "HTTP error: {}", err),
            RailwayError::Status(code) => write!(f, "Dataset server returned status {}", code),
            RailwayError::Json(err) => write!(f, "JSON parse error: {}", err),
            RailwayError::InvalidGeoJson(msg) => write!(f, "Invalid GeoJSON: {}", msg),
            RailwayError::InvalidUrl(msg) => write!(f, "Invalid dataset URL: {}", msg),
            RailwayError::InvalidBbox(msg) => write!(f, "Invalid bounding box: {}", msg),
        }
    }
}

impl std::error::Error for RailwayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RailwayError::Http(err) => Some(err.as_ref()),
            RailwayError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RailwayError {
    fn from(err: reqwest::Error) -> Self {
        RailwayError::Http(Box::new(err))
    }
}

impl From<serde_json::Error> for RailwayError {
    fn from(err: serde_json::Error) -> Self {
        RailwayError::Json(err)
    }
}

pub type Result<T> = std::result::Result<T, RailwayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = RailwayError::Status(404);
        assert_eq!(format!("{}", err), "Dataset server returned status 404");
    }

    #[test]
    fn test_invalid_bbox_display() {
        let err = RailwayError::InvalidBbox("expected 4 values".to_string());
        assert_eq!(
            format!("{}", err),
            "Invalid bounding box: expected 4 values"
        );
    }

    #[test]
    fn test_json_error_has_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: RailwayError = json_err.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}

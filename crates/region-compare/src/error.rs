//! Error types for region comparison

use std::fmt;

#[derive(Debug)]
pub enum RegionError {
    InvalidCoordinates(f64, f64),
    InvalidExtent(f64),
    Bbox(railway_data::RailwayError),
    Load(dataset_cache::LoadError),
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCoordinates(lat, lng) => {
                write!(f, "Invalid coordinates: {lat}, {lng}")
            }
            Self::InvalidExtent(extent) => {
                write!(f, "Invalid bounding box half-extent: {extent}")
            }
            Self::Bbox(e) => write!(f, "{e}"),
            Self::Load(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RegionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bbox(e) => Some(e),
            Self::Load(e) => Some(e),
            _ => None,
        }
    }
}

impl From<railway_data::RailwayError> for RegionError {
    fn from(err: railway_data::RailwayError) -> Self {
        Self::Bbox(err)
    }
}

impl From<dataset_cache::LoadError> for RegionError {
    fn from(err: dataset_cache::LoadError) -> Self {
        Self::Load(err)
    }
}

pub type Result<T> = std::result::Result<T, RegionError>;

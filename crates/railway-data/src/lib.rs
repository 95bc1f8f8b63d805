//! Railway service-frequency data
//!
//! Loads the GTFS-GIS.jp per-station train frequency dataset (a GeoJSON
//! FeatureCollection of station points) through [`dataset_cache::CachedLoader`],
//! optionally narrowed to a bounding box.
//!
//! Data licence: CC BY 4.0 / ODbL, provided by GTFS-GIS.jp.
//!
//! # Example
//!
//! ```no_run
//! use dataset_cache::{CachedLoader, LoaderConfig, Settings};
//! use railway_data::{load_railway_data, BoundingBox, RailwayDataset};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::from_env()?;
//! let loader = CachedLoader::new(
//!     RailwayDataset::from_settings(&settings),
//!     LoaderConfig::from(&settings),
//! );
//!
//! let bbox: BoundingBox = "139.69,35.65,139.71,35.70".parse()?;
//! let result = load_railway_data(&loader, Some(bbox))?;
//! println!("{} stations (cached: {})", result.payload.len(), result.was_cached);
//! # Ok(())
//! # }
//! ```

mod bbox;
mod dataset;
mod error;
mod types;

pub use bbox::BoundingBox;
pub use dataset::{load_railway_data, RailwayDataset, BBOX_PARAM, DEFAULT_DATA_URL};
pub use error::{RailwayError, Result};
pub use types::{
    StationCollection, StationFeature, ARRIVALS_PROPERTY, DEPARTURES_PROPERTY,
    STATION_NAME_PROPERTY,
};

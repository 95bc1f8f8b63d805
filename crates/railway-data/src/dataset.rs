//! Railway dataset loader

use crate::bbox::BoundingBox;
use crate::error::{RailwayError, Result};
use crate::types::StationCollection;
use dataset_cache::{CacheError, CacheParams, CachedLoader, Dataset, LoadResult, Settings};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_DATA_URL: &str =
    "https://gtfs-gis.jp/railway_honsu/data/unkohonsu2024_rosen_eki.geojson";

/// Cache parameter carrying the `minx,miny,maxx,maxy` filter
pub const BBOX_PARAM: &str = "bbox";

const USER_AGENT: &str = "compare-regions-jp/0.1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Downloads the GTFS-GIS.jp station frequency GeoJSON
pub struct RailwayDataset {
    http: reqwest::blocking::Client,
    data_url: String,
}

impl RailwayDataset {
    /// Create a dataset with the default URL and a 30 second timeout
    pub fn new() -> Self {
        Self::with_url_and_timeout(DEFAULT_DATA_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a dataset using the transport timeout from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_url_and_timeout(
            DEFAULT_DATA_URL,
            Duration::from_secs(settings.http_timeout_secs),
        )
    }

    /// Create a dataset with a custom data URL and timeout
    pub fn with_url_and_timeout(data_url: &str, timeout: Duration) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            data_url: data_url.to_string(),
        }
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    fn download(&self, source: &str) -> Result<StationCollection> {
        let url = url::Url::parse(source)
            .map_err(|e| RailwayError::InvalidUrl(format!("{source}: {e}")))?;

        info!("Data licence: CC BY 4.0, ODbL (provided by GTFS-GIS.jp)");
        info!(url = %url, "Downloading railway service-frequency data");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/geo+json, application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(RailwayError::Status(response.status().as_u16()));
        }

        let body = response.bytes()?;
        let collection = StationCollection::from_geojson(&body)?;
        debug!(stations = collection.len(), "Parsed railway dataset");
        Ok(collection)
    }
}

impl Default for RailwayDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl Dataset for RailwayDataset {
    type Payload = StationCollection;
    type Error = RailwayError;

    const NAME: &'static str = "railway";

    fn fetch(&self, source: &str, params: &CacheParams) -> Result<StationCollection> {
        // Validate the filter before spending a download on it
        let bbox = params
            .get(BBOX_PARAM)
            .map(str::parse::<BoundingBox>)
            .transpose()?;

        let collection = self.download(source)?;

        Ok(match bbox {
            Some(bbox) => {
                let filtered = collection.within(&bbox);
                debug!(
                    bbox = %bbox,
                    before = collection.len(),
                    after = filtered.len(),
                    "Filtered stations to bounding box"
                );
                filtered
            }
            None => collection,
        })
    }

    fn serialize(
        &self,
        payload: &StationCollection,
        path: &Path,
    ) -> std::result::Result<(), CacheError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, &payload.to_geojson())
            .map_err(|e| CacheError::Encode(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    fn deserialize(&self, path: &Path) -> std::result::Result<StationCollection, CacheError> {
        let bytes = fs::read(path)?;
        StationCollection::from_geojson(&bytes).map_err(|e| CacheError::Decode(e.to_string()))
    }
}

/// Load the railway dataset, optionally narrowed to `bbox`.
///
/// The data URL is the source; the bounding box travels as a cache
/// parameter, so each box gets its own cache entry.
pub fn load_railway_data(
    loader: &CachedLoader<RailwayDataset>,
    bbox: Option<BoundingBox>,
) -> dataset_cache::Result<LoadResult<StationCollection>> {
    let params = match bbox {
        Some(bbox) => CacheParams::new().with(BBOX_PARAM, bbox),
        None => CacheParams::new(),
    };
    loader.load(loader.dataset().data_url(), &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ARRIVALS_PROPERTY, STATION_NAME_PROPERTY};
    use dataset_cache::LoaderConfig;
    use serde_json::{json, Map, Value};
    use tempfile::tempdir;

    // Nothing listens on port 1; connections are refused immediately
    const UNREACHABLE_URL: &str = "http://127.0.0.1:1/railway.geojson";

    fn station(name: &str, lon: f64, lat: f64, arrivals: u64) -> crate::StationFeature {
        let mut props = Map::new();
        props.insert(STATION_NAME_PROPERTY.to_string(), json!(name));
        props.insert(ARRIVALS_PROPERTY.to_string(), json!(arrivals));
        crate::StationFeature::new(lon, lat, props)
    }

    fn sample() -> StationCollection {
        StationCollection::new(vec![
            station("渋谷", 139.7016, 35.6580, 100),
            station("新宿", 139.7004, 35.6896, 150),
        ])
    }

    fn offline_dataset() -> RailwayDataset {
        RailwayDataset::with_url_and_timeout(UNREACHABLE_URL, Duration::from_secs(2))
    }

    #[test]
    fn test_defaults() {
        let dataset = RailwayDataset::new();
        assert_eq!(dataset.data_url(), DEFAULT_DATA_URL);
        assert_eq!(RailwayDataset::NAME, "railway");
    }

    #[test]
    fn test_serialize_then_deserialize() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("railway_test.cache");
        let dataset = offline_dataset();

        dataset.serialize(&sample(), &path).unwrap();
        let raw: Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["type"], "FeatureCollection");

        let loaded = dataset.deserialize(&path).unwrap();
        assert_eq!(loaded, sample());
        assert_eq!(loaded.features[0].name(), Some("渋谷"));
    }

    #[test]
    fn test_serialize_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("railway_test.cache");
        let err = offline_dataset().serialize(&sample(), &path).unwrap_err();
        assert!(matches!(err, CacheError::Io(_)));
    }

    #[test]
    fn test_deserialize_errors() {
        let dir = tempdir().unwrap();
        let dataset = offline_dataset();

        let missing = dataset
            .deserialize(&dir.path().join("nonexistent.cache"))
            .unwrap_err();
        assert!(matches!(missing, CacheError::Io(_)));

        let corrupt = dir.path().join("corrupt.cache");
        fs::write(&corrupt, "corrupted data").unwrap();
        let err = dataset.deserialize(&corrupt).unwrap_err();
        assert!(matches!(err, CacheError::Decode(_)));
    }

    #[test]
    fn test_fetch_network_error() {
        let dataset = offline_dataset();
        let err = dataset
            .fetch(UNREACHABLE_URL, &CacheParams::new())
            .unwrap_err();
        // A configured HTTP proxy may answer with an error status instead
        assert!(matches!(
            err,
            RailwayError::Http(_) | RailwayError::Status(_)
        ));
    }

    #[test]
    fn test_fetch_rejects_bad_inputs_before_download() {
        let dataset = offline_dataset();

        let err = dataset.fetch("not a url", &CacheParams::new()).unwrap_err();
        assert!(matches!(err, RailwayError::InvalidUrl(_)));

        let params = CacheParams::new().with(BBOX_PARAM, "1,2,3");
        let err = dataset.fetch(UNREACHABLE_URL, &params).unwrap_err();
        assert!(matches!(err, RailwayError::InvalidBbox(_)));
    }

    #[test]
    fn test_load_uses_seeded_cache() {
        let dir = tempdir().unwrap();
        let config = LoaderConfig::default().with_cache_dir(dir.path());
        let loader = CachedLoader::new(offline_dataset(), config);

        let bbox = BoundingBox::new(139.69, 35.65, 139.71, 35.70).unwrap();
        let params = CacheParams::new().with(BBOX_PARAM, bbox);
        let path = loader.cache_path(UNREACHABLE_URL, &params);
        loader.dataset().serialize(&sample(), &path).unwrap();

        let result = load_railway_data(&loader, Some(bbox)).unwrap();
        assert!(result.was_cached);
        assert_eq!(result.source, UNREACHABLE_URL);
        assert_eq!(result.cache_path, Some(path));
        assert_eq!(result.payload.len(), 2);
    }

    #[test]
    fn test_bbox_gets_its_own_cache_entry() {
        let dir = tempdir().unwrap();
        let config = LoaderConfig::default().with_cache_dir(dir.path());
        let loader = CachedLoader::new(offline_dataset(), config);

        let bbox = BoundingBox::new(139.69, 35.65, 139.71, 35.70).unwrap();
        let whole = loader.cache_path(UNREACHABLE_URL, &CacheParams::new());
        let boxed = loader.cache_path(UNREACHABLE_URL, &CacheParams::new().with(BBOX_PARAM, bbox));
        assert_ne!(whole, boxed);
    }

    #[test]
    fn test_load_failure_names_source() {
        let dir = tempdir().unwrap();
        let config = LoaderConfig::default()
            .with_cache_dir(dir.path())
            .with_cache_enabled(false);
        let loader = CachedLoader::new(offline_dataset(), config);

        let err = load_railway_data(&loader, None).unwrap_err();
        assert_eq!(err.data_source(), UNREACHABLE_URL);
        assert!(err.to_string().contains(UNREACHABLE_URL));
    }
}

//! Station features and their GeoJSON representation

use crate::bbox::BoundingBox;
use crate::error::{RailwayError, Result};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Station name property in the upstream dataset
pub const STATION_NAME_PROPERTY: &str = "駅名";
/// Daily arriving trains
pub const ARRIVALS_PROPERTY: &str = "着数1";
/// Daily departing trains
pub const DEPARTURES_PROPERTY: &str = "発数1";

/// A station point with its upstream properties kept verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct StationFeature {
    pub longitude: f64,
    pub latitude: f64,
    pub properties: Map<String, Value>,
}

impl StationFeature {
    pub fn new(longitude: f64, latitude: f64, properties: Map<String, Value>) -> Self {
        Self {
            longitude,
            latitude,
            properties,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get(STATION_NAME_PROPERTY)?.as_str()
    }

    /// Numeric value of a count property. Numeric strings are accepted too.
    pub fn count(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Point features of the railway dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationCollection {
    pub features: Vec<StationFeature>,
}

impl StationCollection {
    pub fn new(features: Vec<StationFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StationFeature> {
        self.features.iter()
    }

    /// Features whose point lies inside `bbox`
    pub fn within(&self, bbox: &BoundingBox) -> StationCollection {
        Self::new(
            self.features
                .iter()
                .filter(|f| bbox.contains(f.longitude, f.latitude))
                .cloned()
                .collect(),
        )
    }

    /// Parse a GeoJSON FeatureCollection.
    ///
    /// Only `Point` features are kept; features with other or missing
    /// geometry are skipped.
    pub fn from_geojson(bytes: &[u8]) -> Result<Self> {
        let doc: FeatureCollectionDoc = serde_json::from_slice(bytes)?;
        if doc.kind != "FeatureCollection" {
            return Err(RailwayError::InvalidGeoJson(format!(
                "expected a FeatureCollection, got {:?}",
                doc.kind
            )));
        }

        let total = doc.features.len();
        let features: Vec<StationFeature> = doc
            .features
            .into_iter()
            .filter_map(FeatureDoc::into_station)
            .collect();

        if features.len() < total {
            tracing::debug!(
                skipped = total - features.len(),
                kept = features.len(),
                "Skipped non-point features"
            );
        }

        Ok(Self::new(features))
    }

    /// Render as a GeoJSON FeatureCollection
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .features
            .iter()
            .map(|f| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [f.longitude, f.latitude]
                    },
                    "properties": f.properties,
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

impl<'a> IntoIterator for &'a StationCollection {
    type Item = &'a StationFeature;
    type IntoIter = std::slice::Iter<'a, StationFeature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollectionDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<FeatureDoc>,
}

#[derive(Debug, Deserialize)]
struct FeatureDoc {
    geometry: Option<GeometryDoc>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct GeometryDoc {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

impl FeatureDoc {
    fn into_station(self) -> Option<StationFeature> {
        let geometry = self.geometry?;
        if geometry.kind != "Point" {
            return None;
        }
        let coords = geometry.coordinates.as_array()?;
        let longitude = coords.first()?.as_f64()?;
        let latitude = coords.get(1)?.as_f64()?;
        Some(StationFeature::new(
            longitude,
            latitude,
            self.properties.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"駅名": "渋谷", "着数1": 100, "発数1": 102},
                "geometry": {"type": "Point", "coordinates": [139.7016, 35.6580]}
            },
            {
                "type": "Feature",
                "properties": {"駅名": "新宿", "着数1": 150, "発数1": "155"},
                "geometry": {"type": "Point", "coordinates": [139.7004, 35.6896]}
            },
            {
                "type": "Feature",
                "properties": {"路線名": "山手線"},
                "geometry": {"type": "LineString", "coordinates": [[139.70, 35.65], [139.70, 35.69]]}
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_keeps_point_features() {
        let collection = StationCollection::from_geojson(SAMPLE.as_bytes()).unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.features[0].name(), Some("渋谷"));
        assert_eq!(collection.features[1].name(), Some("新宿"));
        assert_eq!(collection.features[0].longitude, 139.7016);
        assert_eq!(collection.features[0].latitude, 35.6580);
    }

    #[test]
    fn test_count_accepts_numbers_and_numeric_strings() {
        let collection = StationCollection::from_geojson(SAMPLE.as_bytes()).unwrap();
        assert_eq!(collection.features[0].count(ARRIVALS_PROPERTY), Some(100.0));
        assert_eq!(collection.features[1].count(DEPARTURES_PROPERTY), Some(155.0));
        assert_eq!(collection.features[0].count(STATION_NAME_PROPERTY), None);
        assert_eq!(collection.features[0].count("missing"), None);
    }

    #[test]
    fn test_rejects_non_feature_collection() {
        let err = StationCollection::from_geojson(br#"{"type": "Feature"}"#).unwrap_err();
        assert!(matches!(err, RailwayError::InvalidGeoJson(_)));

        let err = StationCollection::from_geojson(b"corrupted data").unwrap_err();
        assert!(matches!(err, RailwayError::Json(_)));
    }

    #[test]
    fn test_geojson_output_reparses() {
        let collection = StationCollection::from_geojson(SAMPLE.as_bytes()).unwrap();
        let rendered = serde_json::to_vec(&collection.to_geojson()).unwrap();
        let reparsed = StationCollection::from_geojson(&rendered).unwrap();
        assert_eq!(reparsed, collection);
    }

    #[test]
    fn test_within_filters_by_bbox() {
        let collection = StationCollection::from_geojson(SAMPLE.as_bytes()).unwrap();
        let bbox = BoundingBox::new(139.69, 35.65, 139.71, 35.67).unwrap();

        let inside = collection.within(&bbox);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside.features[0].name(), Some("渋谷"));
    }
}

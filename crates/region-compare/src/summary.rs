//! Per-region aggregation of station counts

use railway_data::{BoundingBox, StationCollection};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summed counts for the stations inside one bounding box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub label: String,
    pub bbox: BoundingBox,
    pub station_count: usize,
    /// Metric name to summed value; stations lacking a metric add nothing
    pub totals: BTreeMap<String, f64>,
}

impl RegionSummary {
    pub fn from_stations(
        label: impl Into<String>,
        bbox: BoundingBox,
        stations: &StationCollection,
        metrics: &[String],
    ) -> Self {
        let mut totals: BTreeMap<String, f64> =
            metrics.iter().map(|m| (m.clone(), 0.0)).collect();
        let mut station_count = 0;

        for station in stations
            .iter()
            .filter(|s| bbox.contains(s.longitude, s.latitude))
        {
            station_count += 1;
            for (metric, total) in totals.iter_mut() {
                if let Some(value) = station.count(metric) {
                    *total += value;
                }
            }
        }

        Self {
            label: label.into(),
            bbox,
            station_count,
            totals,
        }
    }

    pub fn total(&self, metric: &str) -> f64 {
        self.totals.get(metric).copied().unwrap_or(0.0)
    }
}

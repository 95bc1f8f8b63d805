//! Comparison of two regions

use crate::error::Result;
use crate::region::Coordinate;
use crate::summary::RegionSummary;
use dataset_cache::CachedLoader;
use railway_data::{
    load_railway_data, RailwayDataset, ARRIVALS_PROPERTY, DEPARTURES_PROPERTY,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

/// About 1 km north-south
const DEFAULT_HALF_EXTENT_DEG: f64 = 0.01;
const DEFAULT_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Degrees on each side of a point
    pub half_extent_deg: f64,
    /// Station properties to sum
    pub metrics: Vec<String>,
    /// Relative difference above which a metric is flagged
    pub threshold: f64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            half_extent_deg: DEFAULT_HALF_EXTENT_DEG,
            metrics: vec![
                ARRIVALS_PROPERTY.to_string(),
                DEPARTURES_PROPERTY.to_string(),
            ],
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDifference {
    pub metric: String,
    pub a: f64,
    pub b: f64,
    /// `b - a`
    pub absolute: f64,
    /// `(b - a) / a`; `None` when `a` is zero
    pub relative: Option<f64>,
    pub significant: bool,
}

impl MetricDifference {
    /// With no baseline, any nonzero change is significant
    fn new(metric: &str, a: f64, b: f64, threshold: f64) -> Self {
        let absolute = b - a;
        let relative = (a != 0.0).then(|| absolute / a);
        let significant = match relative {
            Some(r) => r.abs() > threshold,
            None => absolute != 0.0,
        };
        Self {
            metric: metric.to_string(),
            a,
            b,
            absolute,
            relative,
            significant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionComparison {
    pub a: RegionSummary,
    pub b: RegionSummary,
    pub threshold: f64,
    pub differences: Vec<MetricDifference>,
}

impl RegionComparison {
    pub fn between(a: RegionSummary, b: RegionSummary, threshold: f64) -> Self {
        let metrics: BTreeSet<&String> = a.totals.keys().chain(b.totals.keys()).collect();
        let differences = metrics
            .into_iter()
            .map(|m| MetricDifference::new(m, a.total(m), b.total(m), threshold))
            .collect();

        Self {
            a,
            b,
            threshold,
            differences,
        }
    }

    pub fn difference(&self, metric: &str) -> Option<&MetricDifference> {
        self.differences.iter().find(|d| d.metric == metric)
    }
}

/// A comparison together with where its data came from
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub comparison: RegionComparison,
    pub source: String,
    pub was_cached: bool,
    pub elapsed: Duration,
}

/// Compare train service around two points.
///
/// The full dataset is loaded once through `loader` and both regions are cut
/// from it.
pub fn compare_points(
    loader: &CachedLoader<RailwayDataset>,
    a: Coordinate,
    b: Coordinate,
    options: &CompareOptions,
) -> Result<ComparisonReport> {
    let bbox_a = a.bounding_box(options.half_extent_deg)?;
    let bbox_b = b.bounding_box(options.half_extent_deg)?;

    let loaded = load_railway_data(loader, None)?;
    info!(
        source = %loaded.source,
        cached = loaded.was_cached,
        elapsed_secs = loaded.elapsed_seconds(),
        stations = loaded.payload.len(),
        "Loaded railway data"
    );

    let summary_a = RegionSummary::from_stations("A", bbox_a, &loaded.payload, &options.metrics);
    let summary_b = RegionSummary::from_stations("B", bbox_b, &loaded.payload, &options.metrics);
    debug!(
        a_stations = summary_a.station_count,
        b_stations = summary_b.station_count,
        "Aggregated regions"
    );

    Ok(ComparisonReport {
        comparison: RegionComparison::between(summary_a, summary_b, options.threshold),
        source: loaded.source,
        was_cached: loaded.was_cached,
        elapsed: loaded.elapsed,
    })
}
